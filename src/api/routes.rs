use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::health::health_check;
use super::{auth, users, workouts};
use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::llm::GeminiClient;
use crate::services::GenerationService;
use crate::storage::PgTrainingStore;

pub fn create_routes(db: PgPool, config: &AppConfig, gemini: GeminiClient) -> Router {
    let auth_service = AuthService::new(db.clone(), &config.jwt_secret);
    let generation = Arc::new(GenerationService::new(
        PgTrainingStore::new(db.clone()),
        gemini,
    ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth::auth_routes(auth_service.clone()))
        .nest(
            "/api/users",
            users::user_routes(db.clone(), auth_service.clone()),
        )
        .nest(
            "/api/workouts",
            workouts::workout_routes(db, auth_service, generation),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}
