use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use sqlx::PgPool;

use crate::auth::{jwt_auth_middleware, AuthService, AuthUser};
use crate::errors::AppError;
use crate::models::{ProfileResponse, UpdateProfileRequest};
use crate::services::UserService;

/// Profile routes
pub fn user_routes(db: PgPool, auth_service: AuthService) -> Router {
    let service = UserService::new(db);

    Router::new()
        .route(
            "/profile",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(service)
}

/// Fetch the caller's profile and health data
async fn get_profile(
    State(service): State<UserService>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = service.get_profile(user.id).await?;
    Ok(Json(profile))
}

/// Update the caller's profile and health data
async fn update_profile(
    State(service): State<UserService>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = service.update_profile(user.id, request).await?;
    Ok(Json(profile))
}

/// Delete the caller's account together with its profile and workout data
async fn delete_profile(
    State(service): State<UserService>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    service.delete_account(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
