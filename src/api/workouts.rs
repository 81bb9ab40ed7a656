use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{jwt_auth_middleware, AuthService, AuthUser};
use crate::errors::AppError;
use crate::llm::GeminiClient;
use crate::models::{DailyRecommendation, UpdateWorkoutRequest, Workout, WorkoutParams};
use crate::services::GenerationService;
use crate::storage::{PgTrainingStore, TrainingStore};

/// The orchestrator as wired for production.
pub type AppGenerationService = GenerationService<PgTrainingStore, GeminiClient>;

/// Shared state for workout routes
#[derive(Clone)]
pub struct WorkoutAppState {
    pub store: PgTrainingStore,
    pub generation: Arc<AppGenerationService>,
}

/// Workout routes
pub fn workout_routes(
    db: PgPool,
    auth_service: AuthService,
    generation: Arc<AppGenerationService>,
) -> Router {
    let state = WorkoutAppState {
        store: PgTrainingStore::new(db),
        generation,
    };

    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/recommendation", get(daily_recommendation))
        .route(
            "/:id",
            get(get_workout).patch(update_workout).delete(delete_workout),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Create a workout: generate from the request parameters and the caller's
/// health data, then persist the record.
#[tracing::instrument(skip(state, params), fields(user_id = %user.id))]
async fn create_workout(
    State(state): State<WorkoutAppState>,
    Extension(user): Extension<AuthUser>,
    Json(params): Json<WorkoutParams>,
) -> Result<(StatusCode, Json<Workout>), AppError> {
    params
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let workout = state.generation.create_workout(user.id, params).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

/// List the caller's workouts, newest first
async fn list_workouts(
    State(state): State<WorkoutAppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Workout>>, AppError> {
    let workouts = state.store.list_workouts(user.id).await?;
    Ok(Json(workouts))
}

/// Fetch one workout
async fn get_workout(
    State(state): State<WorkoutAppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Workout>, AppError> {
    let workout = state.store.get_workout(user.id, id).await?;
    Ok(Json(workout))
}

/// Patch a workout: a revision request when `suggested_change` is present
/// (this contacts the generation backend), a plain feedback update
/// otherwise.
#[tracing::instrument(skip(state, request), fields(user_id = %user.id))]
async fn update_workout(
    State(state): State<WorkoutAppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkoutRequest>,
) -> Result<Json<Workout>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut workout = match &request.suggested_change {
        Some(change) => {
            state
                .generation
                .revise_workout(user.id, id, change)
                .await?
        }
        None => state.store.get_workout(user.id, id).await?,
    };

    if request.has_feedback() {
        workout = state
            .store
            .update_feedback(user.id, id, request.feedback())
            .await?;
    }

    Ok(Json(workout))
}

/// Delete a workout
async fn delete_workout(
    State(state): State<WorkoutAppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.store.delete_workout(user.id, id).await?;
    Ok(Json(json!({"message": "Workout deleted successfully."})))
}

/// Today's recommendation, generated on first request of the day
#[tracing::instrument(skip(state), fields(user_id = %user.id))]
async fn daily_recommendation(
    State(state): State<WorkoutAppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DailyRecommendation>, AppError> {
    let recommendation = state.generation.daily_recommendation(user.id).await?;
    Ok(Json(recommendation))
}
