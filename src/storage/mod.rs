//! Persistence boundary for the generation flow.

mod postgres;

pub use postgres::PgTrainingStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{DailyRecommendation, HealthAttributes, Workout, WorkoutFeedback, WorkoutParams};

/// Storage operations the workout orchestration depends on.
///
/// `user_id` scopes every workout operation to the requester; a workout that
/// exists but belongs to someone else is indistinguishable from one that
/// does not exist.
#[async_trait]
pub trait TrainingStore: Send + Sync {
    /// Snapshot of the requester's health attributes for prompt
    /// construction. A user without a stored profile yields the empty
    /// snapshot rather than an error.
    async fn health_attributes(&self, user_id: Uuid) -> Result<HealthAttributes, AppError>;

    async fn create_workout(
        &self,
        user_id: Uuid,
        params: WorkoutParams,
        generated_text: String,
    ) -> Result<Workout, AppError>;

    async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<Workout, AppError>;

    /// All of the user's workouts, newest first.
    async fn list_workouts(&self, user_id: Uuid) -> Result<Vec<Workout>, AppError>;

    /// The user's most recent workouts, newest first.
    async fn list_recent_workouts(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Workout>, AppError>;

    async fn count_workouts(&self, user_id: Uuid) -> Result<i64, AppError>;

    /// Append one revision turn to both history sequences atomically.
    ///
    /// Guarded by `expected_revision`: the append only applies if the stored
    /// record still has that revision count, otherwise the call fails with
    /// [`AppError::Conflict`] and nothing changes.
    async fn append_revision(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        expected_revision: i32,
        change_text: String,
        generated_text: String,
    ) -> Result<Workout, AppError>;

    async fn update_feedback(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        feedback: WorkoutFeedback,
    ) -> Result<Workout, AppError>;

    async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<(), AppError>;

    /// The user's recommendation for the current UTC day, if one exists.
    async fn recommendation_for_today(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DailyRecommendation>, AppError>;

    async fn create_recommendation(
        &self,
        user_id: Uuid,
        text: String,
    ) -> Result<DailyRecommendation, AppError>;
}
