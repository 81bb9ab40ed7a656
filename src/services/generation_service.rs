use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm::{prompts, GenerationClient};
use crate::models::{DailyRecommendation, Workout, WorkoutParams};
use crate::storage::TrainingStore;

/// How many recent workouts feed a daily recommendation.
const RECENT_WORKOUT_LIMIT: i64 = 3;

/// Orchestrates workout creation, revision and the daily recommendation.
///
/// One generation call per operation, synchronous and independent. Every
/// generation failure aborts the operation before anything is persisted, so
/// stored state never reflects a half-finished turn.
pub struct GenerationService<S, G> {
    store: S,
    client: G,
}

impl<S: TrainingStore, G: GenerationClient> GenerationService<S, G> {
    pub fn new(store: S, client: G) -> Self {
        Self { store, client }
    }

    /// Generate a workout for the given parameters and persist the new
    /// record with the generated text as its first suggestion.
    pub async fn create_workout(
        &self,
        user_id: Uuid,
        params: WorkoutParams,
    ) -> Result<Workout, AppError> {
        validate_params(&params)?;

        let health = self.store.health_attributes(user_id).await?;
        let prompt = prompts::creation_prompt(&params, &health);

        let generated = self.client.complete(&prompt).await.map_err(|e| {
            warn!(%user_id, "workout generation failed: {e}");
            e
        })?;

        info!(%user_id, "workout generated, persisting record");
        self.store.create_workout(user_id, params, generated).await
    }

    /// Apply one revision turn to an existing workout.
    ///
    /// The stored histories seed the conversation; `change_text` is sent as
    /// the final user turn, and only after the backend answers are both
    /// sequences appended in a single guarded write. A concurrent revision
    /// of the same record surfaces as [`AppError::Conflict`].
    pub async fn revise_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        change_text: &str,
    ) -> Result<Workout, AppError> {
        if change_text.trim().is_empty() {
            return Err(AppError::Validation(
                "suggested_change must not be empty".to_string(),
            ));
        }

        let workout = self.store.get_workout(user_id, workout_id).await?;
        let seed = prompts::revision_seed(&workout.suggested_changes, &workout.suggested_workouts);
        let final_prompt = prompts::revision_prompt(change_text);

        let generated = self
            .client
            .complete_with_history(&seed, &final_prompt)
            .await
            .map_err(|e| {
                warn!(%user_id, %workout_id, "workout revision failed: {e}");
                e
            })?;

        info!(%user_id, %workout_id, "revision generated, appending to history");
        self.store
            .append_revision(
                user_id,
                workout_id,
                workout.revision,
                change_text.to_string(),
                generated,
            )
            .await
    }

    /// Return today's recommendation, generating and persisting one from the
    /// user's recent workouts if none exists yet.
    ///
    /// Users with no workout history get a canned, unpersisted placeholder.
    pub async fn daily_recommendation(
        &self,
        user_id: Uuid,
    ) -> Result<DailyRecommendation, AppError> {
        if let Some(existing) = self.store.recommendation_for_today(user_id).await? {
            return Ok(existing);
        }

        let count = self.store.count_workouts(user_id).await?;
        if count == 0 {
            return Ok(DailyRecommendation {
                id: Uuid::new_v4(),
                user_id,
                created_at: Utc::now(),
                recommendation: prompts::PLACEHOLDER_RECOMMENDATION.to_string(),
            });
        }

        let recent = self
            .store
            .list_recent_workouts(user_id, count.min(RECENT_WORKOUT_LIMIT))
            .await?;
        let latest_texts: Vec<String> = recent
            .iter()
            .filter_map(|w| w.latest_suggestion().map(str::to_string))
            .collect();

        let prompt = prompts::recommendation_prompt(&latest_texts);
        let generated = self.client.complete(&prompt).await.map_err(|e| {
            warn!(%user_id, "recommendation generation failed: {e}");
            e
        })?;

        info!(%user_id, "daily recommendation generated, persisting");
        self.store.create_recommendation(user_id, generated).await
    }
}

fn validate_params(params: &WorkoutParams) -> Result<(), AppError> {
    if params.workout_type.trim().is_empty() {
        return Err(AppError::Validation("workout_type is required".to_string()));
    }
    if params.equipment_access.trim().is_empty() {
        return Err(AppError::Validation(
            "equipment_access is required".to_string(),
        ));
    }
    Ok(())
}
