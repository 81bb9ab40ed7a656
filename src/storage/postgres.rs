use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    DailyRecommendation, Difficulty, ExperienceLevel, Gender, HealthAttributes, Workout,
    WorkoutFeedback, WorkoutKind, WorkoutParams,
};
use crate::storage::TrainingStore;

const WORKOUT_COLUMNS: &str = "id, user_id, created_at, difficulty, workout_type, \
     equipment_access, target_area, length_minutes, included_exercises, excluded_exercises, \
     other_considerations, suggested_changes, suggested_workouts, revision, rating, comments, \
     actual_length_minutes";

/// Postgres-backed [`TrainingStore`].
#[derive(Debug, Clone)]
pub struct PgTrainingStore {
    db: PgPool,
}

impl PgTrainingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct WorkoutRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    difficulty: String,
    workout_type: String,
    equipment_access: String,
    target_area: Option<String>,
    length_minutes: Option<i32>,
    included_exercises: Option<String>,
    excluded_exercises: Option<String>,
    other_considerations: Option<String>,
    suggested_changes: Vec<String>,
    suggested_workouts: Vec<String>,
    revision: i32,
    rating: Option<i32>,
    comments: Option<String>,
    actual_length_minutes: Option<i32>,
}

impl TryFrom<WorkoutRow> for Workout {
    type Error = AppError;

    fn try_from(row: WorkoutRow) -> Result<Self, Self::Error> {
        let difficulty = Difficulty::from_str(&row.difficulty).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "unknown difficulty '{}' stored for workout {}",
                row.difficulty,
                row.id
            ))
        })?;

        Ok(Workout {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
            params: WorkoutParams {
                difficulty,
                workout_type: row.workout_type,
                equipment_access: row.equipment_access,
                target_area: row.target_area,
                length_minutes: row.length_minutes,
                included_exercises: row.included_exercises,
                excluded_exercises: row.excluded_exercises,
                other_considerations: row.other_considerations,
            },
            suggested_changes: row.suggested_changes,
            suggested_workouts: row.suggested_workouts,
            revision: row.revision,
            rating: row.rating,
            comments: row.comments,
            actual_length_minutes: row.actual_length_minutes,
        })
    }
}

#[derive(Debug, FromRow)]
struct HealthRow {
    gender: Option<String>,
    height_m: Option<f64>,
    weight_kg: Option<f64>,
    favourite_workout_type: Option<String>,
    experience: Option<String>,
    fitness_goal: Option<String>,
    injuries: Option<String>,
}

impl From<HealthRow> for HealthAttributes {
    fn from(row: HealthRow) -> Self {
        HealthAttributes {
            gender: row.gender.as_deref().and_then(Gender::from_str),
            height_m: row.height_m,
            weight_kg: row.weight_kg,
            favourite_workout_type: row
                .favourite_workout_type
                .as_deref()
                .and_then(WorkoutKind::from_str),
            experience: row.experience.as_deref().and_then(ExperienceLevel::from_str),
            fitness_goal: row.fitness_goal,
            injuries: row.injuries,
        }
    }
}

#[async_trait]
impl TrainingStore for PgTrainingStore {
    async fn health_attributes(&self, user_id: Uuid) -> Result<HealthAttributes, AppError> {
        let row = sqlx::query_as::<_, HealthRow>(
            "SELECT gender, height_m, weight_kg, favourite_workout_type, experience, \
             fitness_goal, injuries \
             FROM health_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(HealthAttributes::from).unwrap_or_default())
    }

    async fn create_workout(
        &self,
        user_id: Uuid,
        params: WorkoutParams,
        generated_text: String,
    ) -> Result<Workout, AppError> {
        let row = sqlx::query_as::<_, WorkoutRow>(&format!(
            "INSERT INTO workouts (id, user_id, created_at, difficulty, workout_type, \
             equipment_access, target_area, length_minutes, included_exercises, \
             excluded_exercises, other_considerations, suggested_changes, suggested_workouts, \
             revision) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0) \
             RETURNING {WORKOUT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Utc::now())
        .bind(params.difficulty.as_str())
        .bind(&params.workout_type)
        .bind(&params.equipment_access)
        .bind(&params.target_area)
        .bind(params.length_minutes)
        .bind(&params.included_exercises)
        .bind(&params.excluded_exercises)
        .bind(&params.other_considerations)
        .bind(Vec::<String>::new())
        .bind(vec![generated_text])
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<Workout, AppError> {
        let row = sqlx::query_as::<_, WorkoutRow>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Workout"))?;

        row.try_into()
    }

    async fn list_workouts(&self, user_id: Uuid) -> Result<Vec<Workout>, AppError> {
        let rows = sqlx::query_as::<_, WorkoutRow>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Workout::try_from).collect()
    }

    async fn list_recent_workouts(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Workout>, AppError> {
        let rows = sqlx::query_as::<_, WorkoutRow>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Workout::try_from).collect()
    }

    async fn count_workouts(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

        Ok(count)
    }

    async fn append_revision(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        expected_revision: i32,
        change_text: String,
        generated_text: String,
    ) -> Result<Workout, AppError> {
        let row = sqlx::query_as::<_, WorkoutRow>(&format!(
            "UPDATE workouts \
             SET suggested_changes = array_append(suggested_changes, $4), \
                 suggested_workouts = array_append(suggested_workouts, $5), \
                 revision = revision + 1 \
             WHERE id = $1 AND user_id = $2 AND revision = $3 \
             RETURNING {WORKOUT_COLUMNS}"
        ))
        .bind(workout_id)
        .bind(user_id)
        .bind(expected_revision)
        .bind(change_text)
        .bind(generated_text)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => {
                let exists: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2)",
                )
                .bind(workout_id)
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

                if exists {
                    Err(AppError::Conflict(format!(
                        "workout {workout_id} was revised concurrently"
                    )))
                } else {
                    Err(AppError::not_found("Workout"))
                }
            }
        }
    }

    async fn update_feedback(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        feedback: WorkoutFeedback,
    ) -> Result<Workout, AppError> {
        let row = sqlx::query_as::<_, WorkoutRow>(&format!(
            "UPDATE workouts \
             SET rating = COALESCE($3, rating), \
                 comments = COALESCE($4, comments), \
                 actual_length_minutes = COALESCE($5, actual_length_minutes) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {WORKOUT_COLUMNS}"
        ))
        .bind(workout_id)
        .bind(user_id)
        .bind(feedback.rating)
        .bind(&feedback.comments)
        .bind(feedback.actual_length_minutes)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Workout"))?;

        row.try_into()
    }

    async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Workout"));
        }
        Ok(())
    }

    async fn recommendation_for_today(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DailyRecommendation>, AppError> {
        let recommendation = sqlx::query_as::<_, DailyRecommendation>(
            "SELECT id, user_id, created_at, recommendation FROM recommendations \
             WHERE user_id = $1 \
               AND (created_at AT TIME ZONE 'UTC')::date = (NOW() AT TIME ZONE 'UTC')::date \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(recommendation)
    }

    async fn create_recommendation(
        &self,
        user_id: Uuid,
        text: String,
    ) -> Result<DailyRecommendation, AppError> {
        let recommendation = sqlx::query_as::<_, DailyRecommendation>(
            "INSERT INTO recommendations (id, user_id, created_at, recommendation) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, created_at, recommendation",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Utc::now())
        .bind(text)
        .fetch_one(&self.db)
        .await?;

        Ok(recommendation)
    }
}
