use chrono::Utc;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    ExperienceLevel, Gender, HealthProfile, ProfileResponse, UpdateProfileRequest, User,
    WorkoutKind,
};

/// Account and health-profile management. The health profile is created
/// together with the account and only ever updated in place.
#[derive(Debug, Clone)]
pub struct UserService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct HealthProfileRow {
    date_of_birth: Option<chrono::NaiveDate>,
    gender: Option<String>,
    height_m: Option<f64>,
    weight_kg: Option<f64>,
    favourite_workout_type: Option<String>,
    experience: Option<String>,
    fitness_goal: Option<String>,
    injuries: Option<String>,
    other_considerations: Option<String>,
}

impl From<HealthProfileRow> for HealthProfile {
    fn from(row: HealthProfileRow) -> Self {
        HealthProfile {
            date_of_birth: row.date_of_birth,
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
            other_considerations: row.other_considerations,
        }
    }
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileResponse, AppError> {
        let user = self.get_user(user_id).await?;
        let health = self.get_health_profile(user_id).await?;

        Ok(ProfileResponse {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_new: user.is_new,
            health_data: health,
        })
    }

    /// Merge name and health-data updates into the profile. Once the
    /// essential health fields are all populated the account stops counting
    /// as new.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let user = self.get_user(user_id).await?;
        let mut health = self.get_health_profile(user_id).await?;

        if let Some(update) = request.health_data {
            if update.date_of_birth.is_some() {
                health.date_of_birth = update.date_of_birth;
            }
            if update.gender.is_some() {
                health.gender = update.gender;
            }
            if update.height_m.is_some() {
                health.height_m = update.height_m;
            }
            if update.weight_kg.is_some() {
                health.weight_kg = update.weight_kg;
            }
            if update.favourite_workout_type.is_some() {
                health.favourite_workout_type = update.favourite_workout_type;
            }
            if update.experience.is_some() {
                health.experience = update.experience;
            }
            if update.fitness_goal.is_some() {
                health.fitness_goal = update.fitness_goal;
            }
            if update.injuries.is_some() {
                health.injuries = update.injuries;
            }
            if update.other_considerations.is_some() {
                health.other_considerations = update.other_considerations;
            }
        }

        let is_new = user.is_new && !health.is_complete();
        let now = Utc::now();

        let mut tx = self.db.begin().await?;

        sqlx::query(
            "UPDATE users \
             SET first_name = COALESCE($2, first_name), \
                 last_name = COALESCE($3, last_name), \
                 is_new = $4, \
                 updated_at = $5 \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(is_new)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE health_profiles \
             SET date_of_birth = $2, gender = $3, height_m = $4, weight_kg = $5, \
                 favourite_workout_type = $6, experience = $7, fitness_goal = $8, \
                 injuries = $9, other_considerations = $10, updated_at = $11 \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(health.date_of_birth)
        .bind(health.gender.map(|g| g.as_str()))
        .bind(health.height_m)
        .bind(health.weight_kg)
        .bind(health.favourite_workout_type.map(|w| w.as_str()))
        .bind(health.experience.map(|e| e.as_str()))
        .bind(&health.fitness_goal)
        .bind(&health.injuries)
        .bind(&health.other_considerations)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ProfileResponse {
            first_name: request.first_name.or(user.first_name),
            last_name: request.last_name.or(user.last_name),
            email: user.email,
            is_new,
            health_data: health,
        })
    }

    /// Delete the account; the health profile, workouts and recommendations
    /// go with it via cascading foreign keys.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Profile"));
        }
        Ok(())
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, first_name, last_name, is_new, created_at, \
             updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Profile"))
    }

    async fn get_health_profile(&self, user_id: Uuid) -> Result<HealthProfile, AppError> {
        let row = sqlx::query_as::<_, HealthProfileRow>(
            "SELECT date_of_birth, gender, height_m, weight_kg, favourite_workout_type, \
             experience, fitness_goal, injuries, other_considerations \
             FROM health_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(HealthProfile::from).unwrap_or_default())
    }
}
