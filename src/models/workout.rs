use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Easy" => Some(Difficulty::Easy),
            "Medium" => Some(Difficulty::Medium),
            "Hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request parameters for one workout. Doubles as the create-workout
/// request body and the prompt-builder input.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkoutParams {
    pub difficulty: Difficulty,
    #[validate(length(min = 1, message = "workout_type is required"))]
    pub workout_type: String,
    #[validate(length(min = 1, message = "equipment_access is required"))]
    pub equipment_access: String,
    pub target_area: Option<String>,
    pub length_minutes: Option<i32>,
    pub included_exercises: Option<String>,
    pub excluded_exercises: Option<String>,
    pub other_considerations: Option<String>,
}

/// One workout request together with its generation and revision history.
///
/// `suggested_workouts` holds one entry per generation turn (never empty once
/// the record exists, last entry is current); `suggested_changes` holds one
/// entry per revision turn, so `suggested_workouts.len() ==
/// suggested_changes.len() + 1` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub params: WorkoutParams,
    pub suggested_changes: Vec<String>,
    pub suggested_workouts: Vec<String>,
    pub revision: i32,
    pub rating: Option<i32>,
    pub comments: Option<String>,
    pub actual_length_minutes: Option<i32>,
}

impl Workout {
    /// The latest generated workout text.
    pub fn latest_suggestion(&self) -> Option<&str> {
        self.suggested_workouts.last().map(String::as_str)
    }
}

/// PATCH body for a workout: either a revision request (`suggested_change`
/// present, which contacts the generation backend) or a feedback update,
/// or both.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWorkoutRequest {
    pub suggested_change: Option<String>,
    #[validate(range(min = 0, max = 5, message = "rating must be between 0 and 5"))]
    pub rating: Option<i32>,
    pub comments: Option<String>,
    pub actual_length_minutes: Option<i32>,
}

impl UpdateWorkoutRequest {
    pub fn has_feedback(&self) -> bool {
        self.rating.is_some() || self.comments.is_some() || self.actual_length_minutes.is_some()
    }

    pub fn feedback(&self) -> WorkoutFeedback {
        WorkoutFeedback {
            rating: self.rating,
            comments: self.comments.clone(),
            actual_length_minutes: self.actual_length_minutes,
        }
    }
}

/// User-supplied feedback on a workout, never sent to the generation backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutFeedback {
    pub rating: Option<i32>,
    pub comments: Option<String>,
    pub actual_length_minutes: Option<i32>,
}
