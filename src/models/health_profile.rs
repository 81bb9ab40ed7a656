use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The workout types a user can mark as their favourite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutKind {
    #[serde(rename = "Resistance Training")]
    ResistanceTraining,
    Cardio,
    Circuits,
    Crossfit,
    Yoga,
}

impl WorkoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::ResistanceTraining => "Resistance Training",
            WorkoutKind::Cardio => "Cardio",
            WorkoutKind::Circuits => "Circuits",
            WorkoutKind::Crossfit => "Crossfit",
            WorkoutKind::Yoga => "Yoga",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Resistance Training" => Some(WorkoutKind::ResistanceTraining),
            "Cardio" => Some(WorkoutKind::Cardio),
            "Circuits" => Some(WorkoutKind::Circuits),
            "Crossfit" => Some(WorkoutKind::Crossfit),
            "Yoga" => Some(WorkoutKind::Yoga),
            _ => None,
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Expert => "Expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Beginner" => Some(ExperienceLevel::Beginner),
            "Intermediate" => Some(ExperienceLevel::Intermediate),
            "Expert" => Some(ExperienceLevel::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's health data. Created empty alongside the account and kept
/// one-to-one with it; every field is optional until the user fills it in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthProfile {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub favourite_workout_type: Option<WorkoutKind>,
    pub experience: Option<ExperienceLevel>,
    pub fitness_goal: Option<String>,
    pub injuries: Option<String>,
    pub other_considerations: Option<String>,
}

impl HealthProfile {
    /// The essential fields a user must fill in before the account stops
    /// counting as new.
    pub fn is_complete(&self) -> bool {
        self.date_of_birth.is_some()
            && self.gender.is_some()
            && self.height_m.is_some()
            && self.weight_kg.is_some()
            && self.favourite_workout_type.is_some()
            && self.experience.is_some()
    }
}

/// Partial update for health data; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHealthProfile {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub favourite_workout_type: Option<WorkoutKind>,
    pub experience: Option<ExperienceLevel>,
    pub fitness_goal: Option<String>,
    pub injuries: Option<String>,
    pub other_considerations: Option<String>,
}

/// The health attributes sent to the generation backend, looked up per
/// requester at generation time. All fields are nullable; a user without a
/// stored profile yields the empty snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthAttributes {
    pub gender: Option<Gender>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub favourite_workout_type: Option<WorkoutKind>,
    pub experience: Option<ExperienceLevel>,
    pub fitness_goal: Option<String>,
    pub injuries: Option<String>,
}
