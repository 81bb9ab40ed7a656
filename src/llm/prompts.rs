//! Prompt construction for the generation backend.
//!
//! Everything here is pure text assembly: no I/O, no storage access. The
//! request-parameter and health-attribute key orders are part of the prompt
//! contract and must not change without versioning the constants below.

use crate::llm::ChatTurn;
use crate::models::{HealthAttributes, WorkoutParams};

/// Opening line of every creation prompt.
pub const CREATION_PREAMBLE: &str = "Create a workout using the following parameters:\n";

/// Output-format instruction appended to creation prompts and sent as the
/// closing instruction of every revision turn.
pub const WORKOUT_FORMAT_INSTRUCTION: &str = "Return your response in the following JSON format, where each exercise in the workout is a separate object in the workout list. Each exercise has a \"name\", the \"type\" of exercise, and \"info\" about the amount of reps/sets/duration to do it in.\nFormat: {\"workout\": [{\"name\": \"\", \"type\": \"\", \"info\": \"\"}]}\n";

/// Opening line of every daily-recommendation prompt.
pub const RECOMMENDATION_PREAMBLE: &str = "Based on the workouts (in JSON format) that follow, generate a different workout that the user should do today.\n";

/// Output-format instruction appended to recommendation prompts.
pub const RECOMMENDATION_FORMAT_INSTRUCTION: &str = "Return your response in the following JSON format, where \"recommendation\" is a one sentence outline of what workout the user should do today and \"parameters\" are the parameters relevant to that workout.\nFormat: {\"recommendation\": \"\", \"parameters\": {\"length\": \"\", \"workout_type\": \"\", \"target_area\": \"\"}}. Length is an integer representing the length of the workout in minutes.\n";

/// Canned response for users with no workout history. Never persisted.
pub const PLACEHOLDER_RECOMMENDATION: &str = "{\"recommendation\": \"Try creating a workout to get started!\", \"parameters\": {\"length\": \"\", \"workout_type\": \"\", \"target_area\": \"\"}}";

fn push_field(prompt: &mut String, key: &str, value: Option<String>) {
    prompt.push_str(key);
    prompt.push_str(": ");
    if let Some(value) = value {
        prompt.push_str(&value);
    }
    prompt.push('\n');
}

/// Build the single-turn prompt for a new workout.
///
/// Emits one `"<key>: <value>"` line per request parameter and health
/// attribute in a fixed order. Missing values render as an empty value after
/// the key; keys are never omitted, so construction is total over its inputs.
pub fn creation_prompt(params: &WorkoutParams, health: &HealthAttributes) -> String {
    let mut prompt = String::from(CREATION_PREAMBLE);

    let request_fields = [
        ("length", params.length_minutes.map(|m| m.to_string())),
        ("difficulty", Some(params.difficulty.to_string())),
        ("workout_type", Some(params.workout_type.clone())),
        ("target_area", params.target_area.clone()),
        ("equipment_access", Some(params.equipment_access.clone())),
        ("included_exercises", params.included_exercises.clone()),
        ("excluded_exercises", params.excluded_exercises.clone()),
        (
            "other_workout_considerations",
            params.other_considerations.clone(),
        ),
    ];
    for (key, value) in request_fields {
        push_field(&mut prompt, key, value);
    }

    let health_fields = [
        ("gender", health.gender.map(|g| g.to_string())),
        ("height", health.height_m.map(|h| h.to_string())),
        ("weight", health.weight_kg.map(|w| w.to_string())),
        (
            "favourite_workout_type",
            health.favourite_workout_type.map(|w| w.to_string()),
        ),
        (
            "workout_experience",
            health.experience.map(|e| e.to_string()),
        ),
        ("fitness_goal", health.fitness_goal.clone()),
        ("injuries", health.injuries.clone()),
    ];
    for (key, value) in health_fields {
        push_field(&mut prompt, key, value);
    }

    prompt.push_str(WORKOUT_FORMAT_INSTRUCTION);
    prompt
}

/// Reconstruct the revision conversation from a workout's stored history.
///
/// `workouts` holds every generated text (oldest first) and `changes` every
/// prior revision request, so `workouts.len() == changes.len() + 1`. The seed
/// replays the conversation in natural order: the first generated workout as
/// a model turn, then each change paired with the workout it produced. The
/// *current* change is not part of the seed; it goes into
/// [`revision_prompt`] as the final user turn.
pub fn revision_seed(changes: &[String], workouts: &[String]) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(changes.len() + workouts.len());
    let mut workouts = workouts.iter();
    if let Some(first) = workouts.next() {
        turns.push(ChatTurn::model(first));
    }
    for (change, workout) in changes.iter().zip(workouts) {
        turns.push(ChatTurn::user(change));
        turns.push(ChatTurn::model(workout));
    }
    turns
}

/// The final user turn of a revision conversation: the new change request
/// followed by the standard output-format instruction.
pub fn revision_prompt(new_change: &str) -> String {
    format!("{new_change}\n{WORKOUT_FORMAT_INSTRUCTION}")
}

/// Build the single-turn prompt for a daily recommendation from the latest
/// generated text of each recent workout.
pub fn recommendation_prompt(recent_workouts: &[String]) -> String {
    let serialized =
        serde_json::to_string(recent_workouts).unwrap_or_else(|_| "[]".to_string());
    format!("{RECOMMENDATION_PREAMBLE}{serialized}\n{RECOMMENDATION_FORMAT_INSTRUCTION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TurnRole;
    use crate::models::{Difficulty, ExperienceLevel, Gender, WorkoutKind};
    use pretty_assertions::assert_eq;

    fn full_params() -> WorkoutParams {
        WorkoutParams {
            difficulty: Difficulty::Easy,
            workout_type: "Resistance Training".to_string(),
            equipment_access: "Full Gym".to_string(),
            target_area: Some("Chest".to_string()),
            length_minutes: Some(60),
            included_exercises: Some("Bench Press".to_string()),
            excluded_exercises: Some("Burpees".to_string()),
            other_considerations: Some("short rest periods".to_string()),
        }
    }

    fn full_health() -> HealthAttributes {
        HealthAttributes {
            gender: Some(Gender::Male),
            height_m: Some(1.8),
            weight_kg: Some(82.5),
            favourite_workout_type: Some(WorkoutKind::Crossfit),
            experience: Some(ExperienceLevel::Intermediate),
            fitness_goal: Some("build muscle".to_string()),
            injuries: Some("left knee".to_string()),
        }
    }

    #[test]
    fn creation_prompt_contains_every_request_field_verbatim() {
        let prompt = creation_prompt(&full_params(), &full_health());

        assert!(prompt.contains("length: 60\n"));
        assert!(prompt.contains("difficulty: Easy\n"));
        assert!(prompt.contains("workout_type: Resistance Training\n"));
        assert!(prompt.contains("target_area: Chest\n"));
        assert!(prompt.contains("equipment_access: Full Gym\n"));
        assert!(prompt.contains("included_exercises: Bench Press\n"));
        assert!(prompt.contains("excluded_exercises: Burpees\n"));
        assert!(prompt.contains("other_workout_considerations: short rest periods\n"));
    }

    #[test]
    fn creation_prompt_contains_every_health_field_verbatim() {
        let prompt = creation_prompt(&full_params(), &full_health());

        assert!(prompt.contains("gender: Male\n"));
        assert!(prompt.contains("height: 1.8\n"));
        assert!(prompt.contains("weight: 82.5\n"));
        assert!(prompt.contains("favourite_workout_type: Crossfit\n"));
        assert!(prompt.contains("workout_experience: Intermediate\n"));
        assert!(prompt.contains("fitness_goal: build muscle\n"));
        assert!(prompt.contains("injuries: left knee\n"));
    }

    #[test]
    fn creation_prompt_key_order_is_fixed() {
        let prompt = creation_prompt(&full_params(), &full_health());
        let expected_order = [
            "length:",
            "difficulty:",
            "workout_type:",
            "target_area:",
            "equipment_access:",
            "included_exercises:",
            "excluded_exercises:",
            "other_workout_considerations:",
            "gender:",
            "height:",
            "weight:",
            "favourite_workout_type:",
            "workout_experience:",
            "fitness_goal:",
            "injuries:",
        ];

        let mut last = 0;
        for key in expected_order {
            let at = prompt[last..]
                .find(key)
                .unwrap_or_else(|| panic!("{key} missing or out of order"));
            last += at + key.len();
        }
    }

    #[test]
    fn creation_prompt_starts_and_ends_with_fixed_text() {
        let prompt = creation_prompt(&full_params(), &full_health());
        assert!(prompt.starts_with(CREATION_PREAMBLE));
        assert!(prompt.ends_with(WORKOUT_FORMAT_INSTRUCTION));
    }

    #[test]
    fn creation_prompt_renders_missing_values_as_empty() {
        let params = WorkoutParams {
            difficulty: Difficulty::Hard,
            workout_type: "Cardio".to_string(),
            equipment_access: "None".to_string(),
            target_area: None,
            length_minutes: None,
            included_exercises: None,
            excluded_exercises: None,
            other_considerations: None,
        };
        let prompt = creation_prompt(&params, &HealthAttributes::default());

        assert!(prompt.contains("length: \n"));
        assert!(prompt.contains("target_area: \n"));
        assert!(prompt.contains("gender: \n"));
        assert!(prompt.contains("injuries: \n"));
    }

    #[test]
    fn creation_prompt_is_deterministic() {
        let params = full_params();
        let health = full_health();
        assert_eq!(
            creation_prompt(&params, &health),
            creation_prompt(&params, &health)
        );
    }

    #[test]
    fn revision_seed_for_fresh_workout_is_single_model_turn() {
        let workouts = vec!["workout one".to_string()];
        let seed = revision_seed(&[], &workouts);

        assert_eq!(seed.len(), 1);
        assert_eq!(seed[0].role, TurnRole::Model);
        assert_eq!(seed[0].text, "workout one");
    }

    #[test]
    fn revision_seed_replays_conversation_in_order() {
        let changes = vec!["less cardio".to_string(), "add stretching".to_string()];
        let workouts = vec![
            "workout one".to_string(),
            "workout two".to_string(),
            "workout three".to_string(),
        ];
        let seed = revision_seed(&changes, &workouts);

        let rendered: Vec<(TurnRole, &str)> =
            seed.iter().map(|t| (t.role, t.text.as_str())).collect();
        assert_eq!(
            rendered,
            vec![
                (TurnRole::Model, "workout one"),
                (TurnRole::User, "less cardio"),
                (TurnRole::Model, "workout two"),
                (TurnRole::User, "add stretching"),
                (TurnRole::Model, "workout three"),
            ]
        );
    }

    #[test]
    fn revision_prompt_carries_change_and_format_instruction() {
        let prompt = revision_prompt("swap squats for lunges");
        assert!(prompt.starts_with("swap squats for lunges\n"));
        assert!(prompt.ends_with(WORKOUT_FORMAT_INSTRUCTION));
    }

    #[test]
    fn recommendation_prompt_serializes_history_and_is_deterministic() {
        let history = vec!["workout a".to_string(), "workout b".to_string()];
        let prompt = recommendation_prompt(&history);

        assert!(prompt.starts_with(RECOMMENDATION_PREAMBLE));
        assert!(prompt.contains("[\"workout a\",\"workout b\"]"));
        assert!(prompt.ends_with(RECOMMENDATION_FORMAT_INSTRUCTION));
        assert_eq!(prompt, recommendation_prompt(&history));
    }
}
