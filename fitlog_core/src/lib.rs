#![forbid(unsafe_code)]

//! Core record model and conversion logic for Fitlog.
//!
//! This crate provides:
//! - Workout / Exercise / Set record types
//! - Freeform set-line decoding (cardio, weights, bodyweight)
//! - Feed assembly from saved activity-feed HTML
//! - Day aggregation of remote Strava activities
//! - Token handling, JSON output, configuration and logging

pub mod types;
pub mod error;
pub mod cardio;
pub mod decode;
pub mod assemble;
pub mod markup;
pub mod aggregate;
pub mod token;
pub mod strava;
pub mod output;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{DecodeError, Error, Grammar, Result};
pub use types::*;
pub use decode::{decode_line, decode_set};
pub use assemble::{assemble, WorkoutNode};
pub use markup::parse_feed;
pub use aggregate::{aggregate, Activity};
pub use token::{read_tokens, TokenSet};
pub use strava::StravaClient;
pub use output::write_workouts;
pub use config::Config;

/// Parse a saved feed page and assemble its workouts
pub fn convert_feed(html: &str) -> Result<Vec<Workout>> {
    let nodes = parse_feed(html)?;
    assemble(&nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_feed_end_to_end() {
        logging::init_test();

        let html = r#"
<div data-ag-type="workout">
  <span class="action_time">05 Mar, 2019</span>
  <div class="action_prompt">Pull-Up</div>
  <ul>
    <li>12 reps | assisted | 5 kg</li>
    <li class="action_pr">12 reps (PR)</li>
  </ul>
  <div class="action_prompt"> Group 1</div>
  <ul></ul>
  <div class="action_prompt">Rowing</div>
  <ul>
    <li>0:10:00 | 2000 m | 300 kcal</li>
  </ul>
</div>"#;

        let workouts = convert_feed(html).unwrap();
        assert_eq!(
            serde_json::to_value(&workouts).unwrap(),
            json!([{
                "workout_id": 1,
                "date": {"$date": "2019-03-05T00:00:00Z"},
                "exercises": [
                    {
                        "exercise_id": 1,
                        "name": "Pull-Up",
                        "type": "bodyweight",
                        "sets": [
                            {"set_id": 1, "reps": 12, "weight": {"value": -5.0, "unit": "kg"}},
                            {"set_id": 2, "pr": true, "reps": 12}
                        ]
                    },
                    {
                        "exercise_id": 2,
                        "name": "Rowing",
                        "type": "cardio",
                        "sets": [
                            {
                                "set_id": 1,
                                "time": 600,
                                "distance": {"value": 2000.0, "unit": "m"},
                                "other": "300 kcal"
                            }
                        ]
                    }
                ]
            }])
        );
    }
}
