//! Activity aggregator: remote activities → one cardio Workout per day.
//!
//! Activities must already be sorted ascending by start time. Same-day
//! activities of the same mapped type become extra sets of one exercise.

use crate::types::{CardioDetails, CardioSet, DecodedSet, Exercise, Measure, Set, SetDetail, Workout};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Meters per mile used for distance conversion
pub const METERS_PER_MILE: f64 = 1609.0;

/// One activity as listed by the remote API
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: DateTime<Utc>,
    /// Seconds
    pub moving_time: u64,
    /// Meters
    pub distance: f64,
    #[serde(default)]
    pub has_heartrate: bool,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
}

/// Exercise name for an activity type
pub fn exercise_name(kind: &str) -> Result<&'static str> {
    match kind {
        "Ride" => Ok("Cycling"),
        "Run" => Ok("Running"),
        "VirtualRide" => Ok("Cycling (stationary)"),
        other => Err(Error::Lookup {
            table: "activity type",
            key: other.to_string(),
        }),
    }
}

/// Group activities into per-day workouts
pub fn aggregate(activities: &[Activity]) -> Result<Vec<Workout>> {
    let mut workouts = Vec::new();
    let mut current: Option<Workout> = None;

    for activity in activities {
        let day = activity_day(activity);
        let workout = match current.take() {
            Some(open) if open.day() == day => open,
            Some(closed) => {
                workouts.push(closed);
                Workout::new(1, day)
            }
            None => Workout::new(1, day),
        };
        current = Some(add_activity(workout, activity)?);
    }

    workouts.extend(current);
    tracing::info!(
        "Aggregated {} activities into {} workouts",
        activities.len(),
        workouts.len()
    );
    Ok(workouts)
}

fn add_activity(mut workout: Workout, activity: &Activity) -> Result<Workout> {
    let name = exercise_name(&activity.kind)?;

    let index = match workout.exercises.iter().position(|e| e.name == name) {
        Some(index) => index,
        None => {
            let exercise_id = workout.exercises.len() as u32 + 1;
            workout.exercises.push(Exercise::new(exercise_id, name));
            workout.exercises.len() - 1
        }
    };

    let day = workout.day();
    let detail = SetDetail::Cardio(activity_set(activity)?);
    let exercise = &mut workout.exercises[index];
    let set_id = exercise.next_set_id();
    exercise.push_set(Set::numbered(
        set_id,
        DecodedSet {
            pr: false,
            detail,
        },
    ));

    tracing::debug!("{} on {}: set {}", name, day, set_id);
    Ok(workout)
}

fn activity_set(activity: &Activity) -> Result<CardioSet> {
    // whole meters only, then miles
    let miles = activity.distance.trunc() / METERS_PER_MILE;
    let avhr = match (activity.has_heartrate, activity.average_heartrate) {
        (true, Some(bpm)) => Some(Measure::new(bpm.round() as i64, "BPM")),
        (true, None) => {
            return Err(Error::Structure(format!(
                "{} activity at {} flagged has_heartrate without average_heartrate",
                activity.kind, activity.start_date
            )))
        }
        (false, _) => None,
    };

    Ok(CardioSet {
        time_seconds: activity.moving_time,
        details: CardioDetails {
            distance: Some(Measure::new(miles, "mi")),
            avhr,
            ..Default::default()
        },
    })
}

/// Calendar day an activity falls on
pub fn activity_day(activity: &Activity) -> NaiveDate {
    activity.start_date.date_naive()
}
