//! Core record types for normalized workout logs.
//!
//! This module defines the Workout → Exercise → Set tree produced by both
//! builders (the feed assembler and the activity aggregator):
//! - Numeric values with integer/float canonicalization
//! - Value/unit measures
//! - Kind-specific set payloads
//! - Exercises and day-scoped workouts

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

// ============================================================================
// Numeric Types
// ============================================================================

/// A parsed count that keeps integers integral
///
/// A value equal to its own truncation is held as `Int`, anything else as `Float`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn canonical(value: f64) -> Self {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
            Number::Int(value as i64)
        } else {
            Number::Float(value)
        }
    }
}

/// A value paired with the unit it was recorded in
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Measure<T> {
    pub value: T,
    pub unit: String,
}

impl<T> Measure<T> {
    pub fn new(value: T, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

// ============================================================================
// Set Types
// ============================================================================

/// The three recognized set grammars
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Cardio,
    Weights,
    Bodyweight,
}

/// Optional trailing metrics of a cardio set
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CardioDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<Measure<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Measure<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avhr: Option<Measure<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measure<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<Measure<i64>>,
    /// Last detail segment that matched no unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

/// Timed set, e.g. `0:32:10 | 5.2 km | 145 BPM`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardioSet {
    #[serde(rename = "time")]
    pub time_seconds: u64,
    #[serde(flatten)]
    pub details: CardioDetails,
}

/// Loaded set, e.g. `80 kg x 12`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightsSet {
    pub weight: Measure<f64>,
    pub reps: Number,
}

/// Bodyweight set, e.g. `12 reps` or `12 reps | assisted | 5 kg`
///
/// A negative weight marks an assisted set. Zero weight is never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodyweightSet {
    pub reps: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measure<f64>>,
}

/// Kind-specific payload of a set
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SetDetail {
    Cardio(CardioSet),
    Weights(WeightsSet),
    Bodyweight(BodyweightSet),
}

impl SetDetail {
    pub fn kind(&self) -> SetKind {
        match self {
            SetDetail::Cardio(_) => SetKind::Cardio,
            SetDetail::Weights(_) => SetKind::Weights,
            SetDetail::Bodyweight(_) => SetKind::Bodyweight,
        }
    }
}

/// A decoded set before it is numbered within its exercise
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedSet {
    pub pr: bool,
    pub detail: SetDetail,
}

/// One numbered performance of an exercise
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Set {
    pub set_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr: Option<bool>,
    #[serde(flatten)]
    pub detail: SetDetail,
}

impl Set {
    pub fn numbered(set_id: u32, decoded: DecodedSet) -> Self {
        Self {
            set_id,
            pr: decoded.pr.then_some(true),
            detail: decoded.detail,
        }
    }

    pub fn kind(&self) -> SetKind {
        self.detail.kind()
    }
}

// ============================================================================
// Exercise and Workout Types
// ============================================================================

/// A named movement within a workout
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Exercise {
    pub exercise_id: u32,
    pub name: String,
    /// Kind of the most recently decoded set; `None` when the exercise has no sets
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SetKind>,
    #[serde(rename = "exercise_comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub sets: Vec<Set>,
}

impl Exercise {
    pub fn new(exercise_id: u32, name: impl Into<String>) -> Self {
        Self {
            exercise_id,
            name: name.into(),
            kind: None,
            comment: None,
            sets: Vec::new(),
        }
    }

    /// Id the next appended set should carry
    pub fn next_set_id(&self) -> u32 {
        self.sets.last().map_or(1, |s| s.set_id + 1)
    }

    pub fn push_set(&mut self, set: Set) {
        self.kind = Some(set.kind());
        self.sets.push(set);
    }
}

/// One day's session
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Workout {
    pub workout_id: u32,
    #[serde(serialize_with = "serialize_mongo_date")]
    pub date: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
    #[serde(rename = "workout_comments", skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Workout {
    pub fn new(workout_id: u32, day: NaiveDate) -> Self {
        Self {
            workout_id,
            date: midnight_utc(day),
            exercises: Vec::new(),
            comments: None,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Midnight UTC at the start of `day`
pub fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Dates are stored in the `{"$date": "...Z"}` extended-JSON shape
fn serialize_mongo_date<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct MongoDate {
        #[serde(rename = "$date")]
        date: String,
    }

    MongoDate {
        date: date.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    }
    .serialize(serializer)
}
