//! Feed assembler: workout nodes → numbered Workout records.
//!
//! Nodes arrive oldest-first. Workout ids restart at 1 whenever the date
//! changes from the previous node, so a date that reappears after a
//! different one starts a fresh run (`[D1, D1, D2, D1]` → `[1, 2, 1, 1]`).

use crate::decode;
use crate::types::{Exercise, Set, Workout};
use crate::{Error, Result};
use chrono::NaiveDate;

/// Date format used by the feed, e.g. `05 Mar, 2019`
pub const FEED_DATE_FORMAT: &str = "%d %b, %Y";

/// Marker found at characters 1..6 of a section-group pseudo-exercise name
const GROUP_MARKER: &str = "Group";

/// One workout as read from the feed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkoutNode {
    pub date: String,
    pub exercises: Vec<ExerciseNode>,
    pub comments: Vec<CommentNode>,
}

/// One exercise prompt with its list of lines
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExerciseNode {
    pub name: String,
    pub lines: Vec<LineNode>,
}

/// Structural role of a line under an exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Set,
    PersonalRecord,
    Note,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineNode {
    pub kind: LineKind,
    pub text: String,
}

impl LineNode {
    pub fn set(text: impl Into<String>) -> Self {
        Self { kind: LineKind::Set, text: text.into() }
    }

    pub fn pr(text: impl Into<String>) -> Self {
        Self { kind: LineKind::PersonalRecord, text: text.into() }
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self { kind: LineKind::Note, text: text.into() }
    }
}

/// A comment wrapper: `leading` is its first text content, `body` the comment copy
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentNode {
    pub leading: String,
    pub body: String,
}

/// Running date cursor threaded through the workout fold
#[derive(Debug, Default)]
struct DateRun {
    current: Option<NaiveDate>,
    next_id: u32,
}

impl DateRun {
    fn id_for(&mut self, date: NaiveDate) -> u32 {
        if self.current != Some(date) {
            self.current = Some(date);
            self.next_id = 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Build Workout records from oldest-first workout nodes
pub fn assemble(nodes: &[WorkoutNode]) -> Result<Vec<Workout>> {
    let (_, workouts) = nodes.iter().try_fold(
        (DateRun::default(), Vec::with_capacity(nodes.len())),
        |(mut run, mut workouts), node| {
            let date = parse_feed_date(&node.date)?;
            workouts.push(assemble_workout(run.id_for(date), date, node)?);
            Ok::<_, Error>((run, workouts))
        },
    )?;

    tracing::info!("Assembled {} workouts", workouts.len());
    Ok(workouts)
}

pub fn parse_feed_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), FEED_DATE_FORMAT).map_err(|source| Error::Date {
        text: text.to_string(),
        source,
    })
}

/// Whether an exercise name is a section-group header rather than a movement
pub fn is_group_header(name: &str) -> bool {
    name.chars().skip(1).take(GROUP_MARKER.len()).eq(GROUP_MARKER.chars())
}

fn assemble_workout(workout_id: u32, date: NaiveDate, node: &WorkoutNode) -> Result<Workout> {
    let mut workout = Workout::new(workout_id, date);

    let retained = node.exercises.iter().filter(|e| !is_group_header(&e.name));
    for (exercise_id, exercise_node) in (1..).zip(retained) {
        workout
            .exercises
            .push(assemble_exercise(date, exercise_id, exercise_node)?);
    }

    workout.comments = merge_comments(&node.comments);

    tracing::debug!(
        "Workout {} on {}: {} exercises",
        workout_id,
        date,
        workout.exercises.len()
    );
    Ok(workout)
}

fn assemble_exercise(date: NaiveDate, exercise_id: u32, node: &ExerciseNode) -> Result<Exercise> {
    let mut exercise = Exercise::new(exercise_id, node.name.clone());

    for line in &node.lines {
        let pr = match line.kind {
            LineKind::Note => {
                exercise.comment = Some(line.text.clone());
                continue;
            }
            LineKind::Set => false,
            LineKind::PersonalRecord => true,
        };

        let set_id = exercise.next_set_id();
        let decoded = decode::decode_line(&line.text, pr).map_err(|source| Error::Set {
            date,
            exercise: node.name.clone(),
            exercise_index: exercise_id as usize,
            set_index: set_id as usize,
            source,
        })?;
        exercise.push_set(Set::numbered(set_id, decoded));
    }

    Ok(exercise)
}

/// Join the non-empty comments with a blank line between them
fn merge_comments(comments: &[CommentNode]) -> Option<String> {
    let merged = comments
        .iter()
        .filter(|c| !c.leading.trim().is_empty())
        .map(|c| c.body.trim())
        .collect::<Vec<_>>()
        .join("\n\n");

    (!merged.is_empty()).then_some(merged)
}
