//! Trailing detail fields of a cardio set.
//!
//! Each segment after the `H:MM:SS` time is a `<value> <unit>` pair whose
//! unit decides the field it lands in. Segments that are not a pair, or
//! whose unit is not in the table, are kept verbatim as `other`.

use crate::error::{DecodeError, Grammar};
use crate::types::{CardioDetails, Measure};

/// Field a recognized unit maps to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailField {
    Distance,
    Speed,
    Avhr,
    Weight,
    Resistance,
}

const DISTANCE_UNITS: &[&str] = &["km", "mi", "m", "ft", "yd"];
const SPEED_UNITS: &[&str] = &["km/hr", "mph", "min/km", "min/mi", "split", "fps", "m/s"];

/// Look up the field a unit belongs to
pub fn field_for_unit(unit: &str) -> Option<DetailField> {
    if DISTANCE_UNITS.contains(&unit) {
        Some(DetailField::Distance)
    } else if SPEED_UNITS.contains(&unit) {
        Some(DetailField::Speed)
    } else {
        match unit {
            "BPM" => Some(DetailField::Avhr),
            "kg" | "lb" => Some(DetailField::Weight),
            "%" => Some(DetailField::Resistance),
            _ => None,
        }
    }
}

/// Decode every detail segment in order
///
/// Later segments overwrite earlier ones for the same field, `other` included.
pub fn parse_details<'a, I>(segments: I) -> Result<CardioDetails, DecodeError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut details = CardioDetails::default();

    for segment in segments {
        let tokens: Vec<&str> = segment.split_whitespace().collect();
        let (value, unit, field) = match tokens.as_slice() {
            [value, unit] => match field_for_unit(unit) {
                Some(field) => (*value, *unit, field),
                None => {
                    details.other = Some(segment.to_string());
                    continue;
                }
            },
            _ => {
                details.other = Some(segment.to_string());
                continue;
            }
        };

        match field {
            DetailField::Distance => details.distance = Some(float_measure(segment, value, unit)?),
            DetailField::Speed => details.speed = Some(float_measure(segment, value, unit)?),
            DetailField::Weight => details.weight = Some(float_measure(segment, value, unit)?),
            DetailField::Avhr => details.avhr = Some(int_measure(segment, value, unit)?),
            DetailField::Resistance => details.resistance = Some(int_measure(segment, value, unit)?),
        }
    }

    Ok(details)
}

fn float_measure(segment: &str, value: &str, unit: &str) -> Result<Measure<f64>, DecodeError> {
    let value = value.parse::<f64>().map_err(|e| {
        DecodeError::new(segment, Grammar::CardioDetail, format!("{unit} value: {e}"))
    })?;
    Ok(Measure::new(value, unit))
}

fn int_measure(segment: &str, value: &str, unit: &str) -> Result<Measure<i64>, DecodeError> {
    let value = value.parse::<i64>().map_err(|e| {
        DecodeError::new(segment, Grammar::CardioDetail, format!("{unit} value: {e}"))
    })?;
    Ok(Measure::new(value, unit))
}
