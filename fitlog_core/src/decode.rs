//! Freeform set-description decoder.
//!
//! A set line is classified by the first rule that matches, in this fixed order:
//!
//! 1. contains `:` → cardio (`H:MM:SS[ | detail]*`)
//! 2. contains ` x ` → weights (`<weight> <unit> x <reps>[ <label>]`)
//! 3. otherwise → bodyweight (`<reps> reps[ | assisted|weighted | <weight> <unit>]`)
//!
//! The order is the tie-break: a weights or bodyweight line carrying a stray
//! `:` is read as cardio and will usually fail to decode.

use crate::cardio;
use crate::error::{DecodeError, Grammar};
use crate::types::{
    BodyweightSet, CardioSet, DecodedSet, Measure, Number, SetDetail, SetKind, WeightsSet,
};

/// Trailing marker a personal-record line carries
pub const PR_MARKER: &str = " (PR)";

/// Length of the PR marker in characters
pub const PR_MARKER_LEN: usize = 5;

/// Length of the trailing reps label (` rep`, `reps`) dropped from bodyweight counts
const REPS_LABEL_LEN: usize = 4;

const ASSISTED: &str = "assisted";

/// Pick the grammar a set line belongs to
pub fn classify(text: &str) -> SetKind {
    if text.contains(':') {
        SetKind::Cardio
    } else if text.contains(" x ") {
        SetKind::Weights
    } else {
        SetKind::Bodyweight
    }
}

/// Decode a set line, detecting the PR marker from the text itself
pub fn decode_set(text: &str) -> Result<DecodedSet, DecodeError> {
    decode_line(text, text.ends_with(PR_MARKER))
}

/// Decode a set line whose PR status is already known
///
/// When `pr` is set, the last [`PR_MARKER_LEN`] characters are dropped
/// before decoding, whatever they are.
pub fn decode_line(text: &str, pr: bool) -> Result<DecodedSet, DecodeError> {
    let body = if pr {
        drop_last_chars(text, PR_MARKER_LEN).trim()
    } else {
        text
    };

    let detail = match classify(body) {
        SetKind::Cardio => SetDetail::Cardio(decode_cardio(body)?),
        SetKind::Weights => SetDetail::Weights(decode_weights(body)?),
        SetKind::Bodyweight => SetDetail::Bodyweight(decode_bodyweight(body)?),
    };

    Ok(DecodedSet { pr, detail })
}

fn decode_cardio(text: &str) -> Result<CardioSet, DecodeError> {
    let mut segments = text.split(" | ");
    let clock = segments.next().unwrap_or_default();

    let fields: Vec<&str> = clock.split(':').collect();
    let [hours, minutes, seconds] = fields.as_slice() else {
        return Err(DecodeError::new(
            text,
            Grammar::Cardio,
            format!("expected H:MM:SS, got {clock:?}"),
        ));
    };

    let hours = parse_clock_field(text, hours)?;
    let minutes = parse_clock_field(text, minutes)?;
    let seconds = parse_clock_field(text, seconds)?;
    let time_seconds = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| DecodeError::new(text, Grammar::Cardio, "time overflows"))?;

    let details = cardio::parse_details(segments).map_err(|e| {
        DecodeError::new(
            text,
            Grammar::CardioDetail,
            format!("segment {:?}: {}", e.text, e.reason),
        )
    })?;

    Ok(CardioSet {
        time_seconds,
        details,
    })
}

fn decode_weights(text: &str) -> Result<WeightsSet, DecodeError> {
    let halves: Vec<&str> = text.split(" x ").collect();
    let [lift, reps] = halves.as_slice() else {
        return Err(DecodeError::new(
            text,
            Grammar::Weights,
            "expected exactly one \" x \" separator",
        ));
    };

    let weight = parse_load(text, Grammar::Weights, lift)?;
    // "12 reps" and "12" both carry the count first
    let reps = reps.split(' ').next().unwrap_or_default();
    let reps = parse_count(text, Grammar::Weights, reps)?;

    Ok(WeightsSet { weight, reps })
}

fn decode_bodyweight(text: &str) -> Result<BodyweightSet, DecodeError> {
    if !text.contains('|') {
        let reps = parse_count(text, Grammar::Bodyweight, drop_last_chars(text, REPS_LABEL_LEN))?;
        return Ok(BodyweightSet { reps, weight: None });
    }

    let segments: Vec<&str> = text.split(" | ").collect();
    let [reps, modifier, load] = segments.as_slice() else {
        return Err(DecodeError::new(
            text,
            Grammar::Bodyweight,
            format!("expected 3 \" | \" segments, got {}", segments.len()),
        ));
    };

    let reps = parse_count(text, Grammar::Bodyweight, drop_last_chars(reps, REPS_LABEL_LEN))?;
    let mut weight = parse_load(text, Grammar::Bodyweight, load)?;
    if *modifier == ASSISTED {
        weight.value = -weight.value;
    }

    Ok(BodyweightSet {
        reps,
        weight: (weight.value != 0.0).then_some(weight),
    })
}

/// `<value> <unit>` split on a single space
fn parse_load(text: &str, grammar: Grammar, load: &str) -> Result<Measure<f64>, DecodeError> {
    let parts: Vec<&str> = load.split(' ').collect();
    let [value, unit] = parts.as_slice() else {
        return Err(DecodeError::new(
            text,
            grammar,
            format!("expected \"<weight> <unit>\", got {load:?}"),
        ));
    };

    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| DecodeError::new(text, grammar, format!("weight {value:?}: {e}")))?;
    if !value.is_finite() {
        return Err(DecodeError::new(text, grammar, format!("weight {load:?} is not finite")));
    }
    Ok(Measure::new(value, *unit))
}

fn parse_count(text: &str, grammar: Grammar, raw: &str) -> Result<Number, DecodeError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| DecodeError::new(text, grammar, format!("reps {raw:?}: {e}")))?;
    if !value.is_finite() {
        return Err(DecodeError::new(text, grammar, format!("reps {raw:?} is not finite")));
    }
    Ok(Number::canonical(value))
}

fn parse_clock_field(text: &str, raw: &str) -> Result<u64, DecodeError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| DecodeError::new(text, Grammar::Cardio, format!("time field {raw:?}: {e}")))
}

/// `text` without its last `n` characters; empty when shorter than `n`
fn drop_last_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return text;
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardioDetails;

    fn detail(text: &str) -> SetDetail {
        decode_set(text).unwrap().detail
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(classify("0:30:00 | 5 km"), SetKind::Cardio);
        assert_eq!(classify("80 kg x 12"), SetKind::Weights);
        assert_eq!(classify("12 reps"), SetKind::Bodyweight);
        // a colon always wins
        assert_eq!(classify("80 kg x 12 note:heavy"), SetKind::Cardio);
        // bare "x" without spaces is not the weights separator
        assert_eq!(classify("12 reps | weighted | 10xkg"), SetKind::Bodyweight);
    }

    #[test]
    fn test_weights() {
        assert_eq!(
            detail("80 kg x 12"),
            SetDetail::Weights(WeightsSet {
                weight: Measure::new(80.0, "kg"),
                reps: Number::Int(12),
            })
        );
    }

    #[test]
    fn test_weights_ignores_trailing_label_and_keeps_fractional_reps() {
        assert_eq!(
            detail("135 lb x 5.5 reps"),
            SetDetail::Weights(WeightsSet {
                weight: Measure::new(135.0, "lb"),
                reps: Number::Float(5.5),
            })
        );
    }

    #[test]
    fn test_cardio_with_details() {
        assert_eq!(
            detail("1:30:00 | 5.2 km | 145 BPM"),
            SetDetail::Cardio(CardioSet {
                time_seconds: 5400,
                details: CardioDetails {
                    distance: Some(Measure::new(5.2, "km")),
                    avhr: Some(Measure::new(145, "BPM")),
                    ..Default::default()
                },
            })
        );
    }

    #[test]
    fn test_cardio_time_only() {
        assert_eq!(
            detail("0:05:07"),
            SetDetail::Cardio(CardioSet {
                time_seconds: 307,
                details: CardioDetails::default(),
            })
        );
    }

    #[test]
    fn test_bodyweight_plain() {
        assert_eq!(
            detail("12 reps"),
            SetDetail::Bodyweight(BodyweightSet {
                reps: Number::Int(12),
                weight: None,
            })
        );
        assert_eq!(
            detail("1 rep"),
            SetDetail::Bodyweight(BodyweightSet {
                reps: Number::Int(1),
                weight: None,
            })
        );
    }

    #[test]
    fn test_bodyweight_assisted_and_weighted() {
        assert_eq!(
            detail("12 reps | assisted | 5 kg"),
            SetDetail::Bodyweight(BodyweightSet {
                reps: Number::Int(12),
                weight: Some(Measure::new(-5.0, "kg")),
            })
        );
        assert_eq!(
            detail("8 reps | weighted | 20 lb"),
            SetDetail::Bodyweight(BodyweightSet {
                reps: Number::Int(8),
                weight: Some(Measure::new(20.0, "lb")),
            })
        );
    }

    #[test]
    fn test_bodyweight_zero_weight_is_omitted() {
        assert_eq!(
            detail("10 reps | weighted | 0 kg"),
            SetDetail::Bodyweight(BodyweightSet {
                reps: Number::Int(10),
                weight: None,
            })
        );
    }

    #[test]
    fn test_pr_marker_detected_and_stripped() {
        let marked = decode_set("80 kg x 12 (PR)").unwrap();
        let plain = decode_set("80 kg x 12").unwrap();

        assert!(marked.pr);
        assert!(!plain.pr);
        assert_eq!(marked.detail, plain.detail);
    }

    #[test]
    fn test_flagged_pr_drops_marker_characters() {
        let decoded = decode_line("12 reps PR!!", true).unwrap();
        assert!(decoded.pr);
        assert_eq!(
            decoded.detail,
            SetDetail::Bodyweight(BodyweightSet {
                reps: Number::Int(12),
                weight: None,
            })
        );
    }

    #[test]
    fn test_malformed_inputs() {
        let err = decode_set("1:30 | 5 km").unwrap_err();
        assert_eq!(err.grammar, Grammar::Cardio);
        assert_eq!(err.text, "1:30 | 5 km");

        let err = decode_set("0:30:00 | fast km").unwrap_err();
        assert_eq!(err.grammar, Grammar::CardioDetail);
        assert_eq!(err.text, "0:30:00 | fast km");

        let err = decode_set("heavy x 12").unwrap_err();
        assert_eq!(err.grammar, Grammar::Weights);

        let err = decode_set("80 kg x 12 x 3").unwrap_err();
        assert_eq!(err.grammar, Grammar::Weights);

        let err = decode_set("12 reps | assisted").unwrap_err();
        assert_eq!(err.grammar, Grammar::Bodyweight);

        assert!(decode_set("lots reps").is_err());
        assert!(decode_set("").is_err());
    }

    #[test]
    fn test_oversized_time_is_an_error() {
        let err = decode_set("9999999999999999999:00:00").unwrap_err();
        assert_eq!(err.grammar, Grammar::Cardio);
        assert_eq!(err.reason, "time overflows");

        let err = decode_set("5124095576030431:59:59 | 5 km").unwrap_err();
        assert_eq!(err.reason, "time overflows");
    }

    #[test]
    fn test_non_finite_weight_is_an_error() {
        let err = decode_set("inf kg x 5").unwrap_err();
        assert_eq!(err.grammar, Grammar::Weights);

        let err = decode_set("5 reps | weighted | NaN kg").unwrap_err();
        assert_eq!(err.grammar, Grammar::Bodyweight);
    }

    #[test]
    fn test_drop_last_chars() {
        assert_eq!(drop_last_chars("12 reps", 4), "12 ");
        assert_eq!(drop_last_chars("abc", 4), "");
        assert_eq!(drop_last_chars("5 kg é", 2), "5 kg");
    }
}
