//! Saved activity-feed HTML → workout nodes.
//!
//! The feed lists workouts newest-first; nodes are returned oldest-first,
//! ready for [`crate::assemble::assemble`].

use crate::assemble::{CommentNode, ExerciseNode, LineNode, WorkoutNode};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

static WORKOUT: Lazy<Selector> = Lazy::new(|| selector(r#"[data-ag-type="workout"]"#));
static ACTION_TIME: Lazy<Selector> = Lazy::new(|| selector(".action_time"));
static ACTION_PROMPT: Lazy<Selector> = Lazy::new(|| selector(".action_prompt"));
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| selector("li"));
static COMMENT_WRAPPER: Lazy<Selector> = Lazy::new(|| selector(".comment-copy-wrapper"));
static COMMENT_COPY: Lazy<Selector> = Lazy::new(|| selector(".comment-copy"));

const NOTE_CLASS: &str = "stream_note";
const PR_CLASS: &str = "action_pr";

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Parse a saved feed page into oldest-first workout nodes
pub fn parse_feed(html: &str) -> Result<Vec<WorkoutNode>> {
    let document = Html::parse_document(html);

    let mut nodes = document
        .select(&WORKOUT)
        .map(workout_node)
        .collect::<Result<Vec<_>>>()?;
    tracing::info!("Parsed feed, found {} workouts", nodes.len());

    nodes.reverse();
    Ok(nodes)
}

fn workout_node(workout: ElementRef<'_>) -> Result<WorkoutNode> {
    let date = workout
        .select(&ACTION_TIME)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| Error::Structure("workout without an .action_time date".into()))?;

    let exercises = workout
        .select(&ACTION_PROMPT)
        .map(exercise_node)
        .collect::<Result<Vec<_>>>()?;

    let comments = workout
        .select(&COMMENT_WRAPPER)
        .map(comment_node)
        .collect::<Result<Vec<_>>>()?;

    Ok(WorkoutNode {
        date,
        exercises,
        comments,
    })
}

fn exercise_node(prompt: ElementRef<'_>) -> Result<ExerciseNode> {
    let name: String = prompt.text().collect();

    // set list is the element right after the prompt
    let list = prompt
        .next_siblings()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| Error::Structure(format!("exercise {name:?} has no set list")))?;

    let lines = list
        .select(&LIST_ITEM)
        .map(|li| line_node(&name, li))
        .collect::<Result<Vec<_>>>()?;

    Ok(ExerciseNode { name, lines })
}

fn line_node(exercise: &str, li: ElementRef<'_>) -> Result<LineNode> {
    let has_class = |class: &str| li.value().classes().any(|c| c == class);

    if has_class(NOTE_CLASS) {
        return Ok(LineNode::note(li.text().collect::<String>()));
    }

    let text = li
        .children()
        .next()
        .and_then(|child| child.value().as_text().map(|t| String::from(&**t)))
        .ok_or_else(|| {
            Error::Structure(format!("set line under {exercise:?} does not start with text"))
        })?;
    let text = text.trim_matches(|c: char| c == ' ' || c == '\n');

    Ok(if has_class(PR_CLASS) {
        LineNode::pr(text)
    } else {
        LineNode::set(text)
    })
}

fn comment_node(wrapper: ElementRef<'_>) -> Result<CommentNode> {
    let leading = match wrapper.children().next() {
        Some(child) => match child.value() {
            Node::Text(text) => String::from(&**text),
            _ => ElementRef::wrap(child)
                .map(|el| el.text().collect())
                .unwrap_or_default(),
        },
        None => String::new(),
    };

    let body = wrapper
        .select(&COMMENT_COPY)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| Error::Structure("comment wrapper without .comment-copy".into()))?;

    Ok(CommentNode { leading, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::LineKind;

    const FEED: &str = r#"
<html><body>
<div data-ag-type="workout">
  <span class="action_time">06 Mar, 2019</span>
  <div class="action_prompt">Squat</div>
  <ul>
    <li>100 kg x 5</li>
    <li class="action_pr">110 kg x 3 (PR)</li>
    <li class="stream_note">Belt on for the top set</li>
  </ul>
  <div class="comment-copy-wrapper">Me: <span class="comment-copy"> Heavy day </span></div>
  <div class="comment-copy-wrapper"><span class="comment-copy"></span></div>
</div>
<div data-ag-type="workout">
  <span class="action_time">05 Mar, 2019</span>
  <div class="action_prompt">Running</div>
  <ul>
    <li>0:30:00 | 5 km</li>
  </ul>
</div>
</body></html>
"#;

    #[test]
    fn test_feed_is_reversed_to_oldest_first() {
        let nodes = parse_feed(FEED).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].date, "05 Mar, 2019");
        assert_eq!(nodes[1].date, "06 Mar, 2019");
    }

    #[test]
    fn test_lines_are_classified_by_class() {
        let nodes = parse_feed(FEED).unwrap();
        let squat = &nodes[1].exercises[0];

        assert_eq!(squat.name, "Squat");
        let kinds: Vec<LineKind> = squat.lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Set, LineKind::PersonalRecord, LineKind::Note]);
        assert_eq!(squat.lines[0].text, "100 kg x 5");
        assert_eq!(squat.lines[1].text, "110 kg x 3 (PR)");
        assert_eq!(squat.lines[2].text, "Belt on for the top set");
    }

    #[test]
    fn test_comments_keep_leading_text_and_body() {
        let nodes = parse_feed(FEED).unwrap();
        let comments = &nodes[1].comments;

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].leading, "Me: ");
        assert_eq!(comments[0].body, " Heavy day ");
        assert_eq!(comments[1].leading, "");
    }

    #[test]
    fn test_missing_date_is_a_structure_error() {
        let html = r#"<div data-ag-type="workout"><div class="action_prompt">Squat</div><ul></ul></div>"#;
        assert!(matches!(parse_feed(html), Err(Error::Structure(_))));
    }

    #[test]
    fn test_missing_set_list_is_a_structure_error() {
        let html = r#"<div data-ag-type="workout"><span class="action_time">05 Mar, 2019</span><span><div class="action_prompt">Squat</div></span></div>"#;
        assert!(matches!(parse_feed(html), Err(Error::Structure(_))));
    }

    #[test]
    fn test_empty_page_has_no_workouts() {
        assert!(parse_feed("<html><body></body></html>").unwrap().is_empty());
    }
}
