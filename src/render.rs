//! Plain-text and JSON rendering of card annotations

use crate::checklist::AnnotatedStep;
use crate::config::DisplayConfig;
use crate::services::CardAnnotation;

/// One line per step: `"<marker> <name>"`
pub fn step_lines(steps: &[AnnotatedStep], marker: &str) -> Vec<String> {
    steps
        .iter()
        .map(|step| {
            if marker.is_empty() {
                step.name.clone()
            } else {
                format!("{} {}", marker, step.name)
            }
        })
        .collect()
}

/// A card title followed by its indented step lines
pub fn render_card(title: &str, steps: &[AnnotatedStep], marker: &str) -> String {
    let mut out = String::from(title);
    for line in step_lines(steps, marker) {
        out.push_str("\n  ");
        out.push_str(&line);
    }
    out
}

/// Render every annotated card on the board
///
/// Cards without steps are skipped unless `show_empty_cards` is set.
pub fn render_board(annotations: &[CardAnnotation], display: &DisplayConfig) -> String {
    annotations
        .iter()
        .filter(|a| display.show_empty_cards || !a.steps.is_empty())
        .map(|a| render_card(&a.card.name, &a.steps, &display.marker))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The `[{"name": ...}]` array handed to other renderers
pub fn steps_json(steps: &[AnnotatedStep]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(steps)
}
