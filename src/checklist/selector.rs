//! Next-step selection over a card's checklists
//!
//! All functions are pure: inputs are borrowed and never reordered in place.
//! Ordering by position uses a stable sort, so entries with equal positions
//! keep the order in which the source delivered them.

use std::cmp::Ordering;

use super::{AnnotatedStep, Checklist, ChecklistItem, Mode};

/// An incomplete item tagged with the name of the checklist that owns it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingItem<'a> {
    pub checklist_name: &'a str,
    pub item: &'a ChecklistItem,
}

impl PendingItem<'_> {
    /// The step as shown in one-per-card mode
    pub fn plain(&self) -> AnnotatedStep {
        AnnotatedStep::new(self.item.name.clone())
    }

    /// The step with its `"<checklist>: "` prefix
    pub fn prefixed(&self) -> AnnotatedStep {
        AnnotatedStep::new(format!("{}: {}", self.checklist_name, self.item.name))
    }
}

fn by_position(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

fn sorted_checklists(checklists: &[Checklist]) -> Vec<&Checklist> {
    let mut sorted: Vec<&Checklist> = checklists.iter().collect();
    sorted.sort_by(|a, b| by_position(a.position, b.position));
    sorted
}

/// Incomplete items of a checklist, in position order
pub fn incomplete_of(checklist: &Checklist) -> Vec<PendingItem<'_>> {
    let mut items: Vec<&ChecklistItem> = checklist.items.iter().collect();
    items.sort_by(|a, b| by_position(a.position, b.position));
    items
        .into_iter()
        .filter(|item| item.is_incomplete())
        .map(|item| PendingItem {
            checklist_name: &checklist.name,
            item,
        })
        .collect()
}

/// Every incomplete item of the card, checklist by checklist
pub fn all_next_steps(checklists: &[Checklist]) -> Vec<PendingItem<'_>> {
    sorted_checklists(checklists)
        .into_iter()
        .flat_map(incomplete_of)
        .collect()
}

/// Every incomplete item, each prefixed with its checklist name
pub fn all_next_steps_named(checklists: &[Checklist]) -> Vec<AnnotatedStep> {
    all_next_steps(checklists)
        .iter()
        .map(PendingItem::prefixed)
        .collect()
}

/// The first incomplete item of each checklist that has one
pub fn next_steps_of_checklists(checklists: &[Checklist]) -> Vec<AnnotatedStep> {
    sorted_checklists(checklists)
        .into_iter()
        .filter_map(|checklist| incomplete_of(checklist).first().map(PendingItem::prefixed))
        .collect()
}

/// The single earliest incomplete item of the card, unprefixed
pub fn next_step(checklists: &[Checklist]) -> Vec<AnnotatedStep> {
    all_next_steps(checklists)
        .first()
        .map(PendingItem::plain)
        .into_iter()
        .collect()
}

/// Apply a selection mode to a card's checklists
pub fn select(mode: Mode, checklists: &[Checklist]) -> Vec<AnnotatedStep> {
    match mode {
        Mode::Hidden => Vec::new(),
        Mode::OnePerCard => next_step(checklists),
        Mode::OnePerChecklist => next_steps_of_checklists(checklists),
        Mode::DisplayAll => all_next_steps_named(checklists),
    }
}
