//! Checklist data model
//!
//! Cards carry an ordered collection of checklists, each holding checklist
//! items with a completion state. The types decode directly from the Trello
//! card JSON (`pos`, `checkItems`, `state`).

mod mode;
mod selector;

pub use mode::{Mode, ModeCycle, ParseModeError};
pub use selector::{
    all_next_steps, all_next_steps_named, incomplete_of, next_step, next_steps_of_checklists,
    select, PendingItem,
};

use serde::{Deserialize, Serialize};

/// Completion state of a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Complete,
    Incomplete,
}

/// A single task line within a checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    /// Ordering key within the checklist
    #[serde(rename = "pos")]
    pub position: f64,
    pub state: ItemState,
}

impl ChecklistItem {
    pub fn new(name: impl Into<String>, position: f64, state: ItemState) -> Self {
        Self {
            name: name.into(),
            position,
            state,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.state == ItemState::Incomplete
    }
}

/// A named, ordered group of checklist items within a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub name: String,
    /// Ordering key among the card's checklists
    #[serde(rename = "pos")]
    pub position: f64,
    /// Items as delivered by the source, not necessarily sorted
    #[serde(rename = "checkItems", default)]
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn new(name: impl Into<String>, position: f64, items: Vec<ChecklistItem>) -> Self {
        Self {
            name: name.into(),
            position,
            items,
        }
    }
}

/// The checklist payload of a single card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardChecklists {
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

impl CardChecklists {
    /// Decode a card document.
    ///
    /// Accepts either the card object (`{"checklists": [...]}`) or a bare
    /// array of checklists as returned by `/1/cards/{id}/checklists`.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Bare(Vec<Checklist>),
            Card(CardChecklists),
        }

        Ok(match serde_json::from_str(json)? {
            Document::Bare(checklists) => Self { checklists },
            Document::Card(card) => card,
        })
    }
}

/// One rendered next step, optionally prefixed with its checklist name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedStep {
    pub name: String,
}

impl AnnotatedStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
