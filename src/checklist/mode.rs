//! Annotation modes and the mode cycle

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Policy controlling which next steps a card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Show nothing; clears existing annotations without fetching
    Hidden,
    /// The earliest incomplete item of the card
    OnePerCard,
    /// The earliest incomplete item of each checklist
    OnePerChecklist,
    /// Every incomplete item
    DisplayAll,
}

#[derive(Debug, Error)]
#[error("unknown mode '{0}' (expected hidden, one-per-card, one-per-checklist or display-all)")]
pub struct ParseModeError(String);

impl Mode {
    /// Modes in cycle order
    pub const ALL: [Mode; 4] = [
        Mode::Hidden,
        Mode::OnePerCard,
        Mode::OnePerChecklist,
        Mode::DisplayAll,
    ];

    /// Label shown next to the "Next steps:" prompt
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Hidden => "Hidden",
            Mode::OnePerCard => "One per card",
            Mode::OnePerChecklist => "One per checklist",
            Mode::DisplayAll => "Display all",
        }
    }

    /// Name accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            Mode::Hidden => "hidden",
            Mode::OnePerCard => "one-per-card",
            Mode::OnePerChecklist => "one-per-checklist",
            Mode::DisplayAll => "display-all",
        }
    }

    /// Whether the mode needs checklist data at all
    pub fn needs_fetch(&self) -> bool {
        !matches!(self, Mode::Hidden)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Mode::ALL
            .into_iter()
            .find(|m| m.cli_name() == normalized)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// The currently selected mode, advanced circularly by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCycle {
    index: usize,
}

impl Default for ModeCycle {
    fn default() -> Self {
        Self::new(Mode::OnePerCard)
    }
}

impl ModeCycle {
    pub fn new(start: Mode) -> Self {
        Self {
            index: start.index(),
        }
    }

    pub fn current(&self) -> Mode {
        Mode::ALL[self.index]
    }

    /// Move to the next mode, wrapping after the last one
    pub fn advance(&mut self) -> Mode {
        self.index = (self.index + 1) % Mode::ALL.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_per_card() {
        assert_eq!(ModeCycle::default().current(), Mode::OnePerCard);
    }

    #[test]
    fn test_advance_wraps_around() {
        let mut cycle = ModeCycle::default();
        assert_eq!(cycle.advance(), Mode::OnePerChecklist);
        assert_eq!(cycle.advance(), Mode::DisplayAll);
        assert_eq!(cycle.advance(), Mode::Hidden);
        assert_eq!(cycle.advance(), Mode::OnePerCard);
    }

    #[test]
    fn test_four_advances_return_to_start() {
        for start in Mode::ALL {
            let mut cycle = ModeCycle::new(start);
            for _ in 0..Mode::ALL.len() {
                cycle.advance();
            }
            assert_eq!(cycle.current(), start);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Mode::Hidden.label(), "Hidden");
        assert_eq!(Mode::OnePerCard.to_string(), "One per card");
        assert_eq!(Mode::OnePerChecklist.label(), "One per checklist");
        assert_eq!(Mode::DisplayAll.label(), "Display all");
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("hidden".parse::<Mode>().unwrap(), Mode::Hidden);
        assert_eq!("one-per-card".parse::<Mode>().unwrap(), Mode::OnePerCard);
        assert_eq!(
            "one_per_checklist".parse::<Mode>().unwrap(),
            Mode::OnePerChecklist
        );
        assert_eq!("Display all".parse::<Mode>().unwrap(), Mode::DisplayAll);
        assert!("everything".parse::<Mode>().is_err());
    }

    #[test]
    fn test_only_hidden_skips_fetch() {
        assert!(!Mode::Hidden.needs_fetch());
        assert!(Mode::OnePerCard.needs_fetch());
        assert!(Mode::DisplayAll.needs_fetch());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Mode::OnePerChecklist).unwrap(),
            r#""one_per_checklist""#
        );
        let mode: Mode = serde_json::from_str(r#""display_all""#).unwrap();
        assert_eq!(mode, Mode::DisplayAll);
    }
}
