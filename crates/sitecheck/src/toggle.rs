//! Toggle-state assertions.
//!
//! Some controls flip their own label when clicked ("VIEW ALL" / "Hide").
//! [`ToggleState`] tracks which label is expected, and [`ToggleCheck`]
//! describes the full round trip: collapsed, expanded, collapsed again.

use serde::{Deserialize, Serialize};

use crate::locator::Locator;
use crate::step::Step;

/// Normalize a label for comparison.
///
/// Trims, collapses every run of internal whitespace to a single space and
/// lowercases. `"  VIEW\n  ALL "` becomes `"view all"`.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether two labels are equal after normalization
#[must_use]
pub fn labels_match(actual: &str, expected: &str) -> bool {
    normalize_label(actual) == normalize_label(expected)
}

/// Expected state of a two-state control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    /// Initial state
    #[default]
    Collapsed,
    /// State after one click
    Expanded,
}

impl ToggleState {
    /// Flip the state
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    /// The flipped state
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

impl std::fmt::Display for ToggleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collapsed => write!(f, "collapsed"),
            Self::Expanded => write!(f, "expanded"),
        }
    }
}

/// A control whose label alternates between two values on click
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleCheck {
    /// The toggle control
    pub locator: Locator,
    /// Label while collapsed
    pub collapsed_label: String,
    /// Label while expanded
    pub expanded_label: String,
}

impl ToggleCheck {
    /// Create a toggle check
    #[must_use]
    pub fn new(
        locator: Locator,
        collapsed_label: impl Into<String>,
        expanded_label: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            collapsed_label: collapsed_label.into(),
            expanded_label: expanded_label.into(),
        }
    }

    /// Label expected in the given state
    #[must_use]
    pub fn label_for(&self, state: ToggleState) -> &str {
        match state {
            ToggleState::Collapsed => &self.collapsed_label,
            ToggleState::Expanded => &self.expanded_label,
        }
    }

    /// Expected labels for the full round trip, in order
    ///
    /// The first entry is the label before any click; each following entry
    /// is the label after one more click.
    #[must_use]
    pub fn round_trip(&self) -> Vec<(ToggleState, &str)> {
        let mut state = ToggleState::default();
        let mut labels = vec![(state, self.label_for(state))];
        for _ in 0..2 {
            state.toggle();
            labels.push((state, self.label_for(state)));
        }
        labels
    }

    /// Lower into primitive steps: visible, label, then click/label twice
    #[must_use]
    pub fn to_steps(&self) -> Vec<Step> {
        let mut steps = vec![Step::AssertVisible {
            locator: self.locator.clone(),
        }];
        for (i, (_, label)) in self.round_trip().into_iter().enumerate() {
            if i > 0 {
                steps.push(Step::Click {
                    locator: self.locator.clone(),
                });
            }
            steps.push(Step::AssertLabel {
                locator: self.locator.clone(),
                label: label.to_string(),
            });
        }
        steps
    }
}
