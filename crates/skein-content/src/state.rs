//! Tri-state selection attributes.

use serde::{Deserialize, Serialize};
use skein_torrent_core::FilePriority;

/// Download selection of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WantedState {
    /// Every file below is marked for download.
    Wanted,
    /// No file below is marked for download.
    Unwanted,
    /// Files below disagree. Never held by a leaf.
    Mixed,
}

impl WantedState {
    /// Definite state for a leaf flag.
    #[must_use]
    pub const fn from_flag(wanted: bool) -> Self {
        if wanted { Self::Wanted } else { Self::Unwanted }
    }

    /// `Some(flag)` for definite states, `None` for `Mixed`.
    #[must_use]
    pub const fn as_flag(self) -> Option<bool> {
        match self {
            Self::Wanted => Some(true),
            Self::Unwanted => Some(false),
            Self::Mixed => None,
        }
    }

    /// Value a toggle resolves to: only a fully wanted node becomes unwanted.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Wanted => Self::Unwanted,
            Self::Unwanted | Self::Mixed => Self::Wanted,
        }
    }

    /// Checkbox glyph shown next to a row.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Wanted => "[*]",
            Self::Unwanted => "[ ]",
            Self::Mixed => "[-]",
        }
    }

    pub(crate) const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Wanted, Self::Wanted) => Self::Wanted,
            (Self::Unwanted, Self::Unwanted) => Self::Unwanted,
            _ => Self::Mixed,
        }
    }
}

/// Download priority of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityState {
    /// Every file below is low priority.
    Low,
    /// Every file below is normal priority.
    Normal,
    /// Every file below is high priority.
    High,
    /// Files below disagree. Never held by a leaf.
    Mixed,
}

/// Direction of a priority edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityStep {
    /// One level up, saturating at high.
    Raise,
    /// One level down, saturating at low.
    Lower,
}

impl PriorityState {
    /// `Some(priority)` for definite states, `None` for `Mixed`.
    #[must_use]
    pub const fn definite(self) -> Option<FilePriority> {
        match self {
            Self::Low => Some(FilePriority::Low),
            Self::Normal => Some(FilePriority::Normal),
            Self::High => Some(FilePriority::High),
            Self::Mixed => None,
        }
    }

    /// Priority reached by stepping from this state, or `None` when the step
    /// saturates. `Mixed` steps exactly like `Low`.
    #[must_use]
    pub const fn step(self, step: PriorityStep) -> Option<FilePriority> {
        match (self, step) {
            (Self::Low | Self::Mixed, PriorityStep::Raise)
            | (Self::High, PriorityStep::Lower) => Some(FilePriority::Normal),
            (Self::Normal, PriorityStep::Raise) => Some(FilePriority::High),
            (Self::Normal, PriorityStep::Lower) => Some(FilePriority::Low),
            (Self::Low | Self::Mixed, PriorityStep::Lower) | (Self::High, PriorityStep::Raise) => {
                None
            }
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self.definite() {
            Some(priority) => priority.as_str(),
            None => "Mixed",
        }
    }

    pub(crate) const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Low, Self::Low) => Self::Low,
            (Self::Normal, Self::Normal) => Self::Normal,
            (Self::High, Self::High) => Self::High,
            _ => Self::Mixed,
        }
    }
}

impl From<FilePriority> for PriorityState {
    fn from(priority: FilePriority) -> Self {
        match priority {
            FilePriority::Low => Self::Low,
            FilePriority::Normal => Self::Normal,
            FilePriority::High => Self::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_resolves_mixed_to_wanted() {
        assert_eq!(WantedState::Wanted.toggled(), WantedState::Unwanted);
        assert_eq!(WantedState::Unwanted.toggled(), WantedState::Wanted);
        assert_eq!(WantedState::Mixed.toggled(), WantedState::Wanted);
    }

    #[test]
    fn wanted_merge_is_mixed_on_disagreement() {
        assert_eq!(
            WantedState::Wanted.merge(WantedState::Wanted),
            WantedState::Wanted
        );
        assert_eq!(
            WantedState::Wanted.merge(WantedState::Unwanted),
            WantedState::Mixed
        );
        assert_eq!(
            WantedState::Mixed.merge(WantedState::Mixed),
            WantedState::Mixed
        );
    }

    #[test]
    fn markers_distinguish_mixed() {
        assert_eq!(WantedState::Wanted.marker(), "[*]");
        assert_eq!(WantedState::Unwanted.marker(), "[ ]");
        assert_eq!(WantedState::Mixed.marker(), "[-]");
    }

    #[test]
    fn priority_step_table_saturates() {
        use PriorityState::{High, Low, Mixed, Normal};
        use PriorityStep::{Lower, Raise};

        assert_eq!(Low.step(Raise), Some(FilePriority::Normal));
        assert_eq!(Low.step(Lower), None);
        assert_eq!(Mixed.step(Raise), Some(FilePriority::Normal));
        assert_eq!(Mixed.step(Lower), None);
        assert_eq!(Normal.step(Raise), Some(FilePriority::High));
        assert_eq!(Normal.step(Lower), Some(FilePriority::Low));
        assert_eq!(High.step(Raise), None);
        assert_eq!(High.step(Lower), Some(FilePriority::Normal));
    }

    #[test]
    fn priority_merge_and_labels() {
        assert_eq!(
            PriorityState::High.merge(PriorityState::High),
            PriorityState::High
        );
        assert_eq!(
            PriorityState::Low.merge(PriorityState::Normal),
            PriorityState::Mixed
        );
        assert_eq!(PriorityState::Mixed.as_str(), "Mixed");
        assert_eq!(PriorityState::from(FilePriority::Low).as_str(), "Low");
    }
}
