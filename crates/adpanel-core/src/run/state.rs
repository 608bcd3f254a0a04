//! Run state machine and progress reporting.

use serde::{Deserialize, Serialize};

/// Lifecycle of a single test run.
///
/// ```text
/// Idle → PanelReady → Collecting → Reducing → CrossAnalyzing → Complete
///   └──────┴→ Failed            (panel acquisition only)
///   any non-terminal → Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    PanelReady,
    Collecting,
    Reducing,
    CrossAnalyzing,
    Complete,
    Failed,
    Cancelled,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Complete | RunState::Failed | RunState::Cancelled)
    }

    /// Whether `self → next` is a legal transition.
    ///
    /// Once collection begins reaction failures degrade instead of failing
    /// the run, so `Failed` is only reachable before `Collecting`.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Idle, PanelReady)
            | (PanelReady, Collecting)
            | (Collecting, Reducing)
            | (Reducing, CrossAnalyzing)
            | (CrossAnalyzing, Complete) => true,
            (Idle | PanelReady, Failed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Monotonic progress of reaction collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub state: RunState,
    pub completed: usize,
    /// personas × creatives
    pub total: usize,
}

impl ProgressUpdate {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            RunState::Idle,
            RunState::PanelReady,
            RunState::Collecting,
            RunState::Reducing,
            RunState::CrossAnalyzing,
            RunState::Complete,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failed_only_before_collection() {
        assert!(RunState::PanelReady.can_transition_to(RunState::Failed));
        assert!(!RunState::Collecting.can_transition_to(RunState::Failed));
        assert!(!RunState::Reducing.can_transition_to(RunState::Failed));
    }

    #[test]
    fn test_cancel_from_non_terminal_only() {
        assert!(RunState::Collecting.can_transition_to(RunState::Cancelled));
        assert!(!RunState::Complete.can_transition_to(RunState::Cancelled));
        assert!(!RunState::Failed.can_transition_to(RunState::Cancelled));
    }
}
