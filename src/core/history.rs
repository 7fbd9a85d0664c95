//! State transition history tracking.
//!
//! Every transition and reset a machine performs is appended to an
//! in-memory log of named records. The log is diagnostics output, not
//! machine data: it survives [`Machine::reset`](crate::Machine::reset) and
//! is never read back by the engine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Record of a single state transition.
///
/// Records carry the short names of the states involved (see
/// [`State::name`](crate::State::name)) and the wall-clock time at which
/// the swap happened. They serialize for export; deserialization is not
/// offered, the log is one-way.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TransitionRecord {
    /// Name of the state being left
    pub from: &'static str,
    /// Name of the state being entered
    pub to: &'static str,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    pub(crate) fn new(from: &'static str, to: &'static str) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of the transitions a machine instance has performed.
///
/// # Example
///
/// ```rust
/// use flystate::StateHistory;
///
/// let history = StateHistory::new();
/// assert!(history.is_empty());
/// assert!(history.duration().is_none());
/// ```
#[derive(Clone, Debug, Default, Serialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, transition: TransitionRecord) {
        self.transitions.push(transition);
    }

    /// All recorded transitions, oldest first.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// The path of state names traversed: the starting state, then the
    /// target of each transition.
    ///
    /// Empty until the first transition; machine construction does not
    /// record anything.
    pub fn get_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        for transition in &self.transitions {
            path.push(transition.to);
        }
        path
    }

    /// Wall-clock span from the first to the last recorded transition.
    ///
    /// `None` while the log holds fewer than one record.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether any transition has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
