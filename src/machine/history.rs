//! Record of fired transitions.
//!
//! The runtime machine appends one record per fired transition. History
//! is immutable: `record` returns a new history with the record added.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// One fired transition.
#[derive(Clone, Debug)]
pub struct TransitionRecord<S, T> {
    /// The active leaf the machine fired from.
    pub from: S,
    /// The trigger that fired.
    pub trigger: T,
    /// The transition's target state.
    pub to: S,
    /// When the transition fired.
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of fired transitions.
#[derive(Clone, Debug)]
pub struct TransitionHistory<S, T> {
    records: Vec<TransitionRecord<S, T>>,
}

impl<S: Clone, T: Clone> Default for TransitionHistory<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone, T: Clone> TransitionHistory<S, T> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record, returning a new history.
    pub fn record(&self, record: TransitionRecord<S, T>) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// All records, in firing order.
    pub fn records(&self) -> &[TransitionRecord<S, T>] {
        &self.records
    }

    /// The most recent record, if any transition has fired.
    pub fn last(&self) -> Option<&TransitionRecord<S, T>> {
        self.records.last()
    }

    /// Elapsed time from the first to the last fired transition.
    /// `None` until something has fired.
    pub fn duration(&self) -> Option<Duration> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last
                .timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, trigger: &str, to: &str) -> TransitionRecord<String, String> {
        TransitionRecord {
            from: from.to_string(),
            trigger: trigger.to_string(),
            to: to.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: TransitionHistory<String, String> = TransitionHistory::new();
        assert!(history.records().is_empty());
        assert!(history.last().is_none());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = TransitionHistory::new();
        let updated = history.record(record("a", "go", "b"));

        assert!(history.records().is_empty());
        assert_eq!(updated.records().len(), 1);
        assert_eq!(updated.last().map(|r| r.to.as_str()), Some("b"));
    }

    #[test]
    fn records_keep_firing_order() {
        let history = TransitionHistory::new()
            .record(record("a", "go", "b"))
            .record(record("b", "go", "c"));

        let targets: Vec<_> = history.records().iter().map(|r| r.to.as_str()).collect();
        assert_eq!(targets, vec!["b", "c"]);
    }

    #[test]
    fn single_record_has_zero_duration() {
        let history = TransitionHistory::new().record(record("a", "go", "b"));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }
}
