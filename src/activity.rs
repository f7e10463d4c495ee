//! Append-only, capped activity journal.
//!
//! Most-recent-first, independent of undo/redo. Entries are immutable
//! once created and leave the journal only by capacity eviction.

use crate::types::{Activity, ActivityKind};
use chrono::Utc;

/// Maximum number of retained journal entries.
pub const ACTIVITY_LOG_CAP: usize = 20;

/// The journal itself. Index 0 is the newest entry.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<Activity>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted entries, enforcing the cap.
    pub fn from_entries(mut entries: Vec<Activity>) -> Self {
        entries.truncate(ACTIVITY_LOG_CAP);
        Self { entries }
    }

    /// Append a new entry at the front, evicting the oldest beyond the
    /// cap. The id is the creation-time millisecond count.
    pub fn record(&mut self, kind: ActivityKind, description: impl Into<String>) -> &Activity {
        let now = Utc::now();
        let activity = Activity {
            id: now.timestamp_millis(),
            kind,
            description: description.into(),
            timestamp: now,
        };
        self.entries.insert(0, activity);
        self.entries.truncate(ACTIVITY_LOG_CAP);
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[Activity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut log = ActivityLog::new();
        log.record(ActivityKind::MemberAdded, "first");
        log.record(ActivityKind::EventCreated, "second");

        assert_eq!(log.entries()[0].description, "second");
        assert_eq!(log.entries()[1].description, "first");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut log = ActivityLog::new();
        for i in 0..ACTIVITY_LOG_CAP + 3 {
            log.record(ActivityKind::MemberUpdated, format!("entry {i}"));
        }
        assert_eq!(log.len(), ACTIVITY_LOG_CAP);
        assert_eq!(log.entries()[0].description, "entry 22");
        // "entry 0".."entry 2" were silently dropped.
        assert_eq!(log.entries().last().unwrap().description, "entry 3");
    }

    #[test]
    fn test_from_entries_truncates() {
        let mut log = ActivityLog::new();
        for i in 0..5 {
            log.record(ActivityKind::MemberAdded, format!("e{i}"));
        }
        let mut entries = log.entries().to_vec();
        entries.extend(std::iter::repeat(entries[0].clone()).take(30));

        let rehydrated = ActivityLog::from_entries(entries);
        assert_eq!(rehydrated.len(), ACTIVITY_LOG_CAP);
        assert_eq!(rehydrated.entries()[0].description, "e4");
    }
}
