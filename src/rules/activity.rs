// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Editor activity tracking.
//!
//! Rule refreshes are skipped while the editor is idle, so an unattended editor does
//! not poll the registry forever.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::ACTIVITY_WINDOW;

/// Timestamp of the last editor activity.
#[derive(Debug)]
pub struct ActivityTracker {
    /// Milliseconds since the Unix epoch.
    last_activity_ms: AtomicI64,
    window: Duration,
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new(ACTIVITY_WINDOW)
    }
}

impl ActivityTracker {
    /// Create a tracker. Startup counts as activity.
    pub fn new(window: Duration) -> Self {
        Self {
            last_activity_ms: AtomicI64::new(Utc::now().timestamp_millis()),
            window,
        }
    }

    /// Record activity now.
    pub fn record(&self) {
        self.record_at(Utc::now());
    }

    pub fn record_at(&self, at: DateTime<Utc>) {
        self.last_activity_ms
            .store(at.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.last_activity_ms.load(Ordering::SeqCst))
    }

    /// Whether there was activity within the window.
    pub fn was_active_recently(&self) -> bool {
        let window_ms = i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Utc::now().timestamp_millis().saturating_sub(window_ms);
        self.last_activity_ms.load(Ordering::SeqCst) > cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_active() {
        let tracker = ActivityTracker::default();
        assert!(tracker.was_active_recently());
        assert!(tracker.last_activity().is_some());
    }

    #[test]
    fn test_inactive_after_window() {
        let tracker = ActivityTracker::new(Duration::from_secs(600));
        tracker.record_at(Utc::now() - chrono::Duration::minutes(11));
        assert!(!tracker.was_active_recently());

        tracker.record();
        assert!(tracker.was_active_recently());
    }

    #[test]
    fn test_active_within_window() {
        let tracker = ActivityTracker::new(Duration::from_secs(600));
        tracker.record_at(Utc::now() - chrono::Duration::minutes(9));
        assert!(tracker.was_active_recently());
    }
}
