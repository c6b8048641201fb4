//! Bounded, shareable log of recent human-readable activity lines.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl core::fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} | {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Ring buffer of recent activity; the oldest entry is evicted when full.
///
/// Cheap to clone: clones share the same buffer, so observers can write to the
/// log their manager exposes.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    inner: Arc<Mutex<VecDeque<ActivityEntry>>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, message: impl Into<String>) {
        self.push_at(Utc::now(), message);
    }

    pub fn push_at(&self, at: DateTime<Utc>, message: impl Into<String>) {
        // A poisoned buffer only loses log lines.
        if let Ok(mut entries) = self.inner.lock() {
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(ActivityEntry {
                at,
                message: message.into(),
            });
        }
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        match self.inner.lock() {
            Ok(entries) => entries.iter().cloned().collect(),
            Err(_) => vec![],
        }
    }

    /// Rendered `HH:MM:SS | message` lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}
