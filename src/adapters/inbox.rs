//! Local notification inbox.
//!
//! Foreground push messages are kept newest-first so the settings screen can
//! list recent alerts.  Storage is a fixed-capacity `heapless::Deque`; the
//! oldest entry is evicted once the configured capacity is reached.

use chrono::{DateTime, Utc};
use heapless::Deque;
use log::warn;
use serde::Serialize;

use crate::alerts::AlertMessage;

/// Hard upper bound on stored notifications.
pub const INBOX_MAX: usize = 64;

/// One saved notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredNotification {
    /// Milliseconds since the epoch at receipt, as a string.
    pub id: String,
    pub title: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

pub struct NotificationInbox {
    entries: Deque<StoredNotification, INBOX_MAX>,
    capacity: usize,
}

impl NotificationInbox {
    /// `capacity` is clamped to `1..=INBOX_MAX`.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Deque::new(),
            capacity: capacity.clamp(1, INBOX_MAX),
        }
    }

    /// Save a received message at the front.  Blank titles fall back to
    /// "Notification".
    pub fn save(&mut self, title: Option<&str>, body: Option<&str>, received_at: DateTime<Utc>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        let entry = StoredNotification {
            id: received_at.timestamp_millis().to_string(),
            title: title.filter(|t| !t.is_empty()).unwrap_or("Notification").to_owned(),
            body: body.unwrap_or_default().to_owned(),
            received_at,
        };
        if let Err(dropped) = self.entries.push_front(entry) {
            warn!("Inbox full, dropping notification '{}'", dropped.title);
        }
    }

    /// Save a dispatched alert.
    pub fn save_alert(&mut self, message: &AlertMessage, received_at: DateTime<Utc>) {
        self.save(Some(&message.title), Some(&message.body), received_at);
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &StoredNotification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
