//! Mock port adapters for integration tests.
//!
//! Records every store write and every dispatched message so tests can
//! assert on the full history.

use chrono::{DateTime, TimeZone, Utc};
use growsync::adapters::memory_store::MemoryStore;
use growsync::alerts::AlertMessage;
use growsync::app::events::AppEvent;
use growsync::app::ports::{
    DispatchError, EventSink, NotificationPort, RealtimeStore, StoreError, Subscription, TimePort,
};
use serde_json::{Value, json};

// ── RecordingStore ────────────────────────────────────────────

/// [`MemoryStore`] wrapper that records writes and can refuse them.
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub writes: Vec<(String, Value)>,
    pub fail_writes: Option<StoreError>,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new() -> Self {
        Self { inner: MemoryStore::new(), writes: Vec::new(), fail_writes: None }
    }

    /// Writes that landed on `path`, in order.
    pub fn writes_to(&self, path: &str) -> Vec<&Value> {
        self.writes.iter().filter(|(p, _)| p == path).map(|(_, v)| v).collect()
    }

    pub fn close_writes(&self, path: &str) -> usize {
        self.writes_to(path)
            .into_iter()
            .filter(|v| **v == json!({"angle": 0, "timer": 0}))
            .count()
    }
}

impl RealtimeStore for RecordingStore {
    fn write(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        if let Some(e) = self.fail_writes {
            return Err(e);
        }
        self.writes.push((path.to_owned(), value.clone()));
        self.inner.write(path, value)
    }

    fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.inner.read(path)
    }

    fn subscribe(&mut self, path: &str) -> Subscription {
        self.inner.subscribe(path)
    }
}

// ── MockNotifier ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockNotifier {
    pub sent: Vec<AlertMessage>,
    pub fail: Option<DispatchError>,
}

impl NotificationPort for MockNotifier {
    fn send(&mut self, message: &AlertMessage) -> Result<(), DispatchError> {
        if let Some(e) = self.fail {
            return Err(e);
        }
        self.sent.push(message.clone());
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

/// Event sink that keeps every event.
#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Clock ─────────────────────────────────────────────────────

pub struct PinnedClock(pub DateTime<Utc>);

impl PinnedClock {
    pub fn morning() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 11, 2, 8, 30, 0).unwrap())
    }
}

impl TimePort for PinnedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
