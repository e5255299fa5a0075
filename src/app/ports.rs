//! Port traits: the hexagonal boundary between domain logic and the managed
//! services the app talks to.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (realtime store, push dispatcher, event sinks, clock,
//! config storage) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics, so
//! the domain core never talks to a vendor SDK directly.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::alerts::AlertMessage;
use crate::config::SystemConfig;

// ───────────────────────────────────────────────────────────────
// Realtime store port (domain ↔ hosted key-value database)
// ───────────────────────────────────────────────────────────────

/// A single notification delivered on a [`Subscription`].
///
/// Two kinds share this type:
/// - value events (`created == false`): `path` is the subscribed path and
///   `value` its whole current value, sent on subscribe and after every
///   write at, above, or below it;
/// - creation events (`created == true`): one per leaf that did not exist
///   before the write, with `path` the full leaf path.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChanged {
    pub path: String,
    /// `None` when the node is absent.
    pub value: Option<Value>,
    pub created: bool,
}

impl ValueChanged {
    pub fn value(path: impl Into<String>, value: Option<Value>) -> Self {
        Self { path: path.into(), value, created: false }
    }

    pub fn created(path: impl Into<String>, value: Value) -> Self {
        Self { path: path.into(), value: Some(value), created: true }
    }
}

/// Ordered stream of [`ValueChanged`] events for one subscribed path.
///
/// Events for the same path arrive in the order the store applied them.
/// Dropping the subscription unsubscribes.
pub struct Subscription {
    rx: Receiver<ValueChanged>,
}

impl Subscription {
    /// Create a connected sender / subscription pair.  Adapters keep the
    /// sender and push every matching change into it.
    pub fn channel() -> (Sender<ValueChanged>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// Next pending event, if any.  Never blocks.
    pub fn try_next(&self) -> Option<ValueChanged> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Take every pending event in delivery order.
    pub fn drain(&self) -> Vec<ValueChanged> {
        self.rx.try_iter().collect()
    }
}

/// Realtime key-value store with change subscriptions.
///
/// Paths are `/`-separated.  A subscription on `a/b` first receives the
/// current value of `a/b` (if any), then a value event for every write that
/// touches `a/b`, plus a creation event for every new leaf below it.
pub trait RealtimeStore {
    /// Replace the value at `path`.
    fn write(&mut self, path: &str, value: Value) -> Result<(), StoreError>;

    /// One-shot read of the value at `path`.
    fn read(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Subscribe to `path`.  See the trait docs for what is delivered.
    fn subscribe(&mut self, path: &str) -> Subscription;
}

// ───────────────────────────────────────────────────────────────
// Notification port (domain → push dispatcher)
// ───────────────────────────────────────────────────────────────

/// Topic-based push-notification dispatcher.
pub trait NotificationPort {
    fn send(&mut self, message: &AlertMessage) -> Result<(), DispatchError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / UI notices)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, toast, banner).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source, injectable so tests can pin timestamps.
pub trait TimePort {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate values before persisting.  Invalid ranges
/// are rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`SystemConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`RealtimeStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    Unavailable,
    /// The store refused the write (rules / auth).
    PermissionDenied,
    /// The value could not be encoded for the store.
    Encoding,
}

/// Errors from [`NotificationPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The dispatcher could not be reached.
    Unavailable,
    /// The dispatcher rejected the message payload.
    Rejected,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "store unavailable"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Encoding => write!(f, "value encoding failed"),
        }
    }
}

impl core::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "dispatcher unavailable"),
            Self::Rejected => write!(f, "message rejected"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for StoreError {}
impl std::error::Error for DispatchError {}
impl std::error::Error for ConfigError {}
