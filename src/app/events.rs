//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, show a toast, or update a
//! countdown label.

use crate::alerts::AlertEvent;
use crate::app::ports::{DispatchError, StoreError};
use crate::error::ReadingError;
use crate::irrigation::{Countdown, IrrigationCommand};

/// Which command write a [`AppEvent::StoreWriteFailed`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Opening write from `start`.
    Start,
    /// Closing write from a manual stop.
    Stop,
    /// Closing write when the countdown reached zero.
    Complete,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service subscribed to its paths and is idle.
    Started,

    /// A session started with this command.
    IrrigationStarted(IrrigationCommand),

    /// Countdown after a tick.
    Countdown(Countdown),

    /// The countdown reached zero ("Watering Completed").
    IrrigationCompleted,

    /// The user stopped the session early.
    IrrigationStopped,

    /// The device command node changed.
    DeviceStateObserved(IrrigationCommand),

    /// A command write was refused by the store.  The session state has
    /// already moved on.
    StoreWriteFailed { op: WriteOp, error: StoreError },

    /// A reading classified Warning or Danger and was dispatched.
    AlertRaised(AlertEvent),

    /// A reading classified non-safe but the dispatcher failed.
    AlertDispatchFailed { alert: AlertEvent, error: DispatchError },

    /// A logged reading could not be classified and was dropped.
    ReadingRejected(ReadingError),
}
