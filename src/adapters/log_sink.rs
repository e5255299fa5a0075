//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! `log` facade.  A UI adapter would implement the same trait to raise
//! toasts and banners instead.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | session idle"),
            AppEvent::IrrigationStarted(cmd) => {
                info!("VALVE | open angle={} timer={}ms", cmd.angle_degrees, cmd.duration_ms);
            }
            AppEvent::Countdown(c) => info!("VALVE | remaining {c}"),
            AppEvent::IrrigationCompleted => info!("VALVE | Watering Completed"),
            AppEvent::IrrigationStopped => info!("VALVE | stopped"),
            AppEvent::DeviceStateObserved(cmd) => {
                info!("SERVO | angle={} timer={}ms", cmd.angle_degrees, cmd.duration_ms);
            }
            AppEvent::StoreWriteFailed { op, error } => warn!("STORE | {op:?} write failed: {error}"),
            AppEvent::AlertRaised(alert) => info!(
                "ALERT | {} {} = {}",
                alert.status.as_str(),
                alert.sensor_type.store_key(),
                alert.value
            ),
            AppEvent::AlertDispatchFailed { alert, error } => warn!(
                "ALERT | {} dispatch failed: {error}",
                alert.sensor_type.store_key()
            ),
            AppEvent::ReadingRejected(e) => warn!("READING | dropped: {e}"),
        }
    }
}
