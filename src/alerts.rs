//! Sensor alert monitor.
//!
//! Runs on every newly created sensor-log entry, classifies it against the
//! alerting table, and hands one push message per non-safe reading to the
//! [`NotificationPort`].
//!
//! ```text
//!  value created ──▶ parse path ──▶ classify(Alerting) ──▶ Safe?  ──▶ done
//!                        │                │                  │
//!                  InvalidReading   InvalidReading      Warning/Danger
//!                   (log, drop)      (log, drop)             ▼
//!                                                   AlertEvent ──▶ send once
//! ```
//!
//! There is no rate limiting or deduplication: repeated non-safe readings
//! each produce a new alert.  Dispatch failures are logged and reported,
//! never retried.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::ports::{DispatchError, NotificationPort, TimePort};
use crate::error::ReadingError;
use crate::sensors::history::parse_log_path;
use crate::sensors::{SensorReading, SensorType};
use crate::thresholds::{Status, ThresholdTable};

// ---------------------------------------------------------------------------
// Alert payloads
// ---------------------------------------------------------------------------

/// Severity of a raised alert.  `Safe` never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn from_status(status: Status) -> Option<Self> {
        match status {
            Status::Safe => None,
            Status::Warning => Some(Self::Warning),
            Status::Danger => Some(Self::Danger),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// One non-safe classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub sensor_type: SensorType,
    pub value: f64,
    pub status: AlertLevel,
    pub generated_at: DateTime<Utc>,
}

/// Topic push message as handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub topic: String,
    pub title: String,
    pub body: String,
    /// String-only data map delivered alongside the notification.
    pub data: BTreeMap<String, String>,
}

impl AlertEvent {
    /// Build the push message for this alert.
    pub fn to_message(&self, topic: &str) -> AlertMessage {
        let key = self.sensor_type.store_key();
        let status = self.status.as_str();
        let value = format_value(self.value);

        let data = BTreeMap::from([
            ("sensorType".to_owned(), key.to_owned()),
            ("value".to_owned(), value.clone()),
            ("status".to_owned(), status.to_owned()),
            (
                "timestamp".to_owned(),
                self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ]);

        AlertMessage {
            topic: topic.to_owned(),
            title: format!("{} Alert: {key}", status.to_uppercase()),
            body: format!("The {key} value is {value}, which is out of the safe range."),
            data,
        }
    }
}

/// Render a reading without a trailing `.0` for whole numbers.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// What happened to one created reading.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorOutcome {
    /// Reading classified Safe; nothing sent.
    Safe,
    /// Alert built and accepted by the dispatcher.
    Dispatched(AlertEvent),
    /// Alert built but the dispatcher failed.
    DispatchFailed(AlertEvent, DispatchError),
}

/// Evaluates created readings against the alerting table.
pub struct AlertMonitor {
    table: ThresholdTable,
    log_root: String,
    topic: String,
}

impl AlertMonitor {
    pub fn new(log_root: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            table: ThresholdTable::alerting(),
            log_root: log_root.into(),
            topic: topic.into(),
        }
    }

    /// Handle one value-created event at `path`.
    ///
    /// Invalid readings are logged and returned as errors; the dispatcher is
    /// never called for them.
    pub fn on_value_created(
        &self,
        path: &str,
        raw: &Value,
        clock: &impl TimePort,
        notifier: &mut impl NotificationPort,
    ) -> Result<MonitorOutcome, ReadingError> {
        let reading = parse_log_path(&self.log_root, path)
            .and_then(|(sensor, _)| SensorReading::from_value(sensor, raw, clock.now()))
            .inspect_err(|e| error!("Invalid sensor data at {path}: {e} ({raw})"))?;
        self.evaluate(&reading, clock, notifier)
    }

    /// Classify a parsed reading and dispatch if it is not safe.
    pub fn evaluate(
        &self,
        reading: &SensorReading,
        clock: &impl TimePort,
        notifier: &mut impl NotificationPort,
    ) -> Result<MonitorOutcome, ReadingError> {
        let status = self
            .table
            .classify(reading.sensor_type, reading.value)
            .inspect_err(|e| error!("Invalid sensor data: {e}"))?;

        let Some(level) = AlertLevel::from_status(status) else {
            return Ok(MonitorOutcome::Safe);
        };

        let alert = AlertEvent {
            sensor_type: reading.sensor_type,
            value: reading.value,
            status: level,
            generated_at: clock.now(),
        };
        let message = alert.to_message(&self.topic);

        match notifier.send(&message) {
            Ok(()) => {
                info!("Notification sent for {}: {}", reading.sensor_type.store_key(), message.title);
                Ok(MonitorOutcome::Dispatched(alert))
            }
            Err(e) => {
                error!("Failed to send notification: {e}");
                Ok(MonitorOutcome::DispatchFailed(alert, e))
            }
        }
    }
}
