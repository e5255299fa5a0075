//! System configuration parameters
//!
//! All tunable parameters for the GrowSync core.
//! Values can be overridden from a JSON file (see
//! [`JsonConfigFile`](crate::adapters::config_store::JsonConfigFile)).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Store layout ---
    /// Root of the per-sensor reading log.
    pub sensor_log_path: String,
    /// Single node holding the desired valve command.
    pub servo_command_path: String,
    /// Root of the per-user records.
    pub users_path: String,

    // --- Alerts ---
    /// Push topic that alert messages are published to.
    pub alert_topic: String,
    /// Maximum notifications kept in the local inbox.
    pub inbox_capacity: usize,

    // --- Irrigation ---
    /// Countdown tick interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Valve angle pre-selected on the control screen.
    pub default_angle_degrees: u16,
    /// Timer input pre-filled on the control screen (minutes).
    pub default_duration_minutes: u32,

    // --- Graph ---
    /// Readings averaged into one graph point.
    pub summary_chunk_size: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Store layout
            sensor_log_path: "irrigationSystemLogs".into(),
            servo_command_path: "servoControl".into(),
            users_path: "users".into(),

            // Alerts
            alert_topic: "sensor-alerts".into(),
            inbox_capacity: 32,

            // Irrigation
            tick_interval_ms: 1000, // 1 Hz
            default_angle_degrees: 45,
            default_duration_minutes: 10,

            // Graph
            summary_chunk_size: 5,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Called by config adapters before a config is
    /// handed to the service or persisted.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.sensor_log_path.is_empty()
            || self.servo_command_path.is_empty()
            || self.users_path.is_empty()
        {
            return Err("store paths must not be empty");
        }
        if self.alert_topic.is_empty() {
            return Err("alert_topic must not be empty");
        }
        if !(1..=crate::adapters::inbox::INBOX_MAX).contains(&self.inbox_capacity) {
            return Err("inbox_capacity must be 1–64");
        }
        if !(100..=60_000).contains(&self.tick_interval_ms) {
            return Err("tick_interval_ms must be 100–60000");
        }
        if crate::irrigation::ValveAngle::from_degrees(self.default_angle_degrees).is_none() {
            return Err("default_angle_degrees must be 45, 90, 135 or 180");
        }
        if self.default_duration_minutes == 0 {
            return Err("default_duration_minutes must be > 0");
        }
        if self.summary_chunk_size == 0 {
            return Err("summary_chunk_size must be > 0");
        }
        Ok(())
    }
}
