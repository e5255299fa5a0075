//! Sensor identities and readings.
//!
//! A [`SensorReading`] is produced once from a value-changed event on the
//! sensor log and consumed once by the classifier.  [`history`] holds the
//! projections the dashboard and graph screens build from the raw log.

pub mod history;

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReadingError;

/// Every sensor the greenhouse controller reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensorType {
    Temperature,
    Humidity,
    PhLevel,
    WaterLevel,
}

impl SensorType {
    pub const ALL: [Self; 4] = [
        Self::Temperature,
        Self::Humidity,
        Self::PhLevel,
        Self::WaterLevel,
    ];

    /// Key used for this sensor under the sensor-log root.
    pub const fn store_key(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::PhLevel => "pH",
            Self::WaterLevel => "waterLevelPercentage",
        }
    }

    /// Human-readable label shown on the dashboard cards.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::PhLevel => "pH Level",
            Self::WaterLevel => "Water Level",
        }
    }

    /// Resolve a sensor-log key.
    pub fn from_store_key(key: &str) -> Result<Self, ReadingError> {
        Self::ALL
            .into_iter()
            .find(|s| s.store_key() == key)
            .ok_or_else(|| ReadingError::UnknownSensor(key.to_owned()))
    }

    /// Dashboard gauge layout for this sensor.
    pub const fn gauge(self) -> GaugeSpec {
        match self {
            Self::Temperature => GaugeSpec { unit: "°C", min: 20.0, max: 40.0, normal_range: Some("25-35 °C") },
            Self::Humidity => GaugeSpec { unit: "%", min: 50.0, max: 100.0, normal_range: Some("70-90 %") },
            Self::PhLevel => GaugeSpec { unit: "pH", min: 0.0, max: 14.0, normal_range: Some("5.0-9.0 pH") },
            Self::WaterLevel => GaugeSpec { unit: "%", min: 0.0, max: 100.0, normal_range: None },
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scale and annotation of one dashboard gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSpec {
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub normal_range: Option<&'static str>,
}

impl GaugeSpec {
    /// Fill fraction of the gauge, clamped to `0.0..=1.0`.
    pub fn progress(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// One numeric reading from one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_type: SensorType,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

impl SensorReading {
    /// Build a reading from a raw store value.  Only finite JSON numbers are
    /// accepted; numeric strings, booleans and nulls are rejected.
    pub fn from_value(
        sensor_type: SensorType,
        raw: &Value,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, ReadingError> {
        let value = raw
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or(ReadingError::NotNumeric)?;
        Ok(Self { sensor_type, value, observed_at })
    }
}
