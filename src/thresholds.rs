//! Sensor threshold tables and the shared band classifier.
//!
//! Two tables exist and are deliberately kept apart:
//!
//! | Table                | Used by                          |
//! |----------------------|----------------------------------|
//! | [`DISPLAY_BANDS`]    | dashboard card colouring         |
//! | [`ALERTING_BANDS`]   | automated alert dispatch         |
//!
//! They disagree (e.g. Temperature is Danger above 38 °C on the dashboard
//! but above 35 °C for alerts).  Both are preserved as shipped.
//!
//! ## Band shapes
//!
//! ```text
//!  two-sided:  danger │ warning │   safe   │ warning │ danger
//!                    w.lo      s.lo       s.hi      w.hi
//!
//!  one-sided:  danger │ warning │ danger │   safe   │ danger
//!                    w.lo      w.hi     s.lo       s.hi
//! ```
//!
//! All bounds are inclusive.  Anything outside the safe and warning spans
//! is Danger, including the gap a one-sided table leaves between its
//! warning and safe spans.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReadingError;
use crate::sensors::SensorType;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Classification outcome, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Safe,
    Warning,
    Danger,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Dashboard gauge colour for this status.
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Safe => "#32CD32",
            Self::Warning => "#FFC107",
            Self::Danger => "#F44336",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// Closed interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// Band description for one sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bands {
    /// Warning span encloses the safe span on both sides.
    TwoSided { safe: Span, warning: Span },
    /// Warning span sits entirely below the safe span.
    OneSided { safe: Span, warning: Span },
}

impl Bands {
    /// Classify a finite value against these bands.
    pub fn classify(&self, value: f64) -> Status {
        let (Self::TwoSided { safe, warning } | Self::OneSided { safe, warning }) = self;
        if safe.contains(value) {
            Status::Safe
        } else if warning.contains(value) {
            Status::Warning
        } else {
            Status::Danger
        }
    }

    /// The inclusive safe span.
    pub fn safe(&self) -> Span {
        match self {
            Self::TwoSided { safe, .. } | Self::OneSided { safe, .. } => *safe,
        }
    }

    /// Check the ordering the shape promises.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::TwoSided { safe, warning } => {
                warning.lo < safe.lo && safe.lo <= safe.hi && safe.hi < warning.hi
            }
            Self::OneSided { safe, warning } => {
                warning.lo <= warning.hi && warning.hi < safe.lo && safe.lo <= safe.hi
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Which call site a table serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    /// Interactive dashboard colouring.
    Display,
    /// Automated alert dispatch.
    Alerting,
}

/// Dashboard colouring bands.
pub const DISPLAY_BANDS: &[(SensorType, Bands)] = &[
    (
        SensorType::Temperature,
        Bands::TwoSided { safe: Span::new(25.0, 35.0), warning: Span::new(20.0, 38.0) },
    ),
    (
        SensorType::PhLevel,
        Bands::TwoSided { safe: Span::new(5.0, 9.0), warning: Span::new(4.0, 10.0) },
    ),
    (
        SensorType::Humidity,
        Bands::TwoSided { safe: Span::new(70.0, 90.0), warning: Span::new(65.0, 95.0) },
    ),
    (
        SensorType::WaterLevel,
        Bands::OneSided { safe: Span::new(51.0, 100.0), warning: Span::new(26.0, 50.0) },
    ),
];

/// Alert dispatch bands.  Water level is not monitored here.
pub const ALERTING_BANDS: &[(SensorType, Bands)] = &[
    (
        SensorType::Temperature,
        Bands::TwoSided { safe: Span::new(20.0, 30.0), warning: Span::new(10.0, 35.0) },
    ),
    (
        SensorType::Humidity,
        Bands::TwoSided { safe: Span::new(50.0, 70.0), warning: Span::new(30.0, 90.0) },
    ),
    (
        SensorType::PhLevel,
        Bands::TwoSided { safe: Span::new(6.5, 8.5), warning: Span::new(5.5, 9.5) },
    ),
];

/// A read-only, process-wide threshold table.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable {
    kind: TableKind,
    entries: &'static [(SensorType, Bands)],
}

impl ThresholdTable {
    /// Load the named table.
    pub const fn load(kind: TableKind) -> Self {
        let entries = match kind {
            TableKind::Display => DISPLAY_BANDS,
            TableKind::Alerting => ALERTING_BANDS,
        };
        Self { kind, entries }
    }

    pub const fn display() -> Self {
        Self::load(TableKind::Display)
    }

    pub const fn alerting() -> Self {
        Self::load(TableKind::Alerting)
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Bands for `sensor`, if this table covers it.
    pub fn bands(&self, sensor: SensorType) -> Option<&Bands> {
        self.entries
            .iter()
            .find_map(|(s, b)| (*s == sensor).then_some(b))
    }

    /// Classify `value` for `sensor`.
    ///
    /// Fails with [`ReadingError::UnknownSensor`] if the table does not cover
    /// the sensor and [`ReadingError::NotNumeric`] for NaN or infinities.
    pub fn classify(&self, sensor: SensorType, value: f64) -> Result<Status, ReadingError> {
        let bands = self
            .bands(sensor)
            .ok_or_else(|| ReadingError::UnknownSensor(sensor.store_key().to_owned()))?;
        if !value.is_finite() {
            return Err(ReadingError::NotNumeric);
        }
        Ok(bands.classify(value))
    }
}
