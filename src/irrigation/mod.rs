//! Irrigation valve control.
//!
//! The device watches a single command node in the realtime store holding
//! `{angle, timer}`.  A non-zero angle opens the servo valve for `timer`
//! milliseconds; `{0, 0}` closes it.  [`session`] runs the client-side
//! countdown that writes those commands, [`mirror`] tracks whatever command
//! is actually in the store.

pub mod mirror;
pub mod session;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DurationError;

/// Milliseconds per minute of timer input.
pub const MS_PER_MINUTE: u64 = 60_000;

/// Timer shortcuts offered on the control screen: (minutes, label).
pub const DURATION_PRESETS: [(u32, &str); 6] = [
    (10, "10 min"),
    (20, "20 min"),
    (30, "30 min"),
    (60, "1 hour"),
    (90, "1.5 hours"),
    (120, "2 hours"),
];

/// Valve opening angles the servo supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValveAngle {
    #[default]
    Deg45,
    Deg90,
    Deg135,
    Deg180,
}

impl ValveAngle {
    pub const ALL: [Self; 4] = [Self::Deg45, Self::Deg90, Self::Deg135, Self::Deg180];

    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg45 => 45,
            Self::Deg90 => 90,
            Self::Deg135 => 135,
            Self::Deg180 => 180,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.degrees() == degrees)
    }
}

impl fmt::Display for ValveAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Desired device state as stored at the command node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IrrigationCommand {
    /// Valve angle in degrees; `0` means closed.
    #[serde(rename = "angle")]
    pub angle_degrees: u16,
    /// How long the valve stays open.
    #[serde(rename = "timer")]
    pub duration_ms: u64,
}

impl IrrigationCommand {
    /// Valve closed.
    pub const CLOSED: Self = Self { angle_degrees: 0, duration_ms: 0 };

    pub fn open(angle: ValveAngle, minutes: u32) -> Self {
        Self {
            angle_degrees: angle.degrees(),
            duration_ms: u64::from(minutes) * MS_PER_MINUTE,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.angle_degrees == 0
    }
}

/// Parse the timer text field into whole minutes.
///
/// Surrounding whitespace is ignored; anything else that is not a positive
/// integer is rejected.
pub fn parse_duration_minutes(input: &str) -> Result<u32, DurationError> {
    let minutes: i64 = input.trim().parse().map_err(|_| DurationError::NotANumber)?;
    if minutes <= 0 {
        return Err(DurationError::NotPositive);
    }
    u32::try_from(minutes).map_err(|_| DurationError::TooLong)
}

/// Remaining time split for the `MM:SS` display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub fn from_ms(remaining_ms: u64) -> Self {
        Self {
            minutes: remaining_ms / MS_PER_MINUTE,
            seconds: (remaining_ms / 1000) % 60,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}
