//! Unified error types for the GrowSync core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! service's error handling uniform.  Sub-enums stay `Copy` where they can so
//! they pass through the session and the alert monitor without allocation.

use core::fmt;

use crate::app::ports::{DispatchError, StoreError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible core operation funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A sensor reading could not be classified.
    InvalidReading(ReadingError),
    /// The irrigation timer input was rejected.
    InvalidDuration(DurationError),
    /// The session was asked to do something its current state forbids.
    Session(SessionError),
    /// A write to the realtime store failed.
    StoreWrite(StoreError),
    /// The notification dispatcher rejected an alert.
    Dispatch(DispatchError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReading(e) => write!(f, "invalid reading: {e}"),
            Self::InvalidDuration(e) => write!(f, "invalid duration: {e}"),
            Self::Session(e) => write!(f, "session: {e}"),
            Self::StoreWrite(e) => write!(f, "store write failed: {e}"),
            Self::Dispatch(e) => write!(f, "dispatch failed: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Reading errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingError {
    /// The sensor key is not known to the table in use.
    UnknownSensor(String),
    /// The value is not a finite number.
    NotNumeric,
    /// A sensor-log path did not have the `<root>/<sensor>/<timestamp>` shape.
    MalformedPath(String),
}

impl fmt::Display for ReadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSensor(key) => write!(f, "unrecognised sensor type '{key}'"),
            Self::NotNumeric => write!(f, "value is not numeric"),
            Self::MalformedPath(path) => write!(f, "malformed sensor-log path '{path}'"),
        }
    }
}

impl From<ReadingError> for Error {
    fn from(e: ReadingError) -> Self {
        Self::InvalidReading(e)
    }
}

// ---------------------------------------------------------------------------
// Duration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationError {
    /// Input is not an integer.
    NotANumber,
    /// Input is zero or negative.
    NotPositive,
    /// Minutes do not fit a millisecond counter.
    TooLong,
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "timer value is not a number"),
            Self::NotPositive => write!(f, "timer value must be greater than 0"),
            Self::TooLong => write!(f, "timer value is too large"),
        }
    }
}

impl From<DurationError> for Error {
    fn from(e: DurationError) -> Self {
        Self::InvalidDuration(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `start` while a cycle is already counting down.
    AlreadyRunning,
    /// `stop` while no cycle is active.
    NotRunning,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "irrigation already running"),
            Self::NotRunning => write!(f, "irrigation is not running"),
        }
    }
}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::StoreWrite(e)
    }
}

impl From<DispatchError> for Error {
    fn from(e: DispatchError) -> Self {
        Self::Dispatch(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
