//! GrowSync core library.
//!
//! Sensor threshold classification, alerting on logged readings, and the
//! irrigation countdown that drives the valve command node.  Everything
//! that talks to a hosted service goes through the port traits in
//! [`app::ports`]; [`adapters`] holds the in-process implementations used
//! by the host binary and the tests.

#![deny(unused_must_use)]

pub mod access;
pub mod adapters;
pub mod alerts;
pub mod app;
pub mod config;
pub mod error;
pub mod irrigation;
pub mod sensors;
pub mod thresholds;
