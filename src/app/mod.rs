//! Application core: domain orchestration with no direct I/O.
//!
//! This module wires the threshold classifier, the alert monitor, and the
//! irrigation session together.  All interaction with the hosted store,
//! the push dispatcher, and the clock happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable with in-memory
//! adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
