//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock ports.  Nothing talks to a hosted service.

mod access_tests;
mod mock_ports;
mod monitor_tests;
mod service_tests;
