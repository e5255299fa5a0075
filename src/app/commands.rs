//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (control screen,
//! settings screen, lifecycle hooks) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::config::SystemConfig;
use crate::irrigation::ValveAngle;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Open the valve at `angle` for the minutes typed into the timer field.
    StartIrrigation { angle: ValveAngle, duration_input: String },

    /// Close the valve now.
    StopIrrigation,

    /// The control screen went away; drop the local countdown.
    Teardown,

    /// Hot-reload configuration.  Only accepted while idle.
    UpdateConfig(SystemConfig),
}
