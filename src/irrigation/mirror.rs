//! Read-only mirror of the valve command node.
//!
//! Reflects the last command written by anyone (this client, another
//! client, or the device itself).  Display only; it never feeds back into
//! the local [`IrrigationSession`](super::session::IrrigationSession).

use log::{debug, warn};
use serde_json::Value;

use super::IrrigationCommand;
use crate::app::ports::ValueChanged;

#[derive(Debug, Default)]
pub struct DeviceStateMirror {
    observed: IrrigationCommand,
}

impl DeviceStateMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last command seen at the node (`{0, 0}` before the first event).
    pub fn observed(&self) -> IrrigationCommand {
        self.observed
    }

    /// Apply one change event.  Returns `true` if the observed command
    /// changed.  Removed or undecodable nodes and leaf-creation events
    /// leave the mirror untouched.
    pub fn apply(&mut self, change: &ValueChanged) -> bool {
        if change.created {
            return false;
        }
        let Some(value) = change.value.as_ref().filter(|v| !v.is_null()) else {
            debug!("Servo node at {} removed; keeping last state", change.path);
            return false;
        };
        match decode(value) {
            Some(cmd) if cmd != self.observed => {
                self.observed = cmd;
                true
            }
            Some(_) => false,
            None => {
                warn!("Error decoding servo state at {}: {value}", change.path);
                false
            }
        }
    }
}

fn decode(value: &Value) -> Option<IrrigationCommand> {
    serde_json::from_value(value.clone()).ok()
}
