//! Irrigation countdown state machine.
//!
//! ```text
//!  IDLE ──start(angle, minutes)──▶ RUNNING ──tick…──▶ remaining == 0
//!    ▲                                │                     │
//!    │                              stop()            write {0,0}
//!    │                                │                     │
//!    └───────── write {0,0} ◀─────────┘◀────────────────────┘
//! ```
//!
//! Leaving `Running` is a two-phase operation: the close command is written
//! first, then the session moves to `Idle` whatever the write returned.  A
//! failed close is reported to the caller but never leaves a countdown stuck
//! on screen.  A failed `start` write, in contrast, keeps the session
//! `Running` locally.

use log::{info, warn};
use serde_json::Value;

use super::{Countdown, IrrigationCommand, ValveAngle, parse_duration_minutes};
use crate::app::ports::{RealtimeStore, StoreError};
use crate::error::{Error, SessionError};

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running { remaining_ms: u64 },
}

/// Result of a successful [`IrrigationSession::start`].
#[derive(Debug, Clone, PartialEq)]
pub struct StartReport {
    pub command: IrrigationCommand,
    /// Outcome of the open-valve write.  The session runs either way.
    pub write: Result<(), StoreError>,
}

/// Result of one [`IrrigationSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session running; nothing happened.
    Idle,
    /// Still counting down.
    Counting { remaining_ms: u64 },
    /// Countdown reached zero and the close command was attempted.
    Completed { write: Result<(), StoreError> },
}

/// One irrigation cycle, from `start` back to `Idle`.
pub struct IrrigationSession {
    state: SessionState,
    command_path: String,
    tick_ms: u64,
}

impl IrrigationSession {
    pub fn new(command_path: impl Into<String>, tick_ms: u32) -> Self {
        Self {
            state: SessionState::Idle,
            command_path: command_path.into(),
            tick_ms: u64::from(tick_ms.max(1)),
        }
    }

    // ── Transitions ───────────────────────────────────────────

    /// Open the valve at `angle` for `duration_input` minutes.
    ///
    /// Rejects bad input with [`Error::InvalidDuration`] before anything is
    /// written.
    pub fn start(
        &mut self,
        angle: ValveAngle,
        duration_input: &str,
        store: &mut impl RealtimeStore,
    ) -> Result<StartReport, Error> {
        if self.is_active() {
            return Err(SessionError::AlreadyRunning.into());
        }
        let minutes = parse_duration_minutes(duration_input)
            .inspect_err(|e| warn!("Invalid timer input '{duration_input}': {e}"))?;

        let command = IrrigationCommand::open(angle, minutes);
        let write = self.write_command(command, store);
        match &write {
            Ok(()) => info!("Servo started at {angle} for {minutes} minutes"),
            Err(e) => warn!("Error starting irrigation: {e}; countdown continues locally"),
        }

        self.state = SessionState::Running { remaining_ms: command.duration_ms };
        Ok(StartReport { command, write })
    }

    /// Advance the countdown by one tick interval.
    pub fn tick(&mut self, store: &mut impl RealtimeStore) -> TickOutcome {
        let SessionState::Running { remaining_ms } = self.state else {
            return TickOutcome::Idle;
        };

        let remaining_ms = remaining_ms.saturating_sub(self.tick_ms);
        if remaining_ms > 0 {
            self.state = SessionState::Running { remaining_ms };
            return TickOutcome::Counting { remaining_ms };
        }

        let write = self.close_valve(store);
        match &write {
            Ok(()) => info!("Servo reset to angle 0 after irrigation cycle"),
            Err(e) => warn!("Error resetting servo after cycle completion: {e}"),
        }
        TickOutcome::Completed { write }
    }

    /// Close the valve now.
    ///
    /// The returned write outcome is informational; the session is `Idle`
    /// once this returns `Ok`.
    pub fn stop(&mut self, store: &mut impl RealtimeStore) -> Result<Result<(), StoreError>, SessionError> {
        if !self.is_active() {
            return Err(SessionError::NotRunning);
        }
        let write = self.close_valve(store);
        match &write {
            Ok(()) => info!("Irrigation stopped immediately"),
            Err(e) => warn!("Error stopping irrigation: {e}"),
        }
        Ok(write)
    }

    /// Drop the local countdown without touching the store (owning view
    /// torn down).  The device keeps whatever command it last received.
    pub fn teardown(&mut self) {
        if let SessionState::Running { remaining_ms } = self.state {
            warn!("Session torn down with {remaining_ms} ms remaining; valve command left as-is");
        }
        self.state = SessionState::Idle;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Running { .. })
    }

    pub fn remaining_ms(&self) -> u64 {
        match self.state {
            SessionState::Running { remaining_ms } => remaining_ms,
            SessionState::Idle => 0,
        }
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::from_ms(self.remaining_ms())
    }

    // ── Internal ──────────────────────────────────────────────

    /// Phase 1: attempt the close write.  Phase 2: go Idle regardless.
    fn close_valve(&mut self, store: &mut impl RealtimeStore) -> Result<(), StoreError> {
        let write = self.write_command(IrrigationCommand::CLOSED, store);
        self.state = SessionState::Idle;
        write
    }

    fn write_command(&self, command: IrrigationCommand, store: &mut impl RealtimeStore) -> Result<(), StoreError> {
        let value: Value = serde_json::to_value(command).map_err(|_| StoreError::Encoding)?;
        store.write(&self.command_path, value)
    }
}
