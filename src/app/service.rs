//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the irrigation session, the device-state mirror and
//! the alert monitor.  It exposes a clean, backend-agnostic API.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with in-memory adapters.
//!
//! ```text
//!  RealtimeStore ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │        AppService         │
//!  RealtimeStore ◀── │  Session · Mirror · Alert │ ──▶ NotificationPort
//!                    └──────────────────────────┘
//! ```

use chrono::NaiveDate;
use log::{info, warn};
use serde_json::{Map, Value};

use crate::alerts::{AlertMonitor, MonitorOutcome};
use crate::config::SystemConfig;
use crate::error::{Error, Result, SessionError};
use crate::irrigation::mirror::DeviceStateMirror;
use crate::irrigation::session::{IrrigationSession, SessionState, TickOutcome};
use crate::irrigation::{Countdown, IrrigationCommand};
use crate::sensors::SensorType;
use crate::sensors::history::{self, DailySummary, SensorCard};

use super::commands::AppCommand;
use super::events::{AppEvent, WriteOp};
use super::ports::{ConfigPort, EventSink, NotificationPort, RealtimeStore, StoreError, Subscription, TimePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    session: IrrigationSession,
    mirror: DeviceStateMirror,
    monitor: AlertMonitor,
    servo_sub: Option<Subscription>,
    log_sub: Option<Subscription>,
    tick_count: u64,
    config_dirty: bool,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** subscribe to anything; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let session = IrrigationSession::new(config.servo_command_path.clone(), config.tick_interval_ms);
        let monitor = AlertMonitor::new(config.sensor_log_path.clone(), config.alert_topic.clone());
        Self {
            config,
            session,
            mirror: DeviceStateMirror::new(),
            monitor,
            servo_sub: None,
            log_sub: None,
            tick_count: 0,
            config_dirty: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Subscribe to the command node and the sensor log.
    pub fn start(&mut self, store: &mut impl RealtimeStore, sink: &mut impl EventSink) {
        self.subscribe(store);
        sink.emit(&AppEvent::Started);
        self.sync_mirror(sink);
        info!(
            "AppService started (servo={}, logs={})",
            self.config.servo_command_path, self.config.sensor_log_path
        );
    }

    fn subscribe(&mut self, store: &mut impl RealtimeStore) {
        self.servo_sub = Some(store.subscribe(&self.config.servo_command_path));
        self.log_sub = Some(store.subscribe(&self.config.sensor_log_path));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance the irrigation countdown by one tick interval.
    ///
    /// Does nothing (and emits nothing) while idle.
    pub fn tick(&mut self, store: &mut impl RealtimeStore, sink: &mut impl EventSink) -> TickOutcome {
        let outcome = self.session.tick(store);
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Counting { remaining_ms } => {
                self.tick_count += 1;
                sink.emit(&AppEvent::Countdown(Countdown::from_ms(remaining_ms)));
            }
            TickOutcome::Completed { write } => {
                self.tick_count += 1;
                sink.emit(&AppEvent::IrrigationCompleted);
                if let Err(error) = write {
                    sink.emit(&AppEvent::StoreWriteFailed { op: WriteOp::Complete, error });
                }
            }
        }
        outcome
    }

    /// Drain pending store notifications.
    ///
    /// Command-node values update the mirror; every newly created sensor-log
    /// leaf goes through the alert monitor.  Rewrites of an existing reading
    /// are ignored.  Returns the number of events handled.
    pub fn pump_events(
        &mut self,
        clock: &impl TimePort,
        notifier: &mut impl NotificationPort,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut handled = self.sync_mirror(sink);

        if let Some(sub) = &self.log_sub {
            for change in sub.drain() {
                // Only newly created readings trigger the monitor.
                let (true, Some(raw)) = (change.created, change.value) else { continue };
                handled += 1;
                match self.monitor.on_value_created(&change.path, &raw, clock, notifier) {
                    Ok(MonitorOutcome::Safe) => {}
                    Ok(MonitorOutcome::Dispatched(alert)) => sink.emit(&AppEvent::AlertRaised(alert)),
                    Ok(MonitorOutcome::DispatchFailed(alert, error)) => {
                        sink.emit(&AppEvent::AlertDispatchFailed { alert, error });
                    }
                    Err(e) => sink.emit(&AppEvent::ReadingRejected(e)),
                }
            }
        }

        handled
    }

    /// Apply pending command-node values to the mirror.
    fn sync_mirror(&mut self, sink: &mut impl EventSink) -> usize {
        let Some(sub) = &self.servo_sub else { return 0 };
        let mut handled = 0;
        for change in sub.drain().into_iter().filter(|c| !c.created) {
            handled += 1;
            if self.mirror.apply(&change) {
                sink.emit(&AppEvent::DeviceStateObserved(self.mirror.observed()));
            }
        }
        handled
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    ///
    /// Write failures are reported through `sink`, not returned: the
    /// session has already moved on when they happen.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        store: &mut impl RealtimeStore,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::StartIrrigation { angle, duration_input } => {
                let report = self.session.start(angle, &duration_input, store)?;
                sink.emit(&AppEvent::IrrigationStarted(report.command));
                if let Err(error) = report.write {
                    sink.emit(&AppEvent::StoreWriteFailed { op: WriteOp::Start, error });
                }
            }
            AppCommand::StopIrrigation => {
                let write = self.session.stop(store)?;
                sink.emit(&AppEvent::IrrigationStopped);
                if let Err(error) = write {
                    sink.emit(&AppEvent::StoreWriteFailed { op: WriteOp::Stop, error });
                }
            }
            AppCommand::Teardown => self.session.teardown(),
            AppCommand::UpdateConfig(new_config) => {
                if self.session.is_active() {
                    return Err(SessionError::AlreadyRunning.into());
                }
                new_config.validate().map_err(Error::Config)?;
                let resubscribe = self.servo_sub.is_some();
                *self = Self { config_dirty: true, tick_count: self.tick_count, ..Self::new(new_config) };
                if resubscribe {
                    self.subscribe(store);
                    self.sync_mirror(sink);
                }
                info!("Configuration updated at runtime");
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_irrigating(&self) -> bool {
        self.session.is_active()
    }

    pub fn countdown(&self) -> Countdown {
        self.session.countdown()
    }

    /// Last command observed at the device node.
    pub fn device_state(&self) -> IrrigationCommand {
        self.mirror.observed()
    }

    /// Ticks that advanced a running session since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Dashboard cards built from a fresh read of the sensor log.
    pub fn dashboard(&self, store: &impl RealtimeStore) -> core::result::Result<Vec<SensorCard>, StoreError> {
        let root = store.read(&self.config.sensor_log_path)?.unwrap_or(Value::Null);
        Ok(history::dashboard(&root))
    }

    /// Graph summary of one sensor for `date`.
    pub fn daily_summary(
        &self,
        store: &impl RealtimeStore,
        sensor: SensorType,
        date: NaiveDate,
    ) -> core::result::Result<DailySummary, StoreError> {
        let path = format!("{}/{}", self.config.sensor_log_path, sensor.store_key());
        let entries = match store.read(&path)? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Ok(history::daily_summary(&entries, date, self.config.summary_chunk_size))
    }

    // ── Config persistence ────────────────────────────────────

    /// Whether the config has unsaved changes.
    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }

    /// Persist the config if it changed.  Returns `true` if it was saved.
    pub fn save_config_if_dirty(&mut self, storage: &impl ConfigPort) -> bool {
        if !self.config_dirty {
            return false;
        }
        match storage.save(&self.config) {
            Ok(()) => {
                self.config_dirty = false;
                info!("Config saved");
                true
            }
            Err(e) => {
                warn!("Config save failed: {e}");
                false
            }
        }
    }
}
