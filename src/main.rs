//! GrowSync host simulation: main entry point
//!
//! Runs the core against in-process adapters: a seeded sensor log, one
//! irrigation cycle, and the resulting alerts and valve writes.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MemoryStore       LogEventSink   JsonConfigFile   SystemClock │
//! │  (RealtimeStore)   (EventSink)    (ConfigPort)     (TimePort)  │
//! │  LocalPushDispatcher (NotificationPort)                        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  IrrigationSession · DeviceStateMirror · AlertMonitor  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `growsync [minutes]`.  Set `GROWSYNC_CONFIG` to a JSON file to
//! load and persist configuration; `RUST_LOG` controls verbosity.

use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use serde_json::json;

use growsync::access::{self, Access, Screen};
use growsync::adapters::config_store::{JsonConfigFile, MemoryConfigStore};
use growsync::adapters::log_sink::LogEventSink;
use growsync::adapters::memory_store::MemoryStore;
use growsync::adapters::push::LocalPushDispatcher;
use growsync::adapters::time::SystemClock;
use growsync::app::commands::AppCommand;
use growsync::app::ports::{ConfigPort, RealtimeStore, TimePort};
use growsync::app::service::AppService;
use growsync::config::SystemConfig;
use growsync::irrigation::ValveAngle;
use growsync::sensors::SensorType;

/// Inner width of the startup banner box.
const BANNER_WIDTH: usize = 38;

/// Title row of the banner, padded so the right border lines up.
fn banner_title(version: &str) -> String {
    let title = format!("  GrowSync v{version}");
    format!("║{title:<BANNER_WIDTH$}║")
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔{}╗", "═".repeat(BANNER_WIDTH));
    info!("{}", banner_title(env!("CARGO_PKG_VERSION")));
    info!("╚{}╝", "═".repeat(BANNER_WIDTH));

    // ── 2. Load config (file or defaults) ─────────────────────
    let storage: Box<dyn ConfigPort> = match std::env::var("GROWSYNC_CONFIG") {
        Ok(path) => Box::new(JsonConfigFile::new(path)),
        Err(_) => Box::new(MemoryConfigStore::new()),
    };
    let config = match storage.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({e}), using defaults");
            SystemConfig::default()
        }
    };

    // ── 3. Adapters ───────────────────────────────────────────
    let clock = SystemClock;
    let mut store = MemoryStore::new();
    let mut sink = LogEventSink::new();
    let mut push = LocalPushDispatcher::new(clock, config.inbox_capacity);
    push.subscribe_topic(&config.alert_topic);

    // ── 4. Access check for the control screen ────────────────
    let uid = "sim-admin";
    access::register_user(&mut store, &config.users_path, uid, "admin@growsync.local")?;
    store.write(&format!("{}/{uid}/role", config.users_path), json!("admin"))?;
    let role = access::resolve_role(&store, &config.users_path, uid);
    if let Access::Deny(reason) = access::check_access(Screen::IrrigationControl.allowed_roles(), role) {
        bail!("{reason}");
    }
    info!("User {uid} signed in as {}", role.as_str());

    // ── 5. AppService ─────────────────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut store, &mut sink);

    seed_readings(&mut store, &config, clock.now())?;
    app.pump_events(&clock, &mut push, &mut sink);

    for card in app.dashboard(&store)? {
        info!(
            "{:<18} {:>7.2} {:<4} {:?}",
            card.sensor.label(),
            card.latest.value,
            card.gauge.unit,
            card.status
        );
    }

    // ── 6. One irrigation cycle ───────────────────────────────
    let minutes = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.default_duration_minutes.to_string());
    let angle = ValveAngle::from_degrees(config.default_angle_degrees).unwrap_or_default();
    app.handle_command(
        AppCommand::StartIrrigation { angle, duration_input: minutes },
        &mut store,
        &mut sink,
    )?;

    let tick = Duration::from_millis(u64::from(config.tick_interval_ms));
    while app.is_irrigating() {
        thread::sleep(tick);
        app.tick(&mut store, &mut sink);
        app.pump_events(&clock, &mut push, &mut sink);
    }
    info!("Device reports {:?}", app.device_state());

    // ── 7. Wrap up ────────────────────────────────────────────
    let today = clock.now().date_naive();
    let summary = app.daily_summary(&store, SensorType::Temperature, today)?;
    info!(
        "Temperature today: high {:.2}, low {:.2}, avg {:.2}",
        summary.highest, summary.lowest, summary.average
    );
    for n in push.inbox().iter() {
        info!("INBOX | {} | {}", n.title, n.body);
    }

    if let Err(e) = storage.save(&config) {
        warn!("Config not persisted: {e}");
    }
    Ok(())
}

/// Write one reading per sensor under the log root, keyed the way the
/// field device keys them.
fn seed_readings(store: &mut MemoryStore, config: &SystemConfig, at: chrono::DateTime<Utc>) -> Result<()> {
    let key = at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let key = key.trim_end_matches('Z').replacen('T', "_", 1);
    let samples = [
        (SensorType::Temperature, json!(31.5)),
        (SensorType::Humidity, json!(92)),
        (SensorType::PhLevel, json!(6.8)),
        (SensorType::WaterLevel, json!(40)),
    ];
    for (sensor, value) in samples {
        store.write(&format!("{}/{}/{key}", config.sensor_log_path, sensor.store_key()), value)?;
    }
    Ok(())
}
