//! Integration tests for the AppService → IrrigationSession → store
//! pipeline.

use crate::mock_ports::{LogSink, MockNotifier, PinnedClock, RecordingStore};

use growsync::app::commands::AppCommand;
use growsync::app::events::{AppEvent, WriteOp};
use growsync::app::ports::{RealtimeStore, StoreError};
use growsync::app::service::AppService;
use growsync::config::SystemConfig;
use growsync::error::{DurationError, Error, SessionError};
use growsync::irrigation::session::SessionState;
use growsync::irrigation::{IrrigationCommand, ValveAngle};
use serde_json::json;

const SERVO: &str = "servoControl";

fn make_app() -> (AppService, RecordingStore, LogSink) {
    let mut app = AppService::new(SystemConfig::default());
    let mut store = RecordingStore::new();
    let mut sink = LogSink::new();
    app.start(&mut store, &mut sink);
    (app, store, sink)
}

fn start(angle: ValveAngle, minutes: &str) -> AppCommand {
    AppCommand::StartIrrigation { angle, duration_input: minutes.into() }
}

// ── Full cycle ────────────────────────────────────────────────

#[test]
fn twenty_minute_cycle_closes_exactly_once() {
    let (mut app, mut store, mut sink) = make_app();

    app.handle_command(start(ValveAngle::Deg90, "20"), &mut store, &mut sink).unwrap();
    assert_eq!(store.writes_to(SERVO), [&json!({"angle": 90, "timer": 1_200_000})]);
    assert_eq!(app.session_state(), SessionState::Running { remaining_ms: 1_200_000 });

    for _ in 0..1199 {
        app.tick(&mut store, &mut sink);
    }
    assert_eq!(app.session_state(), SessionState::Running { remaining_ms: 1000 });
    assert_eq!(app.countdown().to_string(), "00:01");

    app.tick(&mut store, &mut sink);
    assert_eq!(app.session_state(), SessionState::Idle);
    assert_eq!(store.close_writes(SERVO), 1);

    // Further ticks are no-ops.
    for _ in 0..10 {
        app.tick(&mut store, &mut sink);
    }
    assert_eq!(store.writes_to(SERVO).len(), 2);
    assert_eq!(sink.count(|e| *e == AppEvent::IrrigationCompleted), 1);
}

#[test]
fn countdown_is_monotonic() {
    let (mut app, mut store, mut sink) = make_app();
    app.handle_command(start(ValveAngle::Deg45, "3"), &mut store, &mut sink).unwrap();

    let mut last = u64::MAX;
    while app.is_irrigating() {
        let SessionState::Running { remaining_ms } = app.session_state() else { unreachable!() };
        assert!(remaining_ms < last);
        last = remaining_ms;
        app.tick(&mut store, &mut sink);
    }
}

// ── Invalid input ─────────────────────────────────────────────

#[test]
fn invalid_durations_write_nothing() {
    for (input, expected) in [
        ("-5", DurationError::NotPositive),
        ("0", DurationError::NotPositive),
        ("abc", DurationError::NotANumber),
        ("", DurationError::NotANumber),
    ] {
        let (mut app, mut store, mut sink) = make_app();
        let err = app.handle_command(start(ValveAngle::Deg90, input), &mut store, &mut sink).unwrap_err();
        assert_eq!(err, Error::InvalidDuration(expected), "input {input:?}");
        assert_eq!(app.session_state(), SessionState::Idle);
        assert!(store.writes.is_empty());
    }
}

#[test]
fn second_start_is_rejected_without_a_write() {
    let (mut app, mut store, mut sink) = make_app();
    app.handle_command(start(ValveAngle::Deg90, "5"), &mut store, &mut sink).unwrap();
    let err = app.handle_command(start(ValveAngle::Deg180, "1"), &mut store, &mut sink).unwrap_err();
    assert_eq!(err, Error::Session(SessionError::AlreadyRunning));
    assert_eq!(store.writes.len(), 1);
}

// ── Stop ──────────────────────────────────────────────────────

#[test]
fn stop_mid_session_closes_once() {
    let (mut app, mut store, mut sink) = make_app();
    app.handle_command(start(ValveAngle::Deg135, "10"), &mut store, &mut sink).unwrap();
    for _ in 0..30 {
        app.tick(&mut store, &mut sink);
    }
    app.handle_command(AppCommand::StopIrrigation, &mut store, &mut sink).unwrap();

    assert_eq!(app.session_state(), SessionState::Idle);
    assert_eq!(app.countdown().to_string(), "00:00");
    assert_eq!(store.close_writes(SERVO), 1);

    for _ in 0..600 {
        app.tick(&mut store, &mut sink);
    }
    assert_eq!(store.close_writes(SERVO), 1);
    assert_eq!(sink.count(|e| *e == AppEvent::IrrigationCompleted), 0);
}

#[test]
fn failed_start_write_keeps_counting() {
    let (mut app, mut store, mut sink) = make_app();
    store.fail_writes = Some(StoreError::PermissionDenied);
    app.handle_command(start(ValveAngle::Deg90, "1"), &mut store, &mut sink).unwrap();

    assert!(app.is_irrigating());
    assert!(sink.events.contains(&AppEvent::StoreWriteFailed {
        op: WriteOp::Start,
        error: StoreError::PermissionDenied
    }));
}

#[test]
fn failed_completion_write_still_goes_idle() {
    let (mut app, mut store, mut sink) = make_app();
    app.handle_command(start(ValveAngle::Deg90, "1"), &mut store, &mut sink).unwrap();
    store.fail_writes = Some(StoreError::Unavailable);
    for _ in 0..60 {
        app.tick(&mut store, &mut sink);
    }
    assert_eq!(app.session_state(), SessionState::Idle);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::StoreWriteFailed { op: WriteOp::Complete, .. })),
        1
    );
}

#[test]
fn teardown_leaves_device_command_alone() {
    let (mut app, mut store, mut sink) = make_app();
    app.handle_command(start(ValveAngle::Deg90, "5"), &mut store, &mut sink).unwrap();
    app.handle_command(AppCommand::Teardown, &mut store, &mut sink).unwrap();

    assert!(!app.is_irrigating());
    assert_eq!(store.writes.len(), 1);
    assert_eq!(store.read(SERVO).unwrap(), Some(json!({"angle": 90, "timer": 300_000})));
}

// ── Device mirror ─────────────────────────────────────────────

#[test]
fn repeated_close_does_not_change_observed_state() {
    let (mut app, mut store, mut sink) = make_app();
    let clock = PinnedClock::morning();
    let mut notifier = MockNotifier::default();

    store.write(SERVO, json!({"angle": 0, "timer": 0})).unwrap();
    store.write(SERVO, json!({"angle": 0, "timer": 0})).unwrap();
    app.pump_events(&clock, &mut notifier, &mut sink);

    assert_eq!(app.device_state(), IrrigationCommand::CLOSED);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::DeviceStateObserved(_))), 0);
}

#[test]
fn mirror_reflects_other_writers() {
    let (mut app, mut store, mut sink) = make_app();
    let clock = PinnedClock::morning();
    let mut notifier = MockNotifier::default();

    store.write(SERVO, json!({"angle": 180, "timer": 120_000})).unwrap();
    app.pump_events(&clock, &mut notifier, &mut sink);

    assert_eq!(app.device_state(), IrrigationCommand { angle_degrees: 180, duration_ms: 120_000 });
    assert!(!app.is_irrigating(), "mirror never drives the local session");
}

#[test]
fn mirror_is_seeded_with_existing_command_on_start() {
    let mut store = RecordingStore::new();
    store.write(SERVO, json!({"angle": 90, "timer": 600_000})).unwrap();

    let mut app = AppService::new(SystemConfig::default());
    let mut sink = LogSink::new();
    app.start(&mut store, &mut sink);

    let open = IrrigationCommand { angle_degrees: 90, duration_ms: 600_000 };
    assert_eq!(app.device_state(), open);
    assert!(sink.events.contains(&AppEvent::DeviceStateObserved(open)));
}

#[test]
fn mirror_is_seeded_after_config_update() {
    let (mut app, mut store, mut sink) = make_app();
    store.write("zone2/servo", json!({"angle": 45, "timer": 120_000})).unwrap();

    let cfg = SystemConfig { servo_command_path: "zone2/servo".into(), ..SystemConfig::default() };
    app.handle_command(AppCommand::UpdateConfig(cfg), &mut store, &mut sink).unwrap();

    assert_eq!(app.device_state(), IrrigationCommand { angle_degrees: 45, duration_ms: 120_000 });
}
