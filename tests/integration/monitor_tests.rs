//! Integration tests for logged reading → classifier → push dispatch.

use crate::mock_ports::{LogSink, MockNotifier, PinnedClock, RecordingStore};

use growsync::adapters::push::LocalPushDispatcher;
use growsync::alerts::{AlertLevel, AlertMonitor, MonitorOutcome};
use growsync::app::events::AppEvent;
use growsync::app::ports::{DispatchError, RealtimeStore};
use growsync::app::service::AppService;
use growsync::config::SystemConfig;
use growsync::error::ReadingError;
use serde_json::json;

fn log_path(sensor: &str) -> String {
    format!("irrigationSystemLogs/{sensor}/2024-11-02_08:30:00")
}

fn make_app() -> (AppService, RecordingStore, LogSink) {
    let mut app = AppService::new(SystemConfig::default());
    let mut store = RecordingStore::new();
    let mut sink = LogSink::new();
    app.start(&mut store, &mut sink);
    (app, store, sink)
}

#[test]
fn danger_ph_produces_full_message() {
    let (mut app, mut store, mut sink) = make_app();
    let mut notifier = MockNotifier::default();

    store.write(&log_path("pH"), json!(4)).unwrap();
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);

    assert_eq!(notifier.sent.len(), 1);
    let msg = &notifier.sent[0];
    assert_eq!(msg.topic, "sensor-alerts");
    assert_eq!(msg.title, "DANGER Alert: pH");
    assert_eq!(msg.body, "The pH value is 4, which is out of the safe range.");
    assert_eq!(msg.data["sensorType"], "pH");
    assert_eq!(msg.data["value"], "4");
    assert_eq!(msg.data["status"], "danger");
    assert_eq!(msg.data["timestamp"], "2024-11-02T08:30:00.000Z");
}

#[test]
fn safe_readings_send_nothing() {
    let (mut app, mut store, mut sink) = make_app();
    let mut notifier = MockNotifier::default();

    for (sensor, v) in [("temperature", 25.0), ("humidity", 50.0), ("pH", 8.5)] {
        store.write(&log_path(sensor), json!(v)).unwrap();
    }
    assert_eq!(app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink), 3);
    assert!(notifier.sent.is_empty());
}

#[test]
fn every_non_safe_reading_alerts_again() {
    let (mut app, mut store, mut sink) = make_app();
    let mut notifier = MockNotifier::default();

    for minute in 0..3 {
        let path = format!("irrigationSystemLogs/humidity/2024-11-02_08:3{minute}:00");
        store.write(&path, json!(95)).unwrap();
    }
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);

    assert_eq!(notifier.sent.len(), 3);
    assert!(notifier.sent.iter().all(|m| m.title == "DANGER Alert: humidity"));
}

#[test]
fn bad_readings_are_dropped() {
    let (mut app, mut store, mut sink) = make_app();
    let mut notifier = MockNotifier::default();

    store.write(&log_path("temperature"), json!("hot")).unwrap();
    store.write(&log_path("co2"), json!(800)).unwrap();
    store.write(&log_path("waterLevelPercentage"), json!(3)).unwrap();
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);

    assert!(notifier.sent.is_empty());
    let rejected: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ReadingRejected(r) => Some(r.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        rejected,
        [
            ReadingError::NotNumeric,
            ReadingError::UnknownSensor("co2".into()),
            ReadingError::UnknownSensor("waterLevelPercentage".into()),
        ]
    );
}

#[test]
fn dispatch_failure_is_not_retried() {
    let (mut app, mut store, mut sink) = make_app();
    let mut notifier = MockNotifier { fail: Some(DispatchError::Unavailable), ..MockNotifier::default() };

    store.write(&log_path("temperature"), json!(40)).unwrap();
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);
    notifier.fail = None;
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);

    assert!(notifier.sent.is_empty());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::AlertDispatchFailed { .. })), 1);
}

#[test]
fn monitor_reports_outcomes_directly() {
    let monitor = AlertMonitor::new("irrigationSystemLogs", "sensor-alerts");
    let clock = PinnedClock::morning();
    let mut notifier = MockNotifier::default();

    let outcome = monitor
        .on_value_created(&log_path("temperature"), &json!(12.5), &clock, &mut notifier)
        .unwrap();
    let MonitorOutcome::Dispatched(alert) = outcome else { panic!("expected dispatch, got {outcome:?}") };
    assert_eq!(alert.status, AlertLevel::Warning);
    assert_eq!(alert.value, 12.5);
    assert_eq!(notifier.sent[0].body, "The temperature value is 12.5, which is out of the safe range.");
}

#[test]
fn local_dispatcher_fills_inbox_newest_first() {
    let (mut app, mut store, mut sink) = make_app();
    let mut push = LocalPushDispatcher::new(PinnedClock::morning(), 4);
    push.subscribe_topic("sensor-alerts");

    store.write(&log_path("temperature"), json!(36)).unwrap();
    store.write(&log_path("humidity"), json!(40)).unwrap();
    app.pump_events(&PinnedClock::morning(), &mut push, &mut sink);

    let titles: Vec<_> = push.inbox().iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["WARNING Alert: humidity", "DANGER Alert: temperature"]);
}

#[test]
fn rewriting_a_reading_does_not_alert_again() {
    let (mut app, mut store, mut sink) = make_app();
    let mut notifier = MockNotifier::default();

    store.write(&log_path("temperature"), json!(33)).unwrap();
    store.write(&log_path("temperature"), json!(34)).unwrap();
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);

    assert_eq!(notifier.sent.len(), 1);
    assert_eq!(notifier.sent[0].data["value"], "33");
}

#[test]
fn parent_write_alerts_once_per_new_reading() {
    let (mut app, mut store, mut sink) = make_app();
    let mut notifier = MockNotifier::default();

    store.write(&log_path("temperature"), json!(25)).unwrap();
    store
        .write(
            "irrigationSystemLogs/temperature",
            json!({ "2024-11-02_08:30:00": 25, "2024-11-02_08:31:00": 5, "2024-11-02_08:32:00": 50 }),
        )
        .unwrap();
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);

    let values: Vec<_> = notifier.sent.iter().map(|m| m.data["value"].as_str()).collect();
    assert_eq!(values, ["5", "50"]);
    assert!(notifier.sent.iter().all(|m| m.title == "DANGER Alert: temperature"));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ReadingRejected(_))), 0);
}

#[test]
fn readings_logged_before_start_are_not_alerted() {
    let mut store = RecordingStore::new();
    store.write(&log_path("pH"), json!(2)).unwrap();

    let mut app = AppService::new(SystemConfig::default());
    let mut sink = LogSink::new();
    let mut notifier = MockNotifier::default();
    app.start(&mut store, &mut sink);
    app.pump_events(&PinnedClock::morning(), &mut notifier, &mut sink);

    assert!(notifier.sent.is_empty());
}
