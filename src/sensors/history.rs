//! Projections over the raw sensor log.
//!
//! The log is laid out as `<root>/<sensorKey>/<timestamp> -> number`, where
//! timestamps are `YYYY-MM-DD_HH:MM:SS` keys whose lexical order is their
//! chronological order.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{GaugeSpec, SensorType};
use crate::error::ReadingError;
use crate::thresholds::{Status, ThresholdTable};

/// Separator between the date and time halves of a log key.
const KEY_SEPARATOR: char = '_';

/// Split `<root>/<sensorKey>/<timestamp>` into its sensor and timestamp.
pub fn parse_log_path<'a>(root: &str, path: &'a str) -> Result<(SensorType, &'a str), ReadingError> {
    let malformed = || ReadingError::MalformedPath(path.to_owned());
    let rest = path
        .strip_prefix(root)
        .and_then(|r| r.strip_prefix('/'))
        .ok_or_else(malformed)?;
    let (sensor_key, timestamp) = rest.split_once('/').ok_or_else(malformed)?;
    if timestamp.is_empty() || timestamp.contains('/') {
        return Err(malformed());
    }
    Ok((SensorType::from_store_key(sensor_key)?, timestamp))
}

/// Date half of a log key, if it parses.
pub fn key_date(key: &str) -> Option<NaiveDate> {
    let date = key.split(KEY_SEPARATOR).next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Time half of a log key (empty if the key has none).
pub fn key_time(key: &str) -> &str {
    key.split_once(KEY_SEPARATOR).map_or("", |(_, t)| t)
}

// ---------------------------------------------------------------------------
// Latest value / dashboard cards
// ---------------------------------------------------------------------------

/// Newest entry of one sensor's log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestValue {
    pub value: f64,
    /// Log key of the entry; empty when the log is empty.
    pub timestamp: String,
}

/// Newest entry by key.  An empty or missing log yields `0` with an empty
/// timestamp; a non-numeric newest entry reads as `0`.
pub fn latest(entries: Option<&Map<String, Value>>) -> LatestValue {
    entries
        .and_then(|m| m.iter().max_by(|(a, _), (b, _)| a.cmp(b)))
        .map_or_else(
            || LatestValue { value: 0.0, timestamp: String::new() },
            |(k, v)| LatestValue {
                value: v.as_f64().unwrap_or(0.0),
                timestamp: k.clone(),
            },
        )
}

/// Everything the dashboard shows for one sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorCard {
    pub sensor: SensorType,
    pub latest: LatestValue,
    pub gauge: GaugeSpec,
    pub status: Status,
    pub progress: f64,
}

/// Build one card per sensor from a snapshot of the whole log root.
pub fn dashboard(log_root: &Value) -> Vec<SensorCard> {
    let table = ThresholdTable::display();
    SensorType::ALL
        .into_iter()
        .map(|sensor| {
            let latest = latest(log_root.get(sensor.store_key()).and_then(Value::as_object));
            let gauge = sensor.gauge();
            // Every sensor is covered by the display table.
            let status = table.classify(sensor, latest.value).unwrap_or(Status::Danger);
            SensorCard {
                sensor,
                progress: gauge.progress(latest.value),
                latest,
                gauge,
                status,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Daily summary (graph screen)
// ---------------------------------------------------------------------------

/// One averaged point on the daily graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPoint {
    /// Time half of the last key in the chunk.
    pub label: String,
    pub average: f64,
}

/// Graph points plus the headline figures for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub points: Vec<GraphPoint>,
    pub highest: f64,
    pub lowest: f64,
    /// Rounded to two decimals.
    pub average: f64,
}

impl DailySummary {
    fn empty(date: NaiveDate) -> Self {
        Self { date, points: Vec::new(), highest: 0.0, lowest: 0.0, average: 0.0 }
    }
}

/// Summarise one sensor's entries for `date`, averaging every
/// `chunk_size` consecutive readings into a graph point.
pub fn daily_summary(entries: &Map<String, Value>, date: NaiveDate, chunk_size: usize) -> DailySummary {
    let mut day: Vec<(&str, f64)> = entries
        .iter()
        .filter(|(k, _)| key_date(k) == Some(date))
        .filter_map(|(k, v)| v.as_f64().map(|v| (k.as_str(), v)))
        .collect();
    day.sort_by(|a, b| a.0.cmp(b.0));

    if day.is_empty() {
        log::debug!("no readings logged for {date}");
        return DailySummary::empty(date);
    }

    let points = day
        .chunks(chunk_size.max(1))
        .map(|chunk| GraphPoint {
            label: chunk.last().map_or("", |(k, _)| key_time(k)).to_owned(),
            average: chunk.iter().map(|(_, v)| v).sum::<f64>() / chunk.len() as f64,
        })
        .collect();

    let values = day.iter().map(|(_, v)| *v);
    let highest = values.clone().fold(f64::MIN, f64::max);
    let lowest = values.clone().fold(f64::MAX, f64::min);
    let average = values.sum::<f64>() / day.len() as f64;

    DailySummary {
        date,
        points,
        highest,
        lowest,
        average: (average * 100.0).round() / 100.0,
    }
}
