//! Series validation and shaping
//!
//! Turns raw payloads into the finished artifacts the presentation layer
//! consumes. Records that fail validation are dropped silently; a payload is
//! only an error once nothing valid remains.

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

use crate::error::LoadError;
use crate::model::{
    DriverLaps, DriverPair, LapComparison, LapTelemetry, Provenance, TelemetryPoint,
};

/// Shape a driver-code → laps payload into a comparison for one pair.
///
/// Only the two requested codes are kept; anything else in the payload is
/// ignored. A requested code that is absent, or whose records all fail
/// validation, is dropped without error as long as the other driver yields at
/// least one valid lap. Zero valid laps across the whole payload is
/// [`LoadError::NoValidRecords`].
pub fn shape_comparison(
    year: u16,
    race: &str,
    pair: &DriverPair,
    mut payload: HashMap<String, DriverLaps>,
    provenance: Provenance,
) -> Result<LapComparison, LoadError> {
    let mut entries = BTreeMap::new();

    for code in pair.codes() {
        let Some(mut entry) = payload.remove(code) else {
            continue;
        };
        entry.laps.retain(|lap| lap.is_valid());
        if entry.laps.is_empty() {
            continue;
        }
        entries.insert(code.to_string(), entry);
    }

    if entries.is_empty() {
        return Err(LoadError::NoValidRecords {
            what: format!("lap times for {pair}"),
        });
    }

    Ok(LapComparison {
        year,
        race: race.to_string(),
        pair: pair.clone(),
        entries,
        provenance,
        fetched_at: Utc::now(),
    })
}

/// Shape a raw telemetry point list into a single-lap artifact.
///
/// Invalid points are dropped; the distance span is the min/max of what
/// survives, since a lap's telemetry does not necessarily start at 0.
pub fn shape_telemetry(
    driver: &str,
    lap: u32,
    mut points: Vec<TelemetryPoint>,
    provenance: Provenance,
) -> Result<LapTelemetry, LoadError> {
    points.retain(|point| point.is_valid());

    let span = distance_span(&points).ok_or_else(|| LoadError::NoValidRecords {
        what: format!("telemetry for {driver} lap {lap}"),
    })?;

    Ok(LapTelemetry {
        driver: driver.to_string(),
        lap,
        points,
        span,
        provenance,
        fetched_at: Utc::now(),
    })
}

/// (min, max) distance over a point series, or None when it is empty.
pub fn distance_span(points: &[TelemetryPoint]) -> Option<(f64, f64)> {
    let first = points.first()?.distance;
    let span = points.iter().fold((first, first), |(lo, hi), point| {
        (lo.min(point.distance), hi.max(point.distance))
    });
    Some(span)
}
