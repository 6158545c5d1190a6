//! Race data model
//!
//! Defines the domain types every data source produces and the session layer
//! consumes. Wire payloads from the remote API deserialize directly into
//! these types; fields not every source provides are `Option<T>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::LoadError;

/// Where the session reads its data from for the rest of its lifetime.
///
/// Decided exactly once by the startup reachability probe, before any data
/// load, and never re-probed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The live API answered the health probe.
    Remote,
    /// Bundled sample data (plus the synthetic last resort for lap times).
    Fallback,
}

impl Mode {
    pub fn is_remote(&self) -> bool {
        matches!(self, Mode::Remote)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Remote => write!(f, "live API"),
            Mode::Fallback => write!(f, "sample data"),
        }
    }
}

/// Which source actually produced a loaded artifact.
///
/// Carried on every comparison and telemetry value so synthetic data is never
/// indistinguishable from real or bundled data downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Remote,
    Bundled,
    Synthetic,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Remote => write!(f, "real F1 data"),
            Provenance::Bundled => write!(f, "sample data"),
            Provenance::Synthetic => write!(f, "synthetic data"),
        }
    }
}

/// One event within a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    /// Round number within the season calendar.
    pub round: u32,
    /// Event name, e.g. "Bahrain Grand Prix". Identifies the race in API paths.
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A driver as listed for one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Unique short identifier, e.g. "HAM".
    pub code: String,
    /// Display name.
    pub name: String,
    pub team: String,
    /// Team display color as a hex string, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One timed lap by one driver within one race.
///
/// Only `lap` and `time` are guaranteed; the remaining fields are extras the
/// live API attaches and the bundled samples may omit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// Lap number, starting at 1.
    pub lap: u32,
    /// Lap time in seconds.
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector3: Option<f64>,
    /// Tyre compound, e.g. "SOFT".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<String>,
    /// Whether this lap left the pits.
    #[serde(
        default,
        rename = "pit_out_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub pit_out: Option<bool>,
    /// Whether this lap entered the pits.
    #[serde(
        default,
        rename = "pit_in_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub pit_in: Option<bool>,
}

impl LapRecord {
    /// A record is plottable when its time is a finite positive number of
    /// seconds and its lap number is at least 1.
    pub fn is_valid(&self) -> bool {
        self.lap >= 1 && self.time.is_finite() && self.time > 0.0
    }
}

/// One distance-sampled point along a driver's lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    /// Distance along the lap in meters. Non-decreasing within a lap, but not
    /// guaranteed to start at 0.
    pub distance: f64,
    /// Speed in km/h.
    pub speed: f64,
    /// Throttle application in percent (0-100).
    pub throttle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brake: Option<bool>,
}

impl TelemetryPoint {
    /// A point is plottable when every numeric field is finite; `distance`
    /// positions it on the x axis, so a non-finite distance discards it.
    pub fn is_valid(&self) -> bool {
        self.distance.is_finite() && self.speed.is_finite() && self.throttle.is_finite()
    }
}

/// One driver's validated lap series within a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLaps {
    pub driver: Driver,
    pub laps: Vec<LapRecord>,
}

/// The two driver codes a comparison targets.
///
/// Construction enforces the selection invariant: both codes non-empty and
/// distinct. Comparison loads never start from an invalid pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPair {
    first: String,
    second: String,
}

impl DriverPair {
    pub fn new(first: &str, second: &str) -> Result<Self, LoadError> {
        let first = first.trim();
        let second = second.trim();
        if first.is_empty() || second.is_empty() {
            return Err(LoadError::InvalidSelection(
                "both drivers must be selected".to_string(),
            ));
        }
        if first == second {
            return Err(LoadError::InvalidSelection(format!(
                "cannot compare {first} against themselves"
            )));
        }
        Ok(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn codes(&self) -> [&str; 2] {
        [&self.first, &self.second]
    }

    pub fn contains(&self, code: &str) -> bool {
        self.first == code || self.second == code
    }

    /// Comma-joined form used in the lap-times query string, e.g. "HAM,VER".
    pub fn query_value(&self) -> String {
        format!("{},{}", self.first, self.second)
    }
}

impl fmt::Display for DriverPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}

/// The finished lap-time comparison artifact.
///
/// Built fresh on every load; prior values are replaced wholesale, never
/// mutated. Carries the request key so a caller can check an arriving result
/// is still relevant before rendering it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapComparison {
    pub year: u16,
    pub race: String,
    pub pair: DriverPair,
    /// Validated series keyed by driver code. A requested code with no valid
    /// laps in the payload is simply absent.
    pub entries: BTreeMap<String, DriverLaps>,
    pub provenance: Provenance,
    pub fetched_at: DateTime<Utc>,
}

impl LapComparison {
    /// Whether this artifact answers the given selection.
    pub fn is_for(&self, year: u16, race: &str, pair: &DriverPair) -> bool {
        self.year == year && self.race == race && &self.pair == pair
    }

    /// Number of drivers that survived validation.
    pub fn dataset_count(&self) -> usize {
        self.entries.len()
    }
}

/// The finished single-lap telemetry artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapTelemetry {
    pub driver: String,
    pub lap: u32,
    /// Validated points in payload order.
    pub points: Vec<TelemetryPoint>,
    /// (min, max) distance of the validated points. Computed, never assumed
    /// to start at 0.
    pub span: (f64, f64),
    pub provenance: Provenance,
    pub fetched_at: DateTime<Utc>,
}

impl LapTelemetry {
    pub fn is_for(&self, driver: &str, lap: u32) -> bool {
        self.driver == driver && self.lap == lap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_pair_rejects_same_code() {
        let err = DriverPair::new("HAM", "HAM").unwrap_err();
        assert!(matches!(err, LoadError::InvalidSelection(_)));
    }

    #[test]
    fn test_driver_pair_rejects_empty_codes() {
        assert!(DriverPair::new("", "VER").is_err());
        assert!(DriverPair::new("HAM", "").is_err());
        assert!(DriverPair::new("  ", "VER").is_err());
    }

    #[test]
    fn test_driver_pair_query_value() {
        let pair = DriverPair::new("HAM", "VER").unwrap();
        assert_eq!(pair.query_value(), "HAM,VER");
        assert!(pair.contains("HAM"));
        assert!(pair.contains("VER"));
        assert!(!pair.contains("LEC"));
    }

    #[test]
    fn test_lap_record_validity() {
        let lap = LapRecord {
            lap: 3,
            time: 92.481,
            sector1: None,
            sector2: None,
            sector3: None,
            compound: None,
            pit_out: None,
            pit_in: None,
        };
        assert!(lap.is_valid());

        assert!(!LapRecord { time: 0.0, ..lap.clone() }.is_valid());
        assert!(!LapRecord { time: -1.5, ..lap.clone() }.is_valid());
        assert!(!LapRecord { time: f64::NAN, ..lap.clone() }.is_valid());
        assert!(!LapRecord { lap: 0, ..lap }.is_valid());
    }

    #[test]
    fn test_lap_record_wire_shape() {
        // Shape as served by /api/lap-times, pit markers included.
        let json = r#"{
            "lap": 12,
            "time": 95.103,
            "sector1": 29.4,
            "sector2": 38.1,
            "sector3": 27.6,
            "compound": "HARD",
            "pit_out_time": false,
            "pit_in_time": true
        }"#;
        let lap: LapRecord = serde_json::from_str(json).unwrap();
        assert_eq!(lap.lap, 12);
        assert_eq!(lap.pit_in, Some(true));
        assert_eq!(lap.pit_out, Some(false));
        assert_eq!(lap.compound.as_deref(), Some("HARD"));
    }

    #[test]
    fn test_lap_record_minimal_wire_shape() {
        // Bundled samples carry only lap and time.
        let lap: LapRecord = serde_json::from_str(r#"{"lap": 1, "time": 93.2}"#).unwrap();
        assert!(lap.is_valid());
        assert!(lap.sector1.is_none());
        assert!(lap.compound.is_none());
    }

    #[test]
    fn test_telemetry_point_validity() {
        let point = TelemetryPoint {
            distance: 410.5,
            speed: 287.0,
            throttle: 100.0,
            brake: Some(false),
        };
        assert!(point.is_valid());
        assert!(!TelemetryPoint { distance: f64::NAN, ..point.clone() }.is_valid());
        assert!(!TelemetryPoint { speed: f64::INFINITY, ..point }.is_valid());
    }

    #[test]
    fn test_comparison_relevance_check() {
        let pair = DriverPair::new("HAM", "VER").unwrap();
        let cmp = LapComparison {
            year: 2021,
            race: "Bahrain Grand Prix".to_string(),
            pair: pair.clone(),
            entries: BTreeMap::new(),
            provenance: Provenance::Bundled,
            fetched_at: Utc::now(),
        };
        assert!(cmp.is_for(2021, "Bahrain Grand Prix", &pair));
        assert!(!cmp.is_for(2022, "Bahrain Grand Prix", &pair));

        let other = DriverPair::new("LEC", "SAI").unwrap();
        assert!(!cmp.is_for(2021, "Bahrain Grand Prix", &other));
    }
}
