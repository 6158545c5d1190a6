//! Bundled sample-data source
//!
//! Static assets compiled into the binary: a season → races calendar and
//! per-season lap-time documents keyed by driver code. Seasons without a
//! lap-time document exist so the loader's synthetic last resort has
//! something to do. There is no bundled telemetry.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

use lapdelta_core::series;
use lapdelta_core::{
    Driver, DriverLaps, DriverPair, LapComparison, LapTelemetry, LoadError, Provenance, Race,
};

use crate::source::RaceDataSource;

const CALENDAR_JSON: &str = include_str!("../data/f1-calendar.json");

const LAP_TIME_DOCS: &[(u16, &str)] = &[
    (2021, include_str!("../data/lap-times-2021.json")),
    (2022, include_str!("../data/lap-times-2022.json")),
];

/// Bundled samples as a data source. Assets parse once at construction;
/// a malformed embedded document is a build defect and fails loudly here.
pub struct BundledSource {
    calendar: BTreeMap<u16, Vec<Race>>,
    lap_times: BTreeMap<u16, HashMap<String, DriverLaps>>,
}

impl BundledSource {
    pub fn new() -> Result<Self, LoadError> {
        let raw: BTreeMap<String, Vec<Race>> = serde_json::from_str(CALENDAR_JSON)?;
        let mut calendar = BTreeMap::new();
        for (year, races) in raw {
            let year = year.parse::<u16>().map_err(|_| {
                LoadError::Malformed(format!("calendar season {year:?} is not a year"))
            })?;
            calendar.insert(year, races);
        }

        let mut lap_times = BTreeMap::new();
        for (year, doc) in LAP_TIME_DOCS {
            lap_times.insert(*year, serde_json::from_str(doc)?);
        }

        Ok(Self {
            calendar,
            lap_times,
        })
    }

    /// Roster served when no per-race driver list is available.
    pub fn default_drivers() -> Vec<Driver> {
        let roster = [
            ("HAM", "Lewis Hamilton", "Mercedes"),
            ("RUS", "George Russell", "Mercedes"),
            ("VER", "Max Verstappen", "Red Bull"),
            ("PER", "Sergio Pérez", "Red Bull"),
            ("LEC", "Charles Leclerc", "Ferrari"),
            ("SAI", "Carlos Sainz", "Ferrari"),
            ("NOR", "Lando Norris", "McLaren"),
            ("RIC", "Daniel Ricciardo", "McLaren"),
        ];
        roster
            .into_iter()
            .map(|(code, name, team)| Driver {
                code: code.to_string(),
                name: name.to_string(),
                team: team.to_string(),
                color: None,
            })
            .collect()
    }
}

#[async_trait]
impl RaceDataSource for BundledSource {
    fn name(&self) -> &str {
        "bundled"
    }

    async fn seasons(&self) -> Result<Vec<u16>, LoadError> {
        Ok(self.calendar.keys().copied().collect())
    }

    async fn races(&self, year: u16) -> Result<Vec<Race>, LoadError> {
        self.calendar
            .get(&year)
            .cloned()
            .ok_or_else(|| LoadError::MissingResource {
                what: format!("the {year} race calendar"),
            })
    }

    async fn drivers(&self, _year: u16, _race: &str) -> Result<Vec<Driver>, LoadError> {
        Ok(Self::default_drivers())
    }

    async fn lap_times(
        &self,
        year: u16,
        race: &str,
        pair: &DriverPair,
    ) -> Result<LapComparison, LoadError> {
        let payload = self
            .lap_times
            .get(&year)
            .cloned()
            .ok_or_else(|| LoadError::MissingResource {
                what: format!("{year} lap times"),
            })?;
        series::shape_comparison(year, race, pair, payload, Provenance::Bundled)
    }

    async fn telemetry(
        &self,
        _year: u16,
        _race: &str,
        _driver: &str,
        _lap: u32,
    ) -> Result<LapTelemetry, LoadError> {
        Err(LoadError::TelemetryUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> BundledSource {
        BundledSource::new().expect("embedded assets must parse")
    }

    #[tokio::test]
    async fn test_embedded_assets_parse() {
        let bundled = source();
        let seasons = bundled.seasons().await.unwrap();
        assert_eq!(seasons, vec![2020, 2021, 2022]);
    }

    #[tokio::test]
    async fn test_calendar_has_bahrain_2021() {
        let races = source().races(2021).await.unwrap();
        let bahrain = races
            .iter()
            .find(|race| race.name == "Bahrain Grand Prix")
            .expect("2021 calendar should open in Bahrain");
        assert_eq!(bahrain.round, 1);
        assert_eq!(bahrain.location, "Sakhir");
    }

    #[tokio::test]
    async fn test_unknown_season_is_missing_resource() {
        let err = source().races(1994).await.unwrap_err();
        assert!(matches!(err, LoadError::MissingResource { .. }));
    }

    #[tokio::test]
    async fn test_drivers_returns_default_roster_for_any_race() {
        let drivers = source().drivers(2021, "Monaco Grand Prix").await.unwrap();
        assert_eq!(drivers.len(), 8);
        assert!(drivers.iter().any(|d| d.code == "HAM"));
        assert!(drivers.iter().any(|d| d.code == "VER"));
    }

    #[tokio::test]
    async fn test_bahrain_2021_pair_scenario() {
        let pair = DriverPair::new("HAM", "VER").unwrap();
        let cmp = source()
            .lap_times(2021, "Bahrain Grand Prix", &pair)
            .await
            .unwrap();

        assert_eq!(cmp.dataset_count(), 2);
        assert_eq!(cmp.provenance, Provenance::Bundled);
        assert!(cmp.entries["HAM"].laps.iter().all(|lap| lap.is_valid()));
        assert!(cmp.entries["VER"].laps.iter().all(|lap| lap.is_valid()));
        // Only the requested codes survive even though the document has more.
        assert!(!cmp.entries.contains_key("PER"));
    }

    #[tokio::test]
    async fn test_missing_queried_code_is_absent_not_error() {
        let pair = DriverPair::new("HAM", "ALO").unwrap();
        let cmp = source()
            .lap_times(2021, "Bahrain Grand Prix", &pair)
            .await
            .unwrap();

        assert_eq!(cmp.dataset_count(), 1);
        assert!(cmp.entries.contains_key("HAM"));
        assert!(!cmp.entries.contains_key("ALO"));
    }

    #[tokio::test]
    async fn test_season_without_lap_times_is_missing_resource() {
        let pair = DriverPair::new("HAM", "VER").unwrap();
        let err = source()
            .lap_times(2020, "Austrian Grand Prix", &pair)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingResource { .. }));
    }

    #[tokio::test]
    async fn test_telemetry_is_never_bundled() {
        let err = source()
            .telemetry(2021, "Bahrain Grand Prix", "HAM", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::TelemetryUnavailable));
    }
}
