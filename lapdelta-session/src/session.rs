//! Session context
//!
//! One explicit object per user session: the mode decided at startup, the
//! hierarchical selection, the race-calendar and driver-list caches, and the
//! per-category busy gates. Selection steps take `&mut self`; the gated
//! comparison and telemetry loads take `&self`, so loads of different
//! categories may be in flight at the same time against a selection that is
//! read, never written, while they run.
//!
//! There is no cancellation: a load that becomes stale completes normally,
//! and its artifact carries the request key so the caller can check
//! relevance against the current selection before rendering.

use std::collections::HashMap;
use tracing::debug;

use lapdelta_core::{
    Driver, DriverPair, LapComparison, LapTelemetry, LoadError, Mode, Race,
};
use lapdelta_sources::{BundledSource, RemoteSource};

use crate::loader::{self, LoadGate};
use crate::resolver;
use crate::selection::Selection;

pub struct Session {
    mode: Mode,
    remote: RemoteSource,
    bundled: BundledSource,
    selection: Selection,
    seasons: Option<Vec<u16>>,
    calendars: HashMap<u16, Vec<Race>>,
    rosters: HashMap<(u16, String), Vec<Driver>>,
    comparison_gate: LoadGate,
    telemetry_gate: LoadGate,
}

impl Session {
    /// Probe the live API once and build the session in the resulting mode.
    pub async fn connect(remote: RemoteSource, bundled: BundledSource) -> Self {
        let mode = resolver::resolve(&remote).await;
        Self::with_mode(mode, remote, bundled)
    }

    /// Build a session in a predetermined mode, skipping the probe.
    pub fn with_mode(mode: Mode, remote: RemoteSource, bundled: BundledSource) -> Self {
        Self {
            mode,
            remote,
            bundled,
            selection: Selection::new(),
            seasons: None,
            calendars: HashMap::new(),
            rosters: HashMap::new(),
            comparison_gate: LoadGate::new(),
            telemetry_gate: LoadGate::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The available seasons, loaded once and cached for the session.
    pub async fn seasons(&mut self) -> Result<&[u16], LoadError> {
        if self.seasons.is_none() {
            let seasons = loader::load_seasons(self.mode, &self.remote, &self.bundled).await?;
            self.seasons = Some(seasons);
        }
        Ok(self.seasons.as_deref().unwrap_or_default())
    }

    /// Choose a season and return its race calendar. Clears the race and
    /// driver selections; the calendar is fetched once per year and cached.
    pub async fn select_year(&mut self, year: u16) -> Result<&[Race], LoadError> {
        self.selection.select_year(year);
        if !self.calendars.contains_key(&year) {
            let races = loader::load_races(self.mode, &self.remote, &self.bundled, year).await?;
            self.calendars.insert(year, races);
        }
        Ok(self
            .calendars
            .get(&year)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Choose a race by name within the selected season and return its
    /// driver list. Clears the driver pair; the list is fetched once per
    /// (year, race) and cached.
    pub async fn select_race(&mut self, name: &str) -> Result<&[Driver], LoadError> {
        let year = self.selection.year().ok_or_else(|| {
            LoadError::InvalidSelection("select a season before a race".to_string())
        })?;
        let race = self
            .calendars
            .get(&year)
            .and_then(|races| races.iter().find(|race| race.name == name))
            .cloned()
            .ok_or_else(|| {
                LoadError::InvalidSelection(format!("{name:?} is not on the {year} calendar"))
            })?;
        self.selection.select_race(race.clone())?;

        let key = (year, race.name);
        if !self.rosters.contains_key(&key) {
            let drivers =
                loader::load_drivers(self.mode, &self.remote, &self.bundled, year, &key.1).await?;
            self.rosters.insert(key.clone(), drivers);
        }
        Ok(self
            .rosters
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Make two driver codes the active comparison pair. Fails before any
    /// fetch when the codes are equal or empty, or no race is selected.
    pub fn select_drivers(&mut self, first: &str, second: &str) -> Result<(), LoadError> {
        let pair = DriverPair::new(first, second)?;
        self.selection.select_pair(pair)
    }

    /// Load the lap-time comparison for the active pair.
    ///
    /// Returns `Ok(None)` without loading when a comparison is already in
    /// flight: overlapping requests are dropped, not queued.
    pub async fn compare(&self) -> Result<Option<LapComparison>, LoadError> {
        let (year, race, pair) = self.selection.comparison_key()?;
        let Some(_guard) = self.comparison_gate.try_begin() else {
            debug!("comparison already in progress, dropping request");
            return Ok(None);
        };
        let comparison =
            loader::load_lap_times(self.mode, &self.remote, &self.bundled, year, &race, &pair)
                .await?;
        Ok(Some(comparison))
    }

    /// Load telemetry for one (driver, lap) within the selected race.
    ///
    /// Returns `Ok(None)` without loading when a telemetry load is already
    /// in flight. Outside remote mode this fails with
    /// [`LoadError::TelemetryUnavailable`] before any fetch.
    pub async fn telemetry(
        &self,
        driver: &str,
        lap: u32,
    ) -> Result<Option<LapTelemetry>, LoadError> {
        let (year, race) = self.selection.telemetry_key()?;
        let Some(_guard) = self.telemetry_gate.try_begin() else {
            debug!("telemetry load already in progress, dropping request");
            return Ok(None);
        };
        let telemetry =
            loader::load_telemetry(self.mode, &self.remote, year, &race, driver, lap).await?;
        Ok(Some(telemetry))
    }
}
