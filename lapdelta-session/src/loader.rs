//! Fetch-or-fallback loader
//!
//! One policy function per resource kind. In remote mode the live API is
//! tried first; any recoverable failure (transport, non-2xx, malformed body,
//! missing document) falls through to the bundled samples. Lap times alone
//! have a synthetic last resort behind the bundled tier. Telemetry has no
//! fallback at all: it exists only on the live API and its failures surface
//! classified.
//!
//! Non-recoverable errors (invalid selection, zero valid records) surface
//! immediately from whichever tier produced them.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use lapdelta_core::{Driver, DriverPair, LapComparison, LapTelemetry, LoadError, Mode, Race};
use lapdelta_sources::{RaceDataSource, SyntheticSource};

pub async fn load_seasons(
    mode: Mode,
    remote: &dyn RaceDataSource,
    bundled: &dyn RaceDataSource,
) -> Result<Vec<u16>, LoadError> {
    if mode.is_remote() {
        match remote.seasons().await {
            Ok(seasons) => return Ok(seasons),
            Err(err) if err.is_recoverable() => {
                warn!("season list from {}: {err}; using {}", remote.name(), bundled.name());
            }
            Err(err) => return Err(err),
        }
    }
    bundled.seasons().await
}

pub async fn load_races(
    mode: Mode,
    remote: &dyn RaceDataSource,
    bundled: &dyn RaceDataSource,
    year: u16,
) -> Result<Vec<Race>, LoadError> {
    if mode.is_remote() {
        match remote.races(year).await {
            Ok(races) => return Ok(races),
            Err(err) if err.is_recoverable() => {
                warn!("{year} calendar from {}: {err}; using {}", remote.name(), bundled.name());
            }
            Err(err) => return Err(err),
        }
    }
    bundled.races(year).await
}

pub async fn load_drivers(
    mode: Mode,
    remote: &dyn RaceDataSource,
    bundled: &dyn RaceDataSource,
    year: u16,
    race: &str,
) -> Result<Vec<Driver>, LoadError> {
    if mode.is_remote() {
        match remote.drivers(year, race).await {
            Ok(drivers) => return Ok(drivers),
            Err(err) if err.is_recoverable() => {
                warn!(
                    "driver list for {year} {race} from {}: {err}; using {}",
                    remote.name(),
                    bundled.name()
                );
            }
            Err(err) => return Err(err),
        }
    }
    bundled.drivers(year, race).await
}

pub async fn load_lap_times(
    mode: Mode,
    remote: &dyn RaceDataSource,
    bundled: &dyn RaceDataSource,
    year: u16,
    race: &str,
    pair: &DriverPair,
) -> Result<LapComparison, LoadError> {
    if mode.is_remote() {
        match remote.lap_times(year, race, pair).await {
            Ok(comparison) => return Ok(comparison),
            Err(err) if err.is_recoverable() => {
                warn!(
                    "lap times for {pair} at {year} {race} from {}: {err}; using {}",
                    remote.name(),
                    bundled.name()
                );
            }
            Err(err) => return Err(err),
        }
    }

    match bundled.lap_times(year, race, pair).await {
        Ok(comparison) => Ok(comparison),
        Err(err) if err.is_recoverable() => {
            warn!("bundled lap times for {year} {race}: {err}; synthesizing placeholder laps");
            Ok(SyntheticSource::lap_times(year, race, pair))
        }
        Err(err) => Err(err),
    }
}

pub async fn load_telemetry(
    mode: Mode,
    remote: &dyn RaceDataSource,
    year: u16,
    race: &str,
    driver: &str,
    lap: u32,
) -> Result<LapTelemetry, LoadError> {
    match mode {
        Mode::Remote => remote.telemetry(year, race, driver, lap).await,
        Mode::Fallback => Err(LoadError::TelemetryUnavailable),
    }
}

// === Per-category busy gate ===

/// One-at-a-time gate for a load category.
///
/// A request arriving while the gate is held is dropped, not queued: the
/// caller gets `None` back and the in-flight load continues untouched. The
/// gate reopens when the guard drops, whether the load succeeded or failed.
#[derive(Debug, Default)]
pub struct LoadGate(AtomicBool);

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` when a load is already in flight.
    pub fn try_begin(&self) -> Option<GateGuard<'_>> {
        if self.0.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(GateGuard(&self.0))
        }
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct GateGuard<'a>(&'a AtomicBool);

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
