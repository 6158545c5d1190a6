//! Data-source trait definition

use async_trait::async_trait;
use lapdelta_core::{Driver, DriverPair, LapComparison, LapTelemetry, LoadError, Race};

/// Trait for race-data sources
///
/// Each source answers the five questions of the selection flow: which
/// seasons exist, which races a season holds, who drove a race, how two
/// drivers' lap times compare, and what one lap's telemetry looks like.
///
/// A source that cannot serve a resource kind returns a classified
/// [`LoadError`] rather than inventing data; the loader decides whether that
/// failure falls through to the next source in the chain.
#[async_trait]
pub trait RaceDataSource: Send + Sync {
    /// Short label used in logs, e.g. "remote" or "bundled".
    fn name(&self) -> &str;

    /// Ordered list of available season years.
    async fn seasons(&self) -> Result<Vec<u16>, LoadError>;

    /// Race calendar for one season.
    async fn races(&self, year: u16) -> Result<Vec<Race>, LoadError>;

    /// Drivers listed for one race.
    async fn drivers(&self, year: u16, race: &str) -> Result<Vec<Driver>, LoadError>;

    /// Validated lap-time comparison for a driver pair in one race.
    async fn lap_times(
        &self,
        year: u16,
        race: &str,
        pair: &DriverPair,
    ) -> Result<LapComparison, LoadError>;

    /// Validated telemetry for one (driver, lap) within one race.
    async fn telemetry(
        &self,
        year: u16,
        race: &str,
        driver: &str,
        lap: u32,
    ) -> Result<LapTelemetry, LoadError>;
}
