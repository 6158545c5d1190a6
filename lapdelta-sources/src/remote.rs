//! Live API source
//!
//! Speaks the FastF1-backed HTTP API: a health endpoint at the origin root
//! and the data endpoints under `/api`. Every payload is deserialized into an
//! explicit schema at this boundary; nothing duck-typed crosses into the core.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use lapdelta_core::series;
use lapdelta_core::{
    Driver, DriverLaps, DriverPair, LapComparison, LapTelemetry, LoadError, Provenance, Race,
    TelemetryPoint,
};

use crate::source::RaceDataSource;

/// Default per-request transport timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The health probe must answer quickly or the session falls back.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// How much of an error body to keep in a classified fetch error.
const BODY_SNIPPET_LEN: usize = 200;

/// A validated API origin, e.g. `http://localhost:5000`.
///
/// Data endpoints live under `{origin}/api`; the health endpoint lives at
/// `{origin}/health`, deliberately outside the API prefix.
#[derive(Debug, Clone)]
pub struct ApiBase {
    origin: Url,
}

impl ApiBase {
    pub fn parse(origin: &str) -> Result<Self, LoadError> {
        let url = Url::parse(origin.trim_end_matches('/')).map_err(|err| {
            LoadError::Malformed(format!("invalid API origin {origin:?}: {err}"))
        })?;
        if url.cannot_be_a_base() {
            return Err(LoadError::Malformed(format!(
                "API origin {origin:?} cannot carry a path"
            )));
        }
        Ok(Self { origin: url })
    }

    /// `{origin}/health`, deliberately not under `/api`.
    pub fn health_url(&self) -> Url {
        let mut url = self.origin.clone();
        url.set_path("/health");
        url
    }

    /// `{origin}/api/<segments...>`, percent-encoding each segment.
    pub fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.origin.clone();
        // Opaque origins were rejected at parse time.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api");
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }
}

/// The live API as a data source.
pub struct RemoteSource {
    base: ApiBase,
    client: reqwest::Client,
}

impl RemoteSource {
    pub fn new(base: ApiBase) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { base, client }
    }

    /// One bounded reachability check against the health endpoint.
    ///
    /// Any successful status counts as reachable. Failures are reported as
    /// unreachable, never as errors; the caller decides the session mode.
    pub async fn probe(&self) -> bool {
        let url = self.base.health_url();
        match self
            .client
            .get(url.clone())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!("health probe against {url} failed: {err}");
                false
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| LoadError::fetch(None, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::fetch(Some(status.as_u16()), body_snippet(&body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| LoadError::Malformed(err.to_string()))
    }
}

/// Wire shape of `/api/telemetry` responses.
#[derive(Debug, Deserialize)]
struct TelemetryPayload {
    driver: String,
    lap: u32,
    telemetry: Vec<TelemetryPoint>,
}

#[async_trait]
impl RaceDataSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn seasons(&self) -> Result<Vec<u16>, LoadError> {
        self.get_json(self.base.api_url(&["years"])).await
    }

    async fn races(&self, year: u16) -> Result<Vec<Race>, LoadError> {
        self.get_json(self.base.api_url(&["races", &year.to_string()]))
            .await
    }

    async fn drivers(&self, year: u16, race: &str) -> Result<Vec<Driver>, LoadError> {
        self.get_json(self.base.api_url(&["drivers", &year.to_string(), race]))
            .await
    }

    async fn lap_times(
        &self,
        year: u16,
        race: &str,
        pair: &DriverPair,
    ) -> Result<LapComparison, LoadError> {
        let mut url = self.base.api_url(&["lap-times"]);
        url.query_pairs_mut()
            .append_pair("year", &year.to_string())
            .append_pair("race", race)
            .append_pair("drivers", &pair.query_value());

        let payload: HashMap<String, DriverLaps> = self.get_json(url).await?;
        series::shape_comparison(year, race, pair, payload, Provenance::Remote)
    }

    async fn telemetry(
        &self,
        year: u16,
        race: &str,
        driver: &str,
        lap: u32,
    ) -> Result<LapTelemetry, LoadError> {
        let mut url = self.base.api_url(&["telemetry"]);
        url.query_pairs_mut()
            .append_pair("year", &year.to_string())
            .append_pair("race", race)
            .append_pair("driver", driver)
            .append_pair("lap", &lap.to_string());

        let payload: TelemetryPayload = self.get_json(url).await?;
        series::shape_telemetry(&payload.driver, payload.lap, payload.telemetry, Provenance::Remote)
    }
}

fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((at, _)) => format!("{}…", &trimmed[..at]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_url_is_not_under_api() {
        let base = ApiBase::parse("http://localhost:5000").unwrap();
        assert_eq!(base.health_url().as_str(), "http://localhost:5000/health");
    }

    #[test]
    fn test_api_url_segments() {
        let base = ApiBase::parse("http://localhost:5000").unwrap();
        assert_eq!(
            base.api_url(&["years"]).as_str(),
            "http://localhost:5000/api/years"
        );
        assert_eq!(
            base.api_url(&["races", "2021"]).as_str(),
            "http://localhost:5000/api/races/2021"
        );
    }

    #[test]
    fn test_api_url_encodes_race_names() {
        let base = ApiBase::parse("http://localhost:5000").unwrap();
        let url = base.api_url(&["drivers", "2021", "Bahrain Grand Prix"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/drivers/2021/Bahrain%20Grand%20Prix"
        );
    }

    #[test]
    fn test_api_url_preserves_origin_path() {
        let base = ApiBase::parse("https://example.com/f1/").unwrap();
        assert_eq!(
            base.api_url(&["years"]).as_str(),
            "https://example.com/f1/api/years"
        );
        // The health endpoint stays origin-relative regardless.
        assert_eq!(base.health_url().as_str(), "https://example.com/health");
    }

    #[test]
    fn test_parse_rejects_garbage_origins() {
        assert!(ApiBase::parse("not a url").is_err());
        assert!(ApiBase::parse("mailto:race@example.com").is_err());
    }

    #[test]
    fn test_body_snippet_truncates() {
        let long = "x".repeat(500);
        let snippet = body_snippet(&long);
        assert!(snippet.chars().count() <= BODY_SNIPPET_LEN + 1);
        assert!(snippet.ends_with('…'));

        assert_eq!(body_snippet("  short  "), "short");
        assert_eq!(body_snippet(""), "empty response body");
    }
}
