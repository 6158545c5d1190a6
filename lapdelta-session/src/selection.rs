//! Hierarchical selection state
//!
//! Season → race → driver pair, with downstream invalidation: changing an
//! upstream choice clears everything below it. Load keys are only handed out
//! once the selection is complete enough for that load category.

use lapdelta_core::{DriverPair, LoadError, Race};

#[derive(Debug, Clone, Default)]
pub struct Selection {
    year: Option<u16>,
    race: Option<Race>,
    pair: Option<DriverPair>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a season. Clears the race and driver selections.
    pub fn select_year(&mut self, year: u16) {
        self.year = Some(year);
        self.race = None;
        self.pair = None;
    }

    /// Choose a race within the selected season. Clears the driver pair.
    pub fn select_race(&mut self, race: Race) -> Result<(), LoadError> {
        if self.year.is_none() {
            return Err(LoadError::InvalidSelection(
                "select a season before a race".to_string(),
            ));
        }
        self.race = Some(race);
        self.pair = None;
        Ok(())
    }

    /// Make a validated pair the active comparison target.
    pub fn select_pair(&mut self, pair: DriverPair) -> Result<(), LoadError> {
        if self.race.is_none() {
            return Err(LoadError::InvalidSelection(
                "select a race before drivers".to_string(),
            ));
        }
        self.pair = Some(pair);
        Ok(())
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    pub fn race(&self) -> Option<&Race> {
        self.race.as_ref()
    }

    pub fn pair(&self) -> Option<&DriverPair> {
        self.pair.as_ref()
    }

    /// Request key for a comparison load, available once year, race, and
    /// pair are all selected.
    pub fn comparison_key(&self) -> Result<(u16, String, DriverPair), LoadError> {
        let (year, race) = self.telemetry_key()?;
        let pair = self.pair.clone().ok_or_else(|| {
            LoadError::InvalidSelection("select two drivers to compare".to_string())
        })?;
        Ok((year, race, pair))
    }

    /// Request key for a telemetry load, available once year and race are
    /// selected.
    pub fn telemetry_key(&self) -> Result<(u16, String), LoadError> {
        let year = self.year.ok_or_else(|| {
            LoadError::InvalidSelection("no season selected".to_string())
        })?;
        let race = self.race.as_ref().ok_or_else(|| {
            LoadError::InvalidSelection("no race selected".to_string())
        })?;
        Ok((year, race.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(name: &str) -> Race {
        Race {
            round: 1,
            name: name.to_string(),
            location: "Somewhere".to_string(),
            country: None,
        }
    }

    fn pair() -> DriverPair {
        DriverPair::new("HAM", "VER").unwrap()
    }

    #[test]
    fn test_year_change_clears_race_and_pair() {
        let mut selection = Selection::new();
        selection.select_year(2021);
        selection.select_race(race("Bahrain Grand Prix")).unwrap();
        selection.select_pair(pair()).unwrap();

        selection.select_year(2022);

        assert_eq!(selection.year(), Some(2022));
        assert!(selection.race().is_none());
        assert!(selection.pair().is_none());
    }

    #[test]
    fn test_race_change_clears_pair() {
        let mut selection = Selection::new();
        selection.select_year(2021);
        selection.select_race(race("Bahrain Grand Prix")).unwrap();
        selection.select_pair(pair()).unwrap();

        selection.select_race(race("Monaco Grand Prix")).unwrap();

        assert!(selection.pair().is_none());
        assert_eq!(
            selection.race().map(|r| r.name.as_str()),
            Some("Monaco Grand Prix")
        );
    }

    #[test]
    fn test_race_before_year_is_invalid() {
        let mut selection = Selection::new();
        let err = selection.select_race(race("Bahrain Grand Prix")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSelection(_)));
    }

    #[test]
    fn test_pair_before_race_is_invalid() {
        let mut selection = Selection::new();
        selection.select_year(2021);
        let err = selection.select_pair(pair()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSelection(_)));
    }

    #[test]
    fn test_comparison_key_requires_full_selection() {
        let mut selection = Selection::new();
        assert!(selection.comparison_key().is_err());

        selection.select_year(2021);
        assert!(selection.comparison_key().is_err());

        selection.select_race(race("Bahrain Grand Prix")).unwrap();
        assert!(selection.comparison_key().is_err());

        selection.select_pair(pair()).unwrap();
        let (year, race_name, key_pair) = selection.comparison_key().unwrap();
        assert_eq!(year, 2021);
        assert_eq!(race_name, "Bahrain Grand Prix");
        assert_eq!(key_pair, pair());
    }
}
