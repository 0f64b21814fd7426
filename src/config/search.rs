use crate::error::{EvoClassError, Result};
use crate::search::Algorithm;
use serde::{Deserialize, Serialize};

/// Settings for one `fit` invocation: everything the search needs is passed
/// here at call time, never reconfigured on a shared object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub population_size: usize,
    pub max_evaluations: usize,
    pub algorithm: Algorithm,
    pub train_fraction: f64,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 90,
            max_evaluations: 5000,
            algorithm: Algorithm::FireflyAlgorithm,
            train_fraction: 0.8,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 5 {
            return Err(EvoClassError::Configuration(
                "population size must be at least 5".to_string(),
            ));
        }
        if self.max_evaluations < self.population_size {
            return Err(EvoClassError::Configuration(
                "evaluation budget must cover at least one population".to_string(),
            ));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(EvoClassError::Configuration(
                "train fraction must be strictly between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let mut config = SearchConfig::default();
        config.population_size = 2;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.max_evaluations = 10;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.train_fraction = 1.0;
        assert!(config.validate().is_err());
    }
}
