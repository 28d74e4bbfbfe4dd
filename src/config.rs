//! Solver configuration.
use crate::error::StatslatorError;
use serde::{Serialize, Deserialize};

/// What to do with a `NaN` or infinite result headed for an empty slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Leave the slot empty so another equation can still fill it.
    #[default]
    Skip,
    /// Write the value like any other.
    Commit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Level every `XX%` quantity is derived at, as a fraction.
    pub confidence_level: f64,
    /// Relative error above which a recomputation counts as an alternative.
    pub tolerance: f64,
    pub non_finite: NonFinitePolicy,
    /// Seed for dependency-probe placeholders. `None` draws from OS entropy.
    pub probe_seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            tolerance: 0.15,
            non_finite: NonFinitePolicy::Skip,
            probe_seed: None,
        }
    }
}

impl SolverConfig {
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    pub fn with_probe_seed(mut self, seed: u64) -> Self {
        self.probe_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), StatslatorError> {
        check_level(self.confidence_level)?;
        if !(self.tolerance >= 0.0) {
            return Err(StatslatorError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, StatslatorError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn check_level(level: f64) -> Result<(), StatslatorError> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(StatslatorError::InvalidConfidenceLevel(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let c = SolverConfig::default();
        assert_eq!(c.confidence_level, 0.95);
        assert_eq!(c.tolerance, 0.15);
        assert_eq!(c.non_finite, NonFinitePolicy::Skip);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let c = SolverConfig::from_json(r#"{"confidence_level": 0.9, "non_finite": "commit"}"#).unwrap();
        assert_eq!(c.confidence_level, 0.9);
        assert_eq!(c.tolerance, 0.15);
        assert_eq!(c.non_finite, NonFinitePolicy::Commit);
        assert_eq!(c.probe_seed, None);
    }

    #[rstest]
    #[case(r#"{"confidence_level": 1.0}"#)]
    #[case(r#"{"confidence_level": 0.0}"#)]
    #[case(r#"{"confidence_level": 95}"#)]
    #[case(r#"{"tolerance": -0.1}"#)]
    #[case(r#"{"confidence_level": "high"}"#)]
    fn test_from_json_rejects(#[case] json: &str) {
        assert!(SolverConfig::from_json(json).is_err());
    }
}
