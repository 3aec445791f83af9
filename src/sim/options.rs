//! Solver parameters.

use serde::Deserialize;

use crate::error::{PatternError, Result};

/// Parameters of the mesh solver.
///
/// Deserializable from JSON; absent fields take their defaults.
///
/// ```
/// use amigurumi::sim::SolverOptions;
///
/// let options: SolverOptions = serde_json::from_str(r#"{ "iterations": 4 }"#).unwrap();
/// assert_eq!(options.iterations, 4);
/// assert_eq!(options.damping, SolverOptions::default().damping);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    /// Rest length of a unit edge (the stitch spacing).
    /// Zero selects the default spacing of 1.0.
    pub point_distance: f64,

    /// Fraction of velocity kept per tick, in `[0, 1]`.
    pub damping: f64,

    /// Scale of the outward stuffing force.
    pub stiffness: f64,

    /// Constraint relaxation passes per tick.
    pub iterations: usize,

    /// Fixed tick length in seconds.
    pub time_step: f64,

    /// Pull the horizontal centroid back towards the origin.
    /// Ignored when anchors are present.
    pub recenter: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            point_distance: 1.0,
            damping: 0.9,
            stiffness: 0.5,
            iterations: 8,
            time_step: 1.0 / 60.0,
            recenter: true,
        }
    }
}

impl SolverOptions {
    /// Set the stitch spacing.
    pub fn with_point_distance(mut self, point_distance: f64) -> Self {
        self.point_distance = point_distance;
        self
    }

    /// Set the damping factor.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the stuffing stiffness.
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set the number of relaxation passes per tick.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the tick length.
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Enable or disable recentering.
    pub fn with_recenter(mut self, recenter: bool) -> Self {
        self.recenter = recenter;
        self
    }

    /// The effective stitch spacing.
    pub fn spacing(&self) -> f64 {
        if self.point_distance == 0.0 {
            1.0
        } else {
            self.point_distance
        }
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        if !self.point_distance.is_finite() || self.point_distance < 0.0 {
            return Err(PatternError::invalid_param(
                "point_distance",
                self.point_distance,
                "must be finite and non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(PatternError::invalid_param(
                "damping",
                self.damping,
                "must be between 0 and 1",
            ));
        }
        if !self.stiffness.is_finite() {
            return Err(PatternError::invalid_param(
                "stiffness",
                self.stiffness,
                "must be finite",
            ));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(PatternError::invalid_param(
                "time_step",
                self.time_step,
                "must be finite and positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = SolverOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.spacing(), 1.0);
    }

    #[test]
    fn test_zero_spacing_means_unit() {
        let options = SolverOptions::default().with_point_distance(0.0);
        assert_eq!(options.spacing(), 1.0);
        assert_eq!(SolverOptions::default().with_point_distance(2.5).spacing(), 2.5);
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            SolverOptions::default().with_damping(1.5),
            SolverOptions::default().with_point_distance(-1.0),
            SolverOptions::default().with_stiffness(f64::NAN),
            SolverOptions::default().with_time_step(0.0),
        ];
        for options in bad {
            assert!(matches!(
                options.validate(),
                Err(PatternError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        let result: std::result::Result<SolverOptions, _> =
            serde_json::from_str(r#"{ "stifness": 2.0 }"#);
        assert!(result.is_err());
    }
}
