//! Configuration for the MUSIC grid search.
//!
//! This module provides the [`SearchConfig`] struct which centralizes all
//! tunable parameters of the estimator: the four discretized parameter
//! ranges, the wave type, the rotational scaling velocity, the
//! noise-subspace selector and the numerical-stability epsilons.
//!
//! # Example
//!
//! ```
//! use sixc_music::{SearchConfig, WaveType};
//!
//! // Use the body-wave preset
//! let config = SearchConfig::body_wave(WaveType::P);
//!
//! // Or customize it
//! let config = SearchConfig::body_wave(WaveType::P)
//!     .with_scaling_velocity(4000.0)
//!     .with_signals(2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MusicError, Result};
use crate::polarization::WaveType;

/// A closed, uniformly discretized numeric range.
///
/// `steps` is the number of grid nodes, including both endpoints.
/// A single-node range (`steps == 1`) pins the parameter to `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// First grid value.
    pub start: f64,
    /// Last grid value (inclusive).
    pub stop: f64,
    /// Number of grid nodes (>= 1).
    pub steps: usize,
}

impl ParameterRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(start: f64, stop: f64, steps: usize) -> Self {
        Self { start, stop, steps }
    }

    /// Create a range pinned to a single value.
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self {
            start: value,
            stop: value,
            steps: 1,
        }
    }

    /// Distance between adjacent grid nodes (0 for a single-node range).
    #[must_use]
    pub fn spacing(&self) -> f64 {
        if self.steps < 2 {
            0.0
        } else {
            (self.stop - self.start) / (self.steps - 1) as f64
        }
    }

    /// The grid value at node `i`.
    #[must_use]
    pub fn value_at(&self, i: usize) -> f64 {
        debug_assert!(i < self.steps);
        self.start + self.spacing() * i as f64
    }

    /// Materialize all grid values.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        (0..self.steps).map(|i| self.value_at(i)).collect()
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.steps == 0 {
            return Err(MusicError::invalid_config(format!(
                "{name}: steps must be at least 1"
            )));
        }
        if !self.start.is_finite() || !self.stop.is_finite() {
            return Err(MusicError::invalid_config(format!(
                "{name}: bounds must be finite"
            )));
        }
        if self.stop < self.start {
            return Err(MusicError::invalid_config(format!(
                "{name}: stop must not be below start"
            )));
        }
        Ok(())
    }
}

/// Noise-subspace dimension selection strategy.
///
/// The noise subspace is spanned by the `l` smallest-eigenvalue
/// eigenvectors of the coherency matrix; the assumed number of superposed
/// coherent signals is `6 - l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubspaceSelector {
    /// Pick `l` from the eigenvalue spectrum: every eigenvalue below
    /// `eigenvalue_gap_threshold * lambda_1` is counted as noise.
    #[default]
    Auto,
    /// Use an explicit noise-subspace dimension `l` in `0..=5`.
    NoiseDimension(usize),
}

impl SubspaceSelector {
    /// Selector assuming exactly `n` superposed coherent signals.
    #[must_use]
    pub const fn signals(n: usize) -> Self {
        Self::NoiseDimension(6 - n)
    }
}

/// Configuration for the MUSIC grid search.
///
/// Angle ranges are in degrees, velocities in the same unit the data was
/// prepared with (conventionally m/s). All parameters are validated by
/// [`SearchConfig::validate`] before a search runs.
///
/// # Parameter slots per wave type
///
/// The grid is always four-dimensional; wave types that need fewer
/// parameters reinterpret or ignore slots (pin unused ranges with
/// [`ParameterRange::fixed`]):
///
/// | Wave type | `theta_range`        | `phi_range` | `vp_range` | `vs_range`       |
/// |-----------|----------------------|-------------|------------|------------------|
/// | P, SV     | incidence angle      | azimuth     | P velocity | S velocity       |
/// | SH        | incidence angle      | azimuth     | ignored    | S velocity       |
/// | Rayleigh  | ellipticity angle    | azimuth     | ignored    | phase velocity   |
/// | Love      | ignored              | azimuth     | ignored    | phase velocity   |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Wave type whose polarization model is scored at every grid node.
    pub wave_type: WaveType,

    /// Incidence-angle grid in degrees from vertical (ellipticity angle
    /// for Rayleigh waves).
    pub theta_range: ParameterRange,

    /// Propagation-azimuth grid in degrees, measured counterclockwise
    /// from the x (east) axis.
    pub phi_range: ParameterRange,

    /// P-velocity grid.
    pub vp_range: ParameterRange,

    /// S-velocity grid (phase velocity for Rayleigh and Love waves).
    pub vs_range: ParameterRange,

    /// Velocity used to rescale the rotational channels into
    /// velocity-equivalent units. Must equal the value the observed data
    /// was prepared with; it is a configuration contract, not a free
    /// parameter of the search.
    pub scaling_velocity: f64,

    /// Noise-subspace dimension selection strategy.
    pub subspace_selector: SubspaceSelector,

    /// Relative eigenvalue threshold for [`SubspaceSelector::Auto`]:
    /// eigenvalues below `eigenvalue_gap_threshold * lambda_1` are counted
    /// as noise. This is the one tunable heuristic of the estimator.
    pub eigenvalue_gap_threshold: f64,

    /// Diagonal regularization added to a near-singular coherency matrix
    /// before eigendecomposition.
    pub coherency_epsilon: f64,

    /// Additive guard in the likelihood denominator
    /// `1 / (v' Q v + model_epsilon)` against division by zero when a
    /// candidate vector is exactly orthogonal to the noise subspace.
    pub model_epsilon: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::body_wave(WaveType::P)
    }
}

impl SearchConfig {
    /// Preset for body waves (P, SV, SH) in near-surface material.
    ///
    /// Covers the full incidence/azimuth space at 5 degree spacing and a
    /// coarse crustal velocity bracket.
    #[must_use]
    pub fn body_wave(wave_type: WaveType) -> Self {
        Self {
            wave_type,
            theta_range: ParameterRange::new(0.0, 90.0, 19),
            phi_range: ParameterRange::new(0.0, 355.0, 72),
            vp_range: ParameterRange::new(4000.0, 8000.0, 9),
            vs_range: ParameterRange::new(2000.0, 4500.0, 11),
            scaling_velocity: 3000.0,
            subspace_selector: SubspaceSelector::signals(1),
            eigenvalue_gap_threshold: 0.1,
            coherency_epsilon: 1e-9,
            model_epsilon: 1e-9,
        }
    }

    /// Preset for surface waves (Rayleigh, Love).
    ///
    /// The theta slot carries the Rayleigh ellipticity angle and the vs
    /// slot the phase velocity; the vp slot is pinned.
    #[must_use]
    pub fn surface_wave(wave_type: WaveType) -> Self {
        Self {
            wave_type,
            theta_range: ParameterRange::new(-90.0, 90.0, 37),
            phi_range: ParameterRange::new(0.0, 355.0, 72),
            vp_range: ParameterRange::fixed(0.0),
            vs_range: ParameterRange::new(100.0, 3000.0, 30),
            scaling_velocity: 3000.0,
            subspace_selector: SubspaceSelector::signals(1),
            eigenvalue_gap_threshold: 0.1,
            coherency_epsilon: 1e-9,
            model_epsilon: 1e-9,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MusicError::InvalidConfig`] if any parameter is out of
    /// its valid range.
    pub fn validate(&self) -> Result<()> {
        self.theta_range.validate("theta_range")?;
        self.phi_range.validate("phi_range")?;
        self.vp_range.validate("vp_range")?;
        self.vs_range.validate("vs_range")?;

        if self.scaling_velocity <= 0.0 {
            return Err(MusicError::invalid_config(
                "scaling_velocity must be positive",
            ));
        }
        if self.eigenvalue_gap_threshold <= 0.0 || self.eigenvalue_gap_threshold >= 1.0 {
            return Err(MusicError::invalid_config(
                "eigenvalue_gap_threshold must lie strictly between 0 and 1",
            ));
        }
        if self.coherency_epsilon < 0.0 {
            return Err(MusicError::invalid_config(
                "coherency_epsilon must be non-negative",
            ));
        }
        if self.model_epsilon <= 0.0 {
            return Err(MusicError::invalid_config("model_epsilon must be positive"));
        }
        if let SubspaceSelector::NoiseDimension(l) = self.subspace_selector {
            if l > 5 {
                return Err(MusicError::invalid_config(
                    "noise-subspace dimension must be in 0..=5",
                ));
            }
        }

        match self.wave_type {
            WaveType::P | WaveType::Sv => {
                if self.vp_range.start <= 0.0 || self.vs_range.start <= 0.0 {
                    return Err(MusicError::invalid_config(
                        "P and S velocities must be positive",
                    ));
                }
            }
            WaveType::Sh | WaveType::Rayleigh | WaveType::Love => {
                if self.vs_range.start <= 0.0 {
                    return Err(MusicError::invalid_config(
                        "velocity (vs slot) must be positive",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Total number of grid nodes.
    #[must_use]
    pub const fn grid_len(&self) -> usize {
        self.theta_range.steps * self.phi_range.steps * self.vp_range.steps * self.vs_range.steps
    }

    /// Set the wave type.
    #[must_use]
    pub const fn with_wave_type(mut self, wave_type: WaveType) -> Self {
        self.wave_type = wave_type;
        self
    }

    /// Set the rotational scaling velocity.
    #[must_use]
    pub const fn with_scaling_velocity(mut self, v: f64) -> Self {
        self.scaling_velocity = v;
        self
    }

    /// Assume exactly `n` superposed coherent signals.
    #[must_use]
    pub const fn with_signals(mut self, n: usize) -> Self {
        self.subspace_selector = SubspaceSelector::signals(n);
        self
    }

    /// Set the subspace selector directly.
    #[must_use]
    pub const fn with_subspace_selector(mut self, selector: SubspaceSelector) -> Self {
        self.subspace_selector = selector;
        self
    }

    /// Set the theta (incidence/ellipticity) grid.
    #[must_use]
    pub const fn with_theta_range(mut self, range: ParameterRange) -> Self {
        self.theta_range = range;
        self
    }

    /// Set the azimuth grid.
    #[must_use]
    pub const fn with_phi_range(mut self, range: ParameterRange) -> Self {
        self.phi_range = range;
        self
    }

    /// Set the P-velocity grid.
    #[must_use]
    pub const fn with_vp_range(mut self, range: ParameterRange) -> Self {
        self.vp_range = range;
        self
    }

    /// Set the S-velocity (or phase-velocity) grid.
    #[must_use]
    pub const fn with_vs_range(mut self, range: ParameterRange) -> Self {
        self.vs_range = range;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.wave_type, WaveType::P);
    }

    #[test]
    fn test_range_values() {
        let range = ParameterRange::new(0.0, 90.0, 10);
        let values = range.values();
        assert_eq!(values.len(), 10);
        assert_relative_eq!(values[0], 0.0);
        assert_relative_eq!(values[9], 90.0);
        assert_relative_eq!(range.spacing(), 10.0);
    }

    #[test]
    fn test_fixed_range() {
        let range = ParameterRange::fixed(6000.0);
        assert_eq!(range.values(), vec![6000.0]);
        assert_eq!(range.spacing(), 0.0);
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let mut config = SearchConfig::default();

        config.theta_range = ParameterRange::new(90.0, 0.0, 10);
        assert!(config.validate().is_err());

        config.theta_range = ParameterRange::new(0.0, 90.0, 0);
        assert!(config.validate().is_err());

        config = SearchConfig::default();
        config.scaling_velocity = 0.0;
        assert!(config.validate().is_err());

        config = SearchConfig::default();
        config.model_epsilon = 0.0;
        assert!(config.validate().is_err());

        config = SearchConfig::default();
        config.subspace_selector = SubspaceSelector::NoiseDimension(6);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_signals_helper() {
        assert_eq!(
            SubspaceSelector::signals(1),
            SubspaceSelector::NoiseDimension(5)
        );
        assert_eq!(
            SubspaceSelector::signals(2),
            SubspaceSelector::NoiseDimension(4)
        );
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::body_wave(WaveType::Sv)
            .with_scaling_velocity(4000.0)
            .with_signals(2);
        assert_eq!(config.wave_type, WaveType::Sv);
        assert_eq!(config.scaling_velocity, 4000.0);
        assert_eq!(
            config.subspace_selector,
            SubspaceSelector::NoiseDimension(4)
        );
    }

    #[test]
    fn test_grid_len() {
        let config = SearchConfig::default()
            .with_theta_range(ParameterRange::new(0.0, 90.0, 4))
            .with_phi_range(ParameterRange::new(0.0, 350.0, 36))
            .with_vp_range(ParameterRange::fixed(6000.0))
            .with_vs_range(ParameterRange::new(3000.0, 4000.0, 3));
        assert_eq!(config.grid_len(), 4 * 36 * 3);
    }
}
