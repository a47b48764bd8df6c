//! MUSIC grid-search engine.
//!
//! One coherency matrix and noise-subspace projector are computed per
//! analysis window; every node of the 4-D parameter grid is then scored
//! independently with the MUSIC likelihood
//! `L = 1 / (v' Q v + model_epsilon)`, in parallel over the flattened
//! Cartesian index space. The projector and the grids are the only shared
//! state and are read-only, so no locking is needed.
//!
//! # Output contract
//!
//! The likelihood tensor is indexed `[theta][phi][vp][vs]` in the exact
//! order of the configured ranges. Grid nodes whose polarization model
//! degenerates (zero-norm vector, e.g. unphysical post-critical
//! combinations) carry the sentinel value `0.0` instead of aborting the
//! search. Callers must run [`LikelihoodVolume::cleaned`] (non-finite and
//! sentinel values replaced by the neutral value 1.0) before visual
//! inspection or statistics over the volume; the returned argmax already
//! ignores non-finite values.

use ndarray::{Array2, Array4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::{MusicError, Result};
use crate::math::{estimate_coherency, noise_projector, NoiseSubspace};
use crate::polarization::{polarization_vector, ModelParameters};
use crate::signal::SixComponentSignal;

/// Sentinel likelihood for grid nodes with a degenerate polarization model.
pub const DEGENERATE_NODE: f64 = 0.0;

/// Neutral likelihood used by [`LikelihoodVolume::cleaned`].
pub const NEUTRAL_LIKELIHOOD: f64 = 1.0;

/// 4-D MUSIC likelihood tensor with its parameter grids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikelihoodVolume {
    values: Array4<f64>,
    theta_grid: Vec<f64>,
    phi_grid: Vec<f64>,
    vp_grid: Vec<f64>,
    vs_grid: Vec<f64>,
}

impl LikelihoodVolume {
    /// The raw likelihood tensor, indexed `[theta][phi][vp][vs]`.
    #[must_use]
    pub fn values(&self) -> &Array4<f64> {
        &self.values
    }

    /// Grid values along the theta axis (degrees).
    #[must_use]
    pub fn theta_grid(&self) -> &[f64] {
        &self.theta_grid
    }

    /// Grid values along the phi axis (degrees).
    #[must_use]
    pub fn phi_grid(&self) -> &[f64] {
        &self.phi_grid
    }

    /// Grid values along the vp axis.
    #[must_use]
    pub fn vp_grid(&self) -> &[f64] {
        &self.vp_grid
    }

    /// Grid values along the vs axis.
    #[must_use]
    pub fn vs_grid(&self) -> &[f64] {
        &self.vs_grid
    }

    /// Global argmax as `(indices, value)`, ignoring non-finite entries.
    #[must_use]
    pub fn argmax(&self) -> Option<([usize; 4], f64)> {
        let mut best: Option<([usize; 4], f64)> = None;
        for (idx, &value) in self.values.indexed_iter() {
            if !value.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, b)| value > b) {
                best = Some(([idx.0, idx.1, idx.2, idx.3], value));
            }
        }
        best
    }

    /// Copy of the volume with every non-finite or sentinel value replaced
    /// by [`NEUTRAL_LIKELIHOOD`], per the engine-to-caller cleanup contract.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        let mut cleaned = self.clone();
        cleaned.values.mapv_inplace(|v| {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                NEUTRAL_LIKELIHOOD
            }
        });
        cleaned
    }

    /// 2-D marginal of the cleaned volume over the two named axes
    /// (0 = theta, 1 = phi, 2 = vp, 3 = vs), taking the maximum over the
    /// remaining axes. Intended for visualization hand-off.
    #[must_use]
    pub fn marginal_max(&self, axis_a: usize, axis_b: usize) -> Array2<f64> {
        debug_assert!(axis_a < 4 && axis_b < 4 && axis_a != axis_b);
        let shape = self.values.shape();
        let mut out = Array2::from_elem((shape[axis_a], shape[axis_b]), f64::NEG_INFINITY);
        for (idx, &value) in self.values.indexed_iter() {
            if !value.is_finite() {
                continue;
            }
            let idx = [idx.0, idx.1, idx.2, idx.3];
            let slot = &mut out[(idx[axis_a], idx[axis_b])];
            if value > *slot {
                *slot = value;
            }
        }
        out
    }
}

/// Location and value of the global likelihood maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodPeak {
    /// Grid indices `[theta, phi, vp, vs]`.
    pub indices: [usize; 4],
    /// Theta grid value at the peak (degrees).
    pub theta: f64,
    /// Phi grid value at the peak (degrees).
    pub phi: f64,
    /// Vp grid value at the peak.
    pub vp: f64,
    /// Vs grid value at the peak.
    pub vs: f64,
    /// Likelihood at the peak.
    pub likelihood: f64,
}

/// Result of one MUSIC grid search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The full 4-D likelihood volume.
    pub volume: LikelihoodVolume,
    /// Global argmax, as a convenience for single-wave use.
    pub peak: LikelihoodPeak,
    /// Subspace diagnostics for the analysis window: eigenvalue spectrum
    /// and the chosen noise dimension.
    pub subspace: NoiseSubspace,
}

/// Run the MUSIC grid search over one analysis window.
///
/// The eigendecomposition runs exactly once per call; every grid node is
/// then scored independently (rayon parallel map). Calling this twice with
/// identical inputs and a deterministic subspace selector yields a
/// bit-identical likelihood volume.
///
/// # Errors
///
/// - [`MusicError::InvalidConfig`] if the configuration fails validation.
/// - [`MusicError::InvalidWindow`] if the window exceeds the signal.
/// - [`MusicError::DegenerateCoherency`] if the coherency matrix cannot be
///   stably decomposed even after regularization.
///
/// Per-node model degeneracies are expected physical edge cases and map
/// to the [`DEGENERATE_NODE`] sentinel instead of an error.
pub fn music_search(
    signal: &SixComponentSignal,
    center_index: usize,
    window_length: usize,
    config: &SearchConfig,
) -> Result<SearchResult> {
    config.validate()?;

    let coherency = estimate_coherency(signal, center_index, window_length)?;
    let subspace = noise_projector(
        &coherency,
        config.subspace_selector,
        config.eigenvalue_gap_threshold,
        config.coherency_epsilon,
    )?;

    let theta_grid = config.theta_range.values();
    let phi_grid = config.phi_range.values();
    let vp_grid = config.vp_range.values();
    let vs_grid = config.vs_range.values();
    let (nt, np, na, nb) = (
        theta_grid.len(),
        phi_grid.len(),
        vp_grid.len(),
        vs_grid.len(),
    );

    let q = subspace.projector;
    let wave_type = config.wave_type;
    let scaling_velocity = config.scaling_velocity;
    let model_epsilon = config.model_epsilon;

    // Row-major flattening fixes the [theta][phi][vp][vs] index semantics.
    let flat: Vec<f64> = (0..nt * np * na * nb)
        .into_par_iter()
        .map(|idx| {
            let ib = idx % nb;
            let ia = (idx / nb) % na;
            let ip = (idx / (nb * na)) % np;
            let it = idx / (nb * na * np);

            let params = ModelParameters::from_degrees(
                theta_grid[it],
                phi_grid[ip],
                vp_grid[ia],
                vs_grid[ib],
            );
            match polarization_vector(wave_type, &params, scaling_velocity) {
                Ok(v) => {
                    let quadratic = (v.transpose() * q * v)[(0, 0)];
                    1.0 / (quadratic + model_epsilon)
                }
                Err(_) => DEGENERATE_NODE,
            }
        })
        .collect();

    let values = Array4::from_shape_vec((nt, np, na, nb), flat)
        .map_err(|e| MusicError::invalid_config(format!("grid shape mismatch: {e}")))?;

    let volume = LikelihoodVolume {
        values,
        theta_grid,
        phi_grid,
        vp_grid,
        vs_grid,
    };

    let (indices, likelihood) = volume.argmax().ok_or_else(|| {
        MusicError::degenerate_coherency("likelihood volume contains no finite values")
    })?;
    let peak = LikelihoodPeak {
        indices,
        theta: volume.theta_grid[indices[0]],
        phi: volume.phi_grid[indices[1]],
        vp: volume.vp_grid[indices[2]],
        vs: volume.vs_grid[indices[3]],
        likelihood,
    };

    Ok(SearchResult {
        volume,
        peak,
        subspace,
    })
}
