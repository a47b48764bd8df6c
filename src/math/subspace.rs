//! Eigendecomposition and noise-subspace projector construction.
//!
//! The MUSIC estimator scores candidate polarization vectors against the
//! projector onto the noise subspace of the coherency matrix: the span of
//! the `l` smallest-eigenvalue eigenvectors, orthogonal to the true
//! signal directions.

use nalgebra::{Matrix6, SymmetricEigen, Vector6};

use crate::config::SubspaceSelector;
use crate::error::{MusicError, Result};

/// Noise-subspace projector together with its decomposition diagnostics.
#[derive(Debug, Clone)]
pub struct NoiseSubspace {
    /// Projector `Q` onto the noise subspace: symmetric and idempotent up
    /// to numerical precision.
    pub projector: Matrix6<f64>,

    /// Eigenvalues of the (possibly regularized) coherency matrix, sorted
    /// descending, negative round-off clamped to zero.
    pub eigenvalues: [f64; 6],

    /// Chosen noise-subspace dimension `l`; the assumed signal count is
    /// `6 - l`.
    pub noise_dimension: usize,
}

/// Build the noise-subspace projector of a coherency matrix.
///
/// A near-singular matrix (largest eigenvalue at or below `epsilon`, or a
/// non-finite decomposition) is retried once with `epsilon` added to the
/// diagonal. With [`SubspaceSelector::Auto`] the noise dimension is the
/// count of eigenvalues below `gap_threshold * lambda_1` — the one tunable
/// heuristic of the estimator, exposed through the search configuration.
///
/// # Errors
///
/// Returns [`MusicError::DegenerateCoherency`] if regularization cannot
/// produce a stable decomposition, and [`MusicError::InvalidConfig`] for
/// an explicit noise dimension outside `0..=5`.
pub fn noise_projector(
    coherency: &Matrix6<f64>,
    selector: SubspaceSelector,
    gap_threshold: f64,
    epsilon: f64,
) -> Result<NoiseSubspace> {
    let mut pairs = sorted_eigenpairs(coherency);

    let degenerate = pairs
        .as_ref()
        .map_or(true, |p| !p[0].0.is_finite() || p[0].0 <= epsilon);
    if degenerate {
        let regularized = coherency + Matrix6::identity() * epsilon;
        pairs = sorted_eigenpairs(&regularized);
    }

    let pairs = pairs.ok_or_else(|| {
        MusicError::degenerate_coherency("eigendecomposition produced non-finite eigenvalues")
    })?;
    if pairs[0].0 <= 0.0 {
        return Err(MusicError::degenerate_coherency(
            "all eigenvalues indistinguishable from zero after regularization",
        ));
    }

    let noise_dimension = match selector {
        SubspaceSelector::NoiseDimension(l) => {
            if l > 5 {
                return Err(MusicError::invalid_config(
                    "noise-subspace dimension must be in 0..=5",
                ));
            }
            l
        }
        SubspaceSelector::Auto => pairs
            .iter()
            .filter(|(value, _)| *value < gap_threshold * pairs[0].0)
            .count(),
    };

    let mut projector = Matrix6::zeros();
    for (_, vector) in pairs.iter().skip(6 - noise_dimension) {
        projector += vector * vector.transpose();
    }

    let mut eigenvalues = [0.0; 6];
    for (slot, (value, _)) in eigenvalues.iter_mut().zip(pairs.iter()) {
        *slot = *value;
    }

    Ok(NoiseSubspace {
        projector,
        eigenvalues,
        noise_dimension,
    })
}

/// Symmetric eigendecomposition with eigenpairs sorted by descending
/// eigenvalue; negative round-off eigenvalues are clamped to zero.
/// Returns `None` if any eigenvalue is non-finite.
fn sorted_eigenpairs(matrix: &Matrix6<f64>) -> Option<Vec<(f64, Vector6<f64>)>> {
    let eigen = SymmetricEigen::new(*matrix);
    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut pairs: Vec<(f64, Vector6<f64>)> = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .map(|(i, &v)| (v.max(0.0), eigen.eigenvectors.column(i).into_owned()))
        .collect();

    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    Some(pairs)
}
