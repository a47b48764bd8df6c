//! Mathematical core of the MUSIC estimator.
//!
//! This module provides:
//! - [`coherency`]: windowed 6x6 coherency-matrix estimation
//! - [`subspace`]: eigendecomposition and noise-subspace projection

pub mod coherency;
pub mod subspace;

pub use coherency::estimate_coherency;
pub use subspace::{noise_projector, NoiseSubspace};
