//! Six-Component MUSIC Wavefield Analysis
//!
//! Single-station estimation of propagation direction and local wave
//! speeds from six-component ground motion (three translational plus
//! three rotational channels), based on MUltiple SIgnal Classification
//! (MUSIC).
//!
//! # How it works
//!
//! 1. A 6x6 coherency matrix is estimated from one analysis window.
//! 2. Its eigendecomposition splits the channel space into signal and
//!    noise subspaces; the projector onto the noise subspace is built
//!    from the smallest-eigenvalue eigenvectors.
//! 3. For every node of a 4-D parameter grid (incidence angle, azimuth,
//!    P velocity, S velocity), a wave-physics forward model predicts the
//!    theoretical six-component polarization vector.
//! 4. The MUSIC likelihood `1 / (v' Q v + eps)` peaks where a candidate
//!    vector is orthogonal to the noise subspace.
//!
//! Because the subspace split supports more than one signal direction,
//! several interfering waves inside one window can be resolved as
//! separate likelihood maxima — the signature advantage of MUSIC over
//! single-wave correlation.
//!
//! # Quick Start
//!
//! ```
//! use sixc_music::{
//!     music_search, synthesize_wave, ModelParameters, SearchConfig, WaveType,
//! };
//!
//! // A synthetic P-wave arrival at sample 256.
//! let truth = ModelParameters::from_degrees(30.0, 90.0, 6000.0, 3464.0);
//! let signal = synthesize_wave(WaveType::P, &truth, 3000.0, 512, 256, 0.001, 20.0)?;
//!
//! let config = SearchConfig::body_wave(WaveType::P);
//! let result = music_search(&signal, 256, 100, &config)?;
//!
//! println!(
//!     "theta = {} deg, phi = {} deg, likelihood = {}",
//!     result.peak.theta, result.peak.phi, result.peak.likelihood,
//! );
//! # Ok::<(), sixc_music::MusicError>(())
//! ```
//!
//! # Scope
//!
//! The physical model assumes a homogeneous half-space terminated by a
//! free surface. Multi-station array processing, automatic picking and
//! layered or anisotropic media are out of scope; the arrival sample is
//! supplied by the caller.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod config;
pub mod error;
pub mod math;
pub mod polarization;
pub mod search;
pub mod signal;
pub mod synthetic;

// Re-exports for convenient access
pub use config::{ParameterRange, SearchConfig, SubspaceSelector};
pub use error::{MusicError, Result};
pub use math::{estimate_coherency, noise_projector, NoiseSubspace};
pub use polarization::{
    free_surface_p_coefficients, polarization_vector, refracted_s_angle, ModelParameters, WaveType,
};
pub use search::{
    music_search, LikelihoodPeak, LikelihoodVolume, SearchResult, DEGENERATE_NODE,
    NEUTRAL_LIKELIHOOD,
};
pub use signal::{SixComponentSignal, NUM_CHANNELS};
pub use synthetic::{inject_noise, ricker_wavelet, synthesize_wave};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
