//! Theoretical six-component polarization models.
//!
//! For a receiver at the free surface of a homogeneous elastic half-space,
//! each supported wave type has a closed-form six-component polarization
//! vector as a function of the model parameters. The conventions are:
//!
//! - Coordinates: x east, y north, z up. The propagation azimuth `phi` is
//!   measured counterclockwise from +x; the incidence angle `theta` is
//!   measured from the vertical.
//! - Channel order `[tx, ty, tz, rx, ry, rz]`: translational velocity
//!   followed by rotation. For a plane wave these channel groups are
//!   co-phased (equivalently: acceleration with rotation rate), so the
//!   polarization vector is real-valued.
//! - The rotational components are multiplied by the scaling velocity used
//!   when the observed data was prepared, making all six channels
//!   commensurable inside one coherency matrix.
//!
//! Body-wave surface responses are derived from the traction-free boundary
//! condition (P-SV potential method); the P-wave response is expressed
//! through the classical free-surface reflection/conversion amplitude
//! ratios in their angle form. Rayleigh and Love responses use the exact
//! free-surface tilt identities (rotation about the transverse axis equals
//! the horizontal gradient of vertical motion; torsion equals half the
//! horizontal gradient of transverse motion).
//!
//! Post-critical SV incidence (converted P becomes evanescent) is handled
//! by clamping the vertical P slowness to its real part, zero. The policy
//! is deterministic; at exactly 45 degrees post-critical incidence the
//! whole vector degenerates and the grid search maps the node to its
//! sentinel value instead of failing.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector6;
use serde::{Deserialize, Serialize};

use crate::error::{MusicError, Result};

/// Supported wave types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveType {
    /// Compressional body wave.
    #[default]
    P,
    /// Vertically polarized shear wave.
    Sv,
    /// Horizontally polarized shear wave.
    Sh,
    /// Rayleigh surface wave (elliptical, P-SV type).
    Rayleigh,
    /// Love surface wave (SH type).
    Love,
}

impl fmt::Display for WaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::P => "P",
            Self::Sv => "SV",
            Self::Sh => "SH",
            Self::Rayleigh => "Rayleigh",
            Self::Love => "Love",
        };
        write!(f, "{name}")
    }
}

impl FromStr for WaveType {
    type Err = MusicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "P" => Ok(Self::P),
            "SV" => Ok(Self::Sv),
            "SH" => Ok(Self::Sh),
            "RAYLEIGH" | "R" => Ok(Self::Rayleigh),
            "LOVE" | "L" => Ok(Self::Love),
            _ => Err(MusicError::UnsupportedWaveType(s.to_string())),
        }
    }
}

/// Model parameter vector for one grid node.
///
/// Angles are in radians. For Rayleigh waves the `theta` slot carries the
/// ellipticity angle; for Rayleigh and Love waves the `vs` slot carries
/// the phase velocity (see [`crate::SearchConfig`] for the slot table).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Incidence angle from vertical (or Rayleigh ellipticity angle).
    pub theta: f64,
    /// Propagation azimuth, counterclockwise from +x.
    pub phi: f64,
    /// P velocity.
    pub vp: f64,
    /// S velocity (or surface-wave phase velocity).
    pub vs: f64,
}

impl ModelParameters {
    /// Create a parameter vector from radians.
    #[must_use]
    pub const fn new(theta: f64, phi: f64, vp: f64, vs: f64) -> Self {
        Self { theta, phi, vp, vs }
    }

    /// Create a parameter vector with angles in degrees.
    #[must_use]
    pub fn from_degrees(theta_deg: f64, phi_deg: f64, vp: f64, vs: f64) -> Self {
        Self {
            theta: theta_deg.to_radians(),
            phi: phi_deg.to_radians(),
            vp,
            vs,
        }
    }
}

/// Refracted (converted) S angle for an incident P wave, from Snell's law
/// `sin(theta_s) / vs = sin(theta_p) / vp`.
#[must_use]
pub fn refracted_s_angle(theta_p: f64, vp: f64, vs: f64) -> f64 {
    ((vs / vp) * theta_p.sin()).clamp(-1.0, 1.0).asin()
}

/// Free-surface P-to-P and P-to-S displacement amplitude ratios
/// `(A_PP / A_P, A_PS / A_P)` in the classical angle form.
///
/// `theta_p` is the P incidence angle, `theta_s` the converted S angle
/// from Snell's law. At normal incidence the ratios are `(-1, 0)`.
#[must_use]
pub fn free_surface_p_coefficients(theta_p: f64, theta_s: f64, vp: f64, vs: f64) -> (f64, f64) {
    let kappa = vp / vs;
    let sin_2p = (2.0 * theta_p).sin();
    let sin_2s = (2.0 * theta_s).sin();
    let cos_2s = (2.0 * theta_s).cos();
    let denom = sin_2p * sin_2s + kappa * kappa * cos_2s * cos_2s;
    let a_pp = (sin_2p * sin_2s - kappa * kappa * cos_2s * cos_2s) / denom;
    let a_ps = 2.0 * kappa * sin_2p * cos_2s / denom;
    (a_pp, a_ps)
}

/// Compute the unit-normalized six-component polarization vector for a
/// wave type and parameter vector.
///
/// # Errors
///
/// Returns [`MusicError::DegenerateModel`] if the raw vector has zero
/// norm (unphysical parameter combination).
pub fn polarization_vector(
    wave_type: WaveType,
    params: &ModelParameters,
    scaling_velocity: f64,
) -> Result<Vector6<f64>> {
    let raw = match wave_type {
        WaveType::P => p_wave(params, scaling_velocity),
        WaveType::Sv => sv_wave(params, scaling_velocity),
        WaveType::Sh => sh_wave(params, scaling_velocity),
        WaveType::Rayleigh => rayleigh_wave(params, scaling_velocity),
        WaveType::Love => love_wave(params, scaling_velocity),
    };

    let v = Vector6::from_column_slice(&raw);
    let norm = v.norm();
    if norm <= f64::EPSILON {
        return Err(MusicError::DegenerateModel {
            wave_type: wave_type.to_string(),
            theta: params.theta,
            phi: params.phi,
            vp: params.vp,
            vs: params.vs,
        });
    }
    Ok(v / norm)
}

/// Incident P wave plus its free-surface reflected P and converted SV.
///
/// The surface response is the superposition of the incident field and
/// both scattered fields; only the converted SV carries curl, so the
/// rotation is the conversion term over `2 vs`, about the transverse axis.
fn p_wave(params: &ModelParameters, scaling_velocity: f64) -> [f64; 6] {
    let theta_p = params.theta;
    let theta_s = refracted_s_angle(theta_p, params.vp, params.vs);
    let (a_pp, a_ps) = free_surface_p_coefficients(theta_p, theta_s, params.vp, params.vs);

    let u_h = theta_p.sin() * (1.0 + a_pp) + theta_s.cos() * a_ps;
    let u_z = theta_p.cos() * (1.0 - a_pp) + theta_s.sin() * a_ps;
    let omega_t = a_ps / (2.0 * params.vs);

    let (sin_phi, cos_phi) = params.phi.sin_cos();
    [
        u_h * cos_phi,
        u_h * sin_phi,
        u_z,
        -scaling_velocity * omega_t * sin_phi,
        scaling_velocity * omega_t * cos_phi,
        0.0,
    ]
}

/// Incident SV wave plus its free-surface reflected SV and converted P.
///
/// Expressed in slowness form with horizontal slowness `p = sin(theta)/vs`
/// and vertical slownesses `q_a`, `q_b`; the common positive denominator
/// of the scattering coefficients is dropped since the vector is
/// normalized. Post-critical incidence clamps `q_a` to zero (evanescent
/// converted P).
fn sv_wave(params: &ModelParameters, scaling_velocity: f64) -> [f64; 6] {
    let (vp, vs) = (params.vp, params.vs);
    let p = params.theta.sin() / vs;
    let q_a = (1.0 / (vp * vp) - p * p).max(0.0).sqrt();
    let q_b = params.theta.cos() / vs;
    let m = 1.0 / (vs * vs) - 2.0 * p * p;

    let u_h = -q_b * m;
    let u_z = 2.0 * p * q_a * q_b;
    let omega_t = 2.0 * p * p * q_a * q_b;

    let (sin_phi, cos_phi) = params.phi.sin_cos();
    [
        u_h * cos_phi,
        u_h * sin_phi,
        u_z,
        -scaling_velocity * omega_t * sin_phi,
        scaling_velocity * omega_t * cos_phi,
        0.0,
    ]
}

/// Incident SH wave: total reflection doubles the transverse displacement;
/// the surviving rotation is about the vertical axis with magnitude
/// `sin(theta) / vs` (the horizontal-axis contributions of the up- and
/// down-going fields cancel at the surface).
fn sh_wave(params: &ModelParameters, scaling_velocity: f64) -> [f64; 6] {
    let (sin_phi, cos_phi) = params.phi.sin_cos();
    let omega_z = -params.theta.sin() / params.vs;
    [
        -2.0 * sin_phi,
        2.0 * cos_phi,
        0.0,
        0.0,
        0.0,
        scaling_velocity * omega_z,
    ]
}

/// Rayleigh wave with ellipticity angle `xi` (theta slot) and phase
/// velocity `c` (vs slot).
///
/// Uses the free-surface tilt identity: rotation about the transverse
/// axis equals `u_z / c` in the velocity-co-phased convention. The 90
/// degree phase shift between horizontal and vertical translation is not
/// representable in a real-valued vector; the model carries the
/// in-phase amplitudes.
fn rayleigh_wave(params: &ModelParameters, scaling_velocity: f64) -> [f64; 6] {
    let xi = params.theta;
    let c = params.vs;
    let (sin_phi, cos_phi) = params.phi.sin_cos();
    let omega_t = xi.cos() / c;
    [
        xi.sin() * cos_phi,
        xi.sin() * sin_phi,
        xi.cos(),
        -scaling_velocity * omega_t * sin_phi,
        scaling_velocity * omega_t * cos_phi,
        0.0,
    ]
}

/// Love wave with phase velocity `c` (vs slot): transverse displacement
/// with torsion `-1 / (2c)` about the vertical axis.
fn love_wave(params: &ModelParameters, scaling_velocity: f64) -> [f64; 6] {
    let c = params.vs;
    let (sin_phi, cos_phi) = params.phi.sin_cos();
    [
        -sin_phi,
        cos_phi,
        0.0,
        0.0,
        0.0,
        -scaling_velocity / (2.0 * c),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VP: f64 = 6000.0;
    const VS: f64 = 3464.0;
    const V_SCAL: f64 = 3000.0;

    #[test]
    fn test_wave_type_round_trip() {
        for (tag, expected) in [
            ("P", WaveType::P),
            ("sv", WaveType::Sv),
            ("SH", WaveType::Sh),
            ("Rayleigh", WaveType::Rayleigh),
            ("love", WaveType::Love),
        ] {
            assert_eq!(tag.parse::<WaveType>().unwrap(), expected);
        }
        assert!(matches!(
            "XKCD".parse::<WaveType>(),
            Err(MusicError::UnsupportedWaveType(_))
        ));
    }

    #[test]
    fn test_snell_consistency() {
        for theta_deg in [5.0, 20.0, 40.0, 60.0, 85.0] {
            let theta: f64 = f64::to_radians(theta_deg);
            let theta_s = refracted_s_angle(theta, VP, VS);
            assert_relative_eq!(
                theta_s.sin() / VS,
                theta.sin() / VP,
                epsilon = 1e-12,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_free_surface_coefficients_normal_incidence() {
        let (a_pp, a_ps) = free_surface_p_coefficients(0.0, 0.0, VP, VS);
        assert_relative_eq!(a_pp, -1.0, epsilon = 1e-12);
        assert_relative_eq!(a_ps, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_all_types_unit_norm() {
        let params = ModelParameters::from_degrees(35.0, 120.0, VP, VS);
        for wave_type in [
            WaveType::P,
            WaveType::Sv,
            WaveType::Sh,
            WaveType::Rayleigh,
            WaveType::Love,
        ] {
            let v = polarization_vector(wave_type, &params, V_SCAL).unwrap();
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_p_wave_normal_incidence_is_vertical() {
        let params = ModelParameters::from_degrees(0.0, 70.0, VP, VS);
        let v = polarization_vector(WaveType::P, &params, V_SCAL).unwrap();
        // Vertical translation only; no horizontals, no rotation.
        assert_relative_eq!(v[2].abs(), 1.0, epsilon = 1e-12);
        for i in [0, 1, 3, 4, 5] {
            assert_relative_eq!(v[i], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_p_wave_zero_vertical_rotation() {
        for theta_deg in [10.0, 30.0, 55.0, 80.0] {
            let params = ModelParameters::from_degrees(theta_deg, 33.0, VP, VS);
            let v = polarization_vector(WaveType::P, &params, V_SCAL).unwrap();
            assert_relative_eq!(v[5], 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_sh_wave_is_transverse() {
        let params = ModelParameters::from_degrees(30.0, 40.0, VP, VS);
        let v = polarization_vector(WaveType::Sh, &params, V_SCAL).unwrap();
        // No vertical translation, no horizontal-axis rotation.
        assert_relative_eq!(v[2], 0.0, epsilon = 1e-14);
        assert_relative_eq!(v[3], 0.0, epsilon = 1e-14);
        assert_relative_eq!(v[4], 0.0, epsilon = 1e-14);
        // Translational part orthogonal to the azimuth direction.
        let (sin_phi, cos_phi) = f64::to_radians(40.0).sin_cos();
        assert_relative_eq!(v[0] * cos_phi + v[1] * sin_phi, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_sv_post_critical_is_deterministic() {
        // Critical angle is asin(vs/vp) ~ 35.3 degrees for these speeds.
        let params = ModelParameters::from_degrees(60.0, 10.0, VP, VS);
        let a = polarization_vector(WaveType::Sv, &params, V_SCAL).unwrap();
        let b = polarization_vector(WaveType::Sv, &params, V_SCAL).unwrap();
        assert_eq!(a, b);
        assert_relative_eq!(a.norm(), 1.0, epsilon = 1e-12);
        // Evanescent clamp leaves only the horizontal translation.
        assert_relative_eq!(a[2], 0.0, epsilon = 1e-14);
        assert_relative_eq!(a[3], 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_sv_post_critical_45_degrees_degenerates() {
        // Post-critical and exactly 45 degrees: both surviving terms vanish.
        let params = ModelParameters::from_degrees(45.0, 0.0, VP, VS);
        let result = polarization_vector(WaveType::Sv, &params, V_SCAL);
        assert!(matches!(result, Err(MusicError::DegenerateModel { .. })));
    }

    #[test]
    fn test_rayleigh_ellipticity_limits() {
        // Pure vertical ellipticity: no horizontal translation.
        let vertical = ModelParameters::from_degrees(0.0, 25.0, 0.0, 500.0);
        let v = polarization_vector(WaveType::Rayleigh, &vertical, V_SCAL).unwrap();
        assert_relative_eq!(v[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-14);
        assert!(v[2].abs() > 0.0);

        // Pure horizontal ellipticity: no vertical translation or tilt.
        let horizontal = ModelParameters::from_degrees(90.0, 25.0, 0.0, 500.0);
        let v = polarization_vector(WaveType::Rayleigh, &horizontal, V_SCAL).unwrap();
        assert_relative_eq!(v[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(v[3], 0.0, epsilon = 1e-12);
        assert_relative_eq!(v[4], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_love_wave_components() {
        let params = ModelParameters::from_degrees(0.0, 0.0, 0.0, 400.0);
        let v = polarization_vector(WaveType::Love, &params, V_SCAL).unwrap();
        // At phi = 0 the transverse direction is +y.
        assert_relative_eq!(v[0], 0.0, epsilon = 1e-14);
        assert!(v[1] > 0.0);
        assert_relative_eq!(v[2], 0.0, epsilon = 1e-14);
        assert!(v[5] < 0.0);
    }

    #[test]
    fn test_scaling_velocity_rebalances_rotations() {
        let params = ModelParameters::from_degrees(40.0, 10.0, VP, VS);
        let small = polarization_vector(WaveType::P, &params, 1.0).unwrap();
        let large = polarization_vector(WaveType::P, &params, 1e6).unwrap();
        let rot_small = (small[3] * small[3] + small[4] * small[4]).sqrt();
        let rot_large = (large[3] * large[3] + large[4] * large[4]).sqrt();
        assert!(rot_large > rot_small);
    }
}
