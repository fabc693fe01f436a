// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Numerical settings shared by all flux calculations.

use std::sync::OnceLock;

use quadrature::IntegrationRule;
use super::{DISTANCE_SOL, HBAR, KEV2CM, RADIUS_SOL};


/// Tolerances, subdivision budgets and normalisation constants.
///
/// The defaults are available process-wide through `FluxConfig::global()`.
/// Individual calculators can be given a modified copy via
/// `FluxCalculator::with_config`.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct FluxConfig {
    /// Absolute tolerance of the radial integrals.
    pub abs_prec: f64,

    /// Relative tolerance of the radial integrals.
    pub rel_prec: f64,

    /// Maximum number of subintervals of the radial integrals.
    pub subdivision_limit: usize,

    /// Gauss–Kronrod rule for the radial integrals.
    pub rule: IntegrationRule,

    /// The line-of-sight integral of the disc calculation runs at the radial
    /// tolerances multiplied by this factor, so that its noise does not
    /// stall the outer integral.
    pub inner_tolerance_scale: f64,

    /// Maximum number of subintervals of the line-of-sight integral.
    pub cquad_limit: usize,

    /// Absolute tolerance of integrals over energy windows.
    pub window_abs_prec: f64,

    /// Relative tolerance of integrals over energy windows.
    pub window_rel_prec: f64,

    /// Maximum number of subintervals of integrals over energy windows.
    pub window_subdivision_limit: usize,

    /// Gauss–Kronrod rule for integrals over energy windows.
    pub window_rule: IntegrationRule,

    /// Fluxes integrated on the fly over an energy window are multiplied by
    /// this constant. The historical value is 1e20 and downstream consumers
    /// rely on it.
    pub window_rescale: f64,

    /// Converts radial integrals of production rates into fluxes at Earth
    /// (per cm² per second per keV).
    pub flux_factor: f64,
}

/// `Rsol³ / (d² ħ)` with the radius in keV⁻¹, the distance in cm and ħ in
/// keV s.
pub fn default_flux_factor() -> f64 {
    let radius_sol_kev = RADIUS_SOL / (1e-2 * KEV2CM);
    let distance_sol_cm = 1e2 * DISTANCE_SOL;
    let hbar_kev = 1e6 * HBAR;
    radius_sol_kev.powi(3) / (distance_sol_cm.powi(2) * hbar_kev)
}

impl Default for FluxConfig {
    fn default() -> Self {
        FluxConfig {
            abs_prec: 0.,
            rel_prec: 1e-6,
            subdivision_limit: 1000,
            rule: IntegrationRule::GaussKonrod21,
            inner_tolerance_scale: 0.1,
            cquad_limit: 200,
            window_abs_prec: 0.,
            window_rel_prec: 1e-4,
            window_subdivision_limit: 100_000,
            window_rule: IntegrationRule::GaussKonrod15,
            window_rescale: 1e20,
            flux_factor: default_flux_factor(),
        }
    }
}

impl FluxConfig {
    /// The process-wide configuration, initialised on first use.
    pub fn global() -> &'static FluxConfig {
        static GLOBAL: OnceLock<FluxConfig> = OnceLock::new();
        GLOBAL.get_or_init(FluxConfig::default)
    }

    /// Tolerances of the line-of-sight integral, as `(epsabs, epsrel)`.
    pub fn inner_tolerance(&self) -> (f64, f64) {
        (self.inner_tolerance_scale * self.abs_prec, self.inner_tolerance_scale * self.rel_prec)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_factor_magnitude() {
        let f = FluxConfig::global().flux_factor;
        assert_approx_eq!(f, 2.97502e47, 1e-5 * f);
    }

    #[test]
    fn global_is_default() {
        assert_eq!(*FluxConfig::global(), FluxConfig::default());
        assert_eq!(FluxConfig::global().window_rescale, 1e20);
    }

    #[test]
    fn inner_tolerance_is_tighter() {
        let (a, r) = FluxConfig::default().inner_tolerance();
        assert_eq!(a, 0.);
        assert_approx_eq!(r, 1e-7, 1e-20);
    }
}
