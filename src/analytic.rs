// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! A closed-form reference solar model.

Tabulated standard solar models are large and come with their own
interpolation machinery. For testing the integrators and for quick
experiments it is handy to have a model whose profiles are smooth analytic
functions with roughly solar magnitudes:

- temperature `T(r) = 1.35 keV exp(-(r / 0.35)²)`;
- electron density `n_e(r) = 6e25 cm⁻³ exp(-r / 0.15)`.

The Primakoff rate uses the Debye–Hückel screening formula with a
fully-ionised hydrogen plasma. The axion-electron rates are schematic: they
have the right scalings with density, temperature and energy but are not
meant to reproduce a real solar model.

*/

use super::{OpacityCode, SolarModel, ALPHA, KEV2CM, MASS_ELECTRON_KEV, OP_ELEMENT_NAMES, PI};
use super::metal_element_names;


/// Element abundance weights for the schematic opacity rate, in the order
/// of `OP_ELEMENT_NAMES`.
const ELEMENT_WEIGHTS: [f64; 17] = [
    0.70, 0.27, 0.03, 0.01, 0.08, 0.02, 0.0005, 0.01, 0.0008, 0.01, 0.005, 0.001, 0.0008, 0.0002, 0.0001,
    0.02, 0.001,
];

/// Beyond this many thermal energies the Boltzmann factor underflows.
const MAX_ENERGY_OVER_T: f64 = 700.;


/// A solar model with analytic temperature and density profiles.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct AnalyticSolarModel {
    g_agamma: f64,
    g_ae: f64,
    opacity_code: OpacityCode,
}

impl Default for AnalyticSolarModel {
    fn default() -> Self {
        AnalyticSolarModel::new()
    }
}

impl AnalyticSolarModel {
    /// A model with couplings `g_agamma = 1e-10 GeV⁻¹` and `g_ae = 1e-13`,
    /// reporting Opacity Project opacities.
    pub fn new() -> Self {
        AnalyticSolarModel {
            g_agamma: 1e-16,
            g_ae: 1e-13,
            opacity_code: OpacityCode::OP,
        }
    }

    /// Set the couplings; `g_agamma` is in GeV⁻¹.
    pub fn with_couplings(mut self, g_agamma: f64, g_ae: f64) -> Self {
        self.g_agamma = 1e-6 * g_agamma;
        self.g_ae = g_ae;
        self
    }

    /// Set the reported opacity dataset.
    pub fn with_opacity_code(mut self, code: OpacityCode) -> Self {
        self.opacity_code = code;
        self
    }

    /// The electron density at radius `r`, in keV³.
    pub fn electron_density(&self, r: f64) -> f64 {
        6e25 * (-r / 0.15).exp() * KEV2CM.powi(3)
    }

    /// Bremsstrahlung-like rate shared by the free-free and opacity terms.
    fn free_free(&self, erg: f64, r: f64) -> f64 {
        let t = self.temperature_in_kev(r);
        let u = erg / t;

        if erg <= 0. || u > MAX_ENERGY_OVER_T {
            return 0.;
        }

        let n_e = self.electron_density(r);
        let prefactor = 8. * PI.sqrt() / (3. * 2_f64.sqrt());
        prefactor * (ALPHA * self.g_ae).powi(2) * n_e * (2. * n_e)
            / (t.sqrt() * MASS_ELECTRON_KEV.powf(3.5) * erg) * (-u).exp()
    }
}

impl SolarModel for AnalyticSolarModel {
    fn r_lo(&self) -> f64 {
        0.001
    }

    fn r_hi(&self) -> f64 {
        0.96
    }

    fn opacity_code(&self) -> OpacityCode {
        self.opacity_code
    }

    fn temperature_in_kev(&self, r: f64) -> f64 {
        1.35 * (-(r / 0.35).powi(2)).exp()
    }

    fn gamma_p_primakoff(&self, erg: f64, r: f64) -> f64 {
        let t = self.temperature_in_kev(r);
        let u = erg / t;

        if erg <= 0. || u > MAX_ENERGY_OVER_T {
            return 0.;
        }

        // Debye screening scale, electrons plus protons.
        let kappa_sq = 4. * PI * ALPHA * 2. * self.electron_density(r) / t;
        let x = 4. * erg * erg / kappa_sq;
        let screening = (1. + 1. / x) * x.ln_1p() - 1.;

        self.g_agamma.powi(2) * t * kappa_sq / (32. * PI) * screening * 2. / u.exp_m1()
    }

    fn gamma_p_compton(&self, erg: f64, r: f64) -> f64 {
        let u = erg / self.temperature_in_kev(r);

        if erg <= 0. || u > MAX_ENERGY_OVER_T {
            return 0.;
        }

        ALPHA * self.g_ae.powi(2) * erg * erg * self.electron_density(r)
            / (3. * MASS_ELECTRON_KEV.powi(2) * u.exp_m1())
    }

    fn gamma_p_opacity(&self, erg: f64, r: f64) -> f64 {
        metal_element_names().map(|el| self.gamma_p_opacity_element(erg, r, el)).sum()
    }

    fn gamma_p_opacity_element(&self, erg: f64, r: f64, element: &str) -> f64 {
        match OP_ELEMENT_NAMES.iter().position(|&name| name == element) {
            Some(i) => ELEMENT_WEIGHTS[i] * self.free_free(erg, r),
            None => 0.,
        }
    }

    fn gamma_p_ff(&self, erg: f64, r: f64) -> f64 {
        self.free_free(erg, r)
    }

    fn gamma_p_ee(&self, erg: f64, r: f64) -> f64 {
        self.free_free(erg, r) / 2_f64.sqrt()
    }

    fn gamma_p_all_electron(&self, erg: f64, r: f64) -> f64 {
        self.gamma_p_compton(erg, r) + self.gamma_p_ff(erg, r) + self.gamma_p_ee(erg, r)
            + self.gamma_p_opacity(erg, r)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use integrands::Process;

    #[test]
    fn rates_vanish_at_zero_energy() {
        let m = AnalyticSolarModel::new();

        for &r in &[0.001, 0.2, 0.9] {
            assert_eq!(m.gamma_p_primakoff(0., r), 0.);
            assert_eq!(m.gamma_p_compton(0., r), 0.);
            assert_eq!(m.gamma_p_all_electron(0., r), 0.);
        }
    }

    #[test]
    fn rates_positive_and_finite() {
        let m = AnalyticSolarModel::new();

        for &erg in &[0.1, 1., 3., 10.] {
            for &r in &[0.001, 0.1, 0.5, 0.96] {
                for v in &[m.gamma_p_primakoff(erg, r), m.gamma_p_compton(erg, r), m.gamma_p_all_electron(erg, r)] {
                    assert!(v.is_finite() && *v >= 0., "rate {} at erg {} r {}", v, erg, r);
                }
            }
        }

        assert!(m.gamma_p_primakoff(3., 0.1) > 0.);
    }

    #[test]
    fn opacity_codes_agree() {
        let op = AnalyticSolarModel::new();
        let opas = op.with_opacity_code(OpacityCode::OPAS);
        let a = Process::Opacity.rate(&op, 2., 0.2);
        let b = Process::Opacity.rate(&opas, 2., 0.2);
        assert!(a > 0.);
        assert_approx_eq!(a, b, 1e-12 * a);
    }

    #[test]
    fn unknown_element() {
        let m = AnalyticSolarModel::new();
        assert_eq!(m.gamma_p_opacity_element(2., 0.2, "Xx"), 0.);
        assert!(m.gamma_p_opacity_element(2., 0.2, "Fe") > 0.);
    }

    #[test]
    fn primakoff_scales_with_coupling_squared() {
        let a = AnalyticSolarModel::new();
        let b = AnalyticSolarModel::new().with_couplings(2e-10, 1e-13);
        assert_approx_eq!(b.gamma_p_primakoff(3., 0.1), 4. * a.gamma_p_primakoff(3., 0.1),
                          1e-12 * a.gamma_p_primakoff(3., 0.1));
    }
}
