// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Calculate the flux of axions produced in the Sun.

Axion-like particles are produced in the solar plasma by several processes:
Primakoff conversion of photons in the electric fields of charged particles,
Compton-like scattering, electron-ion and electron-electron bremsstrahlung,
and atomic recombination and de-excitation, which are captured through the
opacities of the solar model. This crate turns the production-rate densities
of a solar model into observables:

- energy-differential flux spectra, integrated over the full solar volume or
  over a projected disc of finite angular radius
  ([`FluxCalculator`](spectral_flux/struct.FluxCalculator.html));
- fluxes integrated over energy windows, either computed on the fly or from a
  previously tabulated spectrum
  ([`integrated_flux_from_file`](integrated_flux/fn.integrated_flux_from_file.html));
- inverse cumulative distributions for Monte Carlo sampling of axion energies
  and emission radii ([`mc`](mc/index.html)).

The solar model itself is an external collaborator, consumed through the
[`SolarModel`](trait.SolarModel.html) trait. Radii are in units of the solar
radius, energies in keV and fluxes in axions per cm² per second per keV.

*/

#![deny(missing_docs)]

#[cfg(test)] #[macro_use] extern crate assert_approx_eq;
extern crate rand;
#[macro_use] extern crate slog;

use std::f64;
use std::fmt;

pub mod analytic;
pub mod config;
pub mod errors;
pub mod integrands;
pub mod integrated_flux;
pub mod interpolation;
pub mod mc;
pub mod quadrature;
pub mod spectral_flux;
pub mod table;

pub use config::FluxConfig;
pub use errors::{FluxError, FluxErrorKind, FluxResult};
pub use integrands::Process;
pub use spectral_flux::FluxCalculator;

pub use f64::consts::PI;

/// The solar radius, in meters.
pub const RADIUS_SOL: f64 = 6.957e8;

/// The mean Earth–Sun distance, in meters.
pub const DISTANCE_SOL: f64 = 1.495978707e11;

/// The reduced Planck constant, in GeV seconds.
pub const HBAR: f64 = 6.582119569e-25;

/// The conversion factor from keV⁻¹ to cm (ħc in keV cm).
pub const KEV2CM: f64 = 1.97326979e-8;

/// The fine-structure constant.
pub const ALPHA: f64 = 1. / 137.035999084;

/// The mass of the electron, in keV.
pub const MASS_ELECTRON_KEV: f64 = 510.99895;


/// Which opacity dataset a solar model was built from. This changes how the
/// aggregate metal opacity is obtained: the Opacity Project tables are
/// resolved per element, the others only provide a single total.
#[derive(Clone,Copy,Debug,Eq,Hash,PartialEq)]
pub enum OpacityCode {
    /// The Opacity Project (OP) tables.
    OP,

    /// The OPAS tables.
    OPAS,

    /// The Los Alamos LEDCOP tables.
    LEDCOP,

    /// The Los Alamos ATOMIC tables.
    ATOMIC,
}

impl OpacityCode {
    /// Whether the dataset resolves opacities per element.
    pub fn is_element_resolved(&self) -> bool {
        *self == OpacityCode::OP
    }
}

impl fmt::Display for OpacityCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            OpacityCode::OP => "OP",
            OpacityCode::OPAS => "OPAS",
            OpacityCode::LEDCOP => "LEDCOP",
            OpacityCode::ATOMIC => "ATOMIC",
        };

        f.write_str(name)
    }
}


/// A chemical element, optionally with a mass number.
#[derive(Clone,Debug,Eq,Hash,PartialEq)]
pub struct Isotope {
    name: String,
    mass_number: Option<u32>,
}

impl Isotope {
    /// An element identified only by its symbol, e.g. `"Fe"`.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Isotope { name: name.into(), mass_number: None }
    }

    /// A specific isotope, e.g. `("He", 3)`.
    pub fn with_mass_number<S: Into<String>>(name: S, mass_number: u32) -> Self {
        Isotope { name: name.into(), mass_number: Some(mass_number) }
    }

    /// The element symbol.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mass number, if one was given.
    pub fn mass_number(&self) -> Option<u32> {
        self.mass_number
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.mass_number {
            Some(a) => write!(f, "{}{}", self.name, a),
            None => f.write_str(&self.name),
        }
    }
}


/// The elements covered by the Opacity Project tables, in table order.
pub const OP_ELEMENT_NAMES: [&str; 17] = [
    "H", "He", "C", "N", "O", "Ne", "Na", "Mg", "Al", "Si", "S", "Ar", "Ca", "Cr", "Mn", "Fe", "Ni",
];

/// Elements that never count as metals.
pub const LIGHT_ELEMENTS: [&str; 2] = ["H", "He"];

/// The Opacity Project elements that contribute to the aggregate metal
/// opacity: every tabulated element that is not in `LIGHT_ELEMENTS`.
pub fn metal_element_names() -> impl Iterator<Item = &'static str> {
    OP_ELEMENT_NAMES.iter().cloned().filter(|name| !LIGHT_ELEMENTS.contains(name))
}


/// A solar model, as seen by the flux integrators.
///
/// Rates are production-rate densities of axions per unit energy, in keV
/// units, evaluated at energy `erg` (keV) and radius `r` (solar radii). All
/// accessors are read-only, so a model can be shared between concurrent
/// calculations whenever the implementing type is `Sync`.
pub trait SolarModel {
    /// The lowest radius at which the model is valid.
    fn r_lo(&self) -> f64;

    /// The highest radius at which the model is valid.
    fn r_hi(&self) -> f64;

    /// The opacity dataset the model was built from.
    fn opacity_code(&self) -> OpacityCode;

    /// The plasma temperature at radius `r`, in keV.
    fn temperature_in_kev(&self, r: f64) -> f64;

    /// Primakoff production rate.
    fn gamma_p_primakoff(&self, erg: f64, r: f64) -> f64;

    /// Compton production rate.
    fn gamma_p_compton(&self, erg: f64, r: f64) -> f64;

    /// The aggregate opacity-derived production rate, for datasets that are
    /// not resolved per element.
    fn gamma_p_opacity(&self, erg: f64, r: f64) -> f64;

    /// The opacity-derived production rate due to a single element.
    fn gamma_p_opacity_element(&self, erg: f64, r: f64, element: &str) -> f64;

    /// Electron-ion bremsstrahlung production rate.
    fn gamma_p_ff(&self, erg: f64, r: f64) -> f64;

    /// Electron-electron bremsstrahlung production rate.
    fn gamma_p_ee(&self, erg: f64, r: f64) -> f64;

    /// The total rate of all processes involving the axion-electron
    /// coupling.
    fn gamma_p_all_electron(&self, erg: f64, r: f64) -> f64;
}

impl<'a, M: SolarModel + ?Sized> SolarModel for &'a M {
    fn r_lo(&self) -> f64 { (**self).r_lo() }
    fn r_hi(&self) -> f64 { (**self).r_hi() }
    fn opacity_code(&self) -> OpacityCode { (**self).opacity_code() }
    fn temperature_in_kev(&self, r: f64) -> f64 { (**self).temperature_in_kev(r) }
    fn gamma_p_primakoff(&self, erg: f64, r: f64) -> f64 { (**self).gamma_p_primakoff(erg, r) }
    fn gamma_p_compton(&self, erg: f64, r: f64) -> f64 { (**self).gamma_p_compton(erg, r) }
    fn gamma_p_opacity(&self, erg: f64, r: f64) -> f64 { (**self).gamma_p_opacity(erg, r) }
    fn gamma_p_opacity_element(&self, erg: f64, r: f64, element: &str) -> f64 {
        (**self).gamma_p_opacity_element(erg, r, element)
    }
    fn gamma_p_ff(&self, erg: f64, r: f64) -> f64 { (**self).gamma_p_ff(erg, r) }
    fn gamma_p_ee(&self, erg: f64, r: f64) -> f64 { (**self).gamma_p_ee(erg, r) }
    fn gamma_p_all_electron(&self, erg: f64, r: f64) -> f64 { (**self).gamma_p_all_electron(erg, r) }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_table_ordering() {
        assert_eq!(&OP_ELEMENT_NAMES[..2], &LIGHT_ELEMENTS[..]);
        assert_eq!(OP_ELEMENT_NAMES[15], "Fe");
    }

    #[test]
    fn metals_exclude_light_elements() {
        let metals: Vec<_> = metal_element_names().collect();
        assert_eq!(metals.len(), OP_ELEMENT_NAMES.len() - LIGHT_ELEMENTS.len());
        assert_eq!(metals[0], "C");
        assert!(!metals.contains(&"H"));
        assert!(!metals.contains(&"He"));
        assert!(metals.contains(&"Ni"));
    }

    #[test]
    fn isotope_names() {
        assert_eq!(Isotope::new("Fe").name(), "Fe");
        assert_eq!(Isotope::with_mass_number("He", 3).to_string(), "He3");
        assert_eq!(Isotope::new("O").mass_number(), None);
    }
}
