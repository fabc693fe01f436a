// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! The production processes and the radial integrands built from them.

Every differential-flux integrand is a geometric weight times a process
rate. For the volume integral the weight is `0.5 (r erg / pi)²`; the disc
integrator applies the same weight in cylindrical coordinates.

*/

use std::fmt;
use std::str::FromStr;

use errors::FluxError;
use super::{metal_element_names, Isotope, SolarModel, PI};


/// A production process, or a fixed combination of them.
#[derive(Clone,Debug,Eq,Hash,PartialEq)]
pub enum Process {
    /// Primakoff conversion of photons in the plasma.
    Primakoff,

    /// Compton-like scattering.
    Compton,

    /// Compton-like scattering with the thermal correction factor
    /// `0.5 (1 - 1/(exp(erg/T) - 1))`.
    WeightedCompton,

    /// The opacity-derived contribution of all metals.
    Opacity,

    /// The opacity-derived contribution of a single element.
    OpacityElement(Isotope),

    /// Electron-ion plus electron-electron bremsstrahlung.
    FreeFreeAndElectronElectron,

    /// All processes driven by the axion-electron coupling.
    AxionElectron,
}

impl Process {
    /// The production rate of this process at energy `erg` and radius `r`.
    pub fn rate<M: SolarModel + ?Sized>(&self, model: &M, erg: f64, r: f64) -> f64 {
        match *self {
            Process::Primakoff => model.gamma_p_primakoff(erg, r),

            Process::Compton => model.gamma_p_compton(erg, r),

            Process::WeightedCompton => {
                if erg == 0. {
                    return 0.;
                }

                let u = erg / model.temperature_in_kev(r);
                0.5 * (1. - 1. / u.exp_m1()) * model.gamma_p_compton(erg, r)
            },

            Process::Opacity => {
                if model.opacity_code().is_element_resolved() {
                    metal_element_names()
                        .map(|el| model.gamma_p_opacity_element(erg, r, el))
                        .sum()
                } else {
                    model.gamma_p_opacity(erg, r)
                }
            },

            Process::OpacityElement(ref isotope) => model.gamma_p_opacity_element(erg, r, isotope.name()),

            Process::FreeFreeAndElectronElectron => model.gamma_p_ff(erg, r) + model.gamma_p_ee(erg, r),

            Process::AxionElectron => model.gamma_p_all_electron(erg, r),
        }
    }

    /// The integrand of the full-volume spectral flux at radius `r`.
    pub fn volume_integrand<M: SolarModel + ?Sized>(&self, model: &M, erg: f64, r: f64) -> f64 {
        0.5 * (r * erg / PI).powi(2) * self.rate(model, erg, r)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Process::Primakoff => f.write_str("Primakoff"),
            Process::Compton => f.write_str("Compton"),
            Process::WeightedCompton => f.write_str("weighted Compton"),
            Process::Opacity => f.write_str("metal opacity"),
            Process::OpacityElement(ref iso) => write!(f, "opacity ({})", iso),
            Process::FreeFreeAndElectronElectron => f.write_str("free-free and electron-electron"),
            Process::AxionElectron => f.write_str("axion-electron"),
        }
    }
}

impl FromStr for Process {
    type Err = FluxError;

    /// Parse a process name as used on command lines: `primakoff`,
    /// `compton`, `weighted-compton`, `opacity`, `opacity:<element>`,
    /// `ff-ee` or `axion-electron`. The element may carry a mass number,
    /// as in `opacity:He3`.
    fn from_str(s: &str) -> Result<Self, FluxError> {
        if s.starts_with("opacity:") {
            let element = &s["opacity:".len()..];

            if element.is_empty() {
                return Err(FluxError::range("missing element name after \"opacity:\""));
            }

            let split = element.find(|c: char| c.is_ascii_digit()).unwrap_or(element.len());
            let (name, digits) = element.split_at(split);

            if name.is_empty() {
                return Err(FluxError::range(format!("invalid element name \"{}\"", element)));
            }

            if digits.is_empty() {
                return Ok(Process::OpacityElement(Isotope::new(name)));
            }

            let a = digits.parse().map_err(|_| {
                FluxError::range(format!("invalid mass number in \"{}\"", element))
            })?;
            return Ok(Process::OpacityElement(Isotope::with_mass_number(name, a)));
        }

        match s {
            "primakoff" => Ok(Process::Primakoff),
            "compton" => Ok(Process::Compton),
            "weighted-compton" => Ok(Process::WeightedCompton),
            "opacity" => Ok(Process::Opacity),
            "ff-ee" => Ok(Process::FreeFreeAndElectronElectron),
            "axion-electron" => Ok(Process::AxionElectron),
            _ => Err(FluxError::range(format!("unknown process \"{}\"", s))),
        }
    }
}
