// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Fluxes integrated over energy windows of tabulated spectra.

use std::path::Path;

use config::FluxConfig;
use errors::{FluxError, FluxResult};
use interpolation::OneDInterpolator;
use quadrature::IntegrationWorkspace;


/// Energies (keV) of the narrow atomic lines that appear in spectra of
/// processes driven by the axion-electron coupling.
pub const AXION_ELECTRON_LINES: [f64; 32] = [
    0.653029, 0.779074, 0.920547, 0.956836, 1.02042, 1.05343, 1.3497, 1.40807,
    1.46949, 1.59487, 1.62314, 1.65075, 1.72461, 1.76286, 1.86037, 2.00007,
    2.45281, 2.61233, 3.12669, 3.30616, 3.88237, 4.08163, 5.64394, 5.76064,
    6.14217, 6.19863, 6.58874, 6.63942, 6.66482, 7.68441, 7.74104, 7.76785,
];


/// The sorted integration breakpoints for the window `[erg_lo, erg_hi]`:
/// the window edges, plus the lines that lie strictly inside it if
/// `include_lines` is set.
pub fn window_breakpoints(erg_lo: f64, erg_hi: f64, include_lines: bool) -> Vec<f64> {
    let mut points = vec![erg_lo];

    if include_lines {
        points.extend(AXION_ELECTRON_LINES.iter().cloned().filter(|&e| erg_lo < e && e < erg_hi));
    }

    points.push(erg_hi);
    points
}


/// Integrate a tabulated spectrum over `[erg_min, erg_max]`.
///
/// The spectrum is read from the first two columns of
/// `spectral_flux_file` and interpolated linearly. The window must lie
/// within the tabulated energies. If `includes_electron_interactions` is
/// set, the integral is split at the axion-electron lines inside the window.
pub fn integrated_flux_from_file<P: AsRef<Path>>(
    erg_min: f64, erg_max: f64, spectral_flux_file: P, includes_electron_interactions: bool
) -> FluxResult<f64> {
    let path = spectral_flux_file.as_ref();
    let spectral_flux = OneDInterpolator::from_file(path)?;

    if erg_min < spectral_flux.lower() || erg_max > spectral_flux.upper() {
        return Err(FluxError::range(format!(
            "integration window [{}, {}] keV is incompatible with the energies [{}, {}] keV in \"{}\"",
            erg_min, erg_max, spectral_flux.lower(), spectral_flux.upper(), path.display()
        )));
    }

    integrate_interpolated_flux(&spectral_flux, erg_min, erg_max, includes_electron_interactions,
                                FluxConfig::global())
}


/// Integrate an interpolated spectrum over `[erg_min, erg_max]` with the
/// window tolerances of `config`.
pub fn integrate_interpolated_flux(
    spectral_flux: &OneDInterpolator, erg_min: f64, erg_max: f64, include_lines: bool, config: &FluxConfig
) -> FluxResult<f64> {
    if !(erg_min < erg_max) {
        return Err(FluxError::range(format!("invalid energy window [{}, {}]", erg_min, erg_max)));
    }

    let f = |erg: f64| spectral_flux.interpolate(erg);
    let mut ws = IntegrationWorkspace::new(config.subdivision_limit);

    let result = if include_lines {
        ws.qagp(f, &window_breakpoints(erg_min, erg_max, true))
            .tolerance(config.window_abs_prec, config.window_rel_prec)
            .compute()?
    } else {
        ws.qag(f, erg_min, erg_max)
            .tolerance(config.window_abs_prec, config.window_rel_prec)
            .rule(config.rule)
            .compute()?
    };

    Ok(result.value)
}
