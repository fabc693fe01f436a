// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Spectral fluxes: integrals of production rates over the Sun.

The full-volume spectrum at energy `erg` is

```text
flux(erg) = F ∫_{r_lo}^{r_hi} dr 0.5 (r erg / pi)² rate(erg, r)
```

where `F` is the dimensional factor `FluxConfig::flux_factor`. The disc
spectrum only accepts axions whose line of sight passes within an impact
parameter `r_max` of the solar centre. In cylindrical coordinates it becomes
the nested integral

```text
flux(erg) = F ∫_{r_lo}^{r_max} d rad  rad ∫_{rad}^{r_max} d rho
              rho / sqrt(rho² - rad²) 0.5 (erg / pi)² rate(erg, rho)
```

The inner (line-of-sight) integrand diverges at the tangent point
`rho = rad`, so it is integrated with CQUAD, which tolerates the singular
endpoint. The outer integral is a plain QAG.

*/

use std::f64;
use std::path::Path;

use config::FluxConfig;
use errors::{FluxError, FluxResult};
use integrands::Process;
use quadrature::{CquadWorkspace, IntegrationResult, IntegrationWorkspace, QuadError};
use slog::Logger;
use table::Spectrum;
use super::{SolarModel, PI};


/// Column descriptions shared by all spectrum headers.
const SPECTRUM_COLUMNS: &str = "Columns: energy values [keV], axion flux [axions/cm^2 s keV], \
                                axion flux error estimate [axions/cm^2 s keV]";


/// Computes spectra and integrated fluxes for one solar model.
///
/// The calculator borrows the model read-only, so several calculators may
/// share a model across threads if it is `Sync`. Every integration allocates
/// its own quadrature workspace.
pub struct FluxCalculator<'a, M: 'a + SolarModel + ?Sized> {
    model: &'a M,
    logger: Logger,
    config: FluxConfig,
}

impl<'a, M: 'a + SolarModel + ?Sized> FluxCalculator<'a, M> {
    /// Create a calculator that uses the process-wide configuration.
    pub fn new(model: &'a M, logger: Logger) -> Self {
        FluxCalculator {
            model: model,
            logger: logger,
            config: *FluxConfig::global(),
        }
    }

    /// Replace the numerical configuration of this calculator.
    pub fn with_config(mut self, config: FluxConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &FluxConfig {
        &self.config
    }

    /// The solar model.
    pub fn model(&self) -> &'a M {
        self.model
    }

    /// The logger.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Compute the spectral flux of `process` over the full solar volume at
    /// each of `ergs`, which must be finite and strictly increasing.
    pub fn calculate_spectral_flux(&self, process: &Process, ergs: &[f64]) -> FluxResult<Spectrum> {
        check_energies(ergs)?;

        let mut ws = IntegrationWorkspace::new(self.config.subdivision_limit);
        let mut values = Vec::with_capacity(ergs.len());
        let mut errors = Vec::with_capacity(ergs.len());

        for &erg in ergs {
            let r = self.volume_integral(&mut ws, process, erg)?;
            debug!(self.logger, "volume spectral flux";
                   "process" => %process,
                   "erg" => erg,
                   "flux" => r.value,
                   "abserr" => r.abserr,
                   "intervals" => r.intervals,
            );
            values.push(r.value);
            errors.push(r.abserr);
        }

        Ok(Spectrum {
            ergs: ergs.to_vec(),
            values: values,
            errors: errors,
            header: format!(
                "Spectral flux over full solar volume by solaxflux ({} process). {}",
                process, SPECTRUM_COLUMNS
            ),
        })
    }

    /// Compute the spectral flux of `process` from within a projected disc
    /// of radius `r_max` (solar radii) at each of `ergs`. Radii above the
    /// model's `r_hi` are clamped to it.
    pub fn calculate_spectral_flux_solar_disc(
        &self, process: &Process, ergs: &[f64], r_max: f64
    ) -> FluxResult<Spectrum> {
        check_energies(ergs)?;

        if r_max.is_nan() {
            return Err(FluxError::range("disc radius is NaN"));
        }

        let r_lo = self.model.r_lo();
        let r_max = self.model.r_hi().min(r_max);

        if !(r_max > r_lo) {
            return Err(FluxError::range(format!(
                "disc radius {} must exceed the lowest model radius {}", r_max, r_lo
            )));
        }

        let mut outer_ws = IntegrationWorkspace::new(self.config.subdivision_limit);
        let mut inner_ws = CquadWorkspace::new(self.config.cquad_limit);
        let mut values = Vec::with_capacity(ergs.len());
        let mut errors = Vec::with_capacity(ergs.len());

        for &erg in ergs {
            let r = self.disc_integral(&mut outer_ws, &mut inner_ws, process, erg, r_max)?;
            debug!(self.logger, "disc spectral flux";
                   "process" => %process,
                   "erg" => erg,
                   "r_max" => r_max,
                   "flux" => r.value,
                   "abserr" => r.abserr,
                   "intervals" => r.intervals,
            );
            values.push(r.value);
            errors.push(r.abserr);
        }

        Ok(Spectrum {
            ergs: ergs.to_vec(),
            values: values,
            errors: errors,
            header: format!(
                "Spectral flux over solar disc, r in [{}, {}] R_sol by solaxflux ({} process). {}",
                r_lo, r_max, process, SPECTRUM_COLUMNS
            ),
        })
    }

    /// Compute disc spectra for each disc radius in `radii` and save them to
    /// `{output_root}_{index:03}.dat`.
    pub fn save_spectral_flux_for_different_radii(
        &self, process: &Process, ergs: &[f64], radii: &[f64], output_root: &str
    ) -> FluxResult<Vec<Spectrum>> {
        let mut spectra = Vec::with_capacity(radii.len());

        for (i, &r_max) in radii.iter().enumerate() {
            let spectrum = self.calculate_spectral_flux_solar_disc(process, ergs, r_max)?;
            self.save(&spectrum, format!("{}_{:03}.dat", output_root, i))?;
            spectra.push(spectrum);
        }

        Ok(spectra)
    }

    /// Save a spectrum as a table file.
    pub fn save<P: AsRef<Path>>(&self, spectrum: &Spectrum, path: P) -> FluxResult<()> {
        let path = path.as_ref();
        spectrum.save_to_file(path)?;
        info!(self.logger, "saved spectrum"; "path" => %path.display(), "n" => spectrum.len());
        Ok(())
    }

    /// Integrate the full-volume spectral flux of `process` over the energy
    /// window `[erg_lo, erg_hi]`, evaluating the spectrum on the fly.
    ///
    /// The result is multiplied by `FluxConfig::window_rescale` (1e20 by
    /// default). The energy integral is a single QAG with
    /// `FluxConfig::window_rule`; line splitting is only done for tabulated
    /// spectra, see `integrated_flux::integrated_flux_from_file`.
    pub fn integrated_flux(&self, process: &Process, erg_lo: f64, erg_hi: f64) -> FluxResult<f64> {
        if !(erg_lo.is_finite() && erg_hi.is_finite() && 0. <= erg_lo && erg_lo < erg_hi) {
            return Err(FluxError::range(format!(
                "invalid energy window [{}, {}]", erg_lo, erg_hi
            )));
        }

        let cfg = &self.config;
        let mut radial_ws = IntegrationWorkspace::new(cfg.subdivision_limit);
        let mut energy_ws = IntegrationWorkspace::new(cfg.window_subdivision_limit);
        let mut failure: Option<QuadError> = None;

        let spectral_flux = |erg: f64| -> f64 {
            if failure.is_some() {
                return f64::NAN;
            }

            match self.volume_integral(&mut radial_ws, process, erg) {
                Ok(r) => r.value,
                Err(e) => {
                    failure = Some(e);
                    f64::NAN
                },
            }
        };

        let result = energy_ws.qag(spectral_flux, erg_lo, erg_hi)
            .tolerance(cfg.window_abs_prec, cfg.window_rel_prec)
            .rule(cfg.window_rule)
            .compute();

        if let Some(e) = failure {
            return Err(e.into());
        }

        let result = result?;
        self.check_convergence("energy window", &result, cfg.window_abs_prec, cfg.window_rel_prec);

        debug!(self.logger, "integrated flux";
               "process" => %process,
               "erg_lo" => erg_lo,
               "erg_hi" => erg_hi,
               "flux" => result.value,
               "abserr" => result.abserr,
        );

        Ok(cfg.window_rescale * result.value)
    }

    /// The axion-electron flux integrated over `[erg_lo, erg_hi]`, in units
    /// of 1e-20 axions per cm² per second.
    pub fn calculate_flux(&self, erg_lo: f64, erg_hi: f64) -> FluxResult<f64> {
        self.integrated_flux(&Process::AxionElectron, erg_lo, erg_hi)
    }

    fn volume_integral(
        &self, ws: &mut IntegrationWorkspace, process: &Process, erg: f64
    ) -> Result<IntegrationResult, QuadError> {
        let cfg = &self.config;
        let model = self.model;

        let r = ws.qag(|r| process.volume_integrand(model, erg, r), model.r_lo(), model.r_hi())
            .tolerance(cfg.abs_prec, cfg.rel_prec)
            .rule(cfg.rule)
            .compute()?;

        self.check_convergence("volume", &r, cfg.abs_prec, cfg.rel_prec);

        Ok(IntegrationResult {
            value: cfg.flux_factor * r.value,
            abserr: cfg.flux_factor * r.abserr,
            intervals: r.intervals,
        })
    }

    fn disc_integral(
        &self, outer_ws: &mut IntegrationWorkspace, inner_ws: &mut CquadWorkspace,
        process: &Process, erg: f64, r_max: f64
    ) -> FluxResult<IntegrationResult> {
        let cfg = &self.config;
        let model = self.model;
        let (inner_abs, inner_rel) = cfg.inner_tolerance();
        let weight = 0.5 * (erg / PI).powi(2);
        let mut failure: Option<QuadError> = None;

        let impact_parameter_integrand = |rad: f64| -> f64 {
            if failure.is_some() {
                return f64::NAN;
            }

            let line_of_sight = inner_ws.cquad(|rho| {
                rho / (rho * rho - rad * rad).sqrt() * weight * process.rate(model, erg, rho)
            }, rad, r_max)
                .tolerance(inner_abs, inner_rel)
                .compute();

            match line_of_sight {
                Ok(r) => rad * r.value,
                Err(e) => {
                    failure = Some(e);
                    f64::NAN
                },
            }
        };

        let result = outer_ws.qag(impact_parameter_integrand, model.r_lo(), r_max)
            .tolerance(cfg.abs_prec, cfg.rel_prec)
            .rule(cfg.rule)
            .compute();

        if let Some(e) = failure {
            return Err(FluxError::numerical(format!(
                "line-of-sight integral at {} keV failed: {}", erg, e
            )));
        }

        let r = result?;
        self.check_convergence("disc", &r, cfg.abs_prec, cfg.rel_prec);

        Ok(IntegrationResult {
            value: cfg.flux_factor * r.value,
            abserr: cfg.flux_factor * r.abserr,
            intervals: r.intervals,
        })
    }

    fn check_convergence(&self, what: &str, r: &IntegrationResult, epsabs: f64, epsrel: f64) {
        let tolerance = epsabs.max(epsrel * r.value.abs());

        if r.abserr > tolerance {
            warn!(self.logger, "quadrature did not reach requested tolerance";
                  "integral" => what,
                  "value" => r.value,
                  "abserr" => r.abserr,
                  "tolerance" => tolerance,
                  "intervals" => r.intervals,
            );
        } else {
            trace!(self.logger, "quadrature converged";
                   "integral" => what,
                   "value" => r.value,
                   "abserr" => r.abserr,
                   "intervals" => r.intervals,
            );
        }
    }
}


/// Energies must be finite, non-negative and strictly increasing.
fn check_energies(ergs: &[f64]) -> FluxResult<()> {
    if let Some(&e) = ergs.iter().find(|e| !(e.is_finite() && **e >= 0.)) {
        return Err(FluxError::range(format!("invalid energy {} keV", e)));
    }

    if let Some(w) = ergs.windows(2).find(|w| !(w[0] < w[1])) {
        return Err(FluxError::range(format!(
            "energies must be strictly increasing; found {} followed by {}", w[0], w[1]
        )));
    }

    Ok(())
}
