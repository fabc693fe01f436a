// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Monte Carlo sampling of axion energies and emission radii.

Energies are drawn by inversion sampling. A spectrum tabulated on an energy
grid is integrated with the trapezoidal rule into a cumulative sum, which
starts at exactly zero at the first grid point. Dividing by the total gives
a cumulative probability, and a uniform draw `u` is mapped back to an energy
by linear interpolation of the inverse.

The cumulative table may contain runs of equal values where the spectrum
vanishes. The inversion always brackets `u` as `cdf[i-1] < u <= cdf[i]`, so
such plateaus are never sampled.

*/

use std::path::Path;

use rand::Rng;

use errors::{FluxError, FluxResult};
use integrands::Process;
use interpolation::bracket;
use spectral_flux::FluxCalculator;
use table::{load_table, save_to_file};
use super::SolarModel;


/// Header key under which the normalisation is stored in saved tables.
const NORM_KEY: &str = "integrated_norm =";

/// The largest energy grid `energy_grid` will build.
const MAX_GRID_POINTS: f64 = 1e7;


/// The uniform grid `omega_min + i omega_delta` for
/// `i < floor((omega_max - omega_min) / omega_delta)`.
pub fn energy_grid(omega_min: f64, omega_max: f64, omega_delta: f64) -> FluxResult<Vec<f64>> {
    if !(omega_delta > 0. && omega_min.is_finite() && omega_max.is_finite()) {
        return Err(FluxError::range(format!(
            "invalid energy grid: [{}, {}] with step {}", omega_min, omega_max, omega_delta
        )));
    }

    let n = ((omega_max - omega_min) / omega_delta).floor();

    if !(n >= 2.) {
        return Err(FluxError::range(format!(
            "energy grid [{}, {}] with step {} has fewer than two points", omega_min, omega_max, omega_delta
        )));
    }

    if n > MAX_GRID_POINTS {
        return Err(FluxError::range(format!(
            "energy grid [{}, {}] with step {} has more than {} points",
            omega_min, omega_max, omega_delta, MAX_GRID_POINTS
        )));
    }

    Ok((0..n as usize).map(|i| omega_min + i as f64 * omega_delta).collect())
}


/// Samples axion energies from a tabulated spectrum.
#[derive(Clone,Debug,PartialEq)]
pub struct AxionMcGenerator {
    ergs: Vec<f64>,
    cdf: Vec<f64>,
    integrated_norm: Option<f64>,
}

impl AxionMcGenerator {
    /// Compute the spectrum of `process` on the grid given by `energy_grid`
    /// and build a generator from it.
    ///
    /// If `r_max < 1` the spectrum comes from the disc of that radius;
    /// otherwise the full disc is used.
    pub fn new<M: SolarModel + ?Sized>(
        calc: &FluxCalculator<M>, process: &Process, omega_min: f64, omega_max: f64,
        omega_delta: f64, r_max: f64
    ) -> FluxResult<Self> {
        let ergs = energy_grid(omega_min, omega_max, omega_delta)?;
        let spectrum = calc.calculate_spectral_flux_solar_disc(process, &ergs, r_max.min(1.))?;
        AxionMcGenerator::from_spectrum(spectrum.ergs, &spectrum.values)
    }

    /// Build a generator from a spectrum tabulated at strictly increasing
    /// energies. The flux must be finite and non-negative with a positive
    /// integral.
    pub fn from_spectrum(ergs: Vec<f64>, flux: &[f64]) -> FluxResult<Self> {
        let cumulative = cumulative_trapezoid(&ergs, flux)?;
        let integrated_norm = cumulative[cumulative.len() - 1];

        if !(integrated_norm > 0. && integrated_norm.is_finite()) {
            return Err(FluxError::range(format!(
                "cannot sample a spectrum whose integral is {}", integrated_norm
            )));
        }

        let cdf = cumulative.iter().map(|c| c / integrated_norm).collect();

        Ok(AxionMcGenerator {
            ergs: ergs,
            cdf: cdf,
            integrated_norm: Some(integrated_norm),
        })
    }

    /// Build a generator from an existing inverse-CDF table.
    pub fn from_inv_cdf(cdf: Vec<f64>, ergs: Vec<f64>, integrated_norm: Option<f64>) -> FluxResult<Self> {
        if cdf.len() != ergs.len() || cdf.len() < 2 {
            return Err(FluxError::range("inverse-CDF table needs two equal-length columns of at least two rows"));
        }

        if cdf[0] != 0. || (cdf[cdf.len() - 1] - 1.).abs() > 1e-6 {
            return Err(FluxError::range("cumulative probabilities must run from 0 to 1"));
        }

        if cdf.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(FluxError::range("cumulative probabilities must be non-decreasing"));
        }

        if ergs.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(FluxError::range("inverse-CDF energies must be strictly increasing"));
        }

        Ok(AxionMcGenerator { ergs: ergs, cdf: cdf, integrated_norm: integrated_norm })
    }

    /// Load a table written by `save_inv_cdf_to_file`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> FluxResult<Self> {
        let path = path.as_ref();
        let mut table = load_table(path)?;

        if table.columns.len() != 2 {
            return Err(FluxError::io(format!(
                "\"{}\" should have two columns, found {}", path.display(), table.columns.len()
            )));
        }

        let integrated_norm = parse_norm(&table.comments);
        let ergs = table.columns.pop().unwrap_or_default();
        let cdf = table.columns.pop().unwrap_or_default();

        AxionMcGenerator::from_inv_cdf(cdf, ergs, integrated_norm).map_err(|e| {
            FluxError::range(format!("\"{}\": {}", path.display(), e.message()))
        })
    }

    /// Save the cumulative probabilities and energies as a two-column table.
    pub fn save_inv_cdf_to_file<P: AsRef<Path>>(&self, path: P) -> FluxResult<()> {
        let mut comment = "Inverse CDF of the axion energy by solaxflux. \
                           Columns: cumulative probability, energy [keV]".to_owned();

        if let Some(norm) = self.integrated_norm {
            comment.push_str(&format!("\n{} {:.16e}", NORM_KEY, norm));
        }

        save_to_file(path, &[&self.cdf, &self.ergs], &comment)
    }

    /// The energy grid.
    pub fn energies(&self) -> &[f64] {
        &self.ergs
    }

    /// The cumulative probability at each grid energy.
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// The integral of the source spectrum over the grid, if known.
    pub fn integrated_norm(&self) -> Option<f64> {
        self.integrated_norm
    }

    /// Map a probability `u` in [0, 1] to an energy.
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        let u = u.max(0.).min(1.);

        match bracket(&self.cdf, u) {
            None => self.ergs[self.ergs.len() - 1],
            Some(0) => self.ergs[0],
            Some(i) => {
                let t = (u - self.cdf[i - 1]) / (self.cdf[i] - self.cdf[i - 1]);
                self.ergs[i - 1] + t * (self.ergs[i] - self.ergs[i - 1])
            },
        }
    }

    /// Draw `n` energies.
    pub fn draw_axion_energies<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.inverse_cdf(rng.gen::<f64>())).collect()
    }
}


/// Trapezoidal running integral of `flux` over `ergs`, starting at 0.
fn cumulative_trapezoid(ergs: &[f64], flux: &[f64]) -> FluxResult<Vec<f64>> {
    if ergs.len() != flux.len() || ergs.len() < 2 {
        return Err(FluxError::range("spectrum needs two equal-length sequences of at least two samples"));
    }

    if ergs.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(FluxError::range("spectrum energies must be strictly increasing"));
    }

    if let Some(f) = flux.iter().find(|f| !(f.is_finite() && **f >= 0.)) {
        return Err(FluxError::range(format!("cannot sample a spectrum containing flux value {}", f)));
    }

    let mut cumulative = Vec::with_capacity(flux.len());
    let mut norm = 0.;
    cumulative.push(norm);

    for i in 1..flux.len() {
        norm += 0.5 * (ergs[i] - ergs[i - 1]) * (flux[i] + flux[i - 1]);
        cumulative.push(norm);
    }

    Ok(cumulative)
}


fn parse_norm(comments: &[String]) -> Option<f64> {
    comments.iter()
        .filter_map(|c| if c.starts_with(NORM_KEY) { Some(&c[NORM_KEY.len()..]) } else { None })
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .next()
}


/// Samples emission radii and energies jointly.
///
/// The disc of each outer radius is split into annuli. Each annulus gets its
/// own energy generator, built from the difference of the disc spectra at
/// its edges, and the annuli are chosen in proportion to their integrated
/// flux.
#[derive(Clone,Debug,PartialEq)]
pub struct RadialMcGenerator {
    edges: Vec<f64>,
    radial_cdf: Vec<f64>,
    annuli: Vec<AxionMcGenerator>,
}

impl RadialMcGenerator {
    /// Compute disc spectra of `process` at `ergs` for each of the strictly
    /// increasing disc radii `radii` and build the generator. The innermost
    /// annulus extends down to the model's `r_lo`. Radii are clamped to the
    /// model's `r_hi`; those that coincide with the previous edge after
    /// clamping add no annulus.
    pub fn new<M: SolarModel + ?Sized>(
        calc: &FluxCalculator<M>, process: &Process, ergs: &[f64], radii: &[f64]
    ) -> FluxResult<Self> {
        if radii.is_empty() || radii.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(FluxError::range("disc radii must be a non-empty, strictly increasing sequence"));
        }

        let r_lo = calc.model().r_lo();
        let r_hi = calc.model().r_hi();
        let mut edges = vec![r_lo];
        let mut annuli = Vec::with_capacity(radii.len());
        let mut norms = Vec::with_capacity(radii.len());
        let mut inner = vec![0.; ergs.len()];

        for &r_max in radii {
            let r_max = r_max.min(r_hi);

            if edges.len() > 1 && r_max <= edges[edges.len() - 1] {
                debug!(calc.logger(), "skipping disc radius beyond the model"; "r_max" => r_max);
                continue;
            }

            let disc = calc.calculate_spectral_flux_solar_disc(process, ergs, r_max)?;

            // Quadrature noise can make a thin annulus slightly negative.
            let annulus: Vec<f64> = disc.values.iter()
                .zip(inner.iter())
                .map(|(o, i)| (o - i).max(0.))
                .collect();

            let generator = AxionMcGenerator::from_spectrum(ergs.to_vec(), &annulus).map_err(|e| {
                FluxError::range(format!("annulus [{}, {}]: {}", edges[edges.len() - 1], r_max, e.message()))
            })?;

            norms.push(generator.integrated_norm().unwrap_or(0.));
            annuli.push(generator);
            edges.push(r_max);
            inner = disc.values;
        }

        let total: f64 = norms.iter().sum();
        let mut radial_cdf = vec![0.];
        let mut running = 0.;

        for n in &norms {
            running += n;
            radial_cdf.push(running / total);
        }

        debug!(calc.logger(), "built radial MC generator";
               "process" => %process,
               "n_annuli" => annuli.len(),
               "total_norm" => total,
        );

        Ok(RadialMcGenerator { edges: edges, radial_cdf: radial_cdf, annuli: annuli })
    }

    /// The annulus edges, starting at the innermost radius.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// The cumulative probability of the emission radius at each edge.
    pub fn radial_cdf(&self) -> &[f64] {
        &self.radial_cdf
    }

    /// The energy generator of each annulus.
    pub fn annuli(&self) -> &[AxionMcGenerator] {
        &self.annuli
    }

    /// Map two probabilities to an `(energy, radius)` pair.
    pub fn sample(&self, u_radius: f64, u_energy: f64) -> (f64, f64) {
        let u = u_radius.max(0.).min(1.);
        let k = match bracket(&self.radial_cdf, u) {
            None => self.annuli.len(),
            Some(0) => 1,
            Some(k) => k,
        };

        let width = self.radial_cdf[k] - self.radial_cdf[k - 1];
        let t = if width > 0. { (u - self.radial_cdf[k - 1]) / width } else { 0. };
        let radius = self.edges[k - 1] + t.max(0.).min(1.) * (self.edges[k] - self.edges[k - 1]);

        (self.annuli[k - 1].inverse_cdf(u_energy), radius)
    }

    /// Draw `n` `(energy, radius)` pairs.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<(f64, f64)> {
        (0..n).map(|_| {
            let u_radius = rng.gen::<f64>();
            let u_energy = rng.gen::<f64>();
            self.sample(u_radius, u_energy)
        }).collect()
    }

    /// Save the radial table to `{prefix}_radii.dat` and the annulus tables
    /// to `{prefix}_annulus_{index:03}.dat`.
    pub fn save(&self, prefix: &str) -> FluxResult<()> {
        save_to_file(
            format!("{}_radii.dat", prefix),
            &[&self.radial_cdf, &self.edges],
            "Radial CDF of the axion emission by solaxflux. Columns: cumulative probability, radius [R_sol]",
        )?;

        for (i, annulus) in self.annuli.iter().enumerate() {
            annulus.save_inv_cdf_to_file(format!("{}_annulus_{:03}.dat", prefix, i))?;
        }

        Ok(())
    }

    /// Load tables written by `save`.
    pub fn from_files(prefix: &str) -> FluxResult<Self> {
        let radial_path = format!("{}_radii.dat", prefix);
        let mut table = load_table(&radial_path)?;

        if table.columns.len() != 2 || table.len() < 2 {
            return Err(FluxError::io(format!("\"{}\" is not a radial CDF table", radial_path)));
        }

        let edges = table.columns.pop().unwrap_or_default();
        let radial_cdf = table.columns.pop().unwrap_or_default();

        if radial_cdf[0] != 0. || radial_cdf.windows(2).any(|w| !(w[0] <= w[1]))
            || edges.windows(2).any(|w| !(w[0] < w[1]))
        {
            return Err(FluxError::range(format!("\"{}\" is not a valid radial CDF", radial_path)));
        }

        let annuli = (0..edges.len() - 1)
            .map(|i| AxionMcGenerator::from_file(format!("{}_annulus_{:03}.dat", prefix, i)))
            .collect::<FluxResult<Vec<_>>>()?;

        Ok(RadialMcGenerator { edges: edges, radial_cdf: radial_cdf, annuli: annuli })
    }
}


/// Build a radial generator for `process` and save its tables under
/// `save_output_prefix`.
pub fn calculate_inverse_cdfs_from_solar_model<M: SolarModel + ?Sized>(
    calc: &FluxCalculator<M>, process: &Process, ergs: &[f64], radii: &[f64], save_output_prefix: &str
) -> FluxResult<RadialMcGenerator> {
    let generator = RadialMcGenerator::new(calc, process, ergs, radii)?;
    generator.save(save_output_prefix)?;
    info!(calc.logger(), "saved inverse CDF tables"; "prefix" => save_output_prefix);
    Ok(generator)
}


/// Draw `n` `(energy, radius)` pairs from tables saved under
/// `mc_file_prefix`.
pub fn draw_mc_samples_from_file<R: Rng + ?Sized>(
    mc_file_prefix: &str, rng: &mut R, n: usize
) -> FluxResult<Vec<(f64, f64)>> {
    Ok(RadialMcGenerator::from_files(mc_file_prefix)?.draw(rng, n))
}


#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use super::*;
    use errors::FluxErrorKind;

    #[test]
    fn grid_size() {
        let g = energy_grid(1., 2., 0.25).unwrap();
        assert_eq!(g, vec![1., 1.25, 1.5, 1.75]);
        assert_eq!(energy_grid(1., 1.3, 0.25).unwrap_err().kind(), FluxErrorKind::Range);
        assert_eq!(energy_grid(1., 2., 0.).unwrap_err().kind(), FluxErrorKind::Range);
        assert_eq!(energy_grid(1., 2., -0.1).unwrap_err().kind(), FluxErrorKind::Range);
        assert_eq!(energy_grid(0., 1e300, 1e-300).unwrap_err().kind(), FluxErrorKind::Range);
        assert_eq!(energy_grid(0., 1., 1e-9).unwrap_err().kind(), FluxErrorKind::Range);
    }

    #[test]
    fn cdf_properties() {
        let ergs: Vec<f64> = (0..50).map(|i| 0.5 + 0.2 * i as f64).collect();
        let flux: Vec<f64> = ergs.iter().map(|e| e * e * (-e).exp()).collect();
        let g = AxionMcGenerator::from_spectrum(ergs, &flux).unwrap();

        assert_eq!(g.cdf()[0], 0.);
        assert_approx_eq!(g.cdf()[g.cdf().len() - 1], 1., 1e-12);
        assert!(g.cdf().windows(2).all(|w| w[0] <= w[1]));
        assert!(g.integrated_norm().unwrap() > 0.);
    }

    #[test]
    fn trapezoid_values() {
        let g = AxionMcGenerator::from_spectrum(vec![0., 1., 2.], &[1., 1., 3.]).unwrap();
        assert_eq!(g.integrated_norm(), Some(3.));
        assert_approx_eq!(g.cdf()[1], 1. / 3., 1e-15);
        assert_approx_eq!(g.inverse_cdf(1. / 6.), 0.5, 1e-12);
        assert_eq!(g.inverse_cdf(0.), 0.);
        assert_eq!(g.inverse_cdf(1.), 2.);
    }

    #[test]
    fn plateaus_are_never_sampled() {
        // No flux between 2 and 4 keV.
        let ergs = vec![0., 1., 2., 3., 4., 5.];
        let flux = [1., 1., 0., 0., 0., 1.];
        let g = AxionMcGenerator::from_spectrum(ergs, &flux).unwrap();
        let mut rng = StdRng::seed_from_u64(20180101);

        for e in g.draw_axion_energies(&mut rng, 10_000) {
            assert!(e <= 2. || e >= 4., "sampled {} inside the gap", e);
        }
    }

    #[test]
    fn rejects_unsamplable_spectra() {
        let ergs = vec![0., 1., 2.];
        assert_eq!(AxionMcGenerator::from_spectrum(ergs.clone(), &[0., 0., 0.]).unwrap_err().kind(),
                   FluxErrorKind::Range);
        assert_eq!(AxionMcGenerator::from_spectrum(ergs.clone(), &[1., -1., 0.]).unwrap_err().kind(),
                   FluxErrorKind::Range);
        assert_eq!(AxionMcGenerator::from_spectrum(vec![0., 2., 1.], &[1., 1., 1.]).unwrap_err().kind(),
                   FluxErrorKind::Range);
    }

    #[test]
    fn inv_cdf_file_keeps_norm() {
        let path = env::temp_dir().join(format!("solaxflux-invcdf-{}.dat", ::std::process::id()));
        let g = AxionMcGenerator::from_spectrum(vec![1., 2., 3., 4.], &[4., 3., 2., 1.]).unwrap();
        g.save_inv_cdf_to_file(&path).unwrap();
        let h = AxionMcGenerator::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(h.integrated_norm(), g.integrated_norm());
        assert_eq!(h.energies(), g.energies());
        assert_approx_eq!(h.inverse_cdf(0.3), g.inverse_cdf(0.3), 1e-12);
    }

    #[test]
    fn radial_sample_edges() {
        let annulus = AxionMcGenerator::from_spectrum(vec![1., 2.], &[1., 1.]).unwrap();
        let gen = RadialMcGenerator {
            edges: vec![0., 0.1, 0.3],
            radial_cdf: vec![0., 0.25, 1.],
            annuli: vec![annulus.clone(), annulus],
        };

        assert_eq!(gen.sample(0., 0.5), (1.5, 0.));
        let (_, r) = gen.sample(0.125, 0.);
        assert_approx_eq!(r, 0.05, 1e-12);
        let (_, r) = gen.sample(0.625, 0.);
        assert_approx_eq!(r, 0.2, 1e-12);
        let (e, r) = gen.sample(1., 1.);
        assert_eq!(e, 2.);
        assert_approx_eq!(r, 0.3, 1e-12);
    }
}
