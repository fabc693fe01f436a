// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// End-to-end checks of the integrators on the analytic solar model.

#[macro_use] extern crate assert_approx_eq;
extern crate solaxflux;
extern crate solaxflux_test_support;

use solaxflux::{FluxCalculator, FluxErrorKind, Process};
use solaxflux::analytic::AnalyticSolarModel;
use solaxflux::integrated_flux::integrated_flux_from_file;
use solaxflux::mc::{self, AxionMcGenerator};
use solaxflux::table::load_table;
use solaxflux_test_support::{quiet_log, scratch_path, seeded_rng, Sampler};
use std::fs;


#[test]
fn volume_spectrum_is_deterministic() {
    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, quiet_log());
    let mut rng = seeded_rng(1);
    let ergs = Sampler::new(true, 0.3, 12.).sorted(&mut rng, 8);

    let a = calc.calculate_spectral_flux(&Process::Primakoff, &ergs).unwrap();
    let b = calc.calculate_spectral_flux(&Process::Primakoff, &ergs).unwrap();
    assert_eq!(a, b);
    assert!(a.values.iter().all(|v| *v > 0.));
    assert!(a.errors.iter().all(|e| *e >= 0.));
}

#[test]
fn disc_converges_to_volume() {
    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, quiet_log());
    let ergs = [3.];
    let volume = calc.calculate_spectral_flux(&Process::Primakoff, &ergs).unwrap().values[0];

    let mut previous = 0.;

    for &r_max in &[0.1, 0.2, 0.4, 0.96] {
        let disc = calc.calculate_spectral_flux_solar_disc(&Process::Primakoff, &ergs, r_max).unwrap();
        let v = disc.values[0];
        assert!(v > previous, "disc flux not increasing at r_max = {}", r_max);
        assert!(v <= volume * (1. + 1e-4));
        previous = v;
    }

    assert_approx_eq!(previous, volume, 2e-4 * volume);
}

#[test]
fn window_from_file() {
    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, quiet_log());
    let ergs: Vec<f64> = (0..40).map(|i| 0.5 + 0.25 * i as f64).collect();
    let spectrum = calc.calculate_spectral_flux(&Process::Primakoff, &ergs).unwrap();
    let path = scratch_path("primakoff-window.dat");
    calc.save(&spectrum, &path).unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.columns.len(), 3);
    assert!(table.comments[0].contains("full solar volume"));

    let trapezoid: f64 = (4..12)
        .map(|i| 0.5 * 0.25 * (spectrum.values[i] + spectrum.values[i + 1]))
        .sum();
    let integral = integrated_flux_from_file(1.5, 3.5, &path, false).unwrap();
    let with_lines = integrated_flux_from_file(1.5, 3.5, &path, true).unwrap();
    let below = integrated_flux_from_file(0.4, 3.5, &path, false).unwrap_err();
    let above = integrated_flux_from_file(1.5, 11., &path, true).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert_approx_eq!(integral, trapezoid, 1e-3 * trapezoid);
    assert_approx_eq!(with_lines, trapezoid, 1e-3 * trapezoid);
    assert_eq!(below.kind(), FluxErrorKind::Range);
    assert_eq!(above.kind(), FluxErrorKind::Range);
}

#[test]
fn histogram_of_decreasing_spectrum() {
    let ergs: Vec<f64> = (0..501).map(|i| 0.01 * i as f64).collect();
    let flux: Vec<f64> = ergs.iter().map(|e| (-e).exp()).collect();
    let generator = AxionMcGenerator::from_spectrum(ergs, &flux).unwrap();

    const N: usize = 200_000;
    let mut rng = seeded_rng(42);
    let draws = generator.draw_axion_energies(&mut rng, N);
    let mut counts = [0_usize; 10];

    for e in draws {
        assert!(e >= 0. && e <= 5.);
        counts[((e / 0.5) as usize).min(9)] += 1;
    }

    let total = 1. - (-5_f64).exp();

    for (k, &count) in counts.iter().enumerate() {
        let lo = 0.5 * k as f64;
        let expected = N as f64 * ((-lo).exp() - (-(lo + 0.5)).exp()) / total;
        let sigma = expected.sqrt();
        assert!((count as f64 - expected).abs() < 5. * sigma,
                "bin {}: {} draws, expected {:.1}", k, count, expected);
    }
}

#[test]
fn generator_from_solar_model() {
    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, quiet_log());
    let generator = AxionMcGenerator::new(&calc, &Process::Primakoff, 0.5, 10., 0.5, 0.3).unwrap();
    let cdf = generator.cdf();

    assert_eq!(generator.energies().len(), 19);
    assert_eq!(cdf[0], 0.);
    assert_approx_eq!(cdf[cdf.len() - 1], 1., 1e-6);
    assert!(cdf.windows(2).all(|w| w[0] <= w[1]));

    let mut rng = seeded_rng(7);

    for e in generator.draw_axion_energies(&mut rng, 1000) {
        assert!(e >= 0.5 && e <= 9.5);
    }
}

#[test]
fn radial_tables_round_trip() {
    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, quiet_log());
    let ergs: Vec<f64> = (1..16).map(|i| 0.5 * i as f64).collect();
    let prefix = scratch_path("radial").to_string_lossy().into_owned();

    let built = mc::calculate_inverse_cdfs_from_solar_model(
        &calc, &Process::AxionElectron, &ergs, &[0.1, 0.2, 0.4], &prefix
    ).unwrap();
    assert_eq!(built.annuli().len(), 3);
    assert_eq!(built.edges()[0], 0.001);

    let mut rng = seeded_rng(11);
    let samples = mc::draw_mc_samples_from_file(&prefix, &mut rng, 2000).unwrap();

    fs::remove_file(format!("{}_radii.dat", prefix)).unwrap();
    for i in 0..3 {
        fs::remove_file(format!("{}_annulus_{:03}.dat", prefix, i)).unwrap();
    }

    assert_eq!(samples.len(), 2000);

    for (erg, radius) in samples {
        assert!(erg >= 0.5 && erg <= 7.5);
        assert!(radius >= 0.001 && radius <= 0.4);
    }
}

#[test]
fn radii_beyond_model_edge_share_one_annulus() {
    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, quiet_log());
    let ergs: Vec<f64> = (1..16).map(|i| 0.5 * i as f64).collect();
    let generator = mc::RadialMcGenerator::new(&calc, &Process::Primakoff, &ergs, &[0.5, 0.98, 1.0]).unwrap();

    assert_eq!(generator.edges(), &[0.001, 0.5, 0.96][..]);
    assert_eq!(generator.annuli().len(), 2);
    assert_eq!(generator.radial_cdf().len(), 3);
    assert_approx_eq!(generator.radial_cdf()[2], 1., 1e-12);

    let prefix = scratch_path("radial-clamped").to_string_lossy().into_owned();
    generator.save(&prefix).unwrap();
    let reloaded = mc::RadialMcGenerator::from_files(&prefix);

    fs::remove_file(format!("{}_radii.dat", prefix)).unwrap();
    for i in 0..2 {
        fs::remove_file(format!("{}_annulus_{:03}.dat", prefix, i)).unwrap();
    }

    assert_eq!(reloaded.unwrap().edges(), generator.edges());
}

#[test]
fn spectra_for_several_radii() {
    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, quiet_log());
    let root = scratch_path("radii").to_string_lossy().into_owned();
    let spectra = calc.save_spectral_flux_for_different_radii(
        &Process::Compton, &[1., 2.], &[0.2, 0.5], &root
    ).unwrap();

    assert_eq!(spectra.len(), 2);
    assert!(spectra[1].values[0] > spectra[0].values[0]);

    for i in 0..2 {
        let path = format!("{}_{:03}.dat", root, i);
        let table = load_table(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(table.columns[1], spectra[i].values);
    }
}
