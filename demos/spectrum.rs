// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// Compute a solar axion spectrum for the analytic solar model and save it.

#[macro_use] extern crate clap;
#[macro_use] extern crate slog;
extern crate solaxflux;
extern crate solaxflux_test_support;

use solaxflux::{FluxCalculator, Process};
use solaxflux::analytic::AnalyticSolarModel;
use solaxflux::mc::energy_grid;
use std::process;
use std::str::FromStr;
use std::time::Instant;


fn parse<T: FromStr>(matches: &clap::ArgMatches, name: &str) -> T where T::Err: std::fmt::Display {
    let text = matches.get_one::<String>(name).map(|s| s.as_str()).unwrap_or("");

    match text.parse::<T>() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: cannot parse {} \"{}\": {}", name, text, e);
            process::exit(1);
        },
    }
}


fn main() {
    let matches = clap::Command::new("spectrum")
        .version(crate_version!())
        .about("Compute the solar axion spectrum of the analytic solar model")
        .arg(clap::Arg::new("OUTFILE")
             .help("The path of the output file to create")
             .required(true)
             .index(1))
        .arg(clap::Arg::new("PROCESS")
             .help("primakoff, compton, weighted-compton, opacity, opacity:<element>, ff-ee or axion-electron")
             .required(true)
             .index(2))
        .arg(clap::Arg::new("E_MIN")
             .help("The lowest energy, in keV")
             .default_value("0.5")
             .index(3))
        .arg(clap::Arg::new("E_MAX")
             .help("The highest energy, in keV")
             .default_value("10")
             .index(4))
        .arg(clap::Arg::new("E_STEP")
             .help("The energy step, in keV")
             .default_value("0.1")
             .index(5))
        .arg(clap::Arg::new("r-max")
             .long("r-max")
             .value_name("R")
             .help("Only accept axions from within this disc radius (solar radii)"))
        .arg(clap::Arg::new("g-agamma")
             .long("g-agamma")
             .value_name("G")
             .default_value("1e-10")
             .help("The axion-photon coupling, in GeV^-1"))
        .arg(clap::Arg::new("g-ae")
             .long("g-ae")
             .value_name("G")
             .default_value("1e-13")
             .help("The axion-electron coupling"))
        .get_matches();

    let log = solaxflux_test_support::default_log();
    let which: Process = parse(&matches, "PROCESS");
    let ergs = match energy_grid(parse(&matches, "E_MIN"), parse(&matches, "E_MAX"), parse(&matches, "E_STEP")) {
        Ok(g) => g,
        Err(e) => {
            crit!(log, "{}", e);
            process::exit(1);
        },
    };

    let model = AnalyticSolarModel::new().with_couplings(parse(&matches, "g-agamma"), parse(&matches, "g-ae"));
    let calc = FluxCalculator::new(&model, log.clone());
    let t0 = Instant::now();

    let spectrum = match matches.get_one::<String>("r-max") {
        Some(_) => calc.calculate_spectral_flux_solar_disc(&which, &ergs, parse(&matches, "r-max")),
        None => calc.calculate_spectral_flux(&which, &ergs),
    };

    let outfile = matches.get_one::<String>("OUTFILE").map(|s| s.as_str()).unwrap_or("");
    let result = spectrum.and_then(|s| calc.save(&s, outfile));

    if let Err(e) = result {
        crit!(log, "spectrum calculation failed"; "error" => %e);
        process::exit(1);
    }

    info!(log, "done"; "n" => ergs.len(), "elapsed_s" => t0.elapsed().as_secs_f64());
}
