// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// Draw Monte Carlo axion energies, and optionally emission radii, for the
/// analytic solar model.

#[macro_use] extern crate clap;
#[macro_use] extern crate slog;
extern crate solaxflux;
extern crate solaxflux_test_support;

use solaxflux::{FluxCalculator, FluxResult, Process};
use solaxflux::analytic::AnalyticSolarModel;
use solaxflux::mc::{self, AxionMcGenerator};
use solaxflux_test_support::seeded_rng;
use std::process;


fn run(matches: &clap::ArgMatches) -> FluxResult<()> {
    let log = solaxflux_test_support::default_log();
    let process: Process = matches.get_one::<String>("PROCESS").map(|s| s.as_str()).unwrap_or("").parse()?;
    let n = matches.get_one::<usize>("N").cloned().unwrap_or(10);
    let seed = matches.get_one::<u64>("seed").cloned().unwrap_or(0);
    let mut rng = seeded_rng(seed);

    let model = AnalyticSolarModel::new();
    let calc = FluxCalculator::new(&model, log.clone());

    match matches.get_many::<f64>("radii") {
        Some(radii) => {
            let radii: Vec<f64> = radii.cloned().collect();
            let ergs = mc::energy_grid(0.5, 10., 0.25)?;
            let prefix = matches.get_one::<String>("save").cloned();

            let generator = match prefix {
                Some(ref p) => mc::calculate_inverse_cdfs_from_solar_model(&calc, &process, &ergs, &radii, p)?,
                None => mc::RadialMcGenerator::new(&calc, &process, &ergs, &radii)?,
            };

            for (erg, radius) in generator.draw(&mut rng, n) {
                println!("{:.6}\t{:.6}", erg, radius);
            }
        },

        None => {
            let generator = AxionMcGenerator::new(&calc, &process, 0.5, 10., 0.25, 1.)?;
            info!(log, "built energy generator"; "integrated_norm" => generator.integrated_norm().unwrap_or(0.));

            if let Some(p) = matches.get_one::<String>("save") {
                generator.save_inv_cdf_to_file(p)?;
            }

            for erg in generator.draw_axion_energies(&mut rng, n) {
                println!("{:.6}", erg);
            }
        },
    }

    Ok(())
}

fn main() {
    let matches = clap::Command::new("mc-draw")
        .version(crate_version!())
        .about("Draw Monte Carlo solar axion energies for the analytic solar model")
        .arg(clap::Arg::new("PROCESS")
             .help("primakoff, compton, weighted-compton, opacity, opacity:<element>, ff-ee or axion-electron")
             .required(true)
             .index(1))
        .arg(clap::Arg::new("N")
             .help("How many samples to draw")
             .default_value("10")
             .value_parser(clap::value_parser!(usize))
             .index(2))
        .arg(clap::Arg::new("seed")
             .long("seed")
             .value_name("SEED")
             .default_value("0")
             .value_parser(clap::value_parser!(u64))
             .help("The random number seed"))
        .arg(clap::Arg::new("radii")
             .long("radii")
             .value_name("R")
             .num_args(1..)
             .value_parser(clap::value_parser!(f64))
             .help("Also draw emission radii, using annuli with these outer radii (solar radii)"))
        .arg(clap::Arg::new("save")
             .long("save")
             .value_name("PATH")
             .help("Save the inverse CDF table(s) to this path (or prefix, with --radii)"))
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
