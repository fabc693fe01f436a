// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/// Exercise the quadrature routines on integrals with known answers.

#[macro_use] extern crate clap;
extern crate solaxflux;

use solaxflux::quadrature::{CquadWorkspace, IntegrationRule, IntegrationWorkspace};
use std::f64;

// The closures capture their parameters so that each call builds a fresh
// integrand, as the flux integrators do.

fn cos_power(i: i32, rule: IntegrationRule) {
    let mut ws = IntegrationWorkspace::new(1024);

    let closure = |x: f64| { x.cos().powi(i) };

    println!("Sample: {}", closure(0.));

    let r = ws.qag(closure, 0., 0.5 * f64::consts::PI)
        .tolerance(0., 1e-6)
        .rule(rule)
        .compute()
        .unwrap();

    println!("QAG cos^{}:   Result: {}   Abs err: {}   Intervals: {}", i, r.value, r.abserr, r.intervals);
}

fn tangent_point(rad: f64, r_max: f64) {
    let mut ws = CquadWorkspace::new(200);

    let r = ws.cquad(|rho| rho / (rho * rho - rad * rad).sqrt(), rad, r_max)
        .tolerance(0., 1e-7)
        .compute()
        .unwrap();

    println!("CQUAD line of sight:   Result: {}   Expected: {}   Abs err: {}",
             r.value, (r_max * r_max - rad * rad).sqrt(), r.abserr);
}

fn main() {
    let matches = clap::Command::new("qag")
        .version(crate_version!())
        .about("Run the quadrature routines on known integrals")
        .arg(clap::Arg::new("POWER")
             .help("The power of cos(x) to integrate over [0, pi/2]")
             .default_value("2")
             .index(1))
        .arg(clap::Arg::new("gk15")
             .long("gk15")
             .help("Use the 15-point Gauss-Kronrod rule instead of the 21-point one")
             .action(clap::ArgAction::SetTrue))
        .get_matches();

    let power = match matches.get_one::<String>("POWER").map(|s| s.parse::<i32>()) {
        Some(Ok(p)) => p,
        _ => {
            eprintln!("error: POWER must be an integer");
            std::process::exit(1);
        },
    };

    let rule = if matches.get_flag("gk15") {
        IntegrationRule::GaussKonrod15
    } else {
        IntegrationRule::GaussKonrod21
    };

    cos_power(power, rule);
    tangent_point(0.3, 0.9);
}
