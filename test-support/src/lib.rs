// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Helpers shared by the solaxflux tests, benchmarks and demo programs.

extern crate rand;
#[macro_use] extern crate slog;
extern crate slog_async;
extern crate slog_term;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use slog::Drain;
use std::env;
use std::path::PathBuf;

/// Create a simple `slog` logger for use in test programs.
///
/// It logs to the terminal using default parameters, as per the `slog` basic
/// example.
pub fn default_log() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain)
        .overflow_strategy(slog_async::OverflowStrategy::Block)
        .build().fuse();
    slog::Logger::root(drain, o!())
}

/// A logger that drops everything, for tests that only care about numbers.
pub fn quiet_log() -> slog::Logger {
    slog::Logger::root(slog::Discard, o!())
}

/// A reproducible random number generator.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A path in the temporary directory that is unique to this process, for
/// tables written during tests.
pub fn scratch_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("solaxflux-{}-{}", std::process::id(), name))
}


/// Samples numbers uniformly or log-uniformly between two bounds, e.g.
/// energies for spot checks.
pub struct Sampler {
    is_log: bool,
    low: f64,
    range: f64
}

impl Sampler {
    /// Create a new Sampler. The bounds may be given in either order.
    pub fn new(is_log: bool, mut low: f64, mut high: f64) -> Self {
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }

        if is_log {
            low = low.ln();
            high = high.ln();
        }

        Sampler { is_log: is_log, low: low, range: high - low }
    }

    /// Sample a number using `rng`.
    pub fn get<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let n = self.low + rng.gen::<f64>() * self.range;

        if self.is_log {
            n.exp()
        } else {
            n
        }
    }

    /// Sample `n` numbers and sort them, giving a valid energy grid.
    pub fn sorted<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        let mut v: Vec<f64> = (0..n).map(|_| self.get(rng)).collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        v.dedup();
        v
    }
}
