// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Linear interpolation of tabulated functions.

use std::path::Path;

use errors::{FluxError, FluxResult};
use table::load_table;


/// Find the `i` for which `table[i-1] < f <= table[i]`, in a non-decreasing
/// `table`. Returns `None` if `f` lies above the last entry. A value equal to
/// the first entry gives `Some(0)`.
///
/// Where the table has runs of equal entries, the first index of the run is
/// returned, so a flat stretch is never selected by any `f` other than its
/// own value.
pub fn bracket(table: &[f64], f: f64) -> Option<usize> {
    let i = table.partition_point(|&t| t < f);

    if i < table.len() {
        Some(i)
    } else {
        None
    }
}


/// A piecewise-linear interpolant through `(x, y)` samples.
#[derive(Clone,Debug,PartialEq)]
pub struct OneDInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl OneDInterpolator {
    /// Build an interpolant. `x` must be strictly increasing and the two
    /// sequences must have the same length, at least 2.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> FluxResult<Self> {
        if x.len() != y.len() {
            return Err(FluxError::range(format!(
                "interpolation table has {} abscissae but {} values", x.len(), y.len()
            )));
        }

        if x.len() < 2 {
            return Err(FluxError::range("interpolation table needs at least two points"));
        }

        if let Some(w) = x.windows(2).find(|w| !(w[0] < w[1])) {
            return Err(FluxError::range(format!(
                "interpolation abscissae must be strictly increasing; found {} followed by {}", w[0], w[1]
            )));
        }

        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(FluxError::range("interpolation table contains non-finite values"));
        }

        Ok(OneDInterpolator { x: x, y: y })
    }

    /// Build an interpolant from the first two columns of a table file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> FluxResult<Self> {
        let path = path.as_ref();
        let mut table = load_table(path)?;

        if table.columns.len() < 2 {
            return Err(FluxError::io(format!(
                "\"{}\" must have at least two columns to interpolate", path.display()
            )));
        }

        table.columns.truncate(2);
        let y = table.columns.pop().unwrap_or_default();
        let x = table.columns.pop().unwrap_or_default();

        OneDInterpolator::new(x, y).map_err(|e| {
            FluxError::range(format!("\"{}\": {}", path.display(), e.message()))
        })
    }

    /// The lowest tabulated abscissa.
    pub fn lower(&self) -> f64 {
        self.x[0]
    }

    /// The highest tabulated abscissa.
    pub fn upper(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Evaluate the interpolant. Outside `[lower(), upper()]` the edge values
    /// are returned.
    pub fn interpolate(&self, x: f64) -> f64 {
        match bracket(&self.x, x) {
            None => self.y[self.y.len() - 1],
            Some(0) => self.y[0],
            Some(i) => {
                let t = (x - self.x[i - 1]) / (self.x[i] - self.x[i - 1]);
                self.y[i - 1] + t * (self.y[i] - self.y[i - 1])
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use errors::FluxErrorKind;

    #[test]
    fn bracket_plateaus() {
        let cdf = [0., 0.25, 0.25, 0.25, 1.];
        assert_eq!(bracket(&cdf, 0.), Some(0));
        assert_eq!(bracket(&cdf, 0.1), Some(1));
        assert_eq!(bracket(&cdf, 0.25), Some(1));
        assert_eq!(bracket(&cdf, 0.2500001), Some(4));
        assert_eq!(bracket(&cdf, 1.), Some(4));
        assert_eq!(bracket(&cdf, 1.5), None);
    }

    #[test]
    fn linear_values() {
        let interp = OneDInterpolator::new(vec![1., 2., 4.], vec![10., 20., 0.]).unwrap();
        assert_eq!(interp.lower(), 1.);
        assert_eq!(interp.upper(), 4.);
        assert_approx_eq!(interp.interpolate(1.5), 15., 1e-12);
        assert_approx_eq!(interp.interpolate(3.), 10., 1e-12);
        assert_eq!(interp.interpolate(2.), 20.);
        assert_eq!(interp.interpolate(0.), 10.);
        assert_eq!(interp.interpolate(5.), 0.);
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(OneDInterpolator::new(vec![1.], vec![1.]).unwrap_err().kind(), FluxErrorKind::Range);
        assert_eq!(OneDInterpolator::new(vec![1., 1.], vec![1., 2.]).unwrap_err().kind(), FluxErrorKind::Range);
        assert_eq!(OneDInterpolator::new(vec![1., 2.], vec![1.]).unwrap_err().kind(), FluxErrorKind::Range);
    }
}
