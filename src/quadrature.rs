// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

/*! Adaptive one-dimensional quadrature.

The interface follows the GSL integration routines: a workspace bounds the
number of subintervals, and a builder configures the tolerances and rule
before `compute()` runs the integration. Three integrators are provided:

- QAG: globally adaptive Gauss–Kronrod bisection.
- QAGP: QAG started from a caller-supplied set of breakpoints, for integrands
  with known sharp features.
- CQUAD: doubly adaptive Clenshaw–Curtis (rule degree first, then
  bisection). Non-finite function values are dropped rather than reported,
  which makes it suitable for integrable endpoint singularities.

Running out of subintervals is not an error. The best estimate is returned
along with its error estimate, and the caller decides whether that is good
enough.

*/

use std::f64;
use std::fmt;
use std::error::Error;


/// Why a quadrature failed.
#[derive(Clone,Copy,Debug,PartialEq)]
pub enum QuadError {
    /// The integrand returned a non-finite value at the given abscissa.
    NonFinite(f64),

    /// The requested tolerances cannot be met even in principle.
    BadTolerance,
}

impl fmt::Display for QuadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QuadError::NonFinite(x) => write!(f, "integrand is not finite at x = {:e}", x),
            QuadError::BadTolerance => write!(f, "tolerance cannot be achieved with given epsabs and epsrel"),
        }
    }
}

impl Error for QuadError {}

/// Shorthand for quadrature results.
pub type QuadResult<T> = Result<T, QuadError>;


/// The outcome of a successful integration.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct IntegrationResult {
    /// The estimated value of the integral.
    pub value: f64,

    /// The estimated absolute error.
    pub abserr: f64,

    /// How many subintervals the integrator ended up using.
    pub intervals: usize,
}


/// The Gauss–Kronrod rule used by QAG.
#[derive(Clone,Copy,Debug,Eq,Hash,PartialEq)]
pub enum IntegrationRule {
    /// 7-point Gauss, 15-point Kronrod.
    GaussKonrod15,

    /// 10-point Gauss, 21-point Kronrod.
    GaussKonrod21,
}

struct KronrodRule {
    xgk: &'static [f64],
    wgk: &'static [f64],
    wg: &'static [f64],
}

const GK15: KronrodRule = KronrodRule {
    xgk: &[
        0.991455371120812639206854697526329,
        0.949107912342758524526189684047851,
        0.864864423359769072789712788640926,
        0.741531185599394439863864773280788,
        0.586087235467691130294144845693013,
        0.405845151377397166906606412076961,
        0.207784955007898467600689403773245,
        0.000000000000000000000000000000000,
    ],
    wgk: &[
        0.022935322010529224963732008058970,
        0.063092092629978553290700663189204,
        0.104790010322250183839876322541518,
        0.140653259715525918745189590510238,
        0.169004726639267902826583426598550,
        0.190350578064785409913256402421014,
        0.204432940075298892414161999234649,
        0.209482141084727828012999174891714,
    ],
    wg: &[
        0.129484966168869693270611432679082,
        0.279705391489276667901467771423780,
        0.381830050505118944950369775488975,
        0.417959183673469387755102040816327,
    ],
};

const GK21: KronrodRule = KronrodRule {
    xgk: &[
        0.995657163025808080735527280689003,
        0.973906528517171720077964012084452,
        0.930157491355708226001207180059508,
        0.865063366688984510732096688423493,
        0.780817726586416897063717578345042,
        0.679409568299024406234327365114874,
        0.562757134668604683339000099272694,
        0.433395394129247190799265943165784,
        0.294392862701460198131126603103866,
        0.148874338981631210884826001129720,
        0.000000000000000000000000000000000,
    ],
    wgk: &[
        0.011694638867371874278064396062192,
        0.032558162307964727478818972459390,
        0.054755896574351996031381300244580,
        0.075039674810919952767043140916190,
        0.093125454583697605535065465083366,
        0.109387158802297641899210590325805,
        0.123491976262065851077600525663711,
        0.134709217311473325928054001771707,
        0.142775938577060080797094273138717,
        0.147739104901338491374841515972068,
        0.149445554002916905664936468389821,
    ],
    wg: &[
        0.066671344308688137593568809893332,
        0.149451349150580593145776339657697,
        0.219086362515982043995534934228163,
        0.269266719309996355091226921569469,
        0.295524224714752870173892994651338,
    ],
};

impl IntegrationRule {
    fn kronrod(&self) -> &'static KronrodRule {
        match *self {
            IntegrationRule::GaussKonrod15 => &GK15,
            IntegrationRule::GaussKonrod21 => &GK21,
        }
    }
}


/// GSL's heuristic for turning the Gauss/Kronrod difference into a
/// realistic error estimate.
fn rescale_error(err: f64, result_abs: f64, result_asc: f64) -> f64 {
    let mut err = err.abs();

    if result_asc != 0. && err != 0. {
        let scale = (200. * err / result_asc).powf(1.5);

        if scale < 1. {
            err = result_asc * scale;
        } else {
            err = result_asc;
        }
    }

    if result_abs > f64::MIN_POSITIVE / (50. * f64::EPSILON) {
        let min_err = 50. * f64::EPSILON * result_abs;

        if min_err > err {
            err = min_err;
        }
    }

    err
}


#[derive(Clone,Copy,Debug,PartialEq)]
struct Interval {
    lo: f64,
    hi: f64,
    value: f64,
    abserr: f64,
}

/// Apply a Gauss–Kronrod rule on `[lo, hi]`. The function is never evaluated
/// at the endpoints.
fn gauss_kronrod<F>(rule: &KronrodRule, f: &mut F, lo: f64, hi: f64) -> QuadResult<Interval>
    where F: FnMut(f64) -> f64
{
    let n = rule.xgk.len();
    let center = 0.5 * (lo + hi);
    let half_length = 0.5 * (hi - lo);
    let abs_half_length = half_length.abs();

    let mut eval = |x: f64| -> QuadResult<f64> {
        let v = f(x);

        if v.is_finite() {
            Ok(v)
        } else {
            Err(QuadError::NonFinite(x))
        }
    };

    let f_center = eval(center)?;
    let mut result_gauss = 0.;
    let mut result_kronrod = f_center * rule.wgk[n - 1];
    let mut result_abs = result_kronrod.abs();
    let mut fv1 = [0_f64; 11];
    let mut fv2 = [0_f64; 11];

    if n % 2 == 0 {
        result_gauss = f_center * rule.wg[n / 2 - 1];
    }

    for j in 0..(n - 1) / 2 {
        let jtw = 2 * j + 1;
        let abscissa = half_length * rule.xgk[jtw];
        let fval1 = eval(center - abscissa)?;
        let fval2 = eval(center + abscissa)?;
        let fsum = fval1 + fval2;
        fv1[jtw] = fval1;
        fv2[jtw] = fval2;
        result_gauss += rule.wg[j] * fsum;
        result_kronrod += rule.wgk[jtw] * fsum;
        result_abs += rule.wgk[jtw] * (fval1.abs() + fval2.abs());
    }

    for j in 0..n / 2 {
        let jtwm1 = 2 * j;
        let abscissa = half_length * rule.xgk[jtwm1];
        let fval1 = eval(center - abscissa)?;
        let fval2 = eval(center + abscissa)?;
        fv1[jtwm1] = fval1;
        fv2[jtwm1] = fval2;
        result_kronrod += rule.wgk[jtwm1] * (fval1 + fval2);
        result_abs += rule.wgk[jtwm1] * (fval1.abs() + fval2.abs());
    }

    let mean = 0.5 * result_kronrod;
    let mut result_asc = rule.wgk[n - 1] * (f_center - mean).abs();

    for j in 0..n - 1 {
        result_asc += rule.wgk[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let err = (result_kronrod - result_gauss) * half_length;

    Ok(Interval {
        lo: lo,
        hi: hi,
        value: result_kronrod * half_length,
        abserr: rescale_error(err, result_abs * abs_half_length, result_asc * abs_half_length),
    })
}


fn check_tolerance(epsabs: f64, epsrel: f64) -> QuadResult<()> {
    if epsabs <= 0. && (epsrel < 50. * f64::EPSILON || epsrel < 0.5e-28) {
        Err(QuadError::BadTolerance)
    } else {
        Ok(())
    }
}


/// Scratch space for QAG and QAGP. The capacity bounds the number of
/// subintervals an integration may use; storage is reused between
/// integrations and released when the workspace is dropped.
#[derive(Debug)]
pub struct IntegrationWorkspace {
    limit: usize,
    intervals: Vec<Interval>,
}

impl IntegrationWorkspace {
    /// Create a workspace that allows up to `n` subintervals.
    pub fn new(n: usize) -> Self {
        IntegrationWorkspace {
            limit: n.max(1),
            intervals: Vec::with_capacity(n.max(1).min(64)),
        }
    }
}


#[derive(Clone,Copy,Debug,Eq,PartialEq)]
enum Integrator {
    QAG,
    QAGP,
}


/// Configures and runs a QAG or QAGP integration.
pub struct IntegrationBuilder<'a, F: 'a> where F: FnMut(f64) -> f64 {
    workspace: &'a mut IntegrationWorkspace,
    function: F,
    kind: Integrator,
    rule: IntegrationRule,
    points: Vec<f64>,
    epsabs: f64,
    epsrel: f64,
}

impl<'a, F: 'a> IntegrationBuilder<'a, F> where F: FnMut(f64) -> f64 {
    fn new(ws: &'a mut IntegrationWorkspace, f: F, kind: Integrator, points: Vec<f64>) -> Self {
        IntegrationBuilder {
            workspace: ws,
            function: f,
            kind: kind,
            rule: IntegrationRule::GaussKonrod21,
            points: points,
            epsabs: 0.,
            epsrel: 1e-6,
        }
    }

    /// Set the absolute and relative tolerances.
    pub fn tolerance(mut self, epsabs: f64, epsrel: f64) -> Self {
        self.epsabs = epsabs;
        self.epsrel = epsrel;
        self
    }

    /// Set the Gauss–Kronrod rule. QAGP always uses the 21-point rule, as in
    /// GSL.
    pub fn rule(mut self, rule: IntegrationRule) -> Self {
        self.rule = rule;
        self
    }

    /// Run the integration.
    pub fn compute(mut self) -> QuadResult<IntegrationResult> {
        check_tolerance(self.epsabs, self.epsrel)?;

        let rule = match self.kind {
            Integrator::QAG => self.rule.kronrod(),
            Integrator::QAGP => &GK21,
        };

        let limit = self.workspace.limit;
        let intervals = &mut self.workspace.intervals;
        intervals.clear();

        for pair in self.points.windows(2) {
            if pair[0] != pair[1] {
                intervals.push(gauss_kronrod(rule, &mut self.function, pair[0], pair[1])?);
            }
        }

        let mut value: f64 = intervals.iter().map(|iv| iv.value).sum();
        let mut abserr: f64 = intervals.iter().map(|iv| iv.abserr).sum();

        loop {
            let tolerance = self.epsabs.max(self.epsrel * value.abs());

            if abserr <= tolerance || intervals.len() >= limit {
                break;
            }

            let worst = intervals.iter()
                .enumerate()
                .fold(0, |best, (i, iv)| if iv.abserr > intervals[best].abserr { i } else { best });

            let old = intervals[worst];
            let mid = 0.5 * (old.lo + old.hi);

            if mid == old.lo || mid == old.hi {
                // Cannot bisect any further in floating point.
                break;
            }

            let left = gauss_kronrod(rule, &mut self.function, old.lo, mid)?;
            let right = gauss_kronrod(rule, &mut self.function, mid, old.hi)?;
            value += left.value + right.value - old.value;
            abserr += left.abserr + right.abserr - old.abserr;
            intervals[worst] = left;
            intervals.push(right);
        }

        // Sum afresh; the running totals accumulate rounding.
        Ok(IntegrationResult {
            value: intervals.iter().map(|iv| iv.value).sum(),
            abserr: intervals.iter().map(|iv| iv.abserr).sum(),
            intervals: intervals.len(),
        })
    }
}


impl IntegrationWorkspace {
    /// Integrate `f` over `[lower_bound, upper_bound]` with QAG.
    pub fn qag<'a, F>(&'a mut self, f: F, lower_bound: f64, upper_bound: f64) -> IntegrationBuilder<'a, F> where F: FnMut(f64) -> f64 {
        IntegrationBuilder::new(self, f, Integrator::QAG, vec![lower_bound, upper_bound])
    }

    /// Integrate `f` with QAGP. `points` must be sorted and include the two
    /// integration bounds; interior points are where the integrand has
    /// features the integrator should not have to discover on its own.
    pub fn qagp<'a, F>(&'a mut self, f: F, points: &[f64]) -> IntegrationBuilder<'a, F> where F: FnMut(f64) -> f64 {
        IntegrationBuilder::new(self, f, Integrator::QAGP, points.to_vec())
    }
}


// Nested Clenshaw–Curtis rules with 5, 9 and 17 points. Nodes are
// cos(k pi / 16), k = 0..16; the 9- and 17-point rules reuse every node of
// the coarser ones.

const CC_NODES: usize = 17;

#[derive(Clone,Copy,Debug,PartialEq)]
struct CcInterval {
    lo: f64,
    hi: f64,
    values: [f64; CC_NODES],
    value: f64,
    abserr: f64,
    degree: usize,
    dropped: bool,
    frozen: bool,
}

/// Scratch space for CQUAD.
#[derive(Debug)]
pub struct CquadWorkspace {
    limit: usize,
    nodes: [f64; CC_NODES],
    weights: [[f64; CC_NODES]; 3],
    intervals: Vec<CcInterval>,
}

/// Clenshaw–Curtis weights on [-1, 1] for the rule with `n + 1` points.
fn clenshaw_curtis_weights(n: usize) -> Vec<f64> {
    (0..n + 1).map(|k| {
        let c = if k == 0 || k == n { 1. } else { 2. };
        let mut s = 0.;

        for j in 1..(n / 2 + 1) {
            let b = if 2 * j == n { 1. } else { 2. };
            let theta = (2 * j * k) as f64 * f64::consts::PI / n as f64;
            s += b / ((4 * j * j) as f64 - 1.) * theta.cos();
        }

        c / n as f64 * (1. - s)
    }).collect()
}

impl CquadWorkspace {
    /// Create a workspace that allows up to `n` subintervals.
    pub fn new(n: usize) -> Self {
        let mut nodes = [0_f64; CC_NODES];

        for (k, node) in nodes.iter_mut().enumerate() {
            *node = (k as f64 * f64::consts::PI / 16.).cos();
        }

        // Weights are stored on the 17-node grid, zero where a coarse rule
        // has no node.
        let mut weights = [[0_f64; CC_NODES]; 3];

        for (level, &n_rule) in [4_usize, 8, 16].iter().enumerate() {
            let step = 16 / n_rule;

            for (k, w) in clenshaw_curtis_weights(n_rule).into_iter().enumerate() {
                weights[level][k * step] = w;
            }
        }

        CquadWorkspace {
            limit: n.max(1),
            nodes: nodes,
            weights: weights,
            intervals: Vec::with_capacity(n.max(1).min(64)),
        }
    }

    /// Integrate `f` over `[lower_bound, upper_bound]` with CQUAD.
    pub fn cquad<'a, F>(&'a mut self, f: F, lower_bound: f64, upper_bound: f64) -> CquadBuilder<'a, F> where F: FnMut(f64) -> f64 {
        CquadBuilder {
            workspace: self,
            function: f,
            lower_bound: lower_bound,
            upper_bound: upper_bound,
            epsabs: 0.,
            epsrel: 1e-6,
        }
    }

    fn node(&self, k: usize, lo: f64, hi: f64) -> f64 {
        // Pin the end nodes so that rounding never steps outside the interval.
        if k == 0 {
            hi
        } else if k == CC_NODES - 1 {
            lo
        } else {
            0.5 * (lo + hi) + 0.5 * (hi - lo) * self.nodes[k]
        }
    }

    fn apply(&self, level: usize, values: &[f64; CC_NODES], lo: f64, hi: f64) -> f64 {
        let sum: f64 = self.weights[level].iter().zip(values.iter()).map(|(w, v)| w * v).sum();
        0.5 * (hi - lo) * sum
    }

    fn fill<F>(&self, f: &mut F, iv: &mut CcInterval, step: usize, offset: usize) where F: FnMut(f64) -> f64 {
        let mut k = offset;

        while k < CC_NODES {
            let v = f(self.node(k, iv.lo, iv.hi));

            if v.is_finite() {
                iv.values[k] = v;
            } else {
                iv.values[k] = 0.;
                iv.dropped = true;
            }

            k += step;
        }
    }

    fn fresh<F>(&self, f: &mut F, lo: f64, hi: f64) -> CcInterval where F: FnMut(f64) -> f64 {
        let mut iv = CcInterval {
            lo: lo,
            hi: hi,
            values: [0.; CC_NODES],
            value: 0.,
            abserr: 0.,
            degree: 1,
            dropped: false,
            frozen: false,
        };

        self.fill(f, &mut iv, 2, 0);
        let coarse = self.apply(0, &iv.values, lo, hi);
        iv.value = self.apply(1, &iv.values, lo, hi);
        iv.abserr = (iv.value - coarse).abs();
        iv
    }

    fn refine<F>(&self, f: &mut F, iv: &mut CcInterval) where F: FnMut(f64) -> f64 {
        self.fill(f, iv, 2, 1);
        let fine = self.apply(2, &iv.values, iv.lo, iv.hi);
        iv.abserr = (fine - iv.value).abs();
        iv.value = fine;
        iv.degree = 2;
    }
}


/// Configures and runs a CQUAD integration.
pub struct CquadBuilder<'a, F: 'a> where F: FnMut(f64) -> f64 {
    workspace: &'a mut CquadWorkspace,
    function: F,
    lower_bound: f64,
    upper_bound: f64,
    epsabs: f64,
    epsrel: f64,
}

impl<'a, F: 'a> CquadBuilder<'a, F> where F: FnMut(f64) -> f64 {
    /// Set the absolute and relative tolerances.
    pub fn tolerance(mut self, epsabs: f64, epsrel: f64) -> Self {
        self.epsabs = epsabs;
        self.epsrel = epsrel;
        self
    }

    /// Run the integration.
    ///
    /// Each subinterval is first refined from the 9- to the 17-point rule;
    /// only then, or straight away if it contains dropped non-finite values,
    /// is it bisected.
    pub fn compute(mut self) -> QuadResult<IntegrationResult> {
        check_tolerance(self.epsabs, self.epsrel)?;

        let (lo, hi) = (self.lower_bound, self.upper_bound);

        if lo == hi {
            return Ok(IntegrationResult { value: 0., abserr: 0., intervals: 0 });
        }

        let ws = self.workspace;
        let mut intervals = ::std::mem::replace(&mut ws.intervals, Vec::new());
        intervals.clear();
        intervals.push(ws.fresh(&mut self.function, lo, hi));

        let outcome = loop {
            let value: f64 = intervals.iter().map(|iv| iv.value).sum();
            let abserr: f64 = intervals.iter().map(|iv| iv.abserr).sum();
            let tolerance = self.epsabs.max(self.epsrel * value.abs());

            if abserr <= tolerance || intervals.len() >= ws.limit {
                break IntegrationResult { value: value, abserr: abserr, intervals: intervals.len() };
            }

            let worst = intervals.iter()
                .enumerate()
                .filter(|&(_, iv)| !iv.frozen)
                .fold(None, |best: Option<(usize, f64)>, (i, iv)| match best {
                    Some((_, e)) if e >= iv.abserr => best,
                    _ => Some((i, iv.abserr)),
                });

            let worst = match worst {
                Some((i, _)) => i,
                None => break IntegrationResult { value: value, abserr: abserr, intervals: intervals.len() },
            };

            if intervals[worst].degree < 2 && !intervals[worst].dropped {
                let mut iv = intervals[worst];
                ws.refine(&mut self.function, &mut iv);
                intervals[worst] = iv;
                continue;
            }

            let CcInterval { lo, hi, .. } = intervals[worst];
            let mid = 0.5 * (lo + hi);

            if mid == lo || mid == hi {
                intervals[worst].frozen = true;
                continue;
            }

            intervals[worst] = ws.fresh(&mut self.function, lo, mid);
            let right = ws.fresh(&mut self.function, mid, hi);
            intervals.push(right);
        };

        ws.intervals = intervals;

        if outcome.value.is_finite() {
            Ok(outcome)
        } else {
            Err(QuadError::NonFinite(f64::NAN))
        }
    }
}


#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use super::*;

    #[test]
    fn kronrod_weights_sum_to_two() {
        for rule in &[GK15, GK21] {
            let n = rule.xgk.len();
            let total: f64 = 2. * rule.wgk[..n - 1].iter().sum::<f64>() + rule.wgk[n - 1];
            assert_approx_eq!(total, 2., 1e-14);
        }
    }

    #[test]
    fn qag_cos_squared() {
        let mut ws = IntegrationWorkspace::new(1024);

        for &rule in &[IntegrationRule::GaussKonrod15, IntegrationRule::GaussKonrod21] {
            let r = ws.qag(|x| x.cos().powi(2), 0., 0.5 * PI)
                .tolerance(0., 1e-6)
                .rule(rule)
                .compute()
                .unwrap();
            assert_approx_eq!(r.value, 0.25 * PI, 1e-10);
        }
    }

    #[test]
    fn qag_high_degree_polynomial() {
        let mut ws = IntegrationWorkspace::new(1024);
        let r = ws.qag(|x| x.powi(28), 0., 1.)
            .tolerance(0., 1e-10)
            .rule(IntegrationRule::GaussKonrod15)
            .compute()
            .unwrap();
        assert_approx_eq!(r.value, 1. / 29., 1e-12);
        assert!(r.intervals > 1);
    }

    #[test]
    fn qag_reports_nonfinite() {
        let mut ws = IntegrationWorkspace::new(100);
        let r = ws.qag(|x| if x > 0.5 { f64::NAN } else { x }, 0., 1.).compute();

        match r {
            Err(QuadError::NonFinite(_)) => {},
            other => panic!("expected a non-finite failure, got {:?}", other),
        }
    }

    #[test]
    fn qag_rejects_impossible_tolerance() {
        let mut ws = IntegrationWorkspace::new(100);
        assert_eq!(ws.qag(|x| x, 0., 1.).tolerance(0., 0.).compute(), Err(QuadError::BadTolerance));
    }

    #[test]
    fn qag_limit_is_not_an_error() {
        let mut ws = IntegrationWorkspace::new(2);
        let r = ws.qag(|x| (1. / x).sin(), 1e-3, 1.)
            .tolerance(0., 1e-12)
            .compute()
            .unwrap();
        assert_eq!(r.intervals, 2);
        assert!(r.abserr > 0.);
    }

    #[test]
    fn qagp_kink() {
        let mut ws = IntegrationWorkspace::new(1000);
        let r = ws.qagp(|x| (x - 0.3).abs(), &[0., 0.3, 1.])
            .tolerance(0., 1e-8)
            .compute()
            .unwrap();
        assert_approx_eq!(r.value, 0.29, 1e-12);
    }

    #[test]
    fn clenshaw_curtis_weights_sum_to_two() {
        for &n in &[4, 8, 16] {
            let total: f64 = clenshaw_curtis_weights(n).iter().sum();
            assert_approx_eq!(total, 2., 1e-13);
        }
    }

    #[test]
    fn cquad_smooth() {
        let mut ws = CquadWorkspace::new(100);
        let r = ws.cquad(|x| x.exp(), 0., 1.)
            .tolerance(0., 1e-9)
            .compute()
            .unwrap();
        assert_approx_eq!(r.value, ::std::f64::consts::E - 1., 1e-12);
    }

    #[test]
    fn cquad_inverse_sqrt_singularity() {
        let mut ws = CquadWorkspace::new(200);
        let r = ws.cquad(|x| 1. / x.sqrt(), 0., 1.)
            .tolerance(0., 1e-7)
            .compute()
            .unwrap();
        assert_approx_eq!(r.value, 2., 1e-6);
        assert!(r.abserr < 1e-6);
    }

    #[test]
    fn cquad_tangent_point() {
        let mut ws = CquadWorkspace::new(200);

        for &rad in &[0.001, 0.3, 0.8999] {
            let r = ws.cquad(|rho| rho / (rho * rho - rad * rad).sqrt(), rad, 0.9)
                .tolerance(0., 1e-7)
                .compute()
                .unwrap();
            let expected: f64 = (0.81 - rad * rad).sqrt();
            assert_approx_eq!(r.value, expected, 1e-5 * expected);
        }
    }

    #[test]
    fn cquad_empty_interval() {
        let mut ws = CquadWorkspace::new(10);
        let r = ws.cquad(|_| f64::INFINITY, 0.5, 0.5).compute().unwrap();
        assert_eq!(r.value, 0.);
    }
}
