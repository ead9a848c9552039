//! Running statistics and per-sweep result series.

use itertools::Itertools;

/// Streaming mean and variance of a set of samples, computed with Welford's
/// algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Accumulator {
    count: usize,
    mean: f64,
    m2: f64,
}

impl Accumulator {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, x: f64) -> &mut Self {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self
    }

    pub fn count(&self) -> usize { self.count }

    /// Sample mean, or NaN if no samples have been pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Unbiased sample variance; zero for fewer than two samples.
    pub fn variance(&self) -> f64 {
        if self.count < 2 { 0.0 } else { self.m2 / (self.count - 1) as f64 }
    }

    pub fn std_dev(&self) -> f64 { self.variance().sqrt() }

    /// Standard error of the mean.
    pub fn std_err(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.std_dev() / (self.count as f64).sqrt() }
    }
}

impl Extend<f64> for Accumulator {
    fn extend<I>(&mut self, iter: I)
    where I: IntoIterator<Item = f64>
    {
        iter.into_iter().for_each(|x| { self.push(x); });
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = f64>
    {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

/// Mean estimates with standard errors over a parameter sweep.
///
/// All three columns always have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    param: Vec<f64>,
    mean: Vec<f64>,
    err: Vec<f64>,
}

impl Series {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            param: Vec::with_capacity(cap),
            mean: Vec::with_capacity(cap),
            err: Vec::with_capacity(cap),
        }
    }

    pub fn push(&mut self, param: f64, mean: f64, err: f64) -> &mut Self {
        self.param.push(param);
        self.mean.push(mean);
        self.err.push(err);
        self
    }

    /// Record the mean and standard error of `acc` at `param`.
    pub fn push_acc(&mut self, param: f64, acc: &Accumulator) -> &mut Self {
        self.push(param, acc.mean(), acc.std_err())
    }

    pub fn len(&self) -> usize { self.param.len() }

    pub fn is_empty(&self) -> bool { self.param.is_empty() }

    pub fn param(&self) -> &[f64] { &self.param }

    pub fn mean(&self) -> &[f64] { &self.mean }

    pub fn err(&self) -> &[f64] { &self.err }

    /// Iterate over `(param, mean, err)` triples.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.param.iter().copied()
            .zip(self.mean.iter().copied())
            .zip(self.err.iter().copied())
            .map(|((p, m), e)| (p, m, e))
    }
}

/// Return the first parameter value at which the magnitude of the mean falls
/// below `threshold`.
///
/// Applied to a four-point OTOC against circuit depth, this is the depth
/// needed to scramble the operators and serves as a proxy for circuit
/// complexity.
pub fn scrambling_depth(series: &Series, threshold: f64) -> Option<f64> {
    series.points()
        .find(|(_, m, _)| m.abs() < threshold)
        .map(|(p, _, _)| p)
}

/// Return `true` if no value falls more than `tol` below its predecessor.
pub fn is_non_decreasing(values: &[f64], tol: f64) -> bool {
    values.iter()
        .tuple_windows()
        .all(|(a, b)| *b >= *a - tol)
}

/// Largest elementwise absolute difference between two equal-length slices.
///
/// Returns `None` if the lengths differ or both are empty.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() { return None; }
    a.iter().zip(b)
        .map(|(x, y)| (x - y).abs())
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_matches_direct_formulas() {
        let data = [1.0, 2.0, 4.0, 7.0, 11.0];
        let acc: Accumulator = data.iter().copied().collect();
        let mean = data.iter().sum::<f64>() / 5.0;
        let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 4.0;
        assert_eq!(acc.count(), 5);
        assert!((acc.mean() - mean).abs() < 1e-12);
        assert!((acc.variance() - var).abs() < 1e-12);
        assert!((acc.std_err() - (var / 5.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn extend_equals_sequential_push() {
        let mut pushed = Accumulator::new();
        (0..20).for_each(|k| { pushed.push((k as f64).sin()); });
        let mut extended: Accumulator = (0..7).map(|k| (k as f64).sin()).collect();
        extended.extend((7..20).map(|k| (k as f64).sin()));
        assert_eq!(extended, pushed);
        assert!(Accumulator::new().mean().is_nan());
        assert_eq!(Accumulator::new().std_err(), 0.0);
    }

    #[test]
    fn series_helpers() {
        let mut series = Series::new();
        series.push(0.0, 1.0, 0.0).push(1.0, 0.4, 0.1).push(2.0, 0.02, 0.1);
        assert_eq!(series.len(), 3);
        assert_eq!(scrambling_depth(&series, 0.1), Some(2.0));
        assert_eq!(scrambling_depth(&series, 0.01), None);
        assert!(is_non_decreasing(&[0.0, 0.1, 0.1, 0.5], 0.0));
        assert!(!is_non_decreasing(&[0.0, 0.5, 0.3], 0.1));
        assert!(is_non_decreasing(&[0.0, 0.5, 0.45], 0.1));
        assert_eq!(max_abs_diff(&[1.0, 2.0], &[1.5, 1.0]), Some(1.0));
        assert_eq!(max_abs_diff(&[1.0], &[]), None);
    }
}
