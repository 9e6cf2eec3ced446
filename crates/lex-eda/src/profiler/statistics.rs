//! Numeric primitives shared by the summarizer, chart generator and insight
//! generator.
//!
//! All functions operate on slices of non-missing values. Quantiles use
//! linear interpolation between closest ranks (position `q * (n - 1)`),
//! standard deviation is the sample estimator and skewness is the adjusted
//! Fisher-Pearson coefficient.

use indexmap::IndexMap;

/// Quantile of already sorted values using linear interpolation.
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Sort a copy of the values ascending. NaN must already be removed.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Adjusted Fisher-Pearson skewness.
///
/// `None` for fewer than three values; `0.0` for a constant column.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let first = values[0];
    if values.iter().all(|v| *v == first) {
        return Some(0.0);
    }
    let m = mean(values)?;
    let nf = n as f64;
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / nf;
    let m3 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / nf;
    let g1 = m3 / m2.powf(1.5);
    let adjusted = (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1;
    adjusted.is_finite().then_some(adjusted)
}

/// Tukey fences around the interquartile range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFences {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Strictly outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

pub fn iqr_fences(sorted: &[f64], multiplier: f64) -> Option<IqrFences> {
    let q1 = quantile_sorted(sorted, 0.25)?;
    let q3 = quantile_sorted(sorted, 0.75)?;
    let iqr = q3 - q1;
    Some(IqrFences {
        q1,
        q3,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

pub fn count_outliers(values: &[f64], fences: &IqrFences) -> usize {
    values.iter().filter(|v| fences.is_outlier(**v)).count()
}

/// Pearson correlation over rows where both values are present.
///
/// `None` with fewer than two complete pairs, when either side has zero
/// variance, or when the result is not finite.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Value frequencies ordered by count descending.
///
/// Values with equal counts keep the order of their first appearance.
pub fn rank_frequencies<I, S>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value.into()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Number of distinct values, compared by bit pattern.
pub fn distinct_count(values: &[f64]) -> usize {
    let mut bits: Vec<u64> = values
        .iter()
        .map(|v| if *v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
        .collect();
    bits.sort_unstable();
    bits.dedup();
    bits.len()
}
