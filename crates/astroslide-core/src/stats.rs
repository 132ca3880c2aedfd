//! Summary statistics shared by the primitives.
//!
//! Percentiles use linear interpolation between the two nearest order
//! statistics, so `percentile(v, 50.0)` of an even-length slice is the mean of
//! the two middle values.

use ndarray::Array2;
use num_traits::ToPrimitive;

/// Mean and population standard deviation of any numeric sequence.
pub fn mean_stddev<I, T>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = T>,
    T: ToPrimitive,
{
    let mut n = 0.0f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for v in values {
        let x = v.to_f64().unwrap_or(0.0);
        n += 1.0;
        sum += x;
        sum_sq += x * x;
    }
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let mean = sum / n;
    let var = (sum_sq / n - mean * mean).max(0.0);
    (mean, var.sqrt())
}

/// Mean and standard deviation of a float plane.
pub fn plane_mean_stddev(data: &Array2<f32>) -> (f64, f64) {
    mean_stddev(data.iter().copied())
}

/// Percentile `p` (0..100) of `values`, reordering the slice in place.
///
/// Returns 0.0 for an empty slice.
pub fn percentile(values: &mut [f32], p: f32) -> f32 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f32;
    let lo = (rank.floor() as usize).min(n - 1);
    let frac = rank - lo as f32;

    let (_, &mut lo_val, upper) = values.select_nth_unstable_by(lo, |a, b| a.total_cmp(b));
    if frac <= 0.0 || upper.is_empty() {
        return lo_val;
    }
    let hi_val = upper.iter().copied().fold(f32::INFINITY, f32::min);
    lo_val + (hi_val - lo_val) * frac
}

/// Median of `values`, reordering the slice in place.
pub fn median(values: &mut [f32]) -> f32 {
    percentile(values, 50.0)
}

/// Percentile of a plane without modifying it.
pub fn plane_percentile(data: &Array2<f32>, p: f32) -> f32 {
    let mut values: Vec<f32> = data.iter().copied().collect();
    percentile(&mut values, p)
}

/// 256-bin histogram of 8-bit samples.
pub fn histogram_u8<'a>(values: impl IntoIterator<Item = &'a u8>) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &v in values {
        hist[v as usize] += 1;
    }
    hist
}

/// Percentile `p` (0..100) of the samples summarized by `hist`.
///
/// Equivalent to [`percentile`] on the expanded sample list.
pub fn histogram_percentile(hist: &[u64; 256], p: f32) -> f32 {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let rank = (p.clamp(0.0, 100.0) as f64 / 100.0) * (total - 1) as f64;
    let lo = rank.floor() as u64;
    let frac = (rank - lo as f64) as f32;

    let lo_val = value_at_rank(hist, lo);
    if frac <= 0.0 {
        return lo_val as f32;
    }
    let hi_val = value_at_rank(hist, (lo + 1).min(total - 1));
    lo_val as f32 + (hi_val as f32 - lo_val as f32) * frac
}

fn value_at_rank(hist: &[u64; 256], rank: u64) -> u8 {
    let mut cumulative = 0u64;
    for (value, &count) in hist.iter().enumerate() {
        cumulative += count;
        if cumulative > rank {
            return value as u8;
        }
    }
    255
}
