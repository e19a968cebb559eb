//! Summary statistics.

/// Arithmetic mean; `0.0` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation (divides by `n`); `0.0` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mu = mean(data);
    let variance = data.iter().map(|&x| (x - mu) * (x - mu)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}
