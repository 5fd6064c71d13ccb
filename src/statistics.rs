/// A simple statistics module with the moment and order statistics shared by
/// the feature calculators.
use statrs::statistics::Statistics;

pub fn mean(values: &[f64]) -> f64 {
    values.iter().copied().mean()
}

/// Standard deviation with ddof = 0, matching what the feature definitions
/// expect rather than the sample estimator.
pub fn population_std(values: &[f64]) -> f64 {
    values.iter().copied().population_std_dev()
}

/// Root mean square.
pub fn rms(values: &[f64]) -> f64 {
    values.iter().copied().quadratic_mean()
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.
    } else {
        sorted[mid]
    }
}

/// Bias-adjusted Fisher-Pearson skewness (the pandas estimator): NaN below
/// three samples, 0 for a constant series.
pub fn adjusted_skewness(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 3. {
        return f64::NAN;
    }
    let mean = mean(values);
    let m2: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    let m3: f64 = values.iter().map(|x| (x - mean).powi(3)).sum();
    if m2 == 0. {
        return 0.;
    }

    n * (n - 1.).sqrt() / (n - 2.) * m3 / m2.powf(1.5)
}

/// Bias-adjusted excess kurtosis (the pandas estimator): NaN below four
/// samples, 0 for a constant series.
pub fn adjusted_kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 4. {
        return f64::NAN;
    }
    let mean = mean(values);
    let m2: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    let m4: f64 = values.iter().map(|x| (x - mean).powi(4)).sum();
    let denominator = (n - 2.) * (n - 3.) * m2.powi(2);
    if denominator == 0. {
        return 0.;
    }

    n * (n + 1.) * (n - 1.) * m4 / denominator - 3. * (n - 1.).powi(2) / ((n - 2.) * (n - 3.))
}
