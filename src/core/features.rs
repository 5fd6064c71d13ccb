//! The feature catalogue computed per aggregation window and electrical
//! quantity.
//!
//! Every calculator takes the window's values in row order and returns a
//! single number; a NaN result stands for "not defined on this window" and
//! becomes an empty cell in the output. Output column names follow the
//! `<quantity>__<feature>` convention of the published feature data set,
//! with parametrised features carrying their parameter in the name.

use crate::statistics::{adjusted_kurtosis, adjusted_skewness, mean, median, population_std, rms};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use polyfit_rs::polyfit_rs::polyfit;
use std::collections::HashMap;

pub type FeatureFn = fn(&[f64]) -> f64;

pub struct Feature {
    pub name: &'static str,
    pub calculate: FeatureFn,
}

/// All features of the data set, in catalogue order. Output columns follow
/// this order within each quantity.
pub const FEATURE_CATALOGUE: [Feature; 36] = [
    Feature { name: "count_above_mean", calculate: count_above_mean },
    Feature { name: "count_below_mean", calculate: count_below_mean },
    Feature { name: "has_duplicate", calculate: has_duplicate },
    Feature { name: "has_duplicate_max", calculate: has_duplicate_max },
    Feature { name: "has_duplicate_min", calculate: has_duplicate_min },
    Feature { name: "kurtosis", calculate: adjusted_kurtosis_feature },
    Feature { name: "length", calculate: length },
    Feature { name: "percentage_non_zero_values", calculate: percentage_non_zero_values },
    Feature { name: "maximum", calculate: maximum },
    Feature { name: "minimum", calculate: minimum },
    Feature { name: "mean", calculate: mean_feature },
    Feature { name: "median", calculate: median_feature },
    Feature { name: "crest_factor", calculate: crest_factor },
    Feature {
        name: "percentage_of_reoccurring_values_to_all_values",
        calculate: percentage_of_reoccurring_values_to_all_values,
    },
    Feature {
        name: "percentage_of_reoccurring_datapoints_to_all_datapoints",
        calculate: percentage_of_reoccurring_datapoints_to_all_datapoints,
    },
    Feature { name: "num_states", calculate: num_states },
    Feature { name: "skewness", calculate: adjusted_skewness_feature },
    Feature { name: "standard_deviation", calculate: standard_deviation },
    Feature { name: "absolute_sum_of_changes", calculate: absolute_sum_of_changes },
    Feature {
        name: "mean_second_derivative_central",
        calculate: mean_second_derivative_central,
    },
    Feature { name: "first_location_of_maximum", calculate: first_location_of_maximum },
    Feature { name: "first_location_of_minimum", calculate: first_location_of_minimum },
    Feature { name: "last_location_of_maximum", calculate: last_location_of_maximum },
    Feature { name: "last_location_of_minimum", calculate: last_location_of_minimum },
    Feature { name: "num_maxima", calculate: num_maxima },
    Feature { name: "num_minima", calculate: num_minima },
    Feature { name: "longest_strike_above_mean", calculate: longest_strike_above_mean },
    Feature { name: "longest_strike_below_mean", calculate: longest_strike_below_mean },
    Feature { name: "mean_abs_change", calculate: mean_abs_change },
    Feature { name: "mean_change", calculate: mean_change },
    Feature { name: "number_crossing_mean", calculate: number_crossing_mean },
    Feature { name: "linear_weighted_average", calculate: linear_weighted_average },
    Feature { name: "linear_trend__attr_\"slope\"", calculate: linear_trend_slope },
    Feature { name: "quadratic_weighted_average", calculate: quadratic_weighted_average },
    Feature { name: "sample_entropy", calculate: sample_entropy },
    Feature { name: "cid_ce__normalize_True", calculate: cid_ce_normalized },
];

fn count_above_mean(values: &[f64]) -> f64 {
    let mean = mean(values);
    values.iter().filter(|&&value| value > mean).count() as f64
}

fn count_below_mean(values: &[f64]) -> f64 {
    let mean = mean(values);
    values.iter().filter(|&&value| value < mean).count() as f64
}

/// Multiplicity of each distinct value in the window.
fn value_counts(values: &[f64]) -> HashMap<OrderedFloat<f64>, usize> {
    let mut counts: HashMap<OrderedFloat<f64>, usize> = HashMap::new();
    for &value in values {
        *counts.entry(OrderedFloat(value)).or_default() += 1;
    }
    counts
}

fn has_duplicate(values: &[f64]) -> f64 {
    (value_counts(values).len() < values.len()) as u8 as f64
}

fn has_duplicate_max(values: &[f64]) -> f64 {
    let max = maximum(values);
    (values.iter().filter(|&&value| value == max).count() > 1) as u8 as f64
}

fn has_duplicate_min(values: &[f64]) -> f64 {
    let min = minimum(values);
    (values.iter().filter(|&&value| value == min).count() > 1) as u8 as f64
}

fn adjusted_kurtosis_feature(values: &[f64]) -> f64 {
    adjusted_kurtosis(values)
}

fn length(values: &[f64]) -> f64 {
    values.len() as f64
}

fn percentage_non_zero_values(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().filter(|&&value| value != 0.).count() as f64 / values.len() as f64
}

fn maximum(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

fn minimum(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::min)
}

fn mean_feature(values: &[f64]) -> f64 {
    mean(values)
}

fn median_feature(values: &[f64]) -> f64 {
    median(values)
}

/// max(|x|) / RMS(x)
fn crest_factor(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().fold(0., |max, value| value.abs().max(max)) / rms(values)
}

fn percentage_of_reoccurring_values_to_all_values(values: &[f64]) -> f64 {
    let counts = value_counts(values);
    if counts.is_empty() {
        return f64::NAN;
    }
    counts.values().filter(|&&count| count > 1).count() as f64 / counts.len() as f64
}

fn percentage_of_reoccurring_datapoints_to_all_datapoints(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let reoccurring: usize = value_counts(values)
        .values()
        .filter(|&&count| count > 1)
        .sum();
    reoccurring as f64 / values.len() as f64
}

/// Number of distinct values in the window.
fn num_states(values: &[f64]) -> f64 {
    value_counts(values).len() as f64
}

fn adjusted_skewness_feature(values: &[f64]) -> f64 {
    adjusted_skewness(values)
}

fn standard_deviation(values: &[f64]) -> f64 {
    population_std(values)
}

fn absolute_sum_of_changes(values: &[f64]) -> f64 {
    values
        .iter()
        .tuple_windows()
        .map(|(a, b)| (b - a).abs())
        .sum()
}

fn mean_second_derivative_central(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }
    (values[n - 1] - values[n - 2] - values[1] + values[0]) / (2. * (n - 2) as f64)
}

/// Index of the first occurrence of the maximum, relative to the window
/// length.
fn first_location_of_maximum(values: &[f64]) -> f64 {
    let max = maximum(values);
    match values.iter().position(|&value| value == max) {
        Some(position) => position as f64 / values.len() as f64,
        None => f64::NAN,
    }
}

fn first_location_of_minimum(values: &[f64]) -> f64 {
    let min = minimum(values);
    match values.iter().position(|&value| value == min) {
        Some(position) => position as f64 / values.len() as f64,
        None => f64::NAN,
    }
}

/// One past the index of the last occurrence of the maximum, relative to
/// the window length.
fn last_location_of_maximum(values: &[f64]) -> f64 {
    let max = maximum(values);
    match values.iter().rposition(|&value| value == max) {
        Some(position) => (position + 1) as f64 / values.len() as f64,
        None => f64::NAN,
    }
}

fn last_location_of_minimum(values: &[f64]) -> f64 {
    let min = minimum(values);
    match values.iter().rposition(|&value| value == min) {
        Some(position) => (position + 1) as f64 / values.len() as f64,
        None => f64::NAN,
    }
}

/// Occurrence count of the maximum value.
fn num_maxima(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let max = maximum(values);
    values.iter().filter(|&&value| value == max).count() as f64
}

/// Occurrence count of the minimum value.
fn num_minima(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let min = minimum(values);
    values.iter().filter(|&&value| value == min).count() as f64
}

fn longest_run(values: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
    let mut longest = 0usize;
    let mut current = 0usize;
    for &value in values {
        if predicate(value) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest as f64
}

fn longest_strike_above_mean(values: &[f64]) -> f64 {
    let mean = mean(values);
    longest_run(values, |value| value > mean)
}

fn longest_strike_below_mean(values: &[f64]) -> f64 {
    let mean = mean(values);
    longest_run(values, |value| value < mean)
}

fn mean_abs_change(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    absolute_sum_of_changes(values) / (values.len() - 1) as f64
}

fn mean_change(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    (values[n - 1] - values[0]) / (n - 1) as f64
}

/// Number of times the series crosses its own mean, i.e. sign changes of
/// the above-mean indicator sequence.
fn number_crossing_mean(values: &[f64]) -> f64 {
    let mean = mean(values);
    values
        .iter()
        .map(|&value| value > mean)
        .tuple_windows()
        .filter(|(a, b)| a != b)
        .count() as f64
}

/// 2/(n(n+1)) * sum(i * x_i) with 1-based i.
fn linear_weighted_average(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.is_empty() {
        return f64::NAN;
    }
    let weighted: f64 = values
        .iter()
        .enumerate()
        .map(|(index, value)| (index + 1) as f64 * value)
        .sum();
    2. / (n * (n + 1.)) * weighted
}

/// 6/(n(n+1)(2n+1)) * sum(i^2 * x_i) with 1-based i.
fn quadratic_weighted_average(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.is_empty() {
        return f64::NAN;
    }
    let weighted: f64 = values
        .iter()
        .enumerate()
        .map(|(index, value)| ((index + 1) as f64).powi(2) * value)
        .sum();
    6. / (n * (n + 1.) * (2. * n + 1.)) * weighted
}

/// OLS slope of the values against their position in the window.
fn linear_trend_slope(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let positions = (0..values.len()).map(|index| index as f64).collect_vec();
    polyfit(&positions, values, 1)
        .map(|coefficients| coefficients[1])
        .unwrap_or(f64::NAN)
}

/// Sample entropy with embedding dimension 2 and tolerance 0.2 sigma,
/// Chebyshev distance, self-matches excluded.
fn sample_entropy(values: &[f64]) -> f64 {
    const EMBEDDING: usize = 2;
    if values.len() <= EMBEDDING + 1 {
        return f64::NAN;
    }
    let tolerance = 0.2 * population_std(values);

    let matching_pairs = |template_length: usize| -> usize {
        let templates = values.windows(template_length).collect_vec();
        let mut matches = 0usize;
        for (index, template) in templates.iter().enumerate() {
            for other in &templates[index + 1..] {
                let distance = template
                    .iter()
                    .zip(other.iter())
                    .fold(0., |max, (a, b)| (a - b).abs().max(max));
                if distance <= tolerance {
                    matches += 1;
                }
            }
        }
        matches
    };

    let short_matches = matching_pairs(EMBEDDING);
    let long_matches = matching_pairs(EMBEDDING + 1);
    if short_matches == 0 || long_matches == 0 {
        return f64::NAN;
    }
    -(long_matches as f64 / short_matches as f64).ln()
}

/// Complexity-invariant distance estimate sqrt(sum(diff^2)) over the
/// z-normalised window; 0 for a constant window.
fn cid_ce_normalized(values: &[f64]) -> f64 {
    let std = population_std(values);
    if std == 0. {
        return 0.;
    }
    let mean = mean(values);
    values
        .iter()
        .map(|value| (value - mean) / std)
        .tuple_windows()
        .map(|(a, b)| (b - a).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    // mean = 13/6, population std ~= 1.0672
    #[fixture]
    fn window() -> [f64; 6] {
        [1.0, 2.0, 2.0, 3.0, 1.0, 4.0]
    }

    fn by_name(name: &str) -> FeatureFn {
        FEATURE_CATALOGUE
            .iter()
            .find(|feature| feature.name == name)
            .map(|feature| feature.calculate)
            .unwrap()
    }

    #[rstest]
    fn should_list_every_feature_of_the_data_set() {
        assert_eq!(FEATURE_CATALOGUE.len(), 36);
        let names = FEATURE_CATALOGUE.iter().map(|f| f.name).collect_vec();
        assert_eq!(names.iter().unique().count(), 36);
        assert!(names.contains(&"linear_trend__attr_\"slope\""));
        assert!(names.contains(&"cid_ce__normalize_True"));
    }

    #[rstest]
    #[case("count_above_mean", 2.0)]
    #[case("count_below_mean", 4.0)]
    #[case("has_duplicate", 1.0)]
    #[case("has_duplicate_max", 0.0)]
    #[case("has_duplicate_min", 1.0)]
    #[case("length", 6.0)]
    #[case("percentage_non_zero_values", 1.0)]
    #[case("maximum", 4.0)]
    #[case("minimum", 1.0)]
    #[case("median", 2.0)]
    #[case("num_states", 4.0)]
    #[case("absolute_sum_of_changes", 7.0)]
    #[case("mean_second_derivative_central", 0.25)]
    #[case("first_location_of_minimum", 0.0)]
    #[case("last_location_of_maximum", 1.0)]
    #[case("num_maxima", 1.0)]
    #[case("num_minima", 2.0)]
    #[case("longest_strike_above_mean", 1.0)]
    #[case("longest_strike_below_mean", 3.0)]
    #[case("mean_change", 0.6)]
    #[case("number_crossing_mean", 3.0)]
    #[case("percentage_of_reoccurring_values_to_all_values", 0.5)]
    fn should_calculate_exact_features(
        window: [f64; 6],
        #[case] name: &str,
        #[case] expected: f64,
    ) {
        assert_eq!(by_name(name)(&window), expected);
    }

    #[rstest]
    #[case("mean", 2.1666666666666665)]
    #[case("standard_deviation", 1.0671873729054748)]
    #[case("kurtosis", -0.4461629982153461)]
    #[case("skewness", 0.6676284275264799)]
    #[case("crest_factor", 1.65615734242165)]
    #[case("mean_abs_change", 1.4)]
    #[case("first_location_of_maximum", 0.8333333333333334)]
    #[case("last_location_of_minimum", 0.8333333333333334)]
    #[case("linear_weighted_average", 2.4761904761904763)]
    #[case("quadratic_weighted_average", 2.6813186813186816)]
    #[case("linear_trend__attr_\"slope\"", 0.37142857142857144)]
    #[case("cid_ce__normalize_True", 3.6291502734548033)]
    #[case(
        "percentage_of_reoccurring_datapoints_to_all_datapoints",
        0.6666666666666666
    )]
    fn should_calculate_approximate_features(
        window: [f64; 6],
        #[case] name: &str,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(by_name(name)(&window), expected, max_relative = 1e-9);
    }

    #[rstest]
    fn should_calculate_sample_entropy_of_oscillating_window() {
        let window = [3.0, 4.1, 2.9, 4.0, 3.1, 4.2, 3.0, 3.9, 3.1, 4.1, 2.8, 4.0];
        // 6 template pairs of length 3 match, 9 of length 2: -ln(6/9)
        assert_relative_eq!(
            sample_entropy(&window),
            0.4054651081081644,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn should_not_define_sample_entropy_without_matching_templates(window: [f64; 6]) {
        assert!(sample_entropy(&window).is_nan());
        assert!(sample_entropy(&[1.0, 2.0, 3.0]).is_nan());
    }

    #[rstest]
    fn should_handle_constant_windows() {
        let constant = [2.0, 2.0, 2.0, 2.0];
        assert_eq!(cid_ce_normalized(&constant), 0.0);
        assert_eq!(adjusted_skewness_feature(&constant), 0.0);
        assert_eq!(adjusted_kurtosis_feature(&constant), 0.0);
        assert_eq!(longest_strike_above_mean(&constant), 0.0);
        assert_eq!(number_crossing_mean(&constant), 0.0);
        assert_eq!(count_above_mean(&constant), 0.0);
    }

    #[rstest]
    fn should_count_zero_values_against_percentage_non_zero() {
        assert_relative_eq!(percentage_non_zero_values(&[0.0, 1.0, 2.0, 0.0]), 0.5);
    }

    #[rstest]
    fn should_not_define_change_features_on_single_reading() {
        assert!(mean_abs_change(&[1.0]).is_nan());
        assert!(mean_change(&[1.0]).is_nan());
        assert!(mean_second_derivative_central(&[1.0, 2.0]).is_nan());
        assert!(by_name("linear_trend__attr_\"slope\"")(&[1.0]).is_nan());
        assert_eq!(absolute_sum_of_changes(&[1.0]), 0.0);
    }
}
