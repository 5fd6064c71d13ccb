//! Turns one machine's sensor readings into its feature frame: rows are
//! aggregation windows, columns are (quantity, feature) pairs.

use crate::core::aggregation::{weekday, AggregationLevel};
use crate::core::features::FEATURE_CATALOGUE;
use crate::read_sensor_file::SensorData;
use csv::WriterBuilder;
#[cfg(feature = "indicatif")]
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;

/// Label of the index column, carried over from the published data set.
const INDEX_COLUMN: &str = "id";
const WEEKDAY_COLUMN: &str = "weekday";

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureFrame {
    /// `id`, `weekday`, then one `<quantity>__<feature>` column per pair.
    pub header: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRow {
    pub window_id: String,
    pub weekday: u32,
    pub values: Vec<f64>,
}

/// Bucket the readings into aggregation windows and calculate the full
/// feature catalogue per window and quantity. Windows come out sorted by
/// identifier; within a row, quantities keep their ingest order and
/// features their catalogue order.
pub fn extract_features(
    data: &SensorData,
    aggregation: AggregationLevel,
) -> anyhow::Result<FeatureFrame> {
    let mut windows: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, timestamp) in data.timestamps.iter().enumerate() {
        windows
            .entry(aggregation.window_id(timestamp)?)
            .or_default()
            .push(row);
    }

    let header = [INDEX_COLUMN, WEEKDAY_COLUMN]
        .into_iter()
        .map(String::from)
        .chain(data.columns.keys().flat_map(|column| {
            FEATURE_CATALOGUE
                .iter()
                .map(move |feature| format!("{column}__{}", feature.name))
        }))
        .collect_vec();

    let windows = windows.into_iter().collect_vec();
    let window_iter = windows.into_par_iter();
    #[cfg(feature = "indicatif")]
    let window_iter = {
        let window_count = window_iter.len() as u64;
        window_iter.progress_count(window_count)
    };

    let rows = window_iter
        .map(|(window_id, row_indices)| -> anyhow::Result<FeatureRow> {
            let weekday = weekday(&window_id)?;
            let mut values = Vec::with_capacity(data.columns.len() * FEATURE_CATALOGUE.len());
            for series in data.columns.values() {
                let window_values = row_indices.iter().map(|&row| series[row]).collect_vec();
                values.extend(
                    FEATURE_CATALOGUE
                        .iter()
                        .map(|feature| (feature.calculate)(&window_values)),
                );
            }
            Ok(FeatureRow {
                window_id,
                weekday,
                values,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(FeatureFrame { header, rows })
}

/// Write the frame as CSV. Feature values that are not defined on a window
/// (NaN) become empty cells.
pub fn write_feature_frame(frame: &FeatureFrame, writer: impl Write) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(&frame.header)?;
    for row in &frame.rows {
        let record = [row.window_id.clone(), row.weekday.to_string()]
            .into_iter()
            .chain(row.values.iter().map(|&value| feature_cell(value)));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}

fn feature_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
