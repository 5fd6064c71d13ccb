use crate::dataset::{PhaseCount, DATE_COLUMN};
use crate::errors::IngestError;
use csv::ReaderBuilder as CsvReaderBuilder;
use indexmap::IndexMap;
use std::io::Read;
use tracing::info;

/// One machine's readings in columnar form: the raw timestamp strings plus
/// one f64 series per electrical quantity that was present in the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorData {
    pub timestamps: Vec<String>,
    pub columns: IndexMap<String, Vec<f64>>,
}

impl SensorData {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Keep only the rows whose index satisfies the predicate.
    pub fn retain_rows(self, keep: impl Fn(usize) -> bool) -> SensorData {
        let filtered = |values: Vec<String>| -> Vec<String> {
            values
                .into_iter()
                .enumerate()
                .filter(|(index, _)| keep(*index))
                .map(|(_, value)| value)
                .collect()
        };
        SensorData {
            timestamps: filtered(self.timestamps),
            columns: self
                .columns
                .into_iter()
                .map(|(name, values)| {
                    (
                        name,
                        values
                            .into_iter()
                            .enumerate()
                            .filter(|(index, _)| keep(*index))
                            .map(|(_, value)| value)
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

/// Read one sensor CSV into columns, keeping the date column and whichever
/// of the phase count's quantity columns the file actually has. Quantity
/// columns that are in the table but not in the file are reported and
/// skipped; columns the table does not know are ignored.
pub fn sensor_data_from_csv(
    file: impl Read,
    phase_count: PhaseCount,
) -> Result<SensorData, IngestError> {
    let mut reader = CsvReaderBuilder::new().from_reader(file);

    let headers = reader.headers()?.clone();
    let date_index = headers
        .iter()
        .position(|header| header == DATE_COLUMN)
        .ok_or(IngestError::MissingDateColumn(DATE_COLUMN))?;

    let mut selected: Vec<(&'static str, usize)> = vec![];
    let mut missing_columns: Vec<&'static str> = vec![];
    for column in phase_count.data_columns() {
        match headers.iter().position(|header| header == *column) {
            Some(index) => selected.push((column, index)),
            None => missing_columns.push(column),
        }
    }
    if !missing_columns.is_empty() {
        info!("Missing columns: {missing_columns:?}");
    }

    let mut timestamps: Vec<String> = vec![];
    let mut series: Vec<Vec<f64>> = vec![vec![]; selected.len()];
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        timestamps.push(record.get(date_index).unwrap_or_default().to_string());
        for ((column, index), values) in selected.iter().zip(series.iter_mut()) {
            let raw = record.get(*index).unwrap_or_default();
            let value = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| IngestError::BadValue {
                    row: row + 1,
                    column: column.to_string(),
                    value: raw.to_string(),
                })?;
            values.push(value);
        }
    }

    Ok(SensorData {
        timestamps,
        columns: selected
            .into_iter()
            .map(|(column, _)| column.to_string())
            .zip(series)
            .collect(),
    })
}
