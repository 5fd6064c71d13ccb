pub mod archive;
pub mod core;
pub mod dataset;
pub mod download;
mod errors;
pub mod output;
pub mod read_sensor_file;
mod statistics;

pub use crate::errors::{ArchiveError, DownloadError, HipeError, IngestError};

use crate::archive::SensorArchive;
use crate::core::aggregation::AggregationLevel;
use crate::core::extraction::{extract_features, write_feature_frame};
use crate::core::machine_state::remove_machine_off_rows;
use crate::dataset::{feature_output_name, SensorFileName, HIPE_MONTH_ARCHIVE};
use crate::output::{FileOutputWriter, OutputWriter};
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumString};
use tracing::info;

/// Whether a run extracts features over all readings or only over those
/// where the machine is switched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ExtractionVariant {
    #[strum(serialize = "all")]
    All,
    #[strum(serialize = "only-on")]
    OnlyOn,
}

impl ExtractionVariant {
    fn prunes_machine_off_rows(&self) -> bool {
        matches!(self, ExtractionVariant::OnlyOn)
    }
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub aggregations: Vec<AggregationLevel>,
    pub variants: Vec<ExtractionVariant>,
}

impl Default for RunConfig {
    /// The published data set: 15-minute and 1-hour windows, each over all
    /// readings and over only-on readings.
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            aggregations: vec![AggregationLevel::FifteenMinutes, AggregationLevel::OneHour],
            variants: vec![ExtractionVariant::All, ExtractionVariant::OnlyOn],
        }
    }
}

/// Fetch the HIPE archive when necessary, then produce one feature archive
/// per requested (aggregation, variant) pair.
pub fn run_pipeline(config: &RunConfig) -> Result<(), HipeError> {
    std::fs::create_dir_all(&config.data_dir).map_err(|source| HipeError::DataDir {
        path: config.data_dir.display().to_string(),
        source,
    })?;
    let archive_path = download::ensure_archive(&config.data_dir, HIPE_MONTH_ARCHIVE)?;

    for &aggregation in &config.aggregations {
        for &variant in &config.variants {
            process_archive(&archive_path, &config.data_dir, aggregation, variant)?;
        }
    }

    Ok(())
}

/// One pass over the archive: features for every sensor file, written into
/// a versioned output directory and compressed afterwards.
fn process_archive(
    archive_path: &Path,
    data_dir: &Path,
    aggregation: AggregationLevel,
    variant: ExtractionVariant,
) -> Result<(), HipeError> {
    info!("Processing '{}'.", archive_path.display());
    let mut archive = SensorArchive::open(archive_path)?;
    let member_names = archive.sensor_file_names();
    info!("Found {} files.", member_names.len());

    let output_name = feature_output_name(
        HIPE_MONTH_ARCHIVE,
        &variant.to_string(),
        &aggregation.to_string(),
    );
    let output_dir = data_dir.join(&output_name);
    let output = FileOutputWriter::create(&output_dir)?;

    for member_name in member_names {
        info!("Start processing {member_name}");
        process_member(&mut archive, &member_name, aggregation, variant, &output)?;
        info!("Finished processing {member_name}");
    }

    info!("Compressing output files.");
    let zip_path = data_dir.join(format!("{output_name}.zip"));
    archive::compress_directory(&output_dir, &zip_path)?;
    info!("Compressing done.");
    info!("Finished. The output is file '{}'.", zip_path.display());

    Ok(())
}

fn process_member(
    archive: &mut SensorArchive,
    member_name: &str,
    aggregation: AggregationLevel,
    variant: ExtractionVariant,
    output: &impl OutputWriter,
) -> Result<(), HipeError> {
    let sensor_file = SensorFileName::parse(member_name)?;
    let reader = archive.read_member(member_name)?;
    let mut data = read_sensor_file::sensor_data_from_csv(reader, sensor_file.phase_count)?;

    if variant.prunes_machine_off_rows() {
        data = remove_machine_off_rows(data, sensor_file.machine_off_threshold())?;
        if data.is_empty() {
            info!("No data left after pruning. Skipping file.");
            return Ok(());
        }
    }

    let frame = extract_features(&data, aggregation)?;
    let writer = output.writer_for_member(member_name)?;
    write_feature_frame(&frame, writer)?;
    Ok(())
}
