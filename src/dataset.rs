//! Static description of the HIPE cleaned data set: where it lives, what the
//! per-machine sensor files are called, and which electrical quantities each
//! file carries.

use crate::errors::ArchiveError;

pub const HIPE_URL: &str = "https://www.ipd.kit.edu/mitarbeiter/hipe/";
pub const HIPE_MONTH_ARCHIVE: &str = "hipe_cleaned_v1.0.1_geq_2017-10-01_lt_2018-01-01.zip";

pub const DATE_COLUMN: &str = "SensorDateTime";

/// Start of the day the recording region switched from CEST back to CET.
/// Rows after the change carry a "+01" offset, so a plain day truncation
/// would split 2017-10-29 into two windows.
pub const DATE_CHANGE_WINTER: &str = "2017-10-29T00:00:00.000+02";

pub const FEATURE_OUTPUT_VERSION: &str = "v1.0.0";

const DATA_COLUMNS_2_PHASE: [&str; 7] = ["V1_V", "F_Hz", "I1_A", "P_kW", "Q_kvar", "S_kVA", "L1_F"];
const DATA_COLUMNS_3_PHASE: [&str; 7] = ["VAVR_V", "F_Hz", "IAVR_A", "P_kW", "Q_kvar", "S_kVA", "L_F"];

/// Minimum current in amperes a machine has to draw to count as switched on.
pub fn machine_off_threshold(machine: &str) -> f64 {
    match machine {
        "PickAndPlaceUnit" => 0.3,
        _ => 0.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseCount {
    Two,
    Three,
}

impl PhaseCount {
    /// The electrical quantity columns recorded for machines with this
    /// phase count, in the order they appear in the feature output.
    pub fn data_columns(&self) -> &'static [&'static str] {
        match self {
            PhaseCount::Two => &DATA_COLUMNS_2_PHASE,
            PhaseCount::Three => &DATA_COLUMNS_3_PHASE,
        }
    }

    /// Data columns plus the date column, i.e. everything ingest keeps.
    pub fn target_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![DATE_COLUMN];
        columns.extend_from_slice(self.data_columns());
        columns
    }
}

/// Metadata carried in a sensor file name such as
/// `ChipPress_PhaseCount_2_geq_2017-10-01_lt_2018-01-01.csv`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorFileName {
    pub machine: String,
    pub phase_count: PhaseCount,
}

impl SensorFileName {
    pub fn parse(member_name: &str) -> Result<Self, ArchiveError> {
        let mut tokens = member_name.split('_');
        let machine = tokens
            .next()
            .filter(|machine| !machine.is_empty())
            .ok_or_else(|| ArchiveError::MemberName(member_name.to_string()))?;
        let phase_count = match (tokens.next(), tokens.next()) {
            (Some(_), Some("2")) => PhaseCount::Two,
            (Some(_), Some("3")) => PhaseCount::Three,
            _ => return Err(ArchiveError::MemberName(member_name.to_string())),
        };

        Ok(Self {
            machine: machine.to_string(),
            phase_count,
        })
    }

    pub fn machine_off_threshold(&self) -> f64 {
        machine_off_threshold(&self.machine)
    }
}

/// Name of the output directory (and zip stem) for one pipeline run, e.g.
/// `hipe_cleaned_v1.0.1_geq_2017-10-01_lt_2018-01-01_features_v1.0.0_all_15minutes-agg`.
pub fn feature_output_name(archive_name: &str, variant_label: &str, aggregation_label: &str) -> String {
    let archive_stem = archive_name.strip_suffix(".zip").unwrap_or(archive_name);
    format!("{archive_stem}_features_{FEATURE_OUTPUT_VERSION}_{variant_label}_{aggregation_label}-agg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_parse_two_phase_sensor_file_name() {
        let parsed =
            SensorFileName::parse("ChipPress_PhaseCount_2_geq_2017-10-01_lt_2018-01-01.csv")
                .unwrap();
        assert_eq!(
            parsed,
            SensorFileName {
                machine: "ChipPress".to_string(),
                phase_count: PhaseCount::Two,
            }
        );
    }

    #[rstest]
    fn should_parse_three_phase_sensor_file_name() {
        let parsed =
            SensorFileName::parse("MainTerminal_PhaseCount_3_geq_2017-10-01_lt_2018-01-01.csv")
                .unwrap();
        assert_eq!(parsed.phase_count, PhaseCount::Three);
    }

    #[rstest]
    #[case("")]
    #[case("ChipPress")]
    #[case("ChipPress_PhaseCount")]
    #[case("ChipPress_PhaseCount_5_geq_2017-10-01.csv")]
    fn should_reject_malformed_sensor_file_names(#[case] name: &str) {
        assert!(SensorFileName::parse(name).is_err());
    }

    #[rstest]
    fn should_use_raised_threshold_for_pick_and_place_unit() {
        assert_eq!(machine_off_threshold("PickAndPlaceUnit"), 0.3);
        assert_eq!(machine_off_threshold("ChipPress"), 0.0);
    }

    #[rstest]
    fn should_keep_date_column_first_in_target_columns() {
        let columns = PhaseCount::Three.target_columns();
        assert_eq!(columns[0], DATE_COLUMN);
        assert_eq!(columns.len(), 8);
        assert!(columns.contains(&"VAVR_V"));
    }

    #[rstest]
    fn should_version_and_label_feature_output_name() {
        assert_eq!(
            feature_output_name(HIPE_MONTH_ARCHIVE, "only-on", "15minutes"),
            "hipe_cleaned_v1.0.1_geq_2017-10-01_lt_2018-01-01_features_v1.0.0_only-on_15minutes-agg"
        );
    }
}
