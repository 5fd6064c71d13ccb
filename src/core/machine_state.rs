use crate::read_sensor_file::SensorData;
use anyhow::anyhow;
use tracing::info;

const PER_PHASE_CURRENT_COLUMNS: [&str; 3] = ["I1_A", "I2_A", "I3_A"];
const AVERAGE_CURRENT_COLUMN: &str = "IAVR_A";

/// Mask with one entry per row that is true where the machine is switched
/// off, i.e. where its current draw magnitude does not exceed the
/// machine's threshold.
///
/// With per-phase currents the row maximum over the phases is checked;
/// otherwise the average current column, falling back to the first phase.
pub fn machine_off_mask(data: &SensorData, threshold: f64) -> anyhow::Result<Vec<bool>> {
    let per_phase: Vec<&[f64]> = PER_PHASE_CURRENT_COLUMNS
        .iter()
        .filter_map(|column| data.column(column))
        .collect();
    if per_phase.len() == PER_PHASE_CURRENT_COLUMNS.len() {
        return Ok((0..data.len())
            .map(|row| {
                let phase_max = per_phase
                    .iter()
                    .map(|currents| currents[row])
                    .fold(f64::NEG_INFINITY, f64::max);
                phase_max.abs() <= threshold
            })
            .collect());
    }

    let currents = data
        .column(AVERAGE_CURRENT_COLUMN)
        .or_else(|| data.column(PER_PHASE_CURRENT_COLUMNS[0]))
        .ok_or_else(|| anyhow!("sensor data has no current column to detect machine state from"))?;
    Ok(currents
        .iter()
        .map(|current| current.abs() <= threshold)
        .collect())
}

/// Drop the rows where the machine is switched off.
pub fn remove_machine_off_rows(data: SensorData, threshold: f64) -> anyhow::Result<SensorData> {
    let mask = machine_off_mask(&data, threshold)?;
    let removed = mask.iter().filter(|&&off| off).count();
    info!(
        "Removing {removed}/{} rows where machine is turned off.",
        data.len()
    );
    Ok(data.retain_rows(|row| !mask[row]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn sensor_data(columns: Vec<(&str, Vec<f64>)>) -> SensorData {
        let rows = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
        SensorData {
            timestamps: (0..rows).map(|row| format!("t{row}")).collect(),
            columns: columns
                .into_iter()
                .map(|(name, values)| (name.to_string(), values))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[rstest]
    fn should_mask_rows_below_threshold_on_average_current() {
        let data = sensor_data(vec![("IAVR_A", vec![0.0, 0.2, 0.5, -0.4])]);
        assert_eq!(
            machine_off_mask(&data, 0.3).unwrap(),
            vec![true, true, false, false]
        );
    }

    #[rstest]
    fn should_fall_back_to_first_phase_current() {
        let data = sensor_data(vec![("I1_A", vec![0.0, 1.2]), ("P_kW", vec![0.0, 0.4])]);
        assert_eq!(machine_off_mask(&data, 0.0).unwrap(), vec![true, false]);
    }

    #[rstest]
    fn should_check_phase_maximum_when_all_phases_are_recorded() {
        let data = sensor_data(vec![
            ("I1_A", vec![0.0, 0.0]),
            ("I2_A", vec![0.0, 0.7]),
            ("I3_A", vec![0.1, 0.0]),
        ]);
        assert_eq!(machine_off_mask(&data, 0.5).unwrap(), vec![true, false]);
    }

    #[rstest]
    fn should_fail_without_any_current_column() {
        let data = sensor_data(vec![("P_kW", vec![0.1])]);
        assert!(machine_off_mask(&data, 0.0).is_err());
    }

    #[rstest]
    fn should_remove_only_machine_off_rows() {
        let data = sensor_data(vec![
            ("IAVR_A", vec![0.0, 2.0, 0.0]),
            ("P_kW", vec![0.0, 1.5, 0.0]),
        ]);
        let pruned = remove_machine_off_rows(data, 0.0).unwrap();
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned.column("P_kW").unwrap(), &[1.5]);
    }
}
