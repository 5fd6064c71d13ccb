use crate::dataset::DATE_CHANGE_WINTER;
use anyhow::anyhow;
use chrono::{DateTime, Datelike};
use strum_macros::{Display, EnumString};

/// Window sizes the feature extraction can aggregate sensor readings over.
///
/// The string forms double as the labels used in output directory names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
pub enum AggregationLevel {
    #[strum(serialize = "minute")]
    Minute,
    #[strum(serialize = "10minutes")]
    TenMinutes,
    #[strum(serialize = "15minutes")]
    FifteenMinutes,
    #[strum(serialize = "1hour")]
    OneHour,
    #[strum(serialize = "1day")]
    OneDay,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%#z";

impl AggregationLevel {
    /// Snap a sensor timestamp such as `2017-10-02T13:37:45.123+02` to the
    /// identifier of the window containing it.
    ///
    /// Window identifiers are calculated from the timestamps via string
    /// manipulation to avoid expensive date parsing on every row. The offset
    /// suffix is carried over unchanged, except on the day the recording
    /// region fell back to winter time, which is folded into a single
    /// daily window.
    pub fn window_id(&self, timestamp: &str) -> anyhow::Result<String> {
        let truncated = |len: usize| {
            timestamp
                .get(..len)
                .ok_or_else(|| anyhow!("timestamp '{timestamp}' is too short to aggregate"))
        };
        let offset = timestamp
            .get(timestamp.len().saturating_sub(3)..)
            .filter(|offset| offset.starts_with('+') || offset.starts_with('-'))
            .ok_or_else(|| anyhow!("timestamp '{timestamp}' has no hour offset suffix"))?;

        Ok(match self {
            AggregationLevel::Minute => format!("{}:00.000{offset}", truncated(16)?),
            AggregationLevel::TenMinutes => format!("{}0:00.000{offset}", truncated(15)?),
            AggregationLevel::FifteenMinutes => {
                let minute: u32 = timestamp
                    .get(14..16)
                    .and_then(|minute| minute.parse().ok())
                    .ok_or_else(|| {
                        anyhow!("timestamp '{timestamp}' has no parseable minute field")
                    })?;
                format!("{}{:02}:00.000{offset}", truncated(14)?, minute / 15 * 15)
            }
            AggregationLevel::OneHour => format!("{}:00:00.000{offset}", truncated(13)?),
            AggregationLevel::OneDay => {
                let day_id = format!("{}00:00:00.000{offset}", truncated(11)?);
                if day_id == winter_change_day_in_cet() {
                    DATE_CHANGE_WINTER.to_string()
                } else {
                    day_id
                }
            }
        })
    }
}

/// The fold day's identifier as produced from rows recorded after the
/// clocks went back.
fn winter_change_day_in_cet() -> String {
    let mut id = DATE_CHANGE_WINTER.to_string();
    id.pop();
    id.push('1');
    id
}

/// ISO weekday of a window identifier (1 = Monday, 7 = Sunday).
pub fn weekday(window_id: &str) -> anyhow::Result<u32> {
    let parsed = DateTime::parse_from_str(window_id, TIMESTAMP_FORMAT)
        .map_err(|error| anyhow!("could not parse window id '{window_id}': {error}"))?;
    Ok(parsed.weekday().number_from_monday())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const TIMESTAMP: &str = "2017-10-02T13:37:45.123+02";

    #[rstest]
    #[case(AggregationLevel::Minute, "2017-10-02T13:37:00.000+02")]
    #[case(AggregationLevel::TenMinutes, "2017-10-02T13:30:00.000+02")]
    #[case(AggregationLevel::FifteenMinutes, "2017-10-02T13:30:00.000+02")]
    #[case(AggregationLevel::OneHour, "2017-10-02T13:00:00.000+02")]
    #[case(AggregationLevel::OneDay, "2017-10-02T00:00:00.000+02")]
    fn should_snap_timestamp_to_window_start(
        #[case] level: AggregationLevel,
        #[case] expected: &str,
    ) {
        assert_eq!(level.window_id(TIMESTAMP).unwrap(), expected);
    }

    #[rstest]
    #[case("2017-10-02T13:00:45.000+02", "2017-10-02T13:00:00.000+02")]
    #[case("2017-10-02T13:14:59.999+02", "2017-10-02T13:00:00.000+02")]
    #[case("2017-10-02T13:15:00.000+02", "2017-10-02T13:15:00.000+02")]
    #[case("2017-10-02T13:59:59.999+02", "2017-10-02T13:45:00.000+02")]
    fn should_snap_quarter_hours_downwards(#[case] timestamp: &str, #[case] expected: &str) {
        assert_eq!(
            AggregationLevel::FifteenMinutes
                .window_id(timestamp)
                .unwrap(),
            expected
        );
    }

    #[rstest]
    fn should_fold_winter_time_change_day_into_one_window() {
        // before the change the offset is still +02, after it is +01
        assert_eq!(
            AggregationLevel::OneDay
                .window_id("2017-10-29T01:30:00.000+02")
                .unwrap(),
            "2017-10-29T00:00:00.000+02"
        );
        assert_eq!(
            AggregationLevel::OneDay
                .window_id("2017-10-29T14:00:00.000+01")
                .unwrap(),
            "2017-10-29T00:00:00.000+02"
        );
        assert_eq!(
            AggregationLevel::OneDay
                .window_id("2017-10-30T09:00:00.000+01")
                .unwrap(),
            "2017-10-30T00:00:00.000+01"
        );
    }

    #[rstest]
    #[case("")]
    #[case("2017-10-02")]
    #[case("2017-10-02T13:37:45.123")]
    fn should_reject_timestamps_without_offset_or_time(#[case] timestamp: &str) {
        assert!(AggregationLevel::FifteenMinutes.window_id(timestamp).is_err());
    }

    #[rstest]
    fn should_parse_aggregation_labels() {
        assert_eq!(
            "15minutes".parse::<AggregationLevel>().unwrap(),
            AggregationLevel::FifteenMinutes
        );
        assert_eq!(AggregationLevel::OneHour.to_string(), "1hour");
        assert!("2hours".parse::<AggregationLevel>().is_err());
    }

    #[rstest]
    #[case("2017-10-01T00:00:00.000+02", 7)]
    #[case("2017-10-02T00:00:00.000+02", 1)]
    #[case("2017-10-29T00:00:00.000+02", 7)]
    fn should_number_weekdays_from_monday(#[case] window_id: &str, #[case] expected: u32) {
        assert_eq!(weekday(window_id).unwrap(), expected);
    }

    #[rstest]
    fn should_reject_unparseable_window_id_for_weekday() {
        assert!(weekday("not-a-date").is_err());
    }
}
