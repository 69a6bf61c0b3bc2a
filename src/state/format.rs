//! Display formatting for elapsed durations and wall-clock time

use std::fmt::Display;

use chrono::{DateTime, TimeDelta, TimeZone};

/// Render a duration as zero-padded `HH:MM:SS`.
///
/// Sub-second parts are truncated and negative input renders as zero. Hours
/// are not wrapped at 24.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Render an instant as `HH:MM:SS` in its own time zone
pub fn format_wall_clock<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    #[test]
    fn formats_elapsed_seconds() {
        assert_eq!(format_elapsed(TimeDelta::zero()), "00:00:00");
        assert_eq!(format_elapsed(TimeDelta::seconds(3)), "00:00:03");
        assert_eq!(format_elapsed(TimeDelta::seconds(3661)), "01:01:01");
        assert_eq!(format_elapsed(TimeDelta::seconds(86_399)), "23:59:59");
    }

    #[test]
    fn hours_are_not_wrapped() {
        assert_eq!(format_elapsed(TimeDelta::seconds(90_000)), "25:00:00");
        assert_eq!(format_elapsed(TimeDelta::seconds(360_000)), "100:00:00");
    }

    #[test]
    fn truncates_fractions_and_clamps_negatives() {
        assert_eq!(format_elapsed(TimeDelta::milliseconds(59_999)), "00:00:59");
        assert_eq!(format_elapsed(TimeDelta::seconds(-5)), "00:00:00");
    }

    #[test]
    fn wall_clock_uses_the_instant_time_zone() {
        let utc = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(3_723);
        assert_eq!(format_wall_clock(&utc), "01:02:03");

        let Some(offset) = FixedOffset::east_opt(9 * 3600) else {
            panic!("valid offset");
        };
        assert_eq!(format_wall_clock(&utc.with_timezone(&offset)), "10:02:03");
    }
}
