use chrono::{DateTime, Utc};

/// Humanize a minute count the way the duty views show it: "2h 5m", "2h",
/// or "5m".
pub fn human_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 && minutes > 0 {
        format!("{hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h")
    } else {
        format!("{minutes}m")
    }
}

/// Chat-platform timestamp markup rendering a UTC instant in the viewer's
/// local short-time style.
pub fn platform_timestamp(instant: DateTime<Utc>) -> String {
    format!("<t:{}:t>", instant.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn human_minutes_splits_hours_and_minutes() {
        assert_eq!(human_minutes(0), "0m");
        assert_eq!(human_minutes(5), "5m");
        assert_eq!(human_minutes(60), "1h");
        assert_eq!(human_minutes(125), "2h 5m");
    }

    #[test]
    fn platform_timestamp_uses_unix_seconds() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            platform_timestamp(instant),
            format!("<t:{}:t>", instant.timestamp())
        );
    }
}
