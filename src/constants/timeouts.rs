use std::time::Duration;

/// Proposal cooldown (defaults, can be overridden via env vars)
pub const DEFAULT_POST_COOLDOWN_HOURS: u64 = 24; // One accepted proposal per user per day
pub const DEFAULT_DELETION_GRACE_SECONDS: u64 = 30; // Time to read the warning before removal

/// Thread-create events for threads older than this are re-deliveries, not new posts
pub const NEW_THREAD_MAX_AGE_SECONDS: u64 = 300;

/// Pause before retrying a failed cooldown file write
pub const PERSIST_RETRY_DELAY_MILLIS: u64 = 250;

/// Format duration for display
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if total_secs < 60 {
        format!("{} second{}", total_secs, if total_secs == 1 { "" } else { "s" })
    } else if total_secs < 3600 {
        let mins = total_secs / 60;
        format!("{} minute{}", mins, if mins == 1 { "" } else { "s" })
    } else if total_secs < 86400 * 2 {
        let hours = total_secs / 3600;
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = total_secs / 86400;
        format!("{} day{}", days, if days == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults() {
        assert_eq!(
            format_duration(Duration::from_secs(DEFAULT_POST_COOLDOWN_HOURS * 3600)),
            "24 hours"
        );
        assert_eq!(
            format_duration(Duration::from_secs(DEFAULT_DELETION_GRACE_SECONDS)),
            "30 seconds"
        );
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_duration(Duration::from_secs(1)), "1 second");
        assert_eq!(format_duration(Duration::from_secs(90)), "1 minute");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1 hour");
        assert_eq!(format_duration(Duration::from_secs(72 * 3600)), "3 days");
    }
}
