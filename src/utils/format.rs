//! Remaining-time formatting

/// Format a second count as MM:SS
pub fn format_remaining(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_minutes() {
        assert_eq!(format_remaining(25 * 60), "25:00");
        assert_eq!(format_remaining(5 * 60), "05:00");
    }

    #[test]
    fn formats_partial_minutes() {
        assert_eq!(format_remaining(90), "01:30");
        assert_eq!(format_remaining(59), "00:59");
    }

    #[test]
    fn formats_zero_and_beyond_an_hour() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(3600), "60:00");
    }
}
