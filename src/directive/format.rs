//! Time formatting for directive text and notifications.

/// Format seconds as `HH:MM:SS`, adding up to three fractional digits when
/// the value is not a whole second.
///
/// The output is accepted by the directive parser for values below 100 hours.
/// Negative input is clamped to zero.
///
/// # Examples
/// ```
/// use notecue::directive::format_timestamp;
///
/// assert_eq!(format_timestamp(3723.0), "01:02:03");
/// assert_eq!(format_timestamp(5.25), "00:00:05.25");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    if millis == 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        let fraction = format!("{:03}", millis);
        format!(
            "{:02}:{:02}:{:02}.{}",
            hours,
            minutes,
            secs,
            fraction.trim_end_matches('0')
        )
    }
}
