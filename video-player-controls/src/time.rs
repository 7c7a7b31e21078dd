/// Formats a position in seconds as `M:SS`.
///
/// Seconds are floor-truncated, minutes are not wrapped into hours. Negative,
/// NaN and infinite values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };

    let minutes = total / 60;
    let seconds = total % 60;
    format!("{minutes}:{seconds:02}")
}
