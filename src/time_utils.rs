use chrono::DateTime;

const DAY_SECS: i64 = 86_400;

/// Format a time-axis label in UTC, coarser as the visible span grows.
///
/// - span under 2 days -> `HH:MM`
/// - span under 180 days -> `DD.MM`
/// - otherwise -> `MM.YYYY`
pub fn format_time_label(time_secs: i64, span_secs: i64) -> String {
    let Some(date) = DateTime::from_timestamp(time_secs, 0) else {
        return String::new();
    };

    if span_secs < 2 * DAY_SECS {
        date.format("%H:%M").to_string()
    } else if span_secs < 180 * DAY_SECS {
        date.format("%d.%m").to_string()
    } else {
        date.format("%m.%Y").to_string()
    }
}
