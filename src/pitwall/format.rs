use chrono::{Local, TimeZone};

/// Rendered for sector and lap cells with no time yet.
pub const SECTOR_PLACEHOLDER: &str = "---.---";

/// Lap or total time, `m:ss.SSS`.
pub fn format_time(ms: i64) -> String {
    if ms <= 0 {
        return "0:00.000".to_string();
    }
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}

/// Sector time, `ss.SSS`.
pub fn format_sector(ms: i64) -> String {
    if ms <= 0 {
        return SECTOR_PLACEHOLDER.to_string();
    }
    let seconds = ms / 1000;
    let millis = ms % 1000;
    format!("{seconds:02}.{millis:03}")
}

/// Gap to another car, `+s.SSS`. The leader renders `+0.000`.
pub fn format_gap(gap_ms: i64) -> String {
    format!("+{:.3}", gap_ms as f64 / 1000.0)
}

/// Wall-clock start of the race, `HH:MM` local time.
pub fn format_start_time(epoch_seconds: i64) -> String {
    Local
        .timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
