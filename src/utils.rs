use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use tabled::Table;

use crate::types::{Track, TrackTableRow};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Steadily ticking spinner, cleared by the caller with `finish_and_clear`.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Renders the first `limit` tracks as a table.
pub fn track_table(tracks: &[Track], limit: usize) -> String {
    let rows: Vec<TrackTableRow> = tracks.iter().take(limit).map(TrackTableRow::from).collect();
    Table::new(rows).to_string()
}

/// Human readable interval, e.g. `24 hours`, `90 minutes`, `5 seconds`.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    if secs >= 3600 && secs % 3600 == 0 {
        plural(secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else if secs > 0 {
        plural(secs, "second")
    } else {
        format!("{} ms", interval.as_millis())
    }
}
