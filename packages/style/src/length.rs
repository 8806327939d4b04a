//! CSS length helpers shared by the editor and the exporter.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Pixels per `rem`
pub const REM_PX: f64 = 16.0;

fn rem_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?|\.\d+)rem\b").expect("rem pattern is valid")
    })
}

/// Format a pixel length: integral values print without decimals,
/// others keep at most three.
pub fn format_px(px: f64) -> String {
    if (px - px.round()).abs() < 1e-9 {
        return format!("{}px", px.round() as i64);
    }

    let fixed = format!("{:.3}", px);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{}px", trimmed)
}

/// Rewrite every `<n>rem` token in a value to its pixel equivalent
pub fn rem_to_px(value: &str) -> Cow<'_, str> {
    rem_pattern().replace_all(value, |caps: &Captures<'_>| {
        let rem: f64 = caps[1].parse().unwrap_or(0.0);
        format_px(rem * REM_PX)
    })
}

/// Read a length in pixels. Accepts `px`, `rem` and unitless numbers.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();

    let lower = value.to_ascii_lowercase();

    if let Some(number) = lower.strip_suffix("rem") {
        return number.trim().parse::<f64>().ok().map(|rem| rem * REM_PX);
    }

    let number = lower.strip_suffix("px").unwrap_or(lower.as_str());
    number.trim().parse::<f64>().ok()
}
