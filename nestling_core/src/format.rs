//! Human-facing formatting of durations.

/// Format seconds as `m:ss`, e.g. `65` -> `"1:05"`
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Describe a gap between contractions in words
///
/// Non-positive gaps have no meaningful description and return `"N/A"`.
pub fn describe_interval(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "N/A".into();
    }

    let seconds = seconds.round() as u64;
    match seconds {
        0..=59 => plural(seconds, "second"),
        60..=3569 => {
            let minutes = ((seconds as f64) / 60.0).round() as u64;
            plural(minutes, "minute")
        }
        _ => {
            let hours = ((seconds as f64) / 3600.0).round() as u64;
            format!("about {}", plural(hours, "hour"))
        }
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
