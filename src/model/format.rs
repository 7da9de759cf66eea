//! Display strings used by the movie screens

use chrono::NaiveDate;

/// Placeholder for values the API did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// `2024-06-11` -> `Tue, 11 Jun 2024`
pub fn format_release_date(date: Option<&str>) -> String {
    match date {
        None => "Date not available".to_string(),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(parsed) => parsed.format("%a, %d %b %Y").to_string(),
            Err(_) => "Invalid date".to_string(),
        },
    }
}

/// Runtime minutes as `2h 6m`; zero or missing is `N/A`
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{}h {}m", m / 60, m % 60),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Vote average out of ten, one decimal
pub fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}/10")
}
