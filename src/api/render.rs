//! Plain-text rendering of the session for the terminal front end

use chrono::{DateTime, Utc};

use crate::core::converter::registry;
use crate::core::favorites::is_selectable;
use crate::shared::types::{ConversionRecord, Favorite, SessionView, UnitCategory};

fn with_abbreviation(category: UnitCategory, value: &str, unit: &str) -> String {
    match registry::abbreviation(category, unit) {
        "" => format!("{} {}", value, unit),
        abbr => format!("{} {}", value, abbr),
    }
}

pub fn render_view(view: &SessionView) -> String {
    let star = if view.is_current_favorite { " ★" } else { "" };
    let output = if view.output_value.is_empty() {
        "—".to_string()
    } else {
        with_abbreviation(view.category, &view.output_value, &view.to_unit)
    };

    format!(
        "[{}] {} → {}{}\n  {} = {}",
        registry::display_name(view.category),
        view.from_unit,
        view.to_unit,
        star,
        with_abbreviation(view.category, &view.input_value, &view.from_unit),
        output,
    )
}

/// Human distance between a record and `now`, e.g. "about 2 hours ago"
pub fn relative_time(timestamp_ms: i64, now: DateTime<Utc>) -> String {
    let Some(then) = DateTime::<Utc>::from_timestamp_millis(timestamp_ms) else {
        return "some time ago".to_string();
    };

    let seconds = (now - then).num_seconds().max(0) as f64;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    let distance = if seconds < 30.0 {
        "less than a minute".to_string()
    } else if seconds < 90.0 {
        "1 minute".to_string()
    } else if minutes < 44.5 {
        format!("{} minutes", minutes.round() as i64)
    } else if minutes < 89.5 {
        "about 1 hour".to_string()
    } else if hours < 24.0 {
        format!("about {} hours", hours.round() as i64)
    } else if hours < 42.0 {
        "1 day".to_string()
    } else if days < 30.0 {
        format!("{} days", days.round() as i64)
    } else if days < 45.0 {
        "about 1 month".to_string()
    } else if days < 365.0 {
        format!("{} months", (days / 30.0).round().max(2.0) as i64)
    } else {
        let years = (days / 365.0).floor() as i64;
        if years == 1 {
            "about 1 year".to_string()
        } else {
            format!("about {} years", years)
        }
    };

    format!("{} ago", distance)
}

fn history_row(index: usize, record: &ConversionRecord, favorites: &[Favorite], now: DateTime<Utc>) -> String {
    let pair = Favorite::new(&record.from.unit, &record.to.unit, record.category);
    let star = if favorites.iter().any(|f| f.matches(&pair)) { "★" } else { "☆" };

    format!(
        "{:>3}. {} {} → {}  ({}, {})",
        index + 1,
        star,
        with_abbreviation(record.category, &record.from.value, &record.from.unit),
        with_abbreviation(record.category, &record.to.value, &record.to.unit),
        record.category,
        relative_time(record.timestamp, now),
    )
}

pub fn render_history(view: &SessionView, now: DateTime<Utc>) -> String {
    if view.history.is_empty() {
        return "No conversions yet".to_string();
    }

    view.history
        .iter()
        .enumerate()
        .map(|(i, record)| history_row(i, record, &view.favorites, now))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_favorites(view: &SessionView) -> String {
    if view.favorites.is_empty() {
        return "No favorites yet".to_string();
    }

    view.favorites
        .iter()
        .enumerate()
        .map(|(i, fav)| {
            let note = if is_selectable(fav) { "" } else { " (unavailable)" };
            format!("{:>3}. {} → {}  ({}){}", i + 1, fav.from, fav.to, fav.category, note)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_units(category: UnitCategory) -> String {
    let units = registry::unit_dtos(category)
        .into_iter()
        .map(|u| format!("{} ({})", u.name, u.abbreviation))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} units: {}", registry::display_name(category), units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::shared::types::ConversionSide;

    fn view() -> SessionView {
        SessionView {
            category: UnitCategory::Temperature,
            from_unit: "Celsius".to_string(),
            to_unit: "Fahrenheit".to_string(),
            input_value: "100".to_string(),
            output_value: "212.00".to_string(),
            history: Vec::new(),
            favorites: Vec::new(),
            is_current_favorite: true,
        }
    }

    #[test]
    fn test_render_view_uses_abbreviations() {
        let text = render_view(&view());
        assert!(text.contains("Celsius → Fahrenheit ★"));
        assert!(text.contains("100 °C = 212.00 °F"));
    }

    #[test]
    fn test_render_view_without_output() {
        let mut v = view();
        v.output_value.clear();
        v.is_current_favorite = false;
        let text = render_view(&v);
        assert!(text.ends_with("= —"));
        assert!(!text.contains('★'));
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        let ago = |d: Duration| relative_time((now - d).timestamp_millis(), now);

        assert_eq!(ago(Duration::seconds(5)), "less than a minute ago");
        assert_eq!(ago(Duration::seconds(60)), "1 minute ago");
        assert_eq!(ago(Duration::minutes(10)), "10 minutes ago");
        assert_eq!(ago(Duration::minutes(60)), "about 1 hour ago");
        assert_eq!(ago(Duration::hours(5)), "about 5 hours ago");
        assert_eq!(ago(Duration::hours(30)), "1 day ago");
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(400)), "about 1 year ago");
    }

    #[test]
    fn test_history_rows_mark_favorite_pairs() {
        let mut v = view();
        v.history = vec![
            ConversionRecord::new(
                ConversionSide::new("100", "Celsius"),
                ConversionSide::new("212.00", "Fahrenheit"),
                UnitCategory::Temperature,
            ),
            ConversionRecord::new(
                ConversionSide::new("1", "Meters"),
                ConversionSide::new("3.2808", "Feet"),
                UnitCategory::Length,
            ),
        ];
        v.favorites = vec![Favorite::new("Celsius", "Fahrenheit", UnitCategory::Temperature)];

        let text = render_history(&v, Utc::now());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1. ★ 100 °C → 212.00 °F"));
        assert!(lines[1].contains("2. ☆ 1 m → 3.2808 ft"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(render_history(&view(), Utc::now()), "No conversions yet");
        assert_eq!(render_favorites(&view()), "No favorites yet");
    }

    #[test]
    fn test_stale_favorite_is_marked() {
        let mut v = view();
        v.favorites = vec![Favorite::new("Stone", "Pounds", UnitCategory::Weight)];
        assert!(render_favorites(&v).contains("(unavailable)"));
    }

    #[test]
    fn test_render_units() {
        let text = render_units(UnitCategory::Weight);
        assert!(text.starts_with("Weight units:"));
        assert!(text.contains("Kilograms (kg)"));
    }
}
