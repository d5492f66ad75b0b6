//! Text commands for the terminal front end
//!
//! Each input line becomes either session events or a read-only display request.

use crate::core::converter::registry;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::{Key, SessionEvent};
use crate::shared::types::{SessionView, UnitCategory};

pub const HELP: &str = "\
Commands:
  cat <length|weight|temperature>   switch category
  from <unit> / to <unit>           choose units (name or abbreviation)
  key <k> [k ...]                   keypad: 0-9, '.', C (clear), back
  type <value>                      keyboard entry
  swap                              swap units
  fav                               toggle the current pair as favorite
  star <n>                          toggle favorite from history row n
  favs / pick <n>                   list favorites / use favorite n
  unfav <n>                         remove favorite n
  history / clear                   list / clear history
  units                             list units of the current category
  reset / help / quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Events(Vec<SessionEvent>),
    ShowHistory,
    ShowFavorites,
    ShowUnits,
    Help,
    Quit,
}

/// Resolve a unit typed by the user within a category
pub fn resolve_unit(category: UnitCategory, text: &str) -> Option<&'static str> {
    let text = text.trim();
    let bare = text.trim_start_matches('°');
    registry::units_for(category)
        .iter()
        .find(|u| {
            u.name.eq_ignore_ascii_case(text)
                || u.abbreviation == text
                || u.abbreviation.trim_start_matches('°').eq_ignore_ascii_case(bare)
        })
        .map(|u| u.name)
}

fn parse_key(token: &str) -> AppResult<Key> {
    match token {
        "." | "," => Ok(Key::Decimal),
        "C" | "c" | "clear" => Ok(Key::Clear),
        "back" | "bs" | "⌫" => Ok(Key::Backspace),
        _ => token
            .parse::<u8>()
            .ok()
            .filter(|d| *d <= 9 && token.len() == 1)
            .map(Key::Digit)
            .ok_or_else(|| AppError::Validation(format!("Unknown key: {}", token))),
    }
}

/// 1-based row number
fn parse_row(arg: &str, len: usize, what: &str) -> AppResult<usize> {
    let n: usize = arg
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Expected a {} number, got '{}'", what, arg)))?;
    if n == 0 || n > len {
        return Err(AppError::Validation(format!("No {} #{} (have {})", what, n, len)));
    }
    Ok(n - 1)
}

fn single(event: SessionEvent) -> Command {
    Command::Events(vec![event])
}

/// Parse one line against the current view (needed to resolve units and row numbers)
pub fn parse_command(line: &str, view: &SessionView) -> AppResult<Command> {
    let line = line.trim();
    let (name, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let arg = arg.trim();

    let command = match name.to_lowercase().as_str() {
        "cat" | "category" => single(SessionEvent::SelectCategory(arg.parse()?)),
        "from" | "to" => {
            let unit = resolve_unit(view.category, arg).ok_or_else(|| {
                AppError::Validation(format!("Unknown {} unit: {}", view.category, arg))
            })?;
            if name.eq_ignore_ascii_case("from") {
                single(SessionEvent::SelectFromUnit(unit.to_string()))
            } else {
                single(SessionEvent::SelectToUnit(unit.to_string()))
            }
        }
        "key" => {
            let keys = arg
                .split_whitespace()
                .map(parse_key)
                .collect::<AppResult<Vec<_>>>()?;
            if keys.is_empty() {
                return Err(AppError::Validation("key needs at least one key".to_string()));
            }
            Command::Events(keys.into_iter().map(SessionEvent::Keypad).collect())
        }
        "type" => single(SessionEvent::Type(arg.to_string())),
        "swap" => single(SessionEvent::SwapUnits),
        "fav" => single(SessionEvent::ToggleCurrentFavorite),
        "star" => {
            let index = parse_row(arg, view.history.len(), "history row")?;
            single(SessionEvent::ToggleFavoriteFromHistory(view.history[index].id.clone()))
        }
        "pick" => {
            let index = parse_row(arg, view.favorites.len(), "favorite")?;
            single(SessionEvent::SelectFavorite(view.favorites[index].clone()))
        }
        "unfav" => {
            let index = parse_row(arg, view.favorites.len(), "favorite")?;
            single(SessionEvent::ToggleFavorite(view.favorites[index].clone()))
        }
        "clear" => single(SessionEvent::ClearHistory),
        "reset" => single(SessionEvent::Reset),
        "history" => Command::ShowHistory,
        "favs" | "favorites" => Command::ShowFavorites,
        "units" => Command::ShowUnits,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "" => Command::Events(Vec::new()),
        other => return Err(AppError::Validation(format!("Unknown command: {} (try 'help')", other))),
    };

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::{ConversionRecord, ConversionSide, Favorite};

    fn view() -> SessionView {
        SessionView {
            category: UnitCategory::Length,
            from_unit: "Meters".to_string(),
            to_unit: "Feet".to_string(),
            input_value: "1".to_string(),
            output_value: "3.2808".to_string(),
            history: vec![ConversionRecord::new(
                ConversionSide::new("1", "Meters"),
                ConversionSide::new("3.2808", "Feet"),
                UnitCategory::Length,
            )],
            favorites: vec![Favorite::new("Celsius", "Kelvin", UnitCategory::Temperature)],
            is_current_favorite: false,
        }
    }

    #[test]
    fn test_resolve_unit_by_name_or_abbreviation() {
        assert_eq!(resolve_unit(UnitCategory::Length, "km"), Some("Kilometers"));
        assert_eq!(resolve_unit(UnitCategory::Length, "feet"), Some("Feet"));
        assert_eq!(resolve_unit(UnitCategory::Temperature, "°F"), Some("Fahrenheit"));
        assert_eq!(resolve_unit(UnitCategory::Temperature, "c"), Some("Celsius"));
        assert_eq!(resolve_unit(UnitCategory::Weight, "km"), None);
    }

    #[test]
    fn test_parse_unit_commands() {
        assert_eq!(
            parse_command("to in", &view()).unwrap(),
            Command::Events(vec![SessionEvent::SelectToUnit("Inches".to_string())])
        );
        assert!(parse_command("from kg", &view()).is_err());
    }

    #[test]
    fn test_parse_keypad_sequence() {
        assert_eq!(
            parse_command("key 1 . 5 back C", &view()).unwrap(),
            Command::Events(vec![
                SessionEvent::Keypad(Key::Digit(1)),
                SessionEvent::Keypad(Key::Decimal),
                SessionEvent::Keypad(Key::Digit(5)),
                SessionEvent::Keypad(Key::Backspace),
                SessionEvent::Keypad(Key::Clear),
            ])
        );
        assert!(parse_command("key 12", &view()).is_err());
        assert!(parse_command("key", &view()).is_err());
    }

    #[test]
    fn test_row_numbers_resolve_against_view() {
        let v = view();
        assert_eq!(
            parse_command("star 1", &v).unwrap(),
            Command::Events(vec![SessionEvent::ToggleFavoriteFromHistory(v.history[0].id.clone())])
        );
        assert_eq!(
            parse_command("pick 1", &v).unwrap(),
            Command::Events(vec![SessionEvent::SelectFavorite(v.favorites[0].clone())])
        );
        assert_eq!(
            parse_command("unfav 1", &v).unwrap(),
            Command::Events(vec![SessionEvent::ToggleFavorite(v.favorites[0].clone())])
        );
        assert!(parse_command("unfav 3", &v).is_err());
        assert!(parse_command("pick 2", &v).is_err());
        assert!(parse_command("star 0", &v).is_err());
    }

    #[test]
    fn test_misc_commands() {
        assert_eq!(
            parse_command("cat weight", &view()).unwrap(),
            Command::Events(vec![SessionEvent::SelectCategory(UnitCategory::Weight)])
        );
        assert_eq!(parse_command("  quit ", &view()).unwrap(), Command::Quit);
        assert_eq!(parse_command("", &view()).unwrap(), Command::Events(Vec::new()));
        assert!(parse_command("volume", &view()).is_err());
    }
}
