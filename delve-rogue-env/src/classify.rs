//! Screen classification.
//!
//! Every synchronization point classifies the screen before anything else
//! interprets it: rewards and encoders fall back to safe values on
//! anything that is not a map view, and dialogs are dismissed before the
//! step is allowed to complete.
use crate::screen::Screen;
use crate::status::StatusParser;

/// Markers that appear on the game-over screen (tombstone art, quit
/// confirmation).
const GAME_OVER_MARKERS: [&str; 2] = ["_______)", "You quit"];

/// Message-line fragment of a `--More--` prompt.
const MORE_MARKER: &str = "ore--";

/// Message-line fragment of a naming/confirmation prompt.
const PROMPT_MARKER: &str = "all it";

/// A blocking dialog and the keystroke that dismisses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogKind {
    /// `--More--`: dismissed with space.
    More,
    /// A prompt awaiting confirmation: dismissed with escape.
    Prompt,
}

impl DialogKind {
    /// The keystroke dismissing this dialog.
    pub fn dismiss_byte(self) -> u8 {
        match self {
            DialogKind::More => b' ',
            DialogKind::Prompt => 0x1b,
        }
    }
}

/// What the current screen shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenKind {
    /// Dungeon geometry with a parseable status line.
    MapView,
    /// A blocking dialog that must be dismissed before play continues.
    Dialog(DialogKind),
    /// The tombstone / quit screen.
    GameOver,
    /// Anything else (inventory, options, a transition frame).
    Unknown,
}

impl ScreenKind {
    /// Short name, for diagnostics records.
    pub fn name(&self) -> &'static str {
        match self {
            ScreenKind::MapView => "map_view",
            ScreenKind::Dialog(_) => "dialog",
            ScreenKind::GameOver => "game_over",
            ScreenKind::Unknown => "unknown",
        }
    }
}

/// Classifies `screen`.
///
/// Game-over markers take precedence over everything; a parseable status
/// line makes a map view; a dialog marker on the message line makes a
/// dialog; anything else is unknown.
pub fn classify(screen: &Screen, parser: &StatusParser) -> ScreenKind {
    if GAME_OVER_MARKERS.iter().any(|m| screen.contains(m)) {
        return ScreenKind::GameOver;
    }
    if parser.parse(screen).is_some() {
        return ScreenKind::MapView;
    }
    let message = screen.message_line();
    if message.contains(MORE_MARKER) {
        return ScreenKind::Dialog(DialogKind::More);
    }
    if message.contains(PROMPT_MARKER) {
        return ScreenKind::Dialog(DialogKind::Prompt);
    }
    ScreenKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::tests::{map_screen, STATUS};

    #[test]
    fn map_view_when_status_parses() {
        let parser = StatusParser::new();
        let screen = map_screen("", STATUS);
        assert_eq!(classify(&screen, &parser), ScreenKind::MapView);
    }

    #[test]
    fn tombstone_takes_precedence() {
        let parser = StatusParser::new();
        let mut rows = vec!["".to_string(), "      __________".to_string()];
        rows.push("     /          \\".to_string());
        rows.push("    |  REST IN   |".to_string());
        rows.push("    |   PEACE    |".to_string());
        rows.push("   *|  _______)  |*".to_string());
        while rows.len() < 23 {
            rows.push(String::new());
        }
        rows.push(STATUS.to_string());
        let screen = Screen::from_rows(&rows);
        assert_eq!(classify(&screen, &parser), ScreenKind::GameOver);
    }

    #[test]
    fn quit_message_is_game_over() {
        let parser = StatusParser::new();
        let screen = Screen::from_rows(&["You quit with 0 gold."]);
        assert_eq!(classify(&screen, &parser), ScreenKind::GameOver);
    }

    #[test]
    fn more_prompt_is_a_dialog() {
        let parser = StatusParser::new();
        let screen = Screen::from_rows(&["You found 23 gold pieces. --More--"]);
        assert_eq!(
            classify(&screen, &parser),
            ScreenKind::Dialog(DialogKind::More)
        );
        assert_eq!(DialogKind::More.dismiss_byte(), b' ');
    }

    #[test]
    fn naming_prompt_is_a_dialog() {
        let parser = StatusParser::new();
        let screen = Screen::from_rows(&["Call it: "]);
        assert_eq!(
            classify(&screen, &parser),
            ScreenKind::Dialog(DialogKind::Prompt)
        );
        assert_eq!(DialogKind::Prompt.dismiss_byte(), 0x1b);
    }

    #[test]
    fn everything_else_is_unknown() {
        let parser = StatusParser::new();
        let screen = Screen::from_rows(&["                      Inventory:"]);
        assert_eq!(classify(&screen, &parser), ScreenKind::Unknown);
    }
}
