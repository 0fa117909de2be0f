//! Status line parsing.
//!
//! The status line is the authoritative source of game progress. Its
//! format is fixed:
//!
//! ```text
//! Level: 3 Gold: 237 Hp: 18(24) Str: 16(16) Arm: 4 Exp: 3/23
//! ```
//!
//! A screen whose last row does not match this pattern is not a map view.
use crate::screen::Screen;
use regex::Regex;
use std::fmt;

/// Names of the parsed fields, in status-line order.
pub const FIELD_NAMES: [&str; 9] = [
    "dungeon_level",
    "gold",
    "current_hp",
    "max_hp",
    "current_strength",
    "max_strength",
    "armor",
    "exp_level",
    "tot_exp",
];

/// Integer fields parsed from the status line of a map view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusFields {
    /// Current dungeon depth.
    pub dungeon_level: u32,
    /// Gold gathered.
    pub gold: u32,
    /// Current hit points.
    pub current_hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current strength.
    pub current_strength: u32,
    /// Maximum strength.
    pub max_strength: u32,
    /// Armor class.
    pub armor: u32,
    /// Experience level.
    pub exp_level: u32,
    /// Total experience points.
    pub tot_exp: u32,
}

impl StatusFields {
    /// Field values in status-line order, for delta computations.
    pub fn values(&self) -> [i64; 9] {
        [
            self.dungeon_level as i64,
            self.gold as i64,
            self.current_hp as i64,
            self.max_hp as i64,
            self.current_strength as i64,
            self.max_strength as i64,
            self.armor as i64,
            self.exp_level as i64,
            self.tot_exp as i64,
        ]
    }
}

impl fmt::Display for StatusFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: {} Gold: {} Hp: {}({}) Str: {}({}) Arm: {} Exp: {}/{}",
            self.dungeon_level,
            self.gold,
            self.current_hp,
            self.max_hp,
            self.current_strength,
            self.max_strength,
            self.armor,
            self.exp_level,
            self.tot_exp,
        )
    }
}

/// Parses status lines with a pattern compiled once at construction.
#[derive(Debug)]
pub struct StatusParser {
    re: Regex,
}

impl Default for StatusParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusParser {
    /// Compiles the status-line pattern.
    pub fn new() -> Self {
        let re = Regex::new(
            r"Level:\s*(?P<dungeon_level>\d+)\s*Gold:\s*(?P<gold>\d+)\s*Hp:\s*(?P<current_hp>\d+)\((?P<max_hp>\d+)\)\s*Str:\s*(?P<current_strength>\d+)\((?P<max_strength>\d+)\)\s*Arm:\s*(?P<armor>\d+)\s*Exp:\s*(?P<exp_level>\d+)/(?P<tot_exp>\d+)",
        )
        .expect("status line pattern is valid");
        Self { re }
    }

    /// Parses the status line of `screen`.
    ///
    /// `None` means the screen is not a map view.
    pub fn parse(&self, screen: &Screen) -> Option<StatusFields> {
        self.parse_line(&screen.status_line())
    }

    /// Parses a single status line.
    pub fn parse_line(&self, line: &str) -> Option<StatusFields> {
        let caps = self.re.captures(line)?;
        let field = |name: &str| caps.name(name).and_then(|m| m.as_str().parse().ok());
        Some(StatusFields {
            dungeon_level: field("dungeon_level")?,
            gold: field("gold")?,
            current_hp: field("current_hp")?,
            max_hp: field("max_hp")?,
            current_strength: field("current_strength")?,
            max_strength: field("max_strength")?,
            armor: field("armor")?,
            exp_level: field("exp_level")?,
            tot_exp: field("tot_exp")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_canonical_line() {
        let parser = StatusParser::new();
        let fields = parser
            .parse_line("Level: 3 Gold: 237 Hp: 18(24) Str: 16(16) Arm: 4 Exp: 3/23")
            .unwrap();
        assert_eq!(fields.dungeon_level, 3);
        assert_eq!(fields.gold, 237);
        assert_eq!(fields.current_hp, 18);
        assert_eq!(fields.max_hp, 24);
        assert_eq!(fields.current_strength, 16);
        assert_eq!(fields.max_strength, 16);
        assert_eq!(fields.armor, 4);
        assert_eq!(fields.exp_level, 3);
        assert_eq!(fields.tot_exp, 23);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let parser = StatusParser::new();
        let fields = parser
            .parse_line("  Level: 1   Gold: 0      Hp: 12(12)   Str: 16(16) Arm: 4  Exp: 1/0   ")
            .unwrap();
        assert_eq!(fields.dungeon_level, 1);
        assert_eq!(fields.gold, 0);
    }

    #[test]
    fn roundtrips_through_display() {
        let parser = StatusParser::new();
        let line = "Level: 12 Gold: 4021 Hp: 1(36) Str: 9(18) Arm: 10 Exp: 9/4242";
        let fields = parser.parse_line(line).unwrap();
        let reparsed = parser.parse_line(&fields.to_string()).unwrap();
        assert_eq!(fields, reparsed);
        assert_eq!(fields.to_string(), line);
    }

    #[test]
    fn rejects_non_status_lines() {
        let parser = StatusParser::new();
        assert!(parser.parse_line("").is_none());
        assert!(parser.parse_line("Which direction?").is_none());
        assert!(parser.parse_line("Level: x Gold: 0").is_none());
        assert!(parser
            .parse_line("Level: 1 Gold: 0 Hp: 12(12) Str: 16(16) Arm: 4 Exp: 1")
            .is_none());
    }
}
