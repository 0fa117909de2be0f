//! The emulated screen and its single-pass scan.
use itertools::iproduct;

/// Number of rows of the emulated terminal.
pub const SCREEN_ROWS: usize = 24;

/// Number of columns of the emulated terminal.
pub const SCREEN_COLS: usize = 80;

/// First and one-past-last row of the dungeon map. Row 0 is the message
/// line, row 23 the status line.
pub const MAP_ROW_RANGE: (usize, usize) = (1, 23);

/// Cells the player cannot stand on.
pub const IMPASSABLE: &[char] = &['|', '-', ' '];

const PLAYER_MARKER: char = '@';
const STAIRS_MARKER: char = '%';
const DOOR_MARKER: char = '+';

/// A cell position in screen coordinates.
///
/// `row` is 1-indexed into the visible screen: the first map row is
/// `row == 1`. Encoders subtract 1 to address their 22-row layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Screen row.
    pub row: usize,
    /// Screen column.
    pub col: usize,
}

impl Position {
    /// Constructs a position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(&self, other: &Position) -> usize {
        abs_diff(self.row, other.row) + abs_diff(self.col, other.col)
    }
}

fn abs_diff(a: usize, b: usize) -> usize {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// An immutable snapshot of the terminal screen.
///
/// Fixed 24×80 character grid: row 0 is the message line, rows 1–22 the
/// dungeon map, row 23 the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    rows: Vec<Vec<char>>,
}

impl Screen {
    /// An all-blank screen.
    pub fn blank() -> Self {
        Self {
            rows: vec![vec![' '; SCREEN_COLS]; SCREEN_ROWS],
        }
    }

    /// Builds a screen from string rows, padding or truncating each row
    /// to 80 columns and the row count to 24.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let mut grid = vec![vec![' '; SCREEN_COLS]; SCREEN_ROWS];
        for (i, row) in rows.iter().take(SCREEN_ROWS).enumerate() {
            for (j, c) in row.as_ref().chars().take(SCREEN_COLS).enumerate() {
                grid[i][j] = c;
            }
        }
        Self { rows: grid }
    }

    /// The character at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> char {
        self.rows[row][col]
    }

    /// The message line (row 0) as a string.
    pub fn message_line(&self) -> String {
        self.row_string(0)
    }

    /// The status line (row 23) as a string.
    pub fn status_line(&self) -> String {
        self.row_string(SCREEN_ROWS - 1)
    }

    /// Row `i` as a string.
    pub fn row_string(&self, i: usize) -> String {
        self.rows[i].iter().collect()
    }

    /// Whether any row contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        (0..SCREEN_ROWS).any(|i| self.row_string(i).contains(needle))
    }

    /// Scans the 22 map rows once, classifying every cell.
    pub fn scan(&self) -> ScreenScan {
        let mut scan = ScreenScan::default();
        for (i, j) in iproduct!(MAP_ROW_RANGE.0..MAP_ROW_RANGE.1, 0..SCREEN_COLS) {
            let cell = self.rows[i][j];
            if !IMPASSABLE.contains(&cell) {
                scan.passable.push(Position::new(i, j));
            }
            match cell {
                // last marker found wins, mirroring raw scan order
                PLAYER_MARKER => scan.player = Some(Position::new(i, j)),
                STAIRS_MARKER => scan.stairs = Some(Position::new(i, j)),
                DOOR_MARKER => scan.doors.push(Position::new(i, j)),
                _ => {}
            }
        }
        scan
    }

    /// Count of non-blank cells in the map rows.
    ///
    /// Grows as the player uncovers the level; constant within a fully
    /// explored floor.
    pub fn explored_tiles(&self) -> usize {
        iproduct!(MAP_ROW_RANGE.0..MAP_ROW_RANGE.1, 0..SCREEN_COLS)
            .filter(|&(i, j)| self.rows[i][j] != ' ')
            .count()
    }

    /// Count of passable cells over the whole screen.
    pub fn passable_tiles(&self) -> usize {
        iproduct!(0..SCREEN_ROWS, 0..SCREEN_COLS)
            .filter(|&(i, j)| !IMPASSABLE.contains(&self.rows[i][j]))
            .count()
    }
}

/// Positions extracted from one pass over the map rows.
#[derive(Clone, Debug, Default)]
pub struct ScreenScan {
    /// The player marker, if visible. When several appear, the last in
    /// scan order wins.
    pub player: Option<Position>,

    /// The stairs marker, if visible.
    pub stairs: Option<Position>,

    /// All door markers.
    pub doors: Vec<Position>,

    /// All passable cells.
    pub passable: Vec<Position>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small synthetic map screen with a parseable status line.
    pub(crate) fn map_screen(message: &str, status: &str) -> Screen {
        let mut rows = vec![message.to_string()];
        rows.push("    ------------".to_string());
        rows.push("    |..........|".to_string());
        rows.push("    |...@...%..+".to_string());
        rows.push("    |..........|".to_string());
        rows.push("    ------------".to_string());
        while rows.len() < 23 {
            rows.push(String::new());
        }
        rows.push(status.to_string());
        Screen::from_rows(&rows)
    }

    pub(crate) const STATUS: &str =
        "Level: 1  Gold: 0      Hp: 12(12)   Str: 16(16) Arm: 4  Exp: 1/0";

    #[test]
    fn scan_finds_all_position_sets() {
        let screen = map_screen("", STATUS);
        let scan = screen.scan();
        assert_eq!(scan.player, Some(Position::new(3, 8)));
        assert_eq!(scan.stairs, Some(Position::new(3, 12)));
        assert_eq!(scan.doors, vec![Position::new(3, 15)]);
        assert!(scan.passable.contains(&Position::new(2, 5)));
        assert!(!scan.passable.contains(&Position::new(1, 5)));
    }

    #[test]
    fn last_player_marker_wins() {
        let screen = Screen::from_rows(&["", ".@.", "..@"]);
        assert_eq!(screen.scan().player, Some(Position::new(2, 2)));
    }

    #[test]
    fn missing_player_is_none() {
        assert_eq!(Screen::blank().scan().player, None);
    }

    #[test]
    fn explored_tiles_ignores_message_and_status() {
        let screen = Screen::from_rows(&["--More--", ".."]);
        assert_eq!(screen.explored_tiles(), 2);
    }

    #[test]
    fn manhattan_distance() {
        let a = Position::new(2, 3);
        let b = Position::new(5, 1);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(b.manhattan(&a), 5);
    }
}
