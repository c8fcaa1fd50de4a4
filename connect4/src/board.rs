//! Immutable Connect Four grid.
//!
//! Rows are 0-indexed from the top, columns from the left. Boards are stored
//! column-major and every column sits behind an `Arc`, so applying a move
//! copies one column and shares the other six with the parent board.
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{GameError, Move, Turn, NUM_COLS, NUM_ROWS};

type Column = [Option<Turn>; NUM_ROWS];

/// Every four-in-a-row that fits on the board, computed once.
static LINES: Lazy<Vec<Line>> = Lazy::new(generate_lines);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    columns: [Arc<Column>; NUM_COLS],
}

impl Board {
    pub fn empty() -> Self {
        let column = Arc::new([None; NUM_ROWS]);
        Self {
            columns: std::array::from_fn(|_| Arc::clone(&column)),
        }
    }

    /// Parse a diagram given top row first: `.` or space for an empty cell,
    /// otherwise a side's initial.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GameError> {
        if rows.len() != NUM_ROWS {
            return Err(GameError::BoardDiagram {
                row: rows.len(),
                reason: format!("expected {NUM_ROWS} rows"),
            });
        }
        let mut columns = [[None; NUM_ROWS]; NUM_COLS];
        for (row, text) in rows.iter().enumerate() {
            let cells: Vec<char> = text.as_ref().chars().collect();
            if cells.len() != NUM_COLS {
                return Err(GameError::BoardDiagram {
                    row,
                    reason: format!("expected {NUM_COLS} cells, found {}", cells.len()),
                });
            }
            for (col, cell) in cells.into_iter().enumerate() {
                columns[col][row] = match cell {
                    '.' | ' ' => None,
                    other => Some(Turn::from_initial(other).ok_or_else(|| {
                        GameError::BoardDiagram {
                            row,
                            reason: format!("unknown cell {other:?}"),
                        }
                    })?),
                };
            }
        }
        for (col, column) in columns.iter().enumerate() {
            for row in 1..NUM_ROWS {
                if column[row - 1].is_some() && column[row].is_none() {
                    return Err(GameError::BoardDiagram {
                        row: row - 1,
                        reason: format!("chip in column {col} is floating"),
                    });
                }
            }
        }
        Ok(Self {
            columns: columns.map(Arc::new),
        })
    }

    /// The board after `player` drops a chip into `mv`'s column.
    pub fn apply(&self, player: Turn, mv: Move) -> Result<Board, GameError> {
        let col = mv.column();
        let column = &self.columns[col];
        let row = column
            .iter()
            .rposition(Option::is_none)
            .ok_or(GameError::ColumnFull { column: col })?;
        let mut updated = **column;
        updated[row] = Some(player);
        let mut columns = self.columns.clone();
        columns[col] = Arc::new(updated);
        Ok(Board { columns })
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<Turn> {
        debug_assert!(row < NUM_ROWS && col < NUM_COLS);
        self.columns[col][row]
    }

    pub fn column_is_full(&self, col: usize) -> bool {
        self.columns[col][0].is_some()
    }

    pub fn is_full(&self) -> bool {
        (0..NUM_COLS).all(|col| self.column_is_full(col))
    }

    pub fn chip_count(&self) -> usize {
        self.columns
            .iter()
            .map(|column| column.iter().filter(|cell| cell.is_some()).count())
            .sum()
    }

    /// One move per open column, left to right. Empty once the game is over,
    /// whether by a connect four or a full board.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.winner().is_some() {
            return Vec::new();
        }
        (0..NUM_COLS)
            .filter(|&col| !self.column_is_full(col))
            .map(Move::unchecked)
            .collect()
    }

    /// The side holding a complete line of four, if any.
    pub fn winner(&self) -> Option<Turn> {
        LINES.iter().find_map(|line| line.owner(self))
    }

    pub fn all_lines() -> &'static [Line] {
        &LINES
    }

    /// Multi-line drawing, top row first, each line prefixed by `indent`.
    pub fn render(&self, indent: &str) -> String {
        let mut out = String::new();
        for row in 0..NUM_ROWS {
            out.push_str(indent);
            out.push('|');
            for col in 0..NUM_COLS {
                out.push(self.cell_at(row, col).map_or(' ', Turn::initial));
                out.push('|');
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

/// A cell coordinate on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    pub row: usize,
    pub column: usize,
}

impl Location {
    pub fn player(self, board: &Board) -> Option<Turn> {
        board.cell_at(self.row, self.column)
    }

    fn offset(self, orientation: Orientation) -> Option<Location> {
        let (drow, dcol) = orientation.delta();
        let row = self.row.checked_add_signed(drow).filter(|&r| r < NUM_ROWS)?;
        let column = self.column.checked_add_signed(dcol).filter(|&c| c < NUM_COLS)?;
        Some(Location { row, column })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    DownSlash,
    UpSlash,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::DownSlash,
        Orientation::UpSlash,
    ];

    /// Step as `(row, column)`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
            Orientation::DownSlash => (-1, 1),
            Orientation::UpSlash => (1, 1),
        }
    }
}

/// Four cells in a straight line, all on the board.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Line {
    orientation: Orientation,
    cells: [Location; 4],
}

impl Line {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn cells(&self) -> &[Location; 4] {
        &self.cells
    }

    fn owner(&self, board: &Board) -> Option<Turn> {
        let first = self.cells[0].player(board)?;
        self.cells[1..]
            .iter()
            .all(|loc| loc.player(board) == Some(first))
            .then_some(first)
    }

    fn starting_at(start: Location, orientation: Orientation) -> Option<Line> {
        let mut cells = [start; 4];
        for i in 1..4 {
            cells[i] = cells[i - 1].offset(orientation)?;
        }
        Some(Line { orientation, cells })
    }
}

fn generate_lines() -> Vec<Line> {
    let mut lines = Vec::new();
    for orientation in Orientation::ALL {
        for row in 0..NUM_ROWS {
            for column in 0..NUM_COLS {
                if let Some(line) = Line::starting_at(Location { row, column }, orientation) {
                    lines.push(line);
                }
            }
        }
    }
    lines
}
