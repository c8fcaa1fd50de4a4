use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{GameError, NUM_COLS};

/// A chip dropped into one column. Moves compare by column, so sorted
/// collections of moves iterate left to right.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Move {
    column: usize,
}

impl Move {
    pub fn new(column: usize) -> Result<Self, GameError> {
        if column >= NUM_COLS {
            return Err(GameError::ColumnOutOfBounds { column });
        }
        Ok(Self { column })
    }

    /// Caller guarantees `column < NUM_COLS`.
    pub(crate) fn unchecked(column: usize) -> Self {
        debug_assert!(column < NUM_COLS);
        Self { column }
    }

    pub fn column(self) -> usize {
        self.column
    }
}

impl TryFrom<usize> for Move {
    type Error = GameError;

    fn try_from(column: usize) -> Result<Self, Self::Error> {
        Move::new(column)
    }
}

impl From<Move> for usize {
    fn from(mv: Move) -> usize {
        mv.column
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}", self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_column() {
        assert_eq!(
            Move::new(NUM_COLS),
            Err(GameError::ColumnOutOfBounds { column: NUM_COLS })
        );
        assert_eq!(Move::new(6).unwrap().column(), 6);
    }

    #[test]
    fn orders_by_column() {
        let mut moves = vec![Move::new(4).unwrap(), Move::new(0).unwrap(), Move::new(2).unwrap()];
        moves.sort();
        let columns: Vec<usize> = moves.into_iter().map(Move::column).collect();
        assert_eq!(columns, vec![0, 2, 4]);
    }

    #[test]
    fn deserialization_validates_column() {
        let mv: Move = serde_json::from_str("3").unwrap();
        assert_eq!(mv.column(), 3);
        assert!(serde_json::from_str::<Move>("7").is_err());
        assert_eq!(serde_json::to_string(&mv).unwrap(), "3");
    }
}
