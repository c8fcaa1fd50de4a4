use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::Context;
use connect4::{Board, GameError, Move, MoveResult, SyncPlayer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::setup::SetupError;

/// Picks uniformly among the legal moves. The same seed replays the same game.
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            name: format!("Random-{seed}"),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_arg(seed: &str) -> Result<Self, SetupError> {
        seed.trim()
            .parse()
            .map(Self::new)
            .map_err(|_| SetupError::BadSeed(seed.to_string()))
    }
}

impl SyncPlayer for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board) -> MoveResult {
        let moves = board.legal_moves();
        if moves.is_empty() {
            return Err(GameError::NoMoves.into());
        }
        Ok(moves[self.rng.gen_range(0..moves.len())])
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilePlayerError {
    #[error("line {line}: the file ran out of moves")]
    EndOfFile { line: usize },

    #[error("line {line} specifies invalid move {text:?}")]
    InvalidMove { line: usize, text: String },

    #[error("line {line} specifies unplayable move {column}")]
    Unplayable { line: usize, column: i64 },
}

/// Replays moves from text, one column per line. This is the format the
/// `moveN=` targets of the mega logger write.
pub struct FilePlayer<R> {
    name: String,
    lines: R,
    line: usize,
}

impl FilePlayer<BufReader<File>> {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("opening move file {path}"))?;
        Ok(Self::from_reader(path, BufReader::new(file)))
    }
}

impl<R: BufRead> FilePlayer<R> {
    pub fn from_reader(name: impl Into<String>, lines: R) -> Self {
        Self {
            name: name.into(),
            lines,
            line: 0,
        }
    }
}

impl<R: BufRead> SyncPlayer for FilePlayer<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board) -> MoveResult {
        let mut text = String::new();
        let read = self
            .lines
            .read_line(&mut text)
            .with_context(|| format!("reading move file {}", self.name))?;
        self.line += 1;
        let line = self.line;
        if read == 0 {
            return Err(FilePlayerError::EndOfFile { line }.into());
        }
        let text = text.trim();
        let column: i64 = text.parse().map_err(|_| FilePlayerError::InvalidMove {
            line,
            text: text.to_string(),
        })?;
        board
            .legal_moves()
            .into_iter()
            .find(|mv| i64::try_from(mv.column()) == Ok(column))
            .ok_or_else(|| FilePlayerError::Unplayable { line, column }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect4::Turn;
    use std::io::Cursor;

    fn mv(column: usize) -> Move {
        Move::new(column).unwrap()
    }

    fn file_error(result: MoveResult) -> FilePlayerError {
        result.unwrap_err().downcast::<FilePlayerError>().unwrap()
    }

    #[test]
    fn random_player_is_reproducible_and_legal() {
        let mut board = Board::empty();
        for _ in 0..5 {
            board = board.apply(Turn::First, mv(6)).unwrap();
        }
        let mut a = RandomPlayer::new(7);
        let mut b = RandomPlayer::new(7);
        for _ in 0..50 {
            let choice = a.get_move(&board).unwrap();
            assert_eq!(choice, b.get_move(&board).unwrap());
            assert!(board.legal_moves().contains(&choice));
        }
        let full_column = board.apply(Turn::First, mv(6)).unwrap();
        for _ in 0..50 {
            assert_ne!(a.get_move(&full_column).unwrap(), mv(6));
        }
    }

    #[test]
    fn random_seed_must_be_an_integer() {
        assert_eq!(RandomPlayer::from_seed_arg("12").unwrap().name(), "Random-12");
        assert!(matches!(
            RandomPlayer::from_seed_arg("-1"),
            Err(SetupError::BadSeed(_))
        ));
    }

    #[test]
    fn file_player_reads_one_move_per_line() {
        let mut player = FilePlayer::from_reader("moves.txt", Cursor::new("3\n 4 \n"));
        let board = Board::empty();
        assert_eq!(player.get_move(&board).unwrap(), mv(3));
        assert_eq!(player.get_move(&board).unwrap(), mv(4));
        assert_eq!(
            file_error(player.get_move(&board)),
            FilePlayerError::EndOfFile { line: 3 }
        );
    }

    #[test]
    fn file_player_reports_the_offending_line() {
        let mut board = Board::empty();
        for turn in [Turn::First, Turn::Second].repeat(3) {
            board = board.apply(turn, mv(0)).unwrap();
        }
        let mut player = FilePlayer::from_reader("moves.txt", Cursor::new("1\nseven\n0\n9\n"));
        assert_eq!(player.get_move(&board).unwrap(), mv(1));
        assert_eq!(
            file_error(player.get_move(&board)),
            FilePlayerError::InvalidMove {
                line: 2,
                text: "seven".to_string()
            }
        );
        assert_eq!(
            file_error(player.get_move(&board)),
            FilePlayerError::Unplayable { line: 3, column: 0 }
        );
        let err = player.get_move(&board).unwrap_err();
        assert_eq!(err.to_string(), "line 4 specifies unplayable move 9");
    }

    #[test]
    fn file_player_is_named_after_its_file() {
        let path = std::env::temp_dir().join("connect-four-file-player-test.txt");
        std::fs::write(&path, "5\n").unwrap();
        let name = path.to_str().unwrap();
        let mut player = FilePlayer::open(name).unwrap();
        assert_eq!(player.name(), name);
        assert_eq!(player.get_move(&Board::empty()).unwrap(), mv(5));
        std::fs::remove_file(&path).unwrap();
    }
}
