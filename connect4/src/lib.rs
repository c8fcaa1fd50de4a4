//! Connect Four engine with a reusable minimax game tree.
//! Boards are immutable values; the AI keeps one lazily expanded tree for the
//! whole game and re-roots it on every observed move, so search work from
//! earlier turns carries over. The [`Game`] driver sequences turns through a
//! one-shot continuation contract ([`Deferred`]) so that input-driven players
//! can suspend without blocking their UI.
mod ai;
mod board;
mod deferred;
mod error;
mod game;
mod logger;
mod moves;
mod player;
mod state;
mod turn;
mod ui;

pub use ai::Ai;
pub use board::{Board, Line, Location, Orientation};
pub use deferred::{Callback, Deferred};
pub use error::GameError;
pub use game::{Game, GameOutcome};
pub use logger::{Logger, NullLogger};
pub use moves::Move;
pub use player::{InputPlayer, MoveInbox, MoveResult, Player, Players, SyncPlayer};
pub use state::{heuristic, State};
pub use turn::{Color, Turn};
pub use ui::{Headless, Ui};

pub const NUM_ROWS: usize = 6;
pub const NUM_COLS: usize = 7;

/// Value of a won position for the AI. Larger than any heuristic score.
pub const WIN_SCORE: i32 = 1_000_000;
