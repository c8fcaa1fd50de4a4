use crate::{Board, Deferred, Move, Player, Players, Turn};

/// What the game driver needs from a presentation layer.
pub trait Ui {
    /// Show the opening board.
    fn start(&self, board: &Board, players: &Players) -> anyhow::Result<()>;

    /// Show `mover` playing `mv` on `board` and return the resulting board.
    fn render_move(
        &self,
        board: &Board,
        mover: Turn,
        mv: Move,
        players: &Players,
    ) -> anyhow::Result<Board>;

    /// Show the result; `None` is a tie.
    fn game_over(&self, winner: Option<&dyn Player>) -> anyhow::Result<()>;

    /// Run a pure computation, possibly off the UI thread. The result must be
    /// delivered back on the thread driving the game.
    fn do_long_task<T: 'static>(&self, task: impl FnOnce() -> T + 'static) -> Deferred<T>;
}

/// Shows nothing and runs long tasks inline.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl Ui for Headless {
    fn start(&self, _board: &Board, _players: &Players) -> anyhow::Result<()> {
        Ok(())
    }

    fn render_move(
        &self,
        board: &Board,
        mover: Turn,
        mv: Move,
        _players: &Players,
    ) -> anyhow::Result<Board> {
        Ok(board.apply(mover, mv)?)
    }

    fn game_over(&self, _winner: Option<&dyn Player>) -> anyhow::Result<()> {
        Ok(())
    }

    fn do_long_task<T: 'static>(&self, task: impl FnOnce() -> T + 'static) -> Deferred<T> {
        Deferred::new(move |callback| callback(task()))
    }
}
