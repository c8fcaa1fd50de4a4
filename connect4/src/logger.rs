use crate::{Board, Move, Player, Players, Turn};

/// Records the events of a game. Every hook defaults to doing nothing.
pub trait Logger {
    /// Called once per seat before the game starts. Loggers reject players
    /// they cannot log here.
    fn register_player(&mut self, _turn: Turn, _player: &dyn Player) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called with the opening board. Loggers that dump search trees may
    /// prime an AI here, hence the mutable seats.
    fn start(&mut self, _board: &Board, _players: &mut Players) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after every move, once all players have observed it.
    fn observe_move(
        &mut self,
        _board: &Board,
        _mover: Turn,
        _mv: Move,
        _players: &Players,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// `None` is a tie.
    fn game_over(&mut self, _winner: Option<&dyn Player>) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl Logger for NullLogger {}
