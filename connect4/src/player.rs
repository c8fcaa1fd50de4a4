//! Move sources. Every player hands its move back through a [`Deferred`];
//! [`SyncPlayer`]s resolve it on the spot, [`InputPlayer`] parks it until a UI
//! submits the move.
use std::cell::RefCell;
use std::rc::Rc;

use crate::{Ai, Board, Callback, Deferred, GameError, Move, Turn};

pub type MoveResult = anyhow::Result<Move>;

pub trait Player {
    fn name(&self) -> &str;

    /// Ask for a move on `board`, which has at least one legal move.
    fn get_async_move(&mut self, board: &Board) -> Deferred<MoveResult>;

    /// Called after every move of the game, the player's own included.
    /// `board` already has the move applied.
    fn observe_move(&mut self, _board: &Board, _mover: Turn, _mv: Move) {}

    /// Loggers that dump search trees need the concrete AI.
    fn as_ai(&self) -> Option<&Ai> {
        None
    }

    fn as_ai_mut(&mut self) -> Option<&mut Ai> {
        None
    }
}

/// A player that can answer immediately.
pub trait SyncPlayer {
    fn name(&self) -> &str;

    fn get_move(&mut self, board: &Board) -> MoveResult;

    fn observe_move(&mut self, _board: &Board, _mover: Turn, _mv: Move) {}

    fn as_ai(&self) -> Option<&Ai> {
        None
    }

    fn as_ai_mut(&mut self) -> Option<&mut Ai> {
        None
    }
}

impl<P: SyncPlayer> Player for P {
    fn name(&self) -> &str {
        SyncPlayer::name(self)
    }

    fn get_async_move(&mut self, board: &Board) -> Deferred<MoveResult> {
        Deferred::ready(self.get_move(board))
    }

    fn observe_move(&mut self, board: &Board, mover: Turn, mv: Move) {
        SyncPlayer::observe_move(self, board, mover, mv)
    }

    fn as_ai(&self) -> Option<&Ai> {
        SyncPlayer::as_ai(self)
    }

    fn as_ai_mut(&mut self) -> Option<&mut Ai> {
        SyncPlayer::as_ai_mut(self)
    }
}

#[derive(Default)]
struct PendingMove {
    board: Option<Board>,
    callback: Option<Callback<MoveResult>>,
}

/// Where a UI drops the moves of an [`InputPlayer`]. Clones share one slot.
#[derive(Clone, Default)]
pub struct MoveInbox {
    pending: Rc<RefCell<PendingMove>>,
}

impl MoveInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.borrow().callback.is_some()
    }

    /// The board the outstanding request was made on.
    pub fn board(&self) -> Option<Board> {
        self.pending.borrow().board.clone()
    }

    /// Resolve the outstanding request with `mv`. Illegal moves are refused
    /// and leave the request outstanding.
    pub fn submit(&self, mv: Move) -> Result<(), GameError> {
        let callback = {
            let mut pending = self.pending.borrow_mut();
            let board = pending.board.as_ref().ok_or(GameError::NotAwaitingMove)?;
            if !board.legal_moves().contains(&mv) {
                return Err(GameError::IllegalMove {
                    column: mv.column(),
                });
            }
            pending.board = None;
            pending.callback.take().ok_or(GameError::NotAwaitingMove)?
        };
        callback(Ok(mv));
        Ok(())
    }

    /// Resolve the outstanding request with an error, ending the game.
    pub fn abandon(&self, error: anyhow::Error) -> Result<(), GameError> {
        let callback = {
            let mut pending = self.pending.borrow_mut();
            pending.board = None;
            pending.callback.take().ok_or(GameError::NotAwaitingMove)?
        };
        callback(Err(error));
        Ok(())
    }

    fn park(&self, board: Board, callback: Callback<MoveResult>) {
        let mut pending = self.pending.borrow_mut();
        debug_assert!(pending.callback.is_none(), "a move is already outstanding");
        pending.board = Some(board);
        pending.callback = Some(callback);
    }
}

/// A player whose moves arrive later through its [`MoveInbox`].
pub struct InputPlayer {
    name: String,
    inbox: MoveInbox,
}

impl InputPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inbox: MoveInbox::new(),
        }
    }

    pub fn inbox(&self) -> MoveInbox {
        self.inbox.clone()
    }
}

impl Player for InputPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_async_move(&mut self, board: &Board) -> Deferred<MoveResult> {
        let inbox = self.inbox.clone();
        let board = board.clone();
        Deferred::new(move |callback| inbox.park(board, callback))
    }
}

/// The two seats of a game.
pub struct Players {
    seats: [Box<dyn Player>; 2],
}

impl Players {
    pub fn new(first: Box<dyn Player>, second: Box<dyn Player>) -> Self {
        Self {
            seats: [first, second],
        }
    }

    pub fn get(&self, turn: Turn) -> &dyn Player {
        &*self.seats[turn.index()]
    }

    pub fn get_mut(&mut self, turn: Turn) -> &mut (dyn Player + 'static) {
        &mut *self.seats[turn.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Turn, &(dyn Player + 'static))> + '_ {
        Turn::ALL
            .into_iter()
            .zip(self.seats.iter().map(|seat| &**seat))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Player>> + '_ {
        self.seats.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(column: usize) -> Move {
        Move::new(column).unwrap()
    }

    struct Fixed(usize);

    impl SyncPlayer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn get_move(&mut self, _board: &Board) -> MoveResult {
            Ok(Move::new(self.0)?)
        }
    }

    fn resolve(deferred: Deferred<MoveResult>) -> Rc<RefCell<Option<MoveResult>>> {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        deferred.then(move |result| *sink.borrow_mut() = Some(result));
        seen
    }

    #[test]
    fn sync_players_resolve_immediately() {
        let mut player = Fixed(5);
        let seen = resolve(player.get_async_move(&Board::empty()));
        let result = seen.borrow_mut().take().unwrap();
        assert_eq!(result.unwrap(), mv(5));
    }

    #[test]
    fn input_player_waits_for_submit() {
        let mut player = InputPlayer::new("ada");
        let inbox = player.inbox();
        assert!(!inbox.is_waiting());

        let seen = resolve(player.get_async_move(&Board::empty()));
        assert!(inbox.is_waiting());
        assert_eq!(inbox.board(), Some(Board::empty()));
        assert!(seen.borrow().is_none());

        inbox.submit(mv(2)).unwrap();
        assert!(!inbox.is_waiting());
        let result = seen.borrow_mut().take().unwrap();
        assert_eq!(result.unwrap(), mv(2));
        assert_eq!(inbox.submit(mv(2)), Err(GameError::NotAwaitingMove));
    }

    #[test]
    fn input_player_refuses_full_columns() {
        let mut board = Board::empty();
        for turn in [Turn::First, Turn::Second, Turn::First, Turn::Second, Turn::First, Turn::Second] {
            board = board.apply(turn, mv(0)).unwrap();
        }
        let mut player = InputPlayer::new("ada");
        let inbox = player.inbox();
        let seen = resolve(player.get_async_move(&board));

        assert_eq!(inbox.submit(mv(0)), Err(GameError::IllegalMove { column: 0 }));
        assert!(inbox.is_waiting());
        inbox.submit(mv(1)).unwrap();
        assert_eq!(seen.borrow_mut().take().unwrap().unwrap(), mv(1));
    }

    #[test]
    fn abandon_resolves_with_the_error() {
        let mut player = InputPlayer::new("ada");
        let inbox = player.inbox();
        let seen = resolve(player.get_async_move(&Board::empty()));
        inbox.abandon(anyhow::anyhow!("window closed")).unwrap();
        let err = seen.borrow_mut().take().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "window closed");
    }

    #[test]
    fn seats_are_indexed_by_turn() {
        let players = Players::new(Box::new(Fixed(0)), Box::new(InputPlayer::new("bob")));
        assert_eq!(players.get(Turn::First).name(), "fixed");
        assert_eq!(players.get(Turn::Second).name(), "bob");
        let turns: Vec<Turn> = players.iter().map(|(turn, _)| turn).collect();
        assert_eq!(turns, Turn::ALL.to_vec());
        assert!(players.get(Turn::First).as_ai().is_none());
    }
}
