use tracing::debug;

use crate::{Board, GameError, Move, MoveResult, State, SyncPlayer, Turn};

/// Minimax player that keeps one game tree for the whole game.
///
/// The root tracks the live position: every observed move re-roots the tree at
/// the matching child, keeping the subtree that was already searched. After an
/// opponent move the tree is grown back to the configured depth and
/// re-evaluated, so the next [`Ai::choose_move`] only reads the answer off.
pub struct Ai {
    turn: Turn,
    depth: usize,
    name: String,
    state: Option<State>,
}

impl Ai {
    /// `depth` must parse as an integer of at least 1.
    pub fn new(turn: Turn, depth: &str) -> Result<Self, GameError> {
        let parsed: i64 = depth
            .trim()
            .parse()
            .map_err(|_| GameError::DepthNotInteger(depth.to_string()))?;
        let depth = usize::try_from(parsed)
            .ok()
            .filter(|&d| d >= 1)
            .ok_or(GameError::DepthTooSmall(parsed))?;
        Ok(Self {
            turn,
            depth,
            name: format!("AI-{}{}", turn.initial(), depth),
            state: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Root of the search tree, `None` before the AI has seen the game.
    pub fn current_state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    /// The move minimax recommends on `board`, which must be the position the
    /// AI has been tracking.
    pub fn choose_move(&mut self, board: &Board) -> Result<Move, GameError> {
        if board.legal_moves().is_empty() {
            return Err(GameError::NoMoves);
        }
        let (turn, depth) = (self.turn, self.depth);
        let state = self
            .state
            .get_or_insert_with(|| State::new(turn, board.clone(), turn));
        debug_assert_eq!(state.board(), board, "AI lost track of the game");
        if !state.is_expanded() {
            state.expand_up_to(depth);
            state.compute_minimax();
            log_search(&self.name, state);
        }
        Ok(state.preferred_move())
    }

    /// Follow a move made by either side. `board` has the move applied.
    ///
    /// The first observation (the AI plays second) starts the tree at `board`
    /// itself instead of re-rooting.
    pub fn observe(&mut self, board: &Board, mover: Turn, mv: Move) {
        let mut state = match self.state.take() {
            None => State::new(self.turn, board.clone(), mover.next()),
            Some(mut state) => {
                if !state.is_expanded() {
                    state.expand_up_to(1);
                }
                state.into_child(mv)
            }
        };
        if mover != self.turn {
            state.expand_up_to(self.depth);
            state.compute_minimax();
            log_search(&self.name, &state);
        }
        self.state = Some(state);
    }
}

fn log_search(name: &str, state: &State) {
    debug!(
        ai = name,
        nodes = state.node_count(),
        height = state.height(),
        value = state.value(),
        "search complete"
    );
}

impl SyncPlayer for Ai {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board) -> MoveResult {
        Ok(self.choose_move(board)?)
    }

    fn observe_move(&mut self, board: &Board, mover: Turn, mv: Move) {
        self.observe(board, mover, mv)
    }

    fn as_ai(&self) -> Option<&Ai> {
        Some(self)
    }

    fn as_ai_mut(&mut self) -> Option<&mut Ai> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NUM_COLS, WIN_SCORE};

    fn mv(column: usize) -> Move {
        Move::new(column).unwrap()
    }

    fn board(rows: [&str; 6]) -> Board {
        Board::from_rows(&rows).unwrap()
    }

    /// Every board in the subtree must extend `root` chip for chip.
    fn assert_descends_from(state: &State, root: &Board) {
        for row in 0..crate::NUM_ROWS {
            for col in 0..NUM_COLS {
                if let Some(turn) = root.cell_at(row, col) {
                    assert_eq!(state.board().cell_at(row, col), Some(turn));
                }
            }
        }
        for (_, child) in state.children() {
            assert_descends_from(child, root);
        }
    }

    #[test]
    fn parses_depth_argument() {
        let ai = Ai::new(Turn::Second, " 3 ").unwrap();
        assert_eq!(ai.depth(), 3);
        assert_eq!(ai.name(), "AI-R3");
        assert!(ai.current_state().is_none());
        assert_eq!(
            Ai::new(Turn::First, "three").err(),
            Some(GameError::DepthNotInteger("three".to_string()))
        );
        assert_eq!(Ai::new(Turn::First, "0").err(), Some(GameError::DepthTooSmall(0)));
        assert_eq!(Ai::new(Turn::First, "-2").err(), Some(GameError::DepthTooSmall(-2)));
    }

    #[test]
    fn blocks_a_vertical_threat() {
        let threatened = board([
            ".......",
            ".......",
            ".......",
            "Y......",
            "Y......",
            "Y..RR..",
        ]);
        let mut ai = Ai::new(Turn::Second, "2").unwrap();
        ai.observe(&threatened, Turn::First, mv(0));
        let root = ai.current_state().unwrap();
        for (mv, child) in root.children() {
            if mv.column() != 0 {
                assert_eq!(child.value(), -WIN_SCORE);
            }
        }
        assert_eq!(ai.choose_move(&threatened).unwrap(), mv(0));
    }

    #[test]
    fn takes_an_immediate_win() {
        let winning = board([
            ".......",
            ".......",
            ".......",
            ".......",
            "RRR....",
            "YYRY.YY",
        ]);
        // Blocking column 4 would also be sensible, but winning outranks it.
        let mut ai = Ai::new(Turn::Second, "3").unwrap();
        ai.observe(&winning, Turn::First, mv(6));
        assert_eq!(ai.choose_move(&winning).unwrap(), mv(3));
    }

    #[test]
    fn first_player_ai_searches_on_demand() {
        let mut ai = Ai::new(Turn::First, "1").unwrap();
        let choice = ai.choose_move(&Board::empty()).unwrap();
        assert_eq!(choice, mv(3));
        let root = ai.current_state().unwrap();
        assert_eq!(root.side_to_move(), Turn::First);
        assert_eq!(root.node_count(), 1 + NUM_COLS);
    }

    #[test]
    fn refuses_finished_boards() {
        let won = board([
            ".......",
            ".......",
            ".......",
            ".......",
            "RRR....",
            "YYYY...",
        ]);
        let mut ai = Ai::new(Turn::Second, "2").unwrap();
        assert_eq!(ai.choose_move(&won), Err(GameError::NoMoves));
    }

    #[test]
    fn re_roots_on_every_observed_move() {
        let mut ai = Ai::new(Turn::Second, "2").unwrap();

        let b1 = Board::empty().apply(Turn::First, mv(3)).unwrap();
        ai.observe(&b1, Turn::First, mv(3));
        let root = ai.current_state().unwrap();
        assert_eq!(root.board(), &b1);
        assert_eq!(root.side_to_move(), Turn::Second);
        assert_eq!(root.height(), 2);

        let reply = ai.choose_move(&b1).unwrap();
        let b2 = b1.apply(Turn::Second, reply).unwrap();
        ai.observe(&b2, Turn::Second, reply);
        let root = ai.current_state().unwrap();
        assert_eq!(root.board(), &b2);
        assert_eq!(root.side_to_move(), Turn::First);

        let b3 = b2.apply(Turn::First, mv(2)).unwrap();
        ai.observe(&b3, Turn::First, mv(2));
        let root = ai.current_state().unwrap();
        assert_eq!(root.board(), &b3);
        assert_eq!(root.side_to_move(), Turn::Second);
        assert_eq!(root.height(), 2);
    }

    #[test]
    fn reuses_the_tree_across_turns() {
        let depth = 3;
        let mut ai = Ai::new(Turn::Second, "3").unwrap();
        let mut board = Board::empty();
        for opponent in [3, 2] {
            let theirs = mv(opponent);
            board = board.apply(Turn::First, theirs).unwrap();
            ai.observe(&board, Turn::First, theirs);
            assert_eq!(ai.current_state().unwrap().height(), depth);

            let ours = ai.choose_move(&board).unwrap();
            board = board.apply(Turn::Second, ours).unwrap();
            ai.observe(&board, Turn::Second, ours);
            // Our own move only re-roots; the kept subtree is one level shorter.
            assert_eq!(ai.current_state().unwrap().height(), depth - 1);
        }

        let root = ai.current_state().unwrap();
        assert_eq!(root.board(), &board);
        assert_eq!(board.chip_count(), 4);
        assert!(root.node_count() <= 1 + NUM_COLS + NUM_COLS * NUM_COLS);
        assert_descends_from(root, &board);
    }

    #[test]
    fn scripted_opponent_stacking_column_zero_is_stopped() {
        let mut ai = Ai::new(Turn::Second, "2").unwrap();
        let mut board = Board::empty();
        for _ in 0..3 {
            if board.column_is_full(0) {
                break;
            }
            board = board.apply(Turn::First, mv(0)).unwrap();
            ai.observe(&board, Turn::First, mv(0));
            let threat = (1..=crate::NUM_ROWS - 3).any(|top| {
                board.cell_at(top - 1, 0).is_none()
                    && (top..top + 3).all(|row| board.cell_at(row, 0) == Some(Turn::First))
            });
            let ours = ai.choose_move(&board).unwrap();
            if threat {
                assert_eq!(ours, mv(0));
            }
            board = board.apply(Turn::Second, ours).unwrap();
            ai.observe(&board, Turn::Second, ours);
            assert_eq!(board.winner(), None);
        }
    }
}
