//! Nodes of the lazily grown minimax tree.
use std::collections::BTreeMap;
use std::fmt;

use crate::{Board, Move, Turn, WIN_SCORE};

/// A position in the AI's game tree: a board and the side to move on it.
///
/// Children are materialized on demand by [`State::expand_up_to`] and keyed by
/// move, so iteration runs left to right. A node never points back at its
/// parent; dropping a node drops its whole subtree.
#[derive(Clone, Debug)]
pub struct State {
    ai: Turn,
    board: Board,
    side_to_move: Turn,
    children: Option<BTreeMap<Move, State>>,
    value: i32,
}

impl State {
    pub fn new(ai: Turn, board: Board, side_to_move: Turn) -> Self {
        Self {
            ai,
            board,
            side_to_move,
            children: None,
            value: 0,
        }
    }

    pub fn ai(&self) -> Turn {
        self.ai
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Turn {
        self.side_to_move
    }

    /// Minimax value from the last [`State::compute_minimax`].
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    /// A won or full board. Terminal states are never expanded.
    pub fn is_terminal(&self) -> bool {
        self.board.winner().is_some() || self.board.is_full()
    }

    /// Materialized children in column order; empty when unexpanded.
    pub fn children(&self) -> impl Iterator<Item = (Move, &State)> + '_ {
        self.children
            .iter()
            .flatten()
            .map(|(mv, child)| (*mv, child))
    }

    /// Panics if this state is unexpanded or `mv` is not legal here.
    pub fn child(&self, mv: Move) -> &State {
        self.children
            .as_ref()
            .and_then(|children| children.get(&mv))
            .expect("child requested from an unexpanded state or for an illegal move")
    }

    /// Detach the subtree under `mv`, dropping this node and its other
    /// children. Panics under the same conditions as [`State::child`].
    pub fn into_child(self, mv: Move) -> State {
        self.children
            .and_then(|mut children| children.remove(&mv))
            .expect("child requested from an unexpanded state or for an illegal move")
    }

    /// Make sure every non-terminal node within `depth` moves of this one has
    /// its children. Subtrees that already exist are kept and topped up.
    pub fn expand_up_to(&mut self, depth: usize) {
        if depth == 0 || self.is_terminal() {
            return;
        }
        let (ai, side, board) = (self.ai, self.side_to_move, &self.board);
        let children = self.children.get_or_insert_with(|| {
            board
                .legal_moves()
                .into_iter()
                .map(|mv| {
                    let next = board
                        .apply(side, mv)
                        .expect("legal move must succeed");
                    (mv, State::new(ai, next, side.next()))
                })
                .collect()
        });
        for child in children.values_mut() {
            child.expand_up_to(depth - 1);
        }
    }

    /// Assign minimax values to this node and every expanded descendant.
    pub fn compute_minimax(&mut self) {
        self.value = if let Some(winner) = self.board.winner() {
            if winner == self.ai {
                WIN_SCORE
            } else {
                -WIN_SCORE
            }
        } else if self.board.is_full() {
            0
        } else {
            match self.children.as_mut() {
                None => heuristic(&self.board, self.ai),
                Some(children) => {
                    for child in children.values_mut() {
                        child.compute_minimax();
                    }
                    let values = children.values().map(|child| child.value);
                    let best = if self.side_to_move == self.ai {
                        values.max()
                    } else {
                        values.min()
                    };
                    best.expect("expanded non-terminal state has children")
                }
            }
        };
    }

    /// The leftmost move whose child carries this node's value.
    ///
    /// Requires an expanded, non-terminal state with minimax computed.
    pub fn preferred_move(&self) -> Move {
        self.children()
            .find(|(_, child)| child.value == self.value)
            .map(|(mv, _)| mv)
            .expect("preferred move requested before expansion and minimax")
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|(_, child)| child.node_count())
            .sum::<usize>()
    }

    /// Length of the longest materialized path below this node.
    pub fn height(&self) -> usize {
        self.children()
            .map(|(_, child)| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize, indent: &str) -> fmt::Result {
        let who = if self.side_to_move == self.ai {
            "AI"
        } else {
            "Opponent"
        };
        writeln!(
            f,
            "{indent}{who} will play next on the board below as {}",
            self.side_to_move.initial()
        )?;
        writeln!(f, "{indent}Value: {}", self.value)?;
        writeln!(f, "{}", self.board.render(indent))?;
        if self.children().next().is_some() {
            writeln!(f, "{indent}Children at depth {}:", depth + 1)?;
            writeln!(f, "{indent}----------------")?;
            let nested = format!("{indent}   ");
            for (_, child) in self.children() {
                child.write_tree(f, depth + 1, &nested)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0, "")
    }
}

/// Presence density over every line: +1 per cell held by `ai`, -1 per cell
/// held by the opponent, summed over all lines.
pub fn heuristic(board: &Board, ai: Turn) -> i32 {
    Board::all_lines()
        .iter()
        .flat_map(|line| line.cells().iter())
        .map(|loc| match loc.player(board) {
            None => 0,
            Some(player) if player == ai => 1,
            Some(_) => -1,
        })
        .sum()
}
