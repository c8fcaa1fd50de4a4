//! Turn sequencing.
//!
//! The driver chains one [`Deferred`](crate::Deferred) per step: ask the side
//! to move, apply and render the move, let every player and then the logger
//! observe it, check for the end of the game, and go round again. With
//! synchronous players the whole game unwinds inside [`Game::start`]; when a
//! player parks its request, `start` returns and the game resumes from
//! whatever event later resolves it.
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{Board, Logger, Move, MoveResult, NullLogger, Player, Players, Turn, Ui};

#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    pub winner: Option<Turn>,
    pub winner_name: Option<String>,
    pub moves: Vec<Move>,
    #[serde(skip)]
    pub board: Board,
}

struct Session {
    players: Players,
    logger: Box<dyn Logger>,
    board: Board,
    turn: Turn,
    moves: Vec<Move>,
    result: Option<anyhow::Result<GameOutcome>>,
}

pub struct Game<U> {
    ui: Rc<U>,
    session: Rc<RefCell<Session>>,
}

impl<U: Ui + 'static> Game<U> {
    pub fn new(ui: U, players: Players) -> Self {
        Self {
            ui: Rc::new(ui),
            session: Rc::new(RefCell::new(Session {
                players,
                logger: Box::new(NullLogger),
                board: Board::empty(),
                turn: Turn::First,
                moves: Vec::new(),
                result: None,
            })),
        }
    }

    pub fn with_logger(self, logger: Box<dyn Logger>) -> Self {
        self.session.borrow_mut().logger = logger;
        self
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn board(&self) -> Board {
        self.session.borrow().board.clone()
    }

    /// The side to move, or the side that made the last move once finished.
    pub fn turn(&self) -> Turn {
        self.session.borrow().turn
    }

    pub fn is_finished(&self) -> bool {
        self.session.borrow().result.is_some()
    }

    /// The result of a finished game; `None` while it is still running.
    pub fn take_result(&self) -> Option<anyhow::Result<GameOutcome>> {
        self.session.borrow_mut().result.take()
    }

    /// Register the players with the logger, show the opening board and ask
    /// the first player for a move. Returns once the game has finished or a
    /// player is waiting for input.
    pub fn start(&self) -> anyhow::Result<()> {
        {
            let mut session = self.session.borrow_mut();
            let Session {
                players,
                logger,
                board,
                ..
            } = &mut *session;
            for (turn, player) in players.iter() {
                logger.register_player(turn, player)?;
            }
            logger.start(board, players)?;
            self.ui.start(board, players)?;
            info!(
                first = players.get(Turn::First).name(),
                second = players.get(Turn::Second).name(),
                "game started"
            );
        }
        request_move(&self.ui, &self.session);
        Ok(())
    }

    /// Play a game between players that never suspend.
    pub fn play(self) -> anyhow::Result<GameOutcome> {
        self.start()?;
        self.take_result().unwrap_or_else(|| {
            let session = self.session.borrow();
            let waiting = session.players.get(session.turn).name().to_string();
            Err(anyhow!("game suspended waiting for {waiting} to move"))
        })
    }
}

fn request_move<U: Ui + 'static>(ui: &Rc<U>, session: &Rc<RefCell<Session>>) {
    let deferred = {
        let mut session = session.borrow_mut();
        let (turn, board) = (session.turn, session.board.clone());
        let player = session.players.get_mut(turn);
        debug!(?turn, player = player.name(), "requesting move");
        player.get_async_move(&board)
    };
    let (ui, session) = (Rc::clone(ui), Rc::clone(session));
    deferred.then(move |result| deliver_move(&ui, &session, result));
}

fn deliver_move<U: Ui + 'static>(ui: &Rc<U>, session: &Rc<RefCell<Session>>, result: MoveResult) {
    let applied = result.and_then(|mv| {
        let session = session.borrow();
        let after = ui.render_move(&session.board, session.turn, mv, &session.players)?;
        Ok((mv, after))
    });
    let (mv, after) = match applied {
        Ok(applied) => applied,
        Err(err) => return finish(session, Err(err)),
    };
    {
        let mut session = session.borrow_mut();
        debug!(turn = ?session.turn, column = mv.column(), "move applied");
        session.board = after;
        session.moves.push(mv);
    }

    let observed = Rc::clone(session);
    let (ui_next, session_next) = (Rc::clone(ui), Rc::clone(session));
    ui.do_long_task(move || notify_observers(&observed))
        .then(move |notified| match notified {
            Ok(()) => advance(&ui_next, &session_next),
            Err(err) => finish(&session_next, Err(err)),
        });
}

/// Players first, in seat order, then the logger.
fn notify_observers(session: &RefCell<Session>) -> anyhow::Result<()> {
    let mut session = session.borrow_mut();
    let Session {
        players,
        logger,
        board,
        turn,
        moves,
        ..
    } = &mut *session;
    let mv = *moves.last().expect("observers are notified after a move");
    for player in players.iter_mut() {
        player.observe_move(board, *turn, mv);
    }
    logger.observe_move(board, *turn, mv, players)
}

fn advance<U: Ui + 'static>(ui: &Rc<U>, session: &Rc<RefCell<Session>>) {
    let ended = {
        let mut session = session.borrow_mut();
        if let Some(winner) = session.board.winner() {
            Some(Some(winner))
        } else if session.board.is_full() {
            Some(None)
        } else {
            session.turn = session.turn.next();
            None
        }
    };
    match ended {
        None => request_move(ui, session),
        Some(winner) => {
            let result = conclude(&**ui, session, winner);
            finish(session, result);
        }
    }
}

fn conclude<U: Ui>(
    ui: &U,
    session: &RefCell<Session>,
    winner: Option<Turn>,
) -> anyhow::Result<GameOutcome> {
    let mut session = session.borrow_mut();
    let Session {
        players,
        logger,
        board,
        moves,
        ..
    } = &mut *session;
    let winner_player = winner.map(|turn| players.get(turn));
    logger.game_over(winner_player)?;
    ui.game_over(winner_player)?;
    let winner_name = winner_player.map(|player| player.name().to_string());
    info!(
        winner = winner_name.as_deref().unwrap_or("nobody"),
        moves = moves.len(),
        "game over"
    );
    Ok(GameOutcome {
        winner,
        winner_name,
        moves: moves.clone(),
        board: board.clone(),
    })
}

fn finish(session: &RefCell<Session>, result: anyhow::Result<GameOutcome>) {
    if let Err(err) = &result {
        warn!(error = %err, "game aborted");
    }
    session.borrow_mut().result = Some(result);
}
