use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;

use anyhow::bail;
use connect4::{
    Board, Deferred, Move, MoveResult, Player, Players, SyncPlayer, Turn, Ui, NUM_COLS,
};

use crate::setup::{self, PlayerFactory, PlayerKind};

type Input = Rc<RefCell<Box<dyn BufRead>>>;
type Output = Rc<RefCell<Box<dyn Write>>>;

/// Plays the game as text on a terminal. Humans type their moves on the same
/// terminal.
pub struct Console {
    input: Input,
    output: Output,
}

impl Console {
    pub fn new(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Self {
            input: Rc::new(RefCell::new(Box::new(input))),
            output: Rc::new(RefCell::new(Box::new(output))),
        }
    }

    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }

    fn print(&self, text: &str) -> io::Result<()> {
        let mut out = self.output.borrow_mut();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

impl Ui for Console {
    fn start(&self, board: &Board, players: &Players) -> anyhow::Result<()> {
        self.print(&format!(
            "Let the game begin!\n{} is yellow. {} is red.\n{board}",
            players.get(Turn::First).name(),
            players.get(Turn::Second).name()
        ))?;
        Ok(())
    }

    fn render_move(
        &self,
        board: &Board,
        mover: Turn,
        mv: Move,
        players: &Players,
    ) -> anyhow::Result<Board> {
        let after = board.apply(mover, mv)?;
        self.print(&format!(
            "\n{} put a chip in column {}, resulting in\n{after}",
            players.get(mover).name(),
            mv.column()
        ))?;
        Ok(after)
    }

    fn game_over(&self, winner: Option<&dyn Player>) -> anyhow::Result<()> {
        let text = match winner {
            None => "\nTie game!\n".to_string(),
            Some(player) => format!("\n{} won the game!!!\n", player.name()),
        };
        self.print(&text)?;
        Ok(())
    }

    fn do_long_task<T: 'static>(&self, task: impl FnOnce() -> T + 'static) -> Deferred<T> {
        Deferred::new(move |callback| callback(task()))
    }
}

impl PlayerFactory for Console {
    fn create_player(
        &self,
        turn: Turn,
        kind: PlayerKind,
        argument: &str,
    ) -> anyhow::Result<Box<dyn Player>> {
        match kind {
            PlayerKind::Human => Ok(Box::new(ConsoleHuman {
                name: argument.to_string(),
                input: Rc::clone(&self.input),
                output: Rc::clone(&self.output),
            })),
            other => setup::create_player(turn, other, argument),
        }
    }
}

/// A human answering prompts on the console.
struct ConsoleHuman {
    name: String,
    input: Input,
    output: Output,
}

impl SyncPlayer for ConsoleHuman {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board) -> MoveResult {
        let mut out = self.output.borrow_mut();
        let mut input = self.input.borrow_mut();
        loop {
            let columns: String = (0..NUM_COLS)
                .map(|c| {
                    if board.column_is_full(c) {
                        "  ".to_string()
                    } else {
                        format!(" {c}")
                    }
                })
                .collect();
            write!(out, "{columns}\n\nWhat is {}'s move?\n", self.name)?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                bail!("input closed while waiting for {}'s move", self.name);
            }
            let reply = match line.trim().parse::<i64>() {
                Err(_) => "Move must be an integer".to_string(),
                Ok(c) => match usize::try_from(c).ok().filter(|&c| c < NUM_COLS) {
                    None => format!("Move must be an integer within 0 through {}", NUM_COLS - 1),
                    Some(c) if board.column_is_full(c) => {
                        "Move must be a column that is not full".to_string()
                    }
                    Some(c) => return Ok(Move::new(c)?),
                },
            };
            writeln!(out, "{reply}")?;
        }
    }
}
