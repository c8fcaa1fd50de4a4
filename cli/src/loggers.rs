//! Text-file loggers. Both write the same narration as the console and can
//! additionally dump the search tree of an AI player.
use std::fs::File;
use std::io::{self, Write};

use anyhow::Context;
use connect4::{Board, Logger, Move, Player, Players, Turn};

use crate::setup::{require_txt, SetupError};

pub type Sink = Box<dyn Write>;

fn create(logger: &'static str, path: &str) -> anyhow::Result<Sink> {
    require_txt(logger, path)?;
    let file = File::create(path).with_context(|| format!("{logger} cannot create {path}"))?;
    Ok(Box::new(io::LineWriter::new(file)))
}

fn ending(winner: Option<&dyn Player>) -> String {
    match winner {
        None => "Tie game!".to_string(),
        Some(player) => format!("{} won the game!!!", player.name()),
    }
}

/// Forces the first search of the first player when it is an AI, so its
/// initial tree exists before the game asks it for a move.
fn prime_first_ai<'a>(board: &Board, players: &'a mut Players) -> anyhow::Result<Option<&'a str>> {
    let Some(ai) = players.get_mut(Turn::First).as_ai_mut() else {
        return Ok(None);
    };
    ai.choose_move(board)?;
    Ok(Some(ai.name()))
}

fn tree_of(players: &Players, turn: Turn) -> String {
    players
        .get(turn)
        .as_ai()
        .and_then(|ai| ai.current_state())
        .map(|state| state.to_string())
        .unwrap_or_default()
}

/// Follows one AI through the game.
pub struct StateLogger {
    turn: Turn,
    out: Sink,
}

impl StateLogger {
    pub fn new(turn: Turn, out: Sink) -> Self {
        Self { turn, out }
    }

    /// `[first|second, FILE.txt]`
    pub fn from_args(args: &[String]) -> anyhow::Result<Self> {
        let [side, path] = args else {
            return Err(SetupError::StateLoggerArity(args.len()).into());
        };
        let turn = side
            .parse::<Turn>()
            .map_err(|_| SetupError::StateLoggerSide(side.clone()))?;
        Ok(Self::new(turn, create("StateLogger", path)?))
    }
}

impl Logger for StateLogger {
    fn register_player(&mut self, turn: Turn, player: &dyn Player) -> anyhow::Result<()> {
        if turn == self.turn && player.as_ai().is_none() {
            return Err(SetupError::NotAnAi {
                logger: "StateLogger",
                player: player.name().to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn start(&mut self, board: &Board, players: &mut Players) -> anyhow::Result<()> {
        writeln!(self.out, "Let the game begin!")?;
        writeln!(
            self.out,
            "{} is yellow. {} is red.",
            players.get(Turn::First).name(),
            players.get(Turn::Second).name()
        )?;
        writeln!(self.out, "{board}")?;
        if self.turn == Turn::First {
            prime_first_ai(board, players)?;
            writeln!(self.out, "The AI's state is initially")?;
            write!(self.out, "{}", tree_of(players, self.turn))?;
        }
        Ok(self.out.flush()?)
    }

    fn observe_move(
        &mut self,
        board: &Board,
        mover: Turn,
        mv: Move,
        players: &Players,
    ) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "{} put a chip in column {}, resulting in",
            players.get(mover).name(),
            mv.column()
        )?;
        writeln!(self.out, "{board}")?;
        if mover != self.turn {
            writeln!(self.out, "The AI's state is now")?;
            write!(self.out, "{}", tree_of(players, self.turn))?;
        }
        Ok(self.out.flush()?)
    }

    fn game_over(&mut self, winner: Option<&dyn Player>) -> anyhow::Result<()> {
        writeln!(self.out, "{}", ending(winner))?;
        Ok(self.out.flush()?)
    }
}

/// Paths chosen with `board=`, `move1=`, `move2=`, `state1=` and `state2=`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MegaTargets {
    pub board: Option<String>,
    pub moves: [Option<String>; 2],
    pub states: [Option<String>; 2],
}

impl MegaTargets {
    pub fn parse(args: &[String]) -> Result<Self, SetupError> {
        if args.is_empty() {
            return Err(SetupError::MegaLoggerEmpty);
        }
        let mut targets = Self::default();
        for arg in args {
            let (key, path) = arg
                .split_once('=')
                .ok_or_else(|| SetupError::MegaLoggerArg(arg.clone()))?;
            let (slot, what) = match key {
                "board" => (&mut targets.board, "the board"),
                "move1" => (&mut targets.moves[0], "the first player's moves"),
                "move2" => (&mut targets.moves[1], "the second player's moves"),
                "state1" => (&mut targets.states[0], "the first AI's states"),
                "state2" => (&mut targets.states[1], "the second AI's states"),
                _ => return Err(SetupError::MegaLoggerArg(arg.clone())),
            };
            if slot.is_some() {
                return Err(SetupError::MegaLoggerDuplicate(what.to_string()));
            }
            require_txt("MegaLogger", path)?;
            *slot = Some(path.to_string());
        }
        Ok(targets)
    }
}

/// Logs any combination of the board narration, each side's moves and each
/// AI's search trees. Everything written to the board log is copied into the
/// state logs so they read on their own.
pub struct MegaLogger {
    board: Option<Sink>,
    moves: [Option<Sink>; 2],
    states: [Option<Sink>; 2],
}

impl MegaLogger {
    pub fn new(board: Option<Sink>, moves: [Option<Sink>; 2], states: [Option<Sink>; 2]) -> Self {
        Self {
            board,
            moves,
            states,
        }
    }

    pub fn from_args(args: &[String]) -> anyhow::Result<Self> {
        let targets = MegaTargets::parse(args)?;
        let open = |path: &Option<String>| -> anyhow::Result<Option<Sink>> {
            path.as_deref()
                .map(|path| create("MegaLogger", path))
                .transpose()
        };
        Ok(Self::new(
            open(&targets.board)?,
            [open(&targets.moves[0])?, open(&targets.moves[1])?],
            [open(&targets.states[0])?, open(&targets.states[1])?],
        ))
    }

    fn narrate(&mut self, text: &str) -> io::Result<()> {
        for sink in self.board.iter_mut().chain(self.states.iter_mut().flatten()) {
            writeln!(sink, "{text}")?;
        }
        Ok(())
    }

    fn state_sink(&mut self, turn: Turn) -> Option<&mut Sink> {
        self.states[turn_index(turn)].as_mut()
    }

    fn flush(&mut self) -> io::Result<()> {
        let all = self.board.iter_mut().chain(
            self.moves
                .iter_mut()
                .chain(self.states.iter_mut())
                .flatten(),
        );
        for sink in all {
            sink.flush()?;
        }
        Ok(())
    }
}

fn turn_index(turn: Turn) -> usize {
    match turn {
        Turn::First => 0,
        Turn::Second => 1,
    }
}

impl Logger for MegaLogger {
    fn register_player(&mut self, turn: Turn, player: &dyn Player) -> anyhow::Result<()> {
        if self.states[turn_index(turn)].is_some() && player.as_ai().is_none() {
            return Err(SetupError::NotAnAi {
                logger: "MegaLogger",
                player: player.name().to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn start(&mut self, board: &Board, players: &mut Players) -> anyhow::Result<()> {
        self.narrate("Let the game begin!")?;
        let names = format!(
            "{} is yellow. {} is red.",
            players.get(Turn::First).name(),
            players.get(Turn::Second).name()
        );
        self.narrate(&names)?;
        self.narrate(&board.to_string())?;
        if self.state_sink(Turn::First).is_some() {
            let name = prime_first_ai(board, players)?.unwrap_or_default().to_string();
            let tree = tree_of(players, Turn::First);
            if let Some(sink) = self.state_sink(Turn::First) {
                writeln!(sink, "{name}'s state is initially")?;
                write!(sink, "{tree}")?;
            }
        }
        Ok(self.flush()?)
    }

    fn observe_move(
        &mut self,
        board: &Board,
        mover: Turn,
        mv: Move,
        players: &Players,
    ) -> anyhow::Result<()> {
        if let Some(sink) = self.moves[turn_index(mover)].as_mut() {
            writeln!(sink, "{}", mv.column())?;
        }
        self.narrate(&format!(
            "{} put a chip in column {}, resulting in",
            players.get(mover).name(),
            mv.column()
        ))?;
        self.narrate(&board.to_string())?;
        let opponent = mover.next();
        if self.state_sink(opponent).is_some() {
            let name = players.get(opponent).name().to_string();
            let tree = tree_of(players, opponent);
            if let Some(sink) = self.state_sink(opponent) {
                writeln!(sink, "{name}'s state is now")?;
                write!(sink, "{tree}")?;
            }
        }
        Ok(self.flush()?)
    }

    fn game_over(&mut self, winner: Option<&dyn Player>) -> anyhow::Result<()> {
        self.narrate(&ending(winner))?;
        Ok(self.flush()?)
    }
}
