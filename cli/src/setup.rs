//! Turns command-line words into a UI, players and a logger.
use std::str::FromStr;

use connect4::{Ai, GameError, Logger, Player, Turn, Ui};
use thiserror::Error;

use crate::loggers::{MegaLogger, StateLogger};
use crate::players::{FilePlayer, RandomPlayer};

/// Problems with the command line. These are reported to the user and end the
/// program without a game; they are not failures of the program itself.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("unknown user interface {0:?}; the only one provided is Console")]
    UnknownUi(String),

    #[error("unknown player kind {0:?}; expected Human, Random, AI or File")]
    UnknownPlayer(String),

    #[error("unknown logger kind {0:?}; expected StateLogger or MegaLogger")]
    UnknownLogger(String),

    #[error("this user interface cannot ask a human for moves")]
    NoHumanInput,

    #[error("a Random player needs an integer seed, found {0:?}")]
    BadSeed(String),

    #[error("invalid AI: {0}")]
    BadAi(#[from] GameError),

    #[error("StateLogger takes precisely two arguments, found {0}")]
    StateLoggerArity(usize),

    #[error("StateLogger's first argument must be \"first\" or \"second\", found {0:?}")]
    StateLoggerSide(String),

    #[error(
        "MegaLogger requires at least one argument of the forms \
         board=file.txt move1=file.txt move2=file.txt state1=file.txt state2=file.txt"
    )]
    MegaLoggerEmpty,

    #[error(
        "MegaLogger does not understand {0:?}; arguments must be of the forms \
         board=file.txt move1=file.txt move2=file.txt state1=file.txt state2=file.txt"
    )]
    MegaLoggerArg(String),

    #[error("MegaLogger can only send {0} output to one file")]
    MegaLoggerDuplicate(String),

    #[error("to prevent accidental overwrites {logger} only writes .txt files, not {path:?}")]
    NotTxt { logger: &'static str, path: String },

    #[error("{logger} can only log the states of AI players, but {player} is not one")]
    NotAnAi {
        logger: &'static str,
        player: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiKind {
    Console,
}

impl FromStr for UiKind {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Console" => Ok(Self::Console),
            other => Err(SetupError::UnknownUi(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Random,
    Ai,
    File,
}

impl FromStr for PlayerKind {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Human" => Ok(Self::Human),
            "Random" => Ok(Self::Random),
            "AI" => Ok(Self::Ai),
            "File" => Ok(Self::File),
            other => Err(SetupError::UnknownPlayer(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggerKind {
    StateLogger,
    MegaLogger,
}

impl FromStr for LoggerKind {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "StateLogger" => Ok(Self::StateLogger),
            "MegaLogger" => Ok(Self::MegaLogger),
            other => Err(SetupError::UnknownLogger(other.to_string())),
        }
    }
}

/// A UI that can also build players. UIs that can talk to a human override
/// this to handle [`PlayerKind::Human`] and defer to [`create_player`] for
/// everything else.
pub trait PlayerFactory: Ui {
    fn create_player(
        &self,
        turn: Turn,
        kind: PlayerKind,
        argument: &str,
    ) -> anyhow::Result<Box<dyn Player>> {
        create_player(turn, kind, argument)
    }
}

/// The players every UI can build.
pub fn create_player(
    turn: Turn,
    kind: PlayerKind,
    argument: &str,
) -> anyhow::Result<Box<dyn Player>> {
    let player: Box<dyn Player> = match kind {
        PlayerKind::Human => return Err(SetupError::NoHumanInput.into()),
        PlayerKind::Random => Box::new(RandomPlayer::from_seed_arg(argument)?),
        PlayerKind::Ai => Box::new(Ai::new(turn, argument).map_err(SetupError::from)?),
        PlayerKind::File => Box::new(FilePlayer::open(argument)?),
    };
    Ok(player)
}

pub fn create_logger(kind: LoggerKind, args: &[String]) -> anyhow::Result<Box<dyn Logger>> {
    let logger: Box<dyn Logger> = match kind {
        LoggerKind::StateLogger => Box::new(StateLogger::from_args(args)?),
        LoggerKind::MegaLogger => Box::new(MegaLogger::from_args(args)?),
    };
    Ok(logger)
}

/// Loggers refuse to write anything but text files.
pub(crate) fn require_txt(logger: &'static str, path: &str) -> Result<(), SetupError> {
    if path.ends_with(".txt") {
        Ok(())
    } else {
        Err(SetupError::NotTxt {
            logger,
            path: path.to_string(),
        })
    }
}
