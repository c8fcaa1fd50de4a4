use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// RGB color of a side's chips.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const YELLOW: Color = Color::rgb(240, 240, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// The two sides of a game. `First` always opens.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    First,
    Second,
}

impl Turn {
    pub const ALL: [Turn; 2] = [Turn::First, Turn::Second];

    pub(crate) fn index(self) -> usize {
        match self {
            Turn::First => 0,
            Turn::Second => 1,
        }
    }

    /// The side that plays after this one.
    pub fn next(self) -> Turn {
        match self {
            Turn::First => Turn::Second,
            Turn::Second => Turn::First,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Turn::First => Color::YELLOW,
            Turn::Second => Color::RED,
        }
    }

    pub fn color_name(self) -> &'static str {
        match self {
            Turn::First => "yellow",
            Turn::Second => "red",
        }
    }

    /// Single character used when drawing chips of this side.
    pub fn initial(self) -> char {
        match self {
            Turn::First => 'Y',
            Turn::Second => 'R',
        }
    }

    pub(crate) fn from_initial(initial: char) -> Option<Turn> {
        Turn::ALL.into_iter().find(|turn| turn.initial() == initial)
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::First => f.write_str("first"),
            Turn::Second => f.write_str("second"),
        }
    }
}

impl FromStr for Turn {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Turn::First),
            "second" => Ok(Turn::Second),
            _ => Err(GameError::UnknownTurn(s.to_string())),
        }
    }
}
