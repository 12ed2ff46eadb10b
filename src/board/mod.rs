pub mod state;
pub mod sub_board;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use state::GameState;
pub use sub_board::SubBoard;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    XWins,
    OWins,
    Draw,
}

impl Outcome {
    pub fn won_by(player: Player) -> Self {
        match player {
            Player::X => Outcome::XWins,
            Player::O => Outcome::OWins,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::XWins => Some(Player::X),
            Outcome::OWins => Some(Player::O),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::XWins => write!(f, "X wins"),
            Outcome::OWins => write!(f, "O wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// A move addresses one cell of one sub-board; both indices are row-major in 0..9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub board: usize,
    pub cell: usize,
}

impl Move {
    pub fn new(board: usize, cell: usize) -> Self {
        Self { board, cell }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.board, self.cell)
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (b, c) = s.trim().split_once(':').ok_or_else(|| format!("expected board:cell, got '{s}'"))?;
        let board = b.trim().parse::<usize>().map_err(|e| format!("bad board index '{b}': {e}"))?;
        let cell = c.trim().parse::<usize>().map_err(|e| format!("bad cell index '{c}': {e}"))?;
        if board > 8 || cell > 8 {
            return Err(format!("indices must be in 0..=8, got {board}:{cell}"));
        }
        Ok(Move { board, cell })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("the game is already over")]
    GameOver,
    #[error("move {0} is out of range")]
    OutOfRange(Move),
    #[error("sub-board {0} has already been won")]
    SubBoardDecided(usize),
    #[error("cell {0} is already occupied")]
    CellOccupied(Move),
    #[error("move {mv} is outside the active sub-board {active}")]
    WrongBoard { mv: Move, active: usize },
}
