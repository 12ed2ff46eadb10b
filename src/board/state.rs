use std::fmt;

use super::sub_board::{line_winner, SubBoard};
use super::{Cell, IllegalMove, Move, Outcome, Player};

/// Packed encoding of the full position: two bits per cell (162 bits),
/// then the active board (4 bits, 9 = anywhere) and the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateKey(pub [u64; 3]);

/// Full Ultimate Tic-Tac-Toe position.
///
/// The stored `active_board` always names a playable sub-board or is `None`;
/// `apply_move` normalises it whenever the routed-to board is won or full.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    boards: [SubBoard; 9],
    active_board: Option<usize>,
    sub_winners: [Option<Player>; 9],
    to_move: Player,
    status: Option<Outcome>,
    moves_played: usize,
}

impl Default for GameState {
    fn default() -> Self { Self::new() }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            boards: [SubBoard::new(); 9],
            active_board: None,
            sub_winners: [None; 9],
            to_move: Player::X,
            status: None,
            moves_played: 0,
        }
    }

    pub fn to_move(&self) -> Player { self.to_move }
    pub fn active_board(&self) -> Option<usize> { self.active_board }
    pub fn sub_winner(&self, board: usize) -> Option<Player> { self.sub_winners[board] }
    pub fn sub_winners(&self) -> &[Option<Player>; 9] { &self.sub_winners }
    pub fn sub_board(&self, board: usize) -> &SubBoard { &self.boards[board] }
    pub fn cell(&self, board: usize, cell: usize) -> Cell { self.boards[board].cell(cell) }
    pub fn moves_played(&self) -> usize { self.moves_played }
    pub fn winner(&self) -> Option<Outcome> { self.status }
    pub fn is_terminal(&self) -> bool { self.status.is_some() }

    /// A sub-board accepts moves while it is neither won nor full.
    pub fn is_playable(&self, board: usize) -> bool {
        self.sub_winners[board].is_none() && !self.boards[board].is_full()
    }

    pub fn empty_cells(&self) -> usize {
        self.boards.iter().map(|b| b.empty_cells().count()).sum()
    }

    /// Empty cells in sub-boards that still accept moves; bounds the remaining plies.
    pub fn open_cells(&self) -> usize {
        (0..9).filter(|&b| self.is_playable(b)).map(|b| self.boards[b].empty_cells().count()).sum()
    }

    pub fn valid_moves(&self) -> Vec<Move> {
        if self.is_terminal() { return Vec::new(); }
        let mut moves = Vec::with_capacity(81);
        match self.active_board {
            Some(b) if self.is_playable(b) => {
                moves.extend(self.boards[b].empty_cells().map(|c| Move::new(b, c)));
            }
            _ => {
                for b in (0..9).filter(|&b| self.is_playable(b)) {
                    moves.extend(self.boards[b].empty_cells().map(|c| Move::new(b, c)));
                }
            }
        }
        moves
    }

    pub fn play(&mut self, mv: Move) -> Result<(), IllegalMove> {
        self.apply_move(mv.board, mv.cell)
    }

    /// Places the side to move's mark at `cell` of sub-board `board`.
    ///
    /// Besides won sub-boards and occupied cells, this also rejects a move
    /// outside the active sub-board with [`IllegalMove::WrongBoard`], so every
    /// accepted move is one `valid_moves` would have offered. Checks run in
    /// order: game over, range, decided board, occupied cell, active board.
    /// A rejected move leaves the state untouched.
    pub fn apply_move(&mut self, board: usize, cell: usize) -> Result<(), IllegalMove> {
        let mv = Move::new(board, cell);
        if self.is_terminal() { return Err(IllegalMove::GameOver); }
        if board > 8 || cell > 8 { return Err(IllegalMove::OutOfRange(mv)); }
        if self.sub_winners[board].is_some() { return Err(IllegalMove::SubBoardDecided(board)); }
        if self.boards[board].cell(cell) != Cell::Empty { return Err(IllegalMove::CellOccupied(mv)); }
        if let Some(active) = self.active_board {
            if active != board && self.is_playable(active) {
                return Err(IllegalMove::WrongBoard { mv, active });
            }
        }

        self.boards[board].set(cell, self.to_move.cell());
        self.moves_played += 1;
        if let Some(w) = self.boards[board].winner() {
            self.sub_winners[board] = Some(w);
        }

        // Cell (r, c) routes the opponent to sub-board r * 3 + c, which is the cell index itself.
        self.active_board = Some(cell);
        self.normalize_active_board();

        self.status = self.compute_status();
        if self.status.is_none() {
            self.to_move = self.to_move.opponent();
        }
        Ok(())
    }

    fn normalize_active_board(&mut self) {
        if let Some(b) = self.active_board {
            if !self.is_playable(b) { self.active_board = None; }
        }
    }

    fn compute_status(&self) -> Option<Outcome> {
        if let Some(p) = line_winner(&self.sub_winners) {
            return Some(Outcome::won_by(p));
        }
        if (0..9).all(|b| !self.is_playable(b)) {
            return Some(Outcome::Draw);
        }
        None
    }

    /// Heuristic score from X's perspective: +1 per sub-board X holds, -1 per sub-board O holds.
    pub fn evaluate(&self) -> i32 {
        self.sub_winners.iter().map(|w| match w {
            Some(Player::X) => 1,
            Some(Player::O) => -1,
            None => 0,
        }).sum()
    }

    pub fn key(&self) -> StateKey {
        let mut words = [0u64; 3];
        for (b, sb) in self.boards.iter().enumerate() {
            for c in 0..9 {
                let bits: u64 = match sb.cell(c) { Cell::Empty => 0, Cell::X => 1, Cell::O => 2 };
                let pos = (b * 9 + c) * 2;
                words[pos / 64] |= bits << (pos % 64);
            }
        }
        let active = self.active_board.unwrap_or(9) as u64;
        let side = if self.to_move == Player::O { 1u64 } else { 0 };
        words[2] |= (active | (side << 4)) << (162 - 128);
        StateKey(words)
    }
}

fn mark(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::X => 'X',
        Cell::O => 'O',
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for big_row in 0..3 {
            if big_row > 0 { writeln!(f, "------+-------+------")?; }
            for row in 0..3 {
                let mut line = String::with_capacity(24);
                for big_col in 0..3 {
                    if big_col > 0 { line.push_str(" |"); }
                    let b = big_row * 3 + big_col;
                    for col in 0..3 {
                        if big_col > 0 || col > 0 { line.push(' '); }
                        let ch = match self.sub_winners[b] {
                            Some(p) => if row == 1 && col == 1 { mark(p.cell()) } else { '#' },
                            None => mark(self.boards[b].cell(row * 3 + col)),
                        };
                        line.push(ch);
                    }
                }
                writeln!(f, "{}", line)?;
            }
        }
        match (self.status, self.active_board) {
            (Some(outcome), _) => write!(f, "result: {}", outcome),
            (None, Some(b)) => write!(f, "{} to move in sub-board {}", self.to_move, b),
            (None, None) => write!(f, "{} to move anywhere", self.to_move),
        }
    }
}
