use super::{Cell, Player};

/// The eight winning lines of a 3x3 grid: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// First complete line of identical marks, if any.
pub fn line_winner(marks: &[Option<Player>; 9]) -> Option<Player> {
    for line in LINES.iter() {
        if let Some(p) = marks[line[0]] {
            if marks[line[1]] == Some(p) && marks[line[2]] == Some(p) {
                return Some(p);
            }
        }
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SubBoard {
    cells: [Cell; 9],
}

impl SubBoard {
    pub fn new() -> Self { Self::default() }

    pub fn cell(&self, idx: usize) -> Cell { self.cells[idx] }

    pub fn cells(&self) -> &[Cell; 9] { &self.cells }

    pub(crate) fn set(&mut self, idx: usize, cell: Cell) { self.cells[idx] = cell; }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    pub fn winner(&self) -> Option<Player> {
        let marks = self.cells.map(Cell::player);
        line_winner(&marks)
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().enumerate().filter(|(_, c)| **c == Cell::Empty).map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_line() {
        for line in LINES.iter() {
            let mut sb = SubBoard::new();
            for &i in line { sb.set(i, Cell::O); }
            assert_eq!(sb.winner(), Some(Player::O), "line {:?}", line);
        }
    }

    #[test]
    fn mixed_line_is_not_a_win() {
        let mut sb = SubBoard::new();
        sb.set(0, Cell::X);
        sb.set(1, Cell::X);
        sb.set(2, Cell::O);
        assert_eq!(sb.winner(), None);
        assert!(!sb.is_full());
        assert_eq!(sb.empty_cells().count(), 6);
    }
}
