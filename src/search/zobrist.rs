use crate::board::{Cell, GameState, Player};
use std::sync::OnceLock;

const CELLS: usize = 81;

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

// Layout: [mark X per cell | mark O per cell | active board 0..=8 or anywhere]
static TABLE: OnceLock<[u64; 2 * CELLS + 10]> = OnceLock::new();
static SIDE_KEY: OnceLock<u64> = OnceLock::new();

fn init_table() -> &'static [u64; 2 * CELLS + 10] {
    TABLE.get_or_init(|| {
        let mut t = [0u64; 2 * CELLS + 10];
        let mut seed = 0x0BAD_5EED_1234_ABCD;
        for v in &mut t {
            seed = splitmix64(seed);
            *v = seed;
        }
        t
    })
}

fn init_side() -> u64 {
    *SIDE_KEY.get_or_init(|| splitmix64(0xABCDEF1234567890))
}

pub fn compute(state: &GameState) -> u64 {
    let table = init_table();
    let mut key = 0u64;
    for b in 0..9 {
        for c in 0..9 {
            let idx = b * 9 + c;
            match state.cell(b, c) {
                Cell::Empty => {}
                Cell::X => key ^= table[idx],
                Cell::O => key ^= table[CELLS + idx],
            }
        }
    }
    key ^= table[2 * CELLS + state.active_board().unwrap_or(9)];
    if state.to_move() == Player::O { key ^= init_side(); }
    key
}
