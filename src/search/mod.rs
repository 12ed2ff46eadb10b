pub mod alphabeta;
pub mod cache;
pub mod eval;
pub mod zobrist;
