use crate::board::GameState;
use crate::search::cache::EvalCache;
use crate::search::zobrist;

// Search window bounds; any real evaluation lies well inside them.
pub const SCORE_INF: i32 = 1_000_000;

// Side-agnostic sub-board count: positive means X holds more sub-boards.
pub fn evaluate(state: &GameState) -> i32 {
    state.evaluate()
}

pub fn cached_evaluate(cache: &mut EvalCache, state: &GameState) -> i32 {
    let hash = zobrist::compute(state);
    let key = state.key();
    if let Some(score) = cache.get(hash, &key) {
        return score;
    }
    let score = evaluate(state);
    cache.put(hash, key, score);
    score
}
