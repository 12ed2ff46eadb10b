use crate::board::{GameState, Move, Player};
use crate::search::cache::EvalCache;
use crate::search::eval::{cached_evaluate, evaluate, SCORE_INF};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Search depth: a fixed ceiling, or "full search" that deepens until the clock runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DepthRepr", into = "DepthRepr")]
pub enum Depth {
    Fixed(u32),
    Unbounded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DepthRepr {
    Plies(u32),
    Word(String),
}

impl TryFrom<DepthRepr> for Depth {
    type Error = String;

    fn try_from(r: DepthRepr) -> Result<Self, Self::Error> {
        match r {
            DepthRepr::Plies(d) => Ok(Depth::Fixed(d)),
            DepthRepr::Word(w) => w.parse(),
        }
    }
}

impl From<Depth> for DepthRepr {
    fn from(d: Depth) -> Self {
        match d {
            Depth::Fixed(n) => DepthRepr::Plies(n),
            Depth::Unbounded => DepthRepr::Word("unbounded".to_string()),
        }
    }
}

impl std::str::FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unbounded" | "full" | "inf" => Ok(Depth::Unbounded),
            other => other.parse::<u32>().map(Depth::Fixed).map_err(|_| format!("invalid depth '{s}': expected a number or 'unbounded'")),
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Fixed(d) => write!(f, "{}", d),
            Depth::Unbounded => write!(f, "unbounded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("unbounded depth requires a time budget")]
    UnboundedWithoutBudget,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub depth: Depth,
    pub movetime: Option<Duration>,
    pub use_pruning: bool,
    pub use_cache: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { depth: Depth::Fixed(3), movetime: None, use_pruning: true, use_cache: true }
    }
}

#[derive(Default, Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    /// Last fully completed depth.
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Minimax with optional alpha-beta pruning over cloned states.
///
/// Scores are from X's perspective; X maximises. Among equal scores the
/// first move in `valid_moves()` order wins, so results are deterministic.
pub struct Searcher {
    cache: EvalCache,
    pub(crate) nodes: u64,
    use_pruning: bool,
    use_cache: bool,
}

impl Default for Searcher {
    fn default() -> Self {
        Self { cache: EvalCache::default(), nodes: 0, use_pruning: true, use_cache: true }
    }
}

impl Searcher {
    pub fn with_cache(cache: EvalCache) -> Self {
        Self { cache, ..Self::default() }
    }

    pub fn cache(&self) -> &EvalCache { &self.cache }

    pub fn nodes(&self) -> u64 { self.nodes }

    fn leaf_eval(&mut self, state: &GameState) -> i32 {
        if self.use_cache { cached_evaluate(&mut self.cache, state) } else { evaluate(state) }
    }

    pub fn minimax(&mut self, state: &GameState, depth: u32, maximizing: bool, mut alpha: i32, mut beta: i32) -> (i32, Option<Move>) {
        self.nodes += 1;
        if depth == 0 || state.is_terminal() {
            return (self.leaf_eval(state), None);
        }

        let moves = state.valid_moves();
        if moves.is_empty() {
            error!("no legal moves in a live position:\n{}", state);
            debug_assert!(false, "live position without legal moves");
            return (self.leaf_eval(state), None);
        }

        let mut best_move = None;
        if maximizing {
            let mut max_eval = -SCORE_INF;
            for mv in moves {
                let mut child = state.clone();
                if let Err(e) = child.play(mv) {
                    error!("generated move {} rejected: {}", mv, e);
                    continue;
                }
                let (eval, _) = self.minimax(&child, depth - 1, false, alpha, beta);
                if eval > max_eval { max_eval = eval; best_move = Some(mv); }
                alpha = alpha.max(eval);
                if self.use_pruning && beta <= alpha { break; }
            }
            (max_eval, best_move)
        } else {
            let mut min_eval = SCORE_INF;
            for mv in moves {
                let mut child = state.clone();
                if let Err(e) = child.play(mv) {
                    error!("generated move {} rejected: {}", mv, e);
                    continue;
                }
                let (eval, _) = self.minimax(&child, depth - 1, true, alpha, beta);
                if eval < min_eval { min_eval = eval; best_move = Some(mv); }
                beta = beta.min(eval);
                if self.use_pruning && beta <= alpha { break; }
            }
            (min_eval, best_move)
        }
    }

    /// Single full-window search at `depth` for the side to move.
    pub fn search_depth(&mut self, state: &GameState, depth: u32) -> SearchResult {
        let t0 = Instant::now();
        let start_nodes = self.nodes;
        let maximizing = state.to_move() == Player::X;
        let (score, best_move) = self.minimax(state, depth, maximizing, -SCORE_INF, SCORE_INF);
        SearchResult { best_move, score, depth, nodes: self.nodes - start_nodes, elapsed: t0.elapsed() }
    }

    /// Iterative deepening from depth 1, keeping the last completed depth's move.
    ///
    /// The clock is polled between depths only; a depth in progress always completes.
    pub fn search_with_params(&mut self, state: &GameState, params: SearchParams) -> Result<SearchResult, SearchError> {
        if params.depth == Depth::Unbounded && params.movetime.is_none() {
            return Err(SearchError::UnboundedWithoutBudget);
        }
        self.nodes = 0;
        self.use_pruning = params.use_pruning;
        self.use_cache = params.use_cache;

        let start = Instant::now();
        let mut result = SearchResult { score: evaluate(state), ..SearchResult::default() };
        if state.is_terminal() {
            result.elapsed = start.elapsed();
            return Ok(result);
        }

        match params.depth {
            Depth::Fixed(max_depth) => {
                for d in 1..=max_depth {
                    self.run_depth(state, d, &mut result);
                    if let Some(limit) = params.movetime { if start.elapsed() > limit { break; } }
                }
            }
            Depth::Unbounded => {
                let limit = params.movetime.unwrap_or_default();
                // Past the number of open cells every line has reached a terminal state.
                let ceiling = state.open_cells() as u32;
                let mut d = 1;
                while start.elapsed() < limit {
                    self.run_depth(state, d, &mut result);
                    if d >= ceiling { break; }
                    d += 1;
                }
            }
        }

        result.nodes = self.nodes;
        result.elapsed = start.elapsed();
        Ok(result)
    }

    fn run_depth(&mut self, state: &GameState, depth: u32, result: &mut SearchResult) {
        let r = self.search_depth(state, depth);
        debug!("depth {} score {} best {:?} nodes {} in {:?}", depth, r.score, r.best_move.map(|m| m.to_string()), r.nodes, r.elapsed);
        if r.best_move.is_some() { result.best_move = r.best_move; }
        result.score = r.score;
        result.depth = depth;
    }
}
