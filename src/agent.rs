use log::{debug, error};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::board::{GameState, Move};
use crate::config::ConfigError;
use crate::mcts::{self, MctsParams};
use crate::search::alphabeta::{Depth, SearchParams, Searcher};

pub const DEFAULT_DEPTH: u32 = 3;
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 5.0;
pub const DEFAULT_ITERATIONS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Random,
    Minimax,
    #[serde(alias = "alpha-beta", alias = "alpha_beta")]
    AlphaBeta,
    Mcts,
    Human,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentKind::Random => "Random",
            AgentKind::Minimax => "Minimax",
            AgentKind::AlphaBeta => "AlphaBeta",
            AgentKind::Mcts => "MCTS",
            AgentKind::Human => "Human",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "minimax" => Ok(AgentKind::Minimax),
            "alphabeta" | "alpha-beta" | "alpha_beta" => Ok(AgentKind::AlphaBeta),
            "mcts" => Ok(AgentKind::Mcts),
            "human" => Ok(AgentKind::Human),
            other => Err(format!("unknown agent kind '{other}'")),
        }
    }
}

/// Construction parameters for any agent; fields that do not apply to a kind are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub kind: AgentKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub depth: Option<Depth>,
    #[serde(default)]
    pub time_limit_secs: Option<f64>,
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new(kind: AgentKind) -> Self {
        Self { kind, name: None, depth: None, time_limit_secs: None, iterations: None, seed: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.name = Some(name.into()); self }
    pub fn with_depth(mut self, depth: Depth) -> Self { self.depth = Some(depth); self }
    pub fn with_time_limit(mut self, secs: f64) -> Self { self.time_limit_secs = Some(secs); self }
    pub fn with_iterations(mut self, iterations: u32) -> Self { self.iterations = Some(iterations); self }
    pub fn with_seed(mut self, seed: u64) -> Self { self.seed = Some(seed); self }

    fn depth_or_default(&self) -> Depth { self.depth.unwrap_or(Depth::Fixed(DEFAULT_DEPTH)) }
    fn time_or_default(&self) -> f64 { self.time_limit_secs.unwrap_or(DEFAULT_TIME_LIMIT_SECS) }
    fn iterations_or_default(&self) -> u32 { self.iterations.unwrap_or(DEFAULT_ITERATIONS) }

    fn time_limit(&self) -> Result<Duration, ConfigError> {
        let secs = self.time_or_default();
        Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeLimit(secs))
    }

    /// Explicit name, or one derived from the kind and its parameters.
    pub fn display_name(&self) -> String {
        if let Some(ref n) = self.name { return n.clone(); }
        match self.kind {
            AgentKind::Random | AgentKind::Human => self.kind.to_string(),
            AgentKind::Minimax | AgentKind::AlphaBeta => match self.depth_or_default() {
                Depth::Fixed(d) => format!("{}_D{}_T{}", self.kind, d, self.time_or_default()),
                Depth::Unbounded => format!("{}_FullSearch_T{}", self.kind, self.time_or_default()),
            },
            AgentKind::Mcts => format!("{}_I{}_T{}", self.kind, self.iterations_or_default(), self.time_or_default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            AgentKind::Minimax | AgentKind::AlphaBeta => {
                self.time_limit()?;
                if self.depth_or_default() == Depth::Fixed(0) {
                    return Err(ConfigError::ZeroDepth(self.display_name()));
                }
            }
            AgentKind::Mcts => {
                self.time_limit()?;
                if self.iterations_or_default() == 0 {
                    return Err(ConfigError::ZeroIterations(self.display_name()));
                }
            }
            AgentKind::Random | AgentKind::Human => {}
        }
        Ok(())
    }
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_entropy(),
    }
}

pub struct RandomAgent {
    name: String,
    rng: SmallRng,
}

impl RandomAgent {
    pub fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        state.valid_moves().choose(&mut self.rng).copied()
    }
}

/// Iterative-deepening minimax; `label` only distinguishes Minimax from AlphaBeta.
pub struct MinimaxAgent {
    name: String,
    label: AgentKind,
    params: SearchParams,
    searcher: Searcher,
}

impl MinimaxAgent {
    pub fn params(&self) -> SearchParams { self.params }

    pub fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        match self.searcher.search_with_params(state, self.params) {
            Ok(r) => {
                debug!("{} ({}): {:?} score {} depth {} nodes {} in {:?}",
                    self.name, self.label, r.best_move.map(|m| m.to_string()), r.score, r.depth, r.nodes, r.elapsed);
                r.best_move
            }
            Err(e) => {
                error!("{}: {}", self.name, e);
                None
            }
        }
    }
}

/// With a budget that allows no iteration (zero time), returns `None` even on a live position.
pub struct MctsAgent {
    name: String,
    params: MctsParams,
    rng: SmallRng,
}

impl MctsAgent {
    pub fn params(&self) -> MctsParams { self.params }

    pub fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        let r = mcts::search(state, self.params, &mut self.rng);
        debug!("{}: {:?} after {} iterations ({} nodes) in {:?}",
            self.name, r.best_move.map(|m| m.to_string()), r.iterations, r.nodes, r.elapsed);
        r.best_move
    }
}

/// Moves come from outside; `choose_move` never answers.
pub struct HumanAgent {
    name: String,
}

pub enum Agent {
    Random(RandomAgent),
    Minimax(MinimaxAgent),
    Mcts(MctsAgent),
    Human(HumanAgent),
}

impl Agent {
    pub fn from_config(cfg: &AgentConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let name = cfg.display_name();
        let agent = match cfg.kind {
            AgentKind::Random => Agent::Random(RandomAgent { name, rng: make_rng(cfg.seed) }),
            AgentKind::Minimax | AgentKind::AlphaBeta => {
                let depth = cfg.depth_or_default();
                let movetime = Some(cfg.time_limit()?);
                let params = SearchParams { depth, movetime, ..SearchParams::default() };
                Agent::Minimax(MinimaxAgent { name, label: cfg.kind, params, searcher: Searcher::default() })
            }
            AgentKind::Mcts => {
                let params = MctsParams {
                    iterations: cfg.iterations_or_default(),
                    time_limit: Some(cfg.time_limit()?),
                    ..MctsParams::default()
                };
                Agent::Mcts(MctsAgent { name, params, rng: make_rng(cfg.seed) })
            }
            AgentKind::Human => Agent::Human(HumanAgent { name }),
        };
        Ok(agent)
    }

    pub fn name(&self) -> &str {
        match self {
            Agent::Random(a) => &a.name,
            Agent::Minimax(a) => &a.name,
            Agent::Mcts(a) => &a.name,
            Agent::Human(a) => &a.name,
        }
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            Agent::Random(_) => AgentKind::Random,
            Agent::Minimax(a) => a.label,
            Agent::Mcts(_) => AgentKind::Mcts,
            Agent::Human(_) => AgentKind::Human,
        }
    }

    pub fn is_human(&self) -> bool { matches!(self, Agent::Human(_)) }

    pub fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        match self {
            Agent::Random(a) => a.choose_move(state),
            Agent::Minimax(a) => a.choose_move(state),
            Agent::Mcts(a) => a.choose_move(state),
            Agent::Human(_) => None,
        }
    }
}
