// Ultimate Tic-Tac-Toe: game rules, alpha-beta and MCTS engines, agents, arena
pub mod agent;
pub mod arena;
pub mod board;
pub mod config;
pub mod mcts;
pub mod search;

pub use agent::{Agent, AgentConfig, AgentKind};
pub use board::{Cell, GameState, IllegalMove, Move, Outcome, Player};
