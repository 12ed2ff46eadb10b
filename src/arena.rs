use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::agent::{Agent, AgentConfig};
use crate::board::{GameState, IllegalMove, Move, Outcome, Player};
use crate::config::{ArenaConfig, ConfigError};

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("agent {agent} returned no move in a live position")]
    NoMove { agent: String },
    #[error("agent {agent} played illegal move {mv}: {source}")]
    Illegal { agent: String, mv: Move, #[source] source: IllegalMove },
    #[error("human agent {0} cannot play unattended")]
    Human(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<Move>,
    pub outcome: Outcome,
    pub x_time: Duration,
    pub o_time: Duration,
    pub x_moves: usize,
    pub o_moves: usize,
}

/// Plays one game to the end, `x` moving first.
pub fn play_game(x: &mut Agent, o: &mut Agent) -> Result<GameRecord, ArenaError> {
    for a in [&*x, &*o] {
        if a.is_human() { return Err(ArenaError::Human(a.name().to_string())); }
    }
    let mut state = GameState::new();
    let mut moves = Vec::with_capacity(81);
    let (mut x_time, mut o_time) = (Duration::ZERO, Duration::ZERO);
    let (mut x_moves, mut o_moves) = (0usize, 0usize);

    while state.winner().is_none() {
        let side = state.to_move();
        let agent = if side == Player::X { &mut *x } else { &mut *o };
        let t0 = Instant::now();
        let chosen = agent.choose_move(&state);
        let dt = t0.elapsed();
        let mv = chosen.ok_or_else(|| ArenaError::NoMove { agent: agent.name().to_string() })?;
        state.play(mv).map_err(|source| ArenaError::Illegal { agent: agent.name().to_string(), mv, source })?;
        moves.push(mv);
        match side {
            Player::X => { x_time += dt; x_moves += 1; }
            Player::O => { o_time += dt; o_moves += 1; }
        }
    }
    let outcome = state.winner().unwrap_or(Outcome::Draw);
    Ok(GameRecord { moves, outcome, x_time, o_time, x_moves, o_moves })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    pub x_name: String,
    pub o_name: String,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

impl MatchResult {
    pub fn games(&self) -> usize { self.x_wins + self.o_wins + self.draws }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentStats {
    pub name: String,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub total_time_secs: f64,
    pub total_moves: usize,
    pub avg_time_secs: f64,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub draw_rate: f64,
}

impl AgentStats {
    fn finalize(&mut self) {
        self.avg_time_secs = if self.total_moves > 0 { self.total_time_secs / self.total_moves as f64 } else { 0.0 };
        let games = self.wins + self.losses + self.draws;
        if games > 0 {
            let g = games as f64;
            self.win_rate = self.wins as f64 / g;
            self.loss_rate = self.losses as f64 / g;
            self.draw_rate = self.draws as f64 / g;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TournamentReport {
    pub total_games: usize,
    pub matches: Vec<MatchResult>,
    pub agents: Vec<AgentStats>,
}

impl TournamentReport {
    pub fn summary_table(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Total games played: {}", self.total_games);
        let _ = writeln!(s, "{:<28} {:>6} {:>6} {:>6} {:>9} {:>9} {:>9} {:>12}",
            "agent", "wins", "losses", "draws", "win%", "loss%", "draw%", "avg move s");
        for a in &self.agents {
            let _ = writeln!(s, "{:<28} {:>6} {:>6} {:>6} {:>8.2}% {:>8.2}% {:>8.2}% {:>12.4}",
                a.name, a.wins, a.losses, a.draws, a.win_rate * 100.0, a.loss_rate * 100.0, a.draw_rate * 100.0, a.avg_time_secs);
        }
        s
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ArenaError> {
        let f = std::io::BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer_pretty(f, self)?;
        Ok(())
    }
}

struct PairOutcome {
    first: usize,
    second: usize,
    result: MatchResult,
    first_time: Duration,
    first_moves: usize,
    second_time: Duration,
    second_moves: usize,
}

fn seeded(cfg: &AgentConfig, seed: u64) -> AgentConfig {
    let mut c = cfg.clone();
    if c.seed.is_none() { c.seed = Some(seed); }
    c
}

fn play_pair(config: &ArenaConfig, pair_idx: usize, first: usize, second: usize, on_game: &(dyn Fn() + Sync)) -> Result<PairOutcome, ArenaError> {
    let base = config.seed.wrapping_add((pair_idx as u64) << 16);
    let mut x = Agent::from_config(&seeded(&config.agents[first], base))?;
    let mut o = Agent::from_config(&seeded(&config.agents[second], base ^ 0x5555))?;
    info!("match: {} vs {}", x.name(), o.name());

    let mut out = PairOutcome {
        first,
        second,
        result: MatchResult { x_name: x.name().to_string(), o_name: o.name().to_string(), ..MatchResult::default() },
        first_time: Duration::ZERO,
        first_moves: 0,
        second_time: Duration::ZERO,
        second_moves: 0,
    };
    for _ in 0..config.games_per_match {
        let g = play_game(&mut x, &mut o)?;
        match g.outcome {
            Outcome::XWins => out.result.x_wins += 1,
            Outcome::OWins => out.result.o_wins += 1,
            Outcome::Draw => out.result.draws += 1,
        }
        out.first_time += g.x_time;
        out.first_moves += g.x_moves;
        out.second_time += g.o_time;
        out.second_moves += g.o_moves;
        on_game();
    }
    info!("match {} vs {}: {}-{} with {} draws",
        out.result.x_name, out.result.o_name, out.result.x_wins, out.result.o_wins, out.result.draws);
    Ok(out)
}

/// Number of games a tournament over `config` will play.
pub fn total_games(config: &ArenaConfig) -> usize {
    let n = config.agents.len();
    n * n.saturating_sub(1) / 2 * config.games_per_match
}

pub fn run_tournament(config: &ArenaConfig) -> Result<TournamentReport, ArenaError> {
    run_tournament_with_progress(config, &|| {})
}

/// Every unordered pair plays `games_per_match` games, the earlier agent in config order as X.
pub fn run_tournament_with_progress(config: &ArenaConfig, on_game: &(dyn Fn() + Sync)) -> Result<TournamentReport, ArenaError> {
    config.validate()?;
    let n = config.agents.len();
    let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j))).collect();

    let pool = rayon::ThreadPoolBuilder::new().num_threads(config.threads.max(1)).build()?;
    let outcomes: Vec<PairOutcome> = pool.install(|| {
        pairs.par_iter().enumerate()
            .map(|(k, &(i, j))| play_pair(config, k, i, j, on_game))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut stats: Vec<AgentStats> = config.agents.iter()
        .map(|a| AgentStats { name: a.display_name(), ..AgentStats::default() })
        .collect();
    let mut report = TournamentReport::default();
    for o in outcomes {
        let r = &o.result;
        let a = &mut stats[o.first];
        a.wins += r.x_wins; a.losses += r.o_wins; a.draws += r.draws;
        a.total_time_secs += o.first_time.as_secs_f64(); a.total_moves += o.first_moves;
        let b = &mut stats[o.second];
        b.wins += r.o_wins; b.losses += r.x_wins; b.draws += r.draws;
        b.total_time_secs += o.second_time.as_secs_f64(); b.total_moves += o.second_moves;
        report.total_games += r.games();
        report.matches.push(o.result);
    }
    for s in &mut stats { s.finalize(); }
    report.agents = stats;
    Ok(report)
}
