use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nineboard::agent::{AgentConfig, AgentKind};
use nineboard::arena::{run_tournament_with_progress, total_games};
use nineboard::config::ArenaConfig;
use nineboard::search::alphabeta::Depth;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nineboard-arena", about = "Round-robin tournament between Ultimate Tic-Tac-Toe agents")]
struct Args {
    /// JSON arena config; overrides the agent flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// Comma-separated agent kinds, e.g. random,alphabeta,mcts
    #[arg(long, value_delimiter = ',', default_value = "random,alphabeta,mcts")]
    agents: Vec<AgentKind>,
    #[arg(long, default_value_t = 10)]
    games: usize,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value = "3")]
    depth: Depth,
    #[arg(long, default_value_t = 1.0)]
    time_limit: f64,
    #[arg(long, default_value_t = 1000)]
    iterations: u32,
    /// Optional: write the report as JSON to this path
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let config = match a.config {
        Some(ref path) => ArenaConfig::from_path(path)?,
        None => {
            let agents = a.agents.iter().map(|&kind| {
                AgentConfig::new(kind).with_depth(a.depth).with_time_limit(a.time_limit).with_iterations(a.iterations)
            }).collect();
            ArenaConfig { agents, games_per_match: a.games, threads: a.threads, seed: a.seed }
        }
    };
    config.validate()?;

    let names: Vec<String> = config.agents.iter().map(|c| c.display_name()).collect();
    eprintln!("Arena: {} ({} games per match, threads={}, seed={})", names.join(", "), config.games_per_match, config.threads, config.seed);

    let pb = ProgressBar::new(total_games(&config) as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games [{elapsed_precise}]")?);
    let report = run_tournament_with_progress(&config, &|| pb.inc(1))?;
    pb.finish_and_clear();

    for m in &report.matches {
        println!("{} (X) vs {} (O): {} - {} ({} draws)", m.x_name, m.o_name, m.x_wins, m.o_wins, m.draws);
    }
    println!();
    print!("{}", report.summary_table());

    if let Some(path) = a.json_out {
        report.write_json(&path)?;
        eprintln!("Wrote report to {}", path.display());
    }
    Ok(())
}
