use anyhow::Result;
use clap::Parser;
use nineboard::agent::{Agent, AgentConfig, AgentKind};
use nineboard::board::{GameState, Move, Outcome};
use nineboard::search::alphabeta::Depth;
use std::io::{self, Write};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Ultimate Tic-Tac-Toe in the terminal", long_about = None)]
struct Args {
    /// Agent playing X: human, random, minimax, alphabeta or mcts
    #[arg(long, default_value = "human")]
    x: AgentKind,

    /// Agent playing O: human, random, minimax, alphabeta or mcts
    #[arg(long, default_value = "alphabeta")]
    o: AgentKind,

    /// Search depth for minimax/alphabeta ("unbounded" for full search)
    #[arg(long, default_value = "3")]
    depth: Depth,

    /// Time limit per move in seconds
    #[arg(long, default_value_t = 5.0)]
    time_limit: f64,

    /// MCTS iterations per move
    #[arg(long, default_value_t = 1000)]
    iterations: u32,

    /// Random seed for random and MCTS agents
    #[arg(long)]
    seed: Option<u64>,

    /// Print timing for engine moves
    #[arg(long)]
    verbose: bool,
}

fn build_agent(kind: AgentKind, args: &Args, seed_offset: u64) -> Result<Agent> {
    let mut cfg = AgentConfig::new(kind)
        .with_depth(args.depth)
        .with_time_limit(args.time_limit)
        .with_iterations(args.iterations);
    if let Some(s) = args.seed { cfg = cfg.with_seed(s.wrapping_add(seed_offset)); }
    Ok(Agent::from_config(&cfg)?)
}

fn get_human_move(state: &GameState) -> Result<Move> {
    let legal_moves = state.valid_moves();
    loop {
        print!("Enter your move as board:cell (e.g. 4:4): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            anyhow::bail!("input closed");
        }
        match input.trim().parse::<Move>() {
            Ok(mv) if legal_moves.contains(&mv) => return Ok(mv),
            Ok(_) => {
                let listed: Vec<String> = legal_moves.iter().map(|m| m.to_string()).collect();
                println!("Illegal move! Legal moves are: {}", listed.join(" "));
            }
            Err(e) => println!("Invalid move format: {e}"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut x = build_agent(args.x, &args, 0)?;
    let mut o = build_agent(args.o, &args, 1)?;
    println!("{} (X) vs {} (O)", x.name(), o.name());

    let mut game = GameState::new();
    loop {
        println!("\n{}", game);
        if let Some(result) = game.winner() {
            match result {
                Outcome::XWins => println!("\n{} (X) wins!", x.name()),
                Outcome::OWins => println!("\n{} (O) wins!", o.name()),
                Outcome::Draw => println!("\nThe game is a draw!"),
            }
            break;
        }

        let agent = if game.to_move() == nineboard::Player::X { &mut x } else { &mut o };
        let mv = if agent.is_human() {
            get_human_move(&game)?
        } else {
            let start = Instant::now();
            let Some(mv) = agent.choose_move(&game) else {
                anyhow::bail!("{} found no move", agent.name());
            };
            if args.verbose {
                println!("{} thought for {:.2}s", agent.name(), start.elapsed().as_secs_f32());
            }
            println!("{} plays: {}", agent.name(), mv);
            mv
        };
        game.play(mv)?;
    }

    Ok(())
}
