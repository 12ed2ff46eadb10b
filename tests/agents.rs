use nineboard::agent::{Agent, AgentConfig, AgentKind};
use nineboard::board::GameState;
use nineboard::config::ConfigError;
use nineboard::search::alphabeta::Depth;
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn finished_game() -> GameState {
    let mut rng = SmallRng::seed_from_u64(17);
    let mut g = GameState::new();
    while !g.is_terminal() {
        let mv = *g.valid_moves().choose(&mut rng).unwrap();
        g.play(mv).unwrap();
    }
    g
}

fn opening() -> GameState {
    let mut g = GameState::new();
    for (b, c) in [(4, 4), (4, 0), (0, 8)] { g.apply_move(b, c).unwrap(); }
    g
}

#[test]
fn random_agent_plays_legal_moves() {
    let mut a = Agent::from_config(&AgentConfig::new(AgentKind::Random).with_seed(5)).unwrap();
    let g = opening();
    for _ in 0..20 {
        let mv = a.choose_move(&g).unwrap();
        assert!(g.valid_moves().contains(&mv));
    }
    assert_eq!(a.choose_move(&finished_game()), None);
}

#[test]
fn human_agent_never_answers() {
    let mut a = Agent::from_config(&AgentConfig::new(AgentKind::Human)).unwrap();
    assert!(a.is_human());
    assert_eq!(a.choose_move(&GameState::new()), None);
}

#[test]
fn minimax_and_alphabeta_share_one_engine() {
    let g = opening();
    let mut mm = Agent::from_config(&AgentConfig::new(AgentKind::Minimax).with_depth(Depth::Fixed(3))).unwrap();
    let mut ab = Agent::from_config(&AgentConfig::new(AgentKind::AlphaBeta).with_depth(Depth::Fixed(3))).unwrap();
    assert_eq!(mm.kind(), AgentKind::Minimax);
    assert_eq!(ab.kind(), AgentKind::AlphaBeta);
    let a = mm.choose_move(&g);
    assert!(a.is_some());
    assert_eq!(a, ab.choose_move(&g));
}

#[test]
fn seeded_mcts_agents_agree() {
    let g = opening();
    let cfg = AgentConfig::new(AgentKind::Mcts).with_iterations(150).with_seed(11);
    let mut a = Agent::from_config(&cfg).unwrap();
    let mut b = Agent::from_config(&cfg).unwrap();
    let mv = a.choose_move(&g).expect("mcts agent found no move");
    assert!(g.valid_moves().contains(&mv));
    assert_eq!(Some(mv), b.choose_move(&g));
}

#[test]
fn unbounded_agent_with_short_budget_still_moves() {
    let cfg = AgentConfig::new(AgentKind::AlphaBeta).with_depth(Depth::Unbounded).with_time_limit(0.02);
    let mut a = Agent::from_config(&cfg).unwrap();
    let g = opening();
    let mv = a.choose_move(&g).expect("no move under a short budget");
    assert!(g.valid_moves().contains(&mv));
}

#[test]
fn agent_names_describe_parameters() {
    assert_eq!(AgentConfig::new(AgentKind::AlphaBeta).display_name(), "AlphaBeta_D3_T5");
    assert_eq!(
        AgentConfig::new(AgentKind::Minimax).with_depth(Depth::Unbounded).with_time_limit(2.5).display_name(),
        "Minimax_FullSearch_T2.5"
    );
    assert_eq!(AgentConfig::new(AgentKind::Mcts).with_iterations(200).display_name(), "MCTS_I200_T5");
    assert_eq!(AgentConfig::new(AgentKind::Random).with_name("rnd").display_name(), "rnd");
    let a = Agent::from_config(&AgentConfig::new(AgentKind::Random)).unwrap();
    assert_eq!(a.name(), "Random");
}

#[test]
fn agent_kind_parses_aliases() {
    assert_eq!("alpha-beta".parse::<AgentKind>().unwrap(), AgentKind::AlphaBeta);
    assert_eq!("MCTS".parse::<AgentKind>().unwrap(), AgentKind::Mcts);
    assert!("genius".parse::<AgentKind>().is_err());
}

#[test]
fn invalid_configs_are_rejected() {
    let zero_depth = AgentConfig::new(AgentKind::Minimax).with_depth(Depth::Fixed(0));
    assert!(matches!(Agent::from_config(&zero_depth), Err(ConfigError::ZeroDepth(_))));
    let zero_iter = AgentConfig::new(AgentKind::Mcts).with_iterations(0);
    assert!(matches!(Agent::from_config(&zero_iter), Err(ConfigError::ZeroIterations(_))));
    let nan = AgentConfig::new(AgentKind::AlphaBeta).with_time_limit(f64::NAN);
    assert!(matches!(Agent::from_config(&nan), Err(ConfigError::InvalidTimeLimit(_))));
}

#[test]
fn engines_accept_huge_time_limits() {
    let g = GameState::new();
    for cfg in [
        AgentConfig::new(AgentKind::Mcts).with_iterations(10).with_time_limit(1e19).with_seed(1),
        AgentConfig::new(AgentKind::AlphaBeta).with_depth(Depth::Fixed(1)).with_time_limit(1e19),
    ] {
        let mut a = Agent::from_config(&cfg).unwrap();
        let mv = a.choose_move(&g).expect("no move under a huge time limit");
        assert!(g.valid_moves().contains(&mv));
    }
}
