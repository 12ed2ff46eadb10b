use nineboard::board::GameState;
use nineboard::mcts::{self, MctsParams};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;

fn params(iterations: u32) -> MctsParams {
    MctsParams { iterations, ..MctsParams::default() }
}

#[test]
fn zero_iterations_yield_no_move() {
    let mut rng = SmallRng::seed_from_u64(1);
    let r = mcts::search(&GameState::new(), params(0), &mut rng);
    assert_eq!(r.best_move, None);
    assert_eq!(r.iterations, 0);
}

#[test]
fn expired_time_limit_yields_no_move() {
    let mut rng = SmallRng::seed_from_u64(1);
    let p = MctsParams { time_limit: Some(Duration::ZERO), ..params(500) };
    let r = mcts::search(&GameState::new(), p, &mut rng);
    assert_eq!(r.best_move, None);
    assert_eq!(r.iterations, 0);
}

#[test]
fn terminal_root_yields_no_move() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut g = GameState::new();
    while !g.is_terminal() {
        let mv = *g.valid_moves().choose(&mut rng).unwrap();
        g.play(mv).unwrap();
    }
    let r = mcts::search(&g, params(100), &mut rng);
    assert_eq!(r.best_move, None);
}

#[test]
fn single_iteration_expands_last_valid_move() {
    let g = GameState::new();
    let mut rng = SmallRng::seed_from_u64(3);
    let r = mcts::search(&g, params(1), &mut rng);
    assert_eq!(r.best_move, g.valid_moves().last().copied());
    assert_eq!(r.nodes, 2);
}

#[test]
fn search_returns_legal_move_and_counts_visits() {
    let mut g = GameState::new();
    g.apply_move(4, 4).unwrap();
    let mut rng = SmallRng::seed_from_u64(4);
    let r = mcts::search(&g, params(300), &mut rng);
    let bm = r.best_move.expect("mcts found no move");
    assert!(g.valid_moves().contains(&bm));
    assert_eq!(r.iterations, 300);
    assert_eq!(r.root_visits, 300);
    assert!(r.nodes <= 301);
}

#[test]
fn seeded_search_is_reproducible() {
    let g = GameState::new();
    let run = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        let r = mcts::search(&g, params(200), &mut rng);
        (r.best_move, r.nodes)
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn huge_time_limit_runs_all_iterations() {
    let mut rng = SmallRng::seed_from_u64(5);
    let p = MctsParams { time_limit: Some(Duration::from_secs_f64(1e19)), ..params(10) };
    let r = mcts::search(&GameState::new(), p, &mut rng);
    assert_eq!(r.iterations, 10);
    assert!(r.best_move.is_some());
}
