use nineboard::board::GameState;
use nineboard::search::alphabeta::{Depth, SearchParams, Searcher};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;

fn midgame() -> GameState {
    (0..100u64).find_map(|seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut g = GameState::new();
        for _ in 0..30 {
            let mv = *g.valid_moves().choose(&mut rng)?;
            g.play(mv).ok()?;
        }
        (!g.is_terminal()).then_some(g)
    }).expect("no live midgame position")
}

#[test]
fn expired_budget_still_completes_first_depth() {
    let g = GameState::new();
    let mut s = Searcher::default();
    let p = SearchParams { depth: Depth::Fixed(10), movetime: Some(Duration::ZERO), ..SearchParams::default() };
    let r = s.search_with_params(&g, p).unwrap();
    assert_eq!(r.depth, 1);
    assert!(r.best_move.is_some(), "no move under an expired budget");
    assert!(r.nodes > 0);
}

#[test]
fn unbounded_search_deepens_until_budget() {
    let g = midgame();
    let mut s = Searcher::default();
    let p = SearchParams { depth: Depth::Unbounded, movetime: Some(Duration::from_millis(20)), ..SearchParams::default() };
    let r = s.search_with_params(&g, p).unwrap();
    let bm = r.best_move.expect("unbounded search returned no move");
    assert!(g.valid_moves().contains(&bm));
    assert!(r.depth >= 1);
}

#[test]
fn unbounded_with_zero_budget_does_nothing() {
    let g = GameState::new();
    let mut s = Searcher::default();
    let p = SearchParams { depth: Depth::Unbounded, movetime: Some(Duration::ZERO), ..SearchParams::default() };
    let r = s.search_with_params(&g, p).unwrap();
    assert_eq!(r.best_move, None);
    assert_eq!(r.depth, 0);
    assert_eq!(r.nodes, 0);
}

fn late_position(max_open: usize) -> Option<GameState> {
    for seed in 0..10_000u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut g = GameState::new();
        while !g.is_terminal() {
            if g.open_cells() <= max_open { return Some(g); }
            let mv = *g.valid_moves().choose(&mut rng).unwrap();
            g.play(mv).unwrap();
        }
    }
    None
}

#[test]
fn unbounded_search_stops_once_game_tree_is_exhausted() {
    // With few open cells left the useful depth is capped well before the budget.
    let g = late_position(6).expect("no late position found");
    let mut s = Searcher::default();
    let p = SearchParams { depth: Depth::Unbounded, movetime: Some(Duration::from_secs(60)), ..SearchParams::default() };
    let r = s.search_with_params(&g, p).unwrap();
    assert!(r.best_move.is_some());
    assert!(r.elapsed < Duration::from_secs(60), "search ran to the full budget");
    assert!(r.depth as usize <= g.open_cells());
}
