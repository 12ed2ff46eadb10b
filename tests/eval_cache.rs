use nineboard::board::GameState;
use nineboard::search::alphabeta::{Depth, SearchParams, Searcher};
use nineboard::search::cache::EvalCache;
use nineboard::search::eval::cached_evaluate;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn random_position(seed: u64, plies: usize) -> GameState {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = GameState::new();
    for _ in 0..plies {
        if g.is_terminal() { break; }
        let mv = *g.valid_moves().choose(&mut rng).unwrap();
        g.play(mv).unwrap();
    }
    g
}

#[test]
fn cache_does_not_change_search_results() {
    for seed in 0..8u64 {
        let g = random_position(seed, 10);
        if g.is_terminal() { continue; }
        let run = |use_cache: bool| {
            let mut s = Searcher::default();
            let p = SearchParams { depth: Depth::Fixed(3), use_cache, ..SearchParams::default() };
            let r = s.search_with_params(&g, p).unwrap();
            (r.best_move, r.score, r.nodes)
        };
        assert_eq!(run(true), run(false), "seed {seed}");
    }
}

#[test]
fn cache_stays_within_capacity() {
    let mut s = Searcher::with_cache(EvalCache::with_capacity(64));
    let g = random_position(3, 6);
    s.search_with_params(&g, SearchParams { depth: Depth::Fixed(3), ..SearchParams::default() }).unwrap();
    assert_eq!(s.cache().capacity(), 64);
    assert!(s.cache().len() <= 64);
    assert!(!s.cache().is_empty());
}

#[test]
fn repeated_search_hits_the_cache() {
    let g = random_position(21, 12);
    let mut s = Searcher::default();
    let p = SearchParams { depth: Depth::Fixed(2), ..SearchParams::default() };
    let first = s.search_with_params(&g, p).unwrap();
    let hits_before = s.cache().hits();
    let second = s.search_with_params(&g, p).unwrap();
    assert!(s.cache().hits() > hits_before, "second search missed every leaf");
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
}

#[test]
fn cached_value_matches_fresh_evaluation() {
    let mut cache = EvalCache::with_capacity(16);
    let g = random_position(8, 40);
    assert_eq!(cached_evaluate(&mut cache, &g), g.evaluate());
    assert_eq!(cached_evaluate(&mut cache, &g), g.evaluate());
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.misses(), 1);
}
