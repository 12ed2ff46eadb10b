use criterion::{criterion_group, criterion_main, Criterion, black_box};
use nineboard::board::GameState;
use nineboard::search::alphabeta::{Depth, SearchParams, Searcher};

fn bench_search(c: &mut Criterion) {
    let g = GameState::new();
    c.bench_function("search_depth_3_startpos", |ben| {
        ben.iter(|| {
            let mut s = Searcher::default();
            let p = SearchParams { depth: Depth::Fixed(3), ..SearchParams::default() };
            let r = s.search_with_params(black_box(&g), p).unwrap();
            black_box(r.nodes)
        })
    });
    c.bench_function("search_depth_3_startpos_no_pruning", |ben| {
        ben.iter(|| {
            let mut s = Searcher::default();
            let p = SearchParams { depth: Depth::Fixed(3), use_pruning: false, ..SearchParams::default() };
            let r = s.search_with_params(black_box(&g), p).unwrap();
            black_box(r.nodes)
        })
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
