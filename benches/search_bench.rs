use criterion::{criterion_group, criterion_main, Criterion, black_box};
use pawnstorm::board::Position;

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_startpos");
    group.sample_size(10);
    for depth in [3u32, 4] {
        group.bench_function(format!("depth_{depth}"), |ben| {
            ben.iter(|| {
                let mut pos = Position::startpos();
                let mut s = pawnstorm::search::alphabeta::Searcher::default();
                let mut p = pawnstorm::search::alphabeta::SearchParams::default();
                p.depth = depth;
                let r = s.search_with_params(black_box(&mut pos), p).unwrap();
                black_box(r.nodes)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
