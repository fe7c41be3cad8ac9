use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use sweeper_core::*;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, size, mines) in [("beginner", 9, 10), ("expert", 30, 180), ("dense", 30, 700)] {
        let config = GameConfig::new(size, mines).unwrap();
        group.bench_function(name, |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(RandomBoardGenerator::new(seed).generate(config))
            })
        });
    }
    group.finish();
}

fn bench_flood_fill(c: &mut Criterion) {
    // one mine in the far corner leaves a single huge zero region
    let board = Board::from_mine_coords(255, &[(254, 254)]).unwrap();

    c.bench_function("flood_fill/255x255", |b| {
        b.iter(|| black_box(flood_fill(&board, (0, 0)).unwrap()))
    });

    c.bench_function("mark/255x255", |b| {
        b.iter_batched(
            || PlayEngine::new(board.clone()),
            |mut engine| black_box(engine.mark((0, 0)).unwrap()),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_generate, bench_flood_fill);
criterion_main!(benches);
