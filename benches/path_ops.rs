use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathkit::bench_only::LengthMap;
use pathkit::{shapes, ButtCapper, MiterJoiner, Path, RoundCapper, RoundJoiner};

static CURVES: &str = "M0 0C10 30 40 30 50 0Q60 -20 70 0A10 5 30 0 1 90 10L100 0";

fn path_ops(c: &mut Criterion) {
    let curves = Path::parse(CURVES).unwrap();
    let polygon = shapes::regular_polygon(32, 50.0, true);

    c.bench_function("length of curves", |b| {
        b.iter(|| black_box(&curves).length());
    });

    c.bench_function("bounds of curves", |b| {
        b.iter(|| black_box(&curves).bounds());
    });

    c.bench_function("length map of a cubic", |b| {
        let segment = curves.iter_subpath().next().unwrap().segments()[0];

        b.iter(|| {
            let map = LengthMap::new(black_box(&segment));
            map.t_at(map.total() / 3.0)
        });
    });

    c.bench_function("split curves at distances", |b| {
        b.iter(|| black_box(&curves).split_at(&[10.0, 40.0, 80.0]));
    });

    c.bench_function("dash curves", |b| {
        b.iter(|| black_box(&curves).dash(1.5, &[4.0, 2.0, 1.0, 2.0]));
    });

    c.bench_function("stroke curves", |b| {
        b.iter(|| black_box(&curves).stroke(3.0, &RoundCapper, &RoundJoiner));
    });

    c.bench_function("stroke polygon", |b| {
        b.iter(|| black_box(&polygon).stroke(2.0, &ButtCapper, &MiterJoiner::default()));
    });

    c.bench_function("winding in polygon", |b| {
        b.iter(|| black_box(&polygon).winding(10.0, 10.0));
    });

    c.bench_function("reverse and optimize curves", |b| {
        b.iter(|| black_box(&curves).reverse().optimize());
    });
}

criterion_group!(benches, path_ops);
criterion_main!(benches);
