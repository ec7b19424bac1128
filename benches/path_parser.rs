use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathkit::bench_only::{fmt_number, Lexer};
use pathkit::{Path, PathBuilder};

static INPUT: &str = "M10 20 C 30,40 50 60-70,80,90 100,110 120,130,140";

static ARCS: &str = "M10-20A1 2 3 1 0 6 7a5 5 0 1,1 10,0 5 5 0 0 0-10 0zH40V-40h-5v5z";

fn lex_path(input: &str) {
    let lexer = Lexer::new(black_box(input));

    for (_pos, _token) in lexer {
        // no-op
    }
}

fn path_parser(c: &mut Criterion) {
    c.bench_function("parse path into builder", |b| {
        let input = black_box(INPUT);

        b.iter(|| {
            let mut builder = PathBuilder::default();
            let _ = builder.parse(input);
        });
    });

    c.bench_function("parse arcs and shorthands", |b| {
        let input = black_box(ARCS);

        b.iter(|| Path::parse(input));
    });

    c.bench_function("lex str", |b| {
        let input = black_box(INPUT);

        b.iter(|| {
            lex_path(input);
        });
    });

    c.bench_function("canonical string", |b| {
        let path = Path::parse(ARCS).unwrap();

        b.iter(|| black_box(&path).to_string());
    });

    // how much of writing a path is just formatting numbers
    c.bench_function("format numbers", |b| {
        let numbers = black_box([0.0, -2.5, 13.333333333333, 0.000012345678912, 123456789.0]);

        b.iter(|| {
            for n in numbers.iter() {
                let _ = fmt_number(*n);
            }
        });
    });
}

criterion_group!(benches, path_parser);
criterion_main!(benches);
