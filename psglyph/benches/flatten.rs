use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use psglyph::{
    flatten::{flatten_with_flatness, Curve},
    types::{Fixed, Point},
};

fn pt(x: f64, y: f64) -> Point<Fixed> {
    Point::new(Fixed::from_f64(x), Fixed::from_f64(y))
}

pub fn flatten_benchmark(c: &mut Criterion) {
    let p0 = pt(0.0, 0.0);
    // small glyph sized curve, large curve that requires bisection
    let curves = [
        ("small", Curve::new(pt(2.0, 6.0), pt(8.0, 6.0), pt(10.0, 0.0))),
        (
            "large",
            Curve::new(pt(1500.0, 4000.0), pt(6000.0, 4000.0), pt(8000.0, 0.0)),
        ),
    ];
    let mut out = Vec::new();
    for (name, curve) in &curves {
        for flatness in [0.25, 1.0] {
            c.bench_with_input(BenchmarkId::new(*name, flatness), curve, |b, curve| {
                b.iter(|| {
                    out.clear();
                    flatten_with_flatness(p0, curve, Fixed::from_f64(flatness), &mut out);
                    black_box(out.len())
                })
            });
        }
    }
}

criterion_group!(benches, flatten_benchmark);
criterion_main!(benches);
