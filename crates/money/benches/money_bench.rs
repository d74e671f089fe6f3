use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use money::Money;

fn bench_sum(c: &mut Criterion) {
    let a = Money::new("USD", 2, 500_000_000);
    let b = Money::new("USD", -1, -800_000_000);

    c.bench_function("money/sum_borrow", |bench| {
        bench.iter(|| black_box(&a).sum(black_box(&b)).unwrap());
    });
}

fn bench_multiply(c: &mut Criterion) {
    let unit_price = Money::new("USD", 3, 750_000_000);

    c.bench_function("money/multiply_by_10", |bench| {
        bench.iter(|| black_box(&unit_price).multiply(black_box(10)).unwrap());
    });
}

fn bench_total_assembly(c: &mut Criterion) {
    // A typical checkout: shipping plus five priced lines.
    let shipping = Money::new("USD", 8, 990_000_000);
    let lines: Vec<Money> = (1..=5)
        .map(|n| Money::new("USD", n, 250_000_000))
        .collect();

    c.bench_function("money/total_5_lines", |bench| {
        bench.iter(|| {
            let mut total = Money::zero("USD").sum(black_box(&shipping)).unwrap();
            for line in &lines {
                total = total.sum(black_box(line)).unwrap();
            }
            total
        });
    });
}

criterion_group!(benches, bench_sum, bench_multiply, bench_total_assembly);
criterion_main!(benches);
