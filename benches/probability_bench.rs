use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use multipath_sss::probability::{binomial_pmf, sum_pmf};

fn binomial_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("probability/binomial_pmf");
    for &n in &[10u64, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| binomial_pmf(n, 0.3));
        });
    }
    group.finish();
}

fn sum_pmf_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("probability/sum_pmf");
    for &paths in &[2usize, 5, 10] {
        let ns: Vec<u64> = vec![20; paths];
        let qs: Vec<f64> = vec![0.4; paths];
        group.bench_with_input(BenchmarkId::from_parameter(paths), &paths, |b, _| {
            b.iter(|| sum_pmf(&ns, &qs, 1e-12));
        });
    }
    group.finish();
}

criterion_group!(benches, binomial_bench, sum_pmf_bench);
criterion_main!(benches);
