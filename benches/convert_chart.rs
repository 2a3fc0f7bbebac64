//! Benchmark for converting an osu!mania chart into bmson.

use criterion::{Criterion, Throughput};
use mania_bmson::{ConvertConfig, convert_mania};

fn bench_convert_chart(c: &mut Criterion) {
    let source = include_str!("../tests/files/twilight_7k.osu");
    let config = ConvertConfig::default();

    let mut group = c.benchmark_group("convert_chart");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("twilight_7k", |b| {
        b.iter(|| {
            convert_mania(
                std::hint::black_box(source),
                std::hint::black_box(&config),
            )
        });
    });
    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_convert_chart(&mut criterion);
}
