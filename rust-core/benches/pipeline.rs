use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sirius_audio::{PitchPipeline, SessionConfig};
use std::f64::consts::PI;

fn sine(freq_hz: f64, config: &SessionConfig) -> Vec<f64> {
    (0..config.block_size)
        .map(|n| 0.5 * (2.0 * PI * freq_hz * n as f64 / config.sample_rate as f64).sin())
        .collect()
}

fn bench_submit_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_block");

    for block_size in [512, 1024, 4096] {
        let config = SessionConfig {
            block_size,
            ..SessionConfig::default()
        };
        let mut pipeline = PitchPipeline::new(&config).expect("valid config");
        let samples = sine(440.0, &config);

        group.bench_with_input(BenchmarkId::from_parameter(block_size), &samples, |b, s| {
            b.iter(|| pipeline.submit_samples(black_box(s)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_submit_block);
criterion_main!(benches);
