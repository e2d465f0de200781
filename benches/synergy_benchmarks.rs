use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emg_synergy::config::SearchConfig;
use emg_synergy::processing::{FilterStage, SignalMatrix};
use emg_synergy::synergy::{Nmf, SynergySearch};
use ndarray::Array2;
use std::f64::consts::PI;

const SAMPLE_RATES: &[f64] = &[1000.0, 2000.0, 4000.0];
const TRACE_SECONDS: &[f64] = &[1.0, 5.0, 20.0];
const COMPONENT_COUNTS: &[usize] = &[1, 2, 4, 8];

fn synthetic_trace(fs: f64, seconds: f64) -> Vec<f64> {
    let n = (fs * seconds) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / fs;
            (100.0 + 80.0 * (2.0 * PI * 0.7 * t).sin()) * (2.0 * PI * 95.0 * t).sin()
        })
        .collect()
}

fn synthetic_envelopes(channels: usize, samples: usize) -> Array2<f64> {
    Array2::from_shape_fn((channels, samples), |(c, t)| {
        let t = t as f64 * 0.01;
        5.0 + 20.0 * ((c as f64 + 1.0) * 0.3 * t).sin().abs() + 10.0 * (0.17 * t + c as f64).cos().abs()
    })
}

fn benchmark_filter_stage(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_stage");
    let stage = FilterStage::default();

    for &fs in SAMPLE_RATES {
        for &seconds in TRACE_SECONDS {
            let trace = synthetic_trace(fs, seconds);
            group.throughput(Throughput::Elements(trace.len() as u64));

            group.bench_with_input(
                BenchmarkId::new("process", format!("{fs}Hz_{seconds}s")),
                &trace,
                |b, trace| {
                    b.iter(|| stage.process(black_box(trace), fs).unwrap());
                },
            );
        }
    }

    group.finish();
}

fn benchmark_nnmf(c: &mut Criterion) {
    let mut group = c.benchmark_group("nnmf");
    group.sample_size(20);
    let x = synthetic_envelopes(12, 2000);

    for &k in COMPONENT_COUNTS {
        group.bench_with_input(BenchmarkId::new("fit_12ch_2000", k), &k, |b, &k| {
            let solver = Nmf::new(k);
            b.iter(|| solver.fit(black_box(&x)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("synergy_search");
    group.sample_size(10);

    let data = synthetic_envelopes(12, 4000).reversed_axes();
    let names = (0..12).map(|i| format!("ch{i}")).collect();
    let matrix = SignalMatrix::new(names, data).unwrap();
    let search = SynergySearch::new(SearchConfig::default());

    group.bench_function("12ch_4000", |b| {
        b.iter(|| search.run(black_box(&matrix)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, benchmark_filter_stage, benchmark_nnmf, benchmark_search);
criterion_main!(benches);
