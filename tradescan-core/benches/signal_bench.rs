//! Criterion benchmarks for the signal pipeline hot paths.
//!
//! Benchmarks:
//! 1. Indicator frame (EMA 20/50, RSI 14, VWAP)
//! 2. Signal computation (frame + classification)
//! 3. Trade simulation over labeled records

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradescan_core::indicators::{Ema, Indicator, IndicatorFrame, IndicatorParams, Rsi, Vwap};
use tradescan_core::signals::Thresholds;
use tradescan_core::{
    compute_signals, compute_signals_with, simulate_trades, Bar, Series, SignalParams,
    SimulationConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> Series {
    let t0 = chrono::NaiveDate::from_ymd_opt(2025, 8, 22)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    let bars = (0..n)
        .map(|i| {
            let close = 1_000.0 + (i as f64 * 0.1).sin() * 25.0;
            Bar {
                timestamp: t0 + chrono::Duration::minutes(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 10_000 + (i as u64 % 5_000),
            }
        })
        .collect();
    Series::new("BENCH", bars).unwrap()
}

// ── 1. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");

    for &bar_count in &[75, 375, 1875] {
        let series = make_series(bar_count);
        let bars = series.bars();

        let single: Vec<Box<dyn Indicator>> = vec![
            Box::new(Ema::new(20)),
            Box::new(Rsi::new(14)),
            Box::new(Vwap::new()),
        ];
        group.bench_with_input(BenchmarkId::new("each", bar_count), &bar_count, |b, _| {
            b.iter(|| {
                for ind in &single {
                    black_box(ind.compute(black_box(bars)));
                }
            });
        });

        let params = IndicatorParams::default();
        group.bench_with_input(BenchmarkId::new("frame", bar_count), &bar_count, |b, _| {
            b.iter(|| IndicatorFrame::compute(black_box(&series), black_box(&params)));
        });
    }

    group.finish();
}

// ── 2. Signals ───────────────────────────────────────────────────────

fn bench_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_signals");

    for &bar_count in &[75, 375, 1875] {
        let series = make_series(bar_count);
        group.bench_with_input(
            BenchmarkId::new("default_params", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| compute_signals(black_box(&series)));
            },
        );
    }

    group.finish();
}

// ── 3. Simulation ────────────────────────────────────────────────────

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_trades");

    // Fast params so the labeled series actually contains transitions.
    let params = SignalParams {
        indicators: IndicatorParams {
            ema_fast: 1,
            ema_slow: 3,
            rsi_period: 2,
        },
        thresholds: Thresholds::default(),
    };
    let config = SimulationConfig::default();

    for &bar_count in &[375, 1875] {
        let records = compute_signals_with(&make_series(bar_count), &params).unwrap();
        group.bench_with_input(
            BenchmarkId::new("twitchy", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| simulate_trades(black_box(&records), black_box(&config)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_indicators, bench_signals, bench_simulation);
criterion_main!(benches);
