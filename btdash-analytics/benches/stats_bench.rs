//! Criterion benchmarks for the per-run hot path.
//!
//! Run with: `cargo bench -p btdash-analytics`
//!
//! Every applied run recomputes trade statistics and the rolling win-rate
//! trend from scratch, then projects the equity curve for drawing.

use btdash_analytics::chart::{ChartRenderer, Viewport};
use btdash_analytics::stats::TradeStats;
use btdash_analytics::trend::{rolling_win_rate, DEFAULT_WINDOW};
use btdash_core::config::ChartSettings;
use btdash_core::domain::TradeRecord;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Deterministic trade list with a mix of wins, losses and sides.
fn generate_trades(count: usize) -> Vec<TradeRecord> {
    (0..count)
        .map(|i| {
            let pnl = ((i * 37) % 23) as f64 - 9.0;
            TradeRecord {
                side: if i % 3 == 0 { "short" } else { "long" }.to_string(),
                entry_price: Some(2000.0 + i as f64),
                position_size: Some(0.1),
                pnl: Some(pnl),
                return_pct: Some(pnl / 200.0),
                ..Default::default()
            }
        })
        .collect()
}

fn bench_trade_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("trade_stats");
    for size in [10, 100, 1_000, 10_000].iter() {
        let trades = generate_trades(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| TradeStats::compute(black_box(&trades), Some(0.5)));
        });
    }
    group.finish();
}

fn bench_rolling_trend(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_win_rate");
    for size in [100, 1_000, 10_000].iter() {
        let trades = generate_trades(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| rolling_win_rate(black_box(&trades), DEFAULT_WINDOW));
        });
    }
    group.finish();
}

fn bench_equity_projection(c: &mut Criterion) {
    let renderer = ChartRenderer::equity(ChartSettings::equity());
    let viewport = Viewport::new(600.0, 160.0).with_pixel_ratio(2.0);
    let curve: Vec<f64> = (0..5_000).map(|i| 10_000.0 + (i as f64 * 0.1).sin() * 250.0).collect();
    c.bench_function("equity_projection_5000", |b| {
        b.iter(|| renderer.project(viewport, black_box(&curve)));
    });
}

criterion_group!(
    benches,
    bench_trade_stats,
    bench_rolling_trend,
    bench_equity_projection
);
criterion_main!(benches);
