//! Benchmarks for valuescore-model portfolio construction.
#![allow(missing_docs)]

use chrono::{NaiveDate, TimeDelta};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::Rng;
use valuescore_model::{Basket, PortfolioConstructor};
use valuescore_primitives::{Listing, Market, PriceSeries};

fn random_walk(n_days: usize) -> PriceSeries {
    let mut rng = rand::thread_rng();
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let mut price = 10_000.0;
    (0..n_days)
        .map(|i| {
            price *= 1.0 + rng.r#gen::<f64>() * 0.04 - 0.019;
            (start + TimeDelta::days(i as i64), price)
        })
        .collect()
}

fn random_basket(n_assets: usize, n_days: usize) -> Basket {
    Basket {
        members: (0..n_assets)
            .map(|i| {
                let ticker = format!("{i:06}");
                (Listing::new(ticker.as_str(), Market::Kospi, ticker.as_str()), random_walk(n_days))
            })
            .collect(),
        benchmark: random_walk(n_days),
    }
}

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio_construct");
    group.sample_size(50);

    // three years of trading days
    for n_assets in [5, 10, 20, 50] {
        group.throughput(Throughput::Elements(n_assets as u64));
        group.bench_with_input(BenchmarkId::new("n_assets", n_assets), &n_assets, |b, &n_assets| {
            let constructor = PortfolioConstructor::new();
            let basket = random_basket(n_assets, 750);
            b.iter(|| constructor.construct(black_box(&basket), 10_000_000.0));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construct);
criterion_main!(benches);
