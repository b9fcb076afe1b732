use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use matchbook_rs::prelude::*;
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

fn resting_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("resting_inserts");
    for orders in [100u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(orders), &orders, |b, &orders| {
            b.iter(|| {
                let book = OrderBook::new(0);
                for i in 0..orders {
                    // Non-crossing: buys below 1000, sells above.
                    let (side, price) = if i % 2 == 0 {
                        (Side::Buy, 900 + i % 50)
                    } else {
                        (Side::Sell, 1_100 + i % 50)
                    };
                    let _ = book.submit(side, 10, price, OrderId::from_u64(i));
                }
                black_box(book.resting_order_count())
            });
        });
    }
    group.finish();
}

fn crossing_flow(c: &mut Criterion) {
    c.bench_function("crossing_flow_10k", |b| {
        b.iter(|| {
            let book = OrderBook::new(0);
            for i in 0..10_000u64 {
                let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                let _ = book.submit(side, 1 + i % 7, 1_000, OrderId::from_u64(i));
            }
            black_box(book.trade_count())
        });
    });
}

fn contended_submissions(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_submissions");
    for threads in [1u64, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let registry = Arc::new(
                        ExchangeRegistry::with_config(RegistryConfig::new().with_instruments(1))
                            .expect("one instrument"),
                    );
                    thread::scope(|scope| {
                        for t in 0..threads {
                            let registry = Arc::clone(&registry);
                            scope.spawn(move || {
                                for i in 0..2_000u64 {
                                    let side = if (i + t) % 2 == 0 { Side::Buy } else { Side::Sell };
                                    let price = 995 + (i * 7 + t) % 10;
                                    let id = OrderId::from_u64(t * 1_000_000 + i);
                                    let _ = registry.submit(side, 0, 5, price, id);
                                }
                            });
                        }
                    });
                    black_box(registry.total_resting_orders())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, resting_inserts, crossing_flow, contended_submissions);
criterion_main!(benches);
