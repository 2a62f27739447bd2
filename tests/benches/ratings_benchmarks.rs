//! # Private-Ratings Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Reconciliation pass incl. decryption, 100 cards | < 50ms |
//! | Encrypted rating submission | < 5ms |

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pr_04_card_reconciliation::{CardReconciliationApi, SubmitReviewData};
use pr_tests::fixtures::{Deployment, ALICE, BOB};
use rand::Rng;
use std::time::Duration;
use tokio::runtime::Runtime;

fn bench_reconciliation(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("pr-04-reconciliation");
    group.measurement_time(Duration::from_secs(10));

    for cards in [10usize, 100] {
        let (deployment, alice) = runtime.block_on(async {
            let deployment = Deployment::new();
            let alice = deployment.ready_client(ALICE).await;
            for i in 0..cards {
                deployment.clock.advance(1);
                alice.create(&format!("Card {}", i)).await;
            }
            (deployment, alice)
        });

        group.throughput(Throughput::Elements(cards as u64));
        group.bench_with_input(
            BenchmarkId::new("reconcile_and_decrypt", cards),
            &cards,
            |b, _| b.to_async(&runtime).iter(|| alice.settle()),
        );
        drop(deployment);
    }
    group.finish();
}

fn bench_rating_submission(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("pr-04-rating");

    let bob = runtime.block_on(async {
        let deployment = Deployment::new();
        let alice = deployment.ready_client(ALICE).await;
        let (doc_id, _) = alice.create("Benchmark").await;
        let bob = deployment.ready_client(BOB).await;
        bob.orchestrator.select_card(&doc_id).await;
        bob
    });

    group.bench_function("submit_encrypted_rating", |b| {
        b.to_async(&runtime).iter(|| async {
            let stars = rand::thread_rng().gen_range(1..=5);
            bob.orchestrator
                .submit_rating(SubmitReviewData::new(stars).expect("valid rating"))
                .await
        })
    });
    group.finish();
}

criterion_group!(benches, bench_reconciliation, bench_rating_submission);
criterion_main!(benches);
