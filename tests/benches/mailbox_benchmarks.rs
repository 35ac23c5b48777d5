//! # Mailbox IPC Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Codec | encode, split + decode |
//! | Endpoint | send, get, send → recv_once |
//! | Filter | descriptor checks against growing allow-lists |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mailbox_dom::MemoryDocument;
use mailbox_ipc::{EndpointConfigBuilder, IpcValue, ReceiveFilter, RecvParams};
use mailbox_types::codec::{add_sender, encode};
use mailbox_types::descriptor::split;

// ============================================================================
// CODEC
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let values = [
        ("number", IpcValue::Number(1234.5678)),
        ("boolean", IpcValue::Boolean(true)),
        ("string", IpcValue::String("x".repeat(256))),
    ];

    for (name, value) in &values {
        group.bench_with_input(BenchmarkId::new("encode", name), value, |b, value| {
            b.iter(|| black_box(encode(value)))
        });

        let wire = match encode(value) {
            Ok(encoded) => add_sender(&encoded, "bench"),
            Err(_) => continue,
        };
        group.bench_with_input(BenchmarkId::new("decode", name), &wire, |b, wire| {
            b.iter(|| black_box(split(wire).decode()))
        });
    }

    group.finish();
}

// ============================================================================
// ENDPOINT
// ============================================================================

fn bench_endpoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("endpoint");

    let document = MemoryDocument::new();
    let (Ok(alice), Ok(bob)) = (
        EndpointConfigBuilder::new()
            .create_mailbox()
            .identify_as("alice")
            .connect(&document),
        EndpointConfigBuilder::new().identify_as("bob").connect(&document),
    ) else {
        return;
    };

    group.bench_function("send", |b| b.iter(|| black_box(alice.send("k", 42))));

    let _ = alice.send("k", 42);
    group.bench_function("get", |b| b.iter(|| black_box(bob.get("k"))));

    let Ok(runtime) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };
    let params = RecvParams::any();
    group.bench_function("send_recv_once", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let pending = bob.recv_once(&params);
                let _ = alice.send("k", 1);
                black_box(pending.await)
            })
        })
    });

    group.finish();
}

// ============================================================================
// FILTER
// ============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let wire = split("42\u{1E}number\u{1F}sender-0");

    for size in [1usize, 16, 256] {
        let senders: Vec<String> = (0..size).map(|i| format!("sender-{i}")).collect();
        let params = RecvParams::builder().only_from(senders).build();
        let filter = ReceiveFilter::new(&params, "me");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("check_descriptor", size), &filter, |b, f| {
            b.iter(|| black_box(f.matches("k", &wire)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_endpoint, bench_filter);
criterion_main!(benches);
