//! Benchmarks for convostat decoding and aggregation.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench aggregation -- top_words`

use std::collections::BTreeSet;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use convostat::config::IngestConfig;
use convostat::encoding::{mis_encode, repair_text};
use convostat::loader::load_fragments;
use convostat::report::{Report, ReportOptions};
use convostat::temporal::{Calendar, Zone};
use convostat::{ContentType, Conversation, Message};

// =============================================================================
// Test Data Generators
// =============================================================================

const SENDERS: &[&str] = &["Alice", "Bob", "Иван", "Zoë"];

fn generate_fragment(count: usize) -> String {
    let mut messages = Vec::with_capacity(count);
    for i in 0..count {
        let sender = mis_encode(SENDERS[i % SENDERS.len()]);
        let timestamp = 1705314600000i64 + (i as i64 * 60000);
        let payload = if i % 10 == 0 {
            format!(r#""photos": [{{"uri": "photos/{}.jpg"}}]"#, i)
        } else {
            format!(r#""content": "{}""#, mis_encode(&format!("Message number {} café", i)))
        };
        messages.push(format!(
            r#"{{"sender_name": "{}", "timestamp_ms": {}, "type": "Generic", {}}}"#,
            sender, timestamp, payload
        ));
    }
    format!(
        r#"{{"participants": [{{"name": "Alice"}}, {{"name": "Bob"}}], "messages": [{}]}}"#,
        messages.join(",\n")
    )
}

fn generate_conversation(count: usize) -> Conversation {
    let messages = (0..count)
        .filter_map(|i| {
            let sender = SENDERS[i % SENDERS.len()];
            let ts = 1705314600000i64 + (i as i64 * 37 * 60000);
            if i % 10 == 0 {
                Message::new(sender, ts, "Generic", ContentType::Photos, "a.jpg;b.jpg;")
            } else {
                Message::text(sender, ts, format!("message number {} with some words", i % 500))
            }
        })
        .collect();
    Conversation::new(messages, BTreeSet::new(), Calendar::utc())
}

// =============================================================================
// Decoding Benchmarks
// =============================================================================

fn bench_repair_text(c: &mut Criterion) {
    let garbled = mis_encode(&"Привет, как дела? Café naïve 🎉 ".repeat(20));
    c.bench_function("repair_text", |b| {
        b.iter(|| repair_text(black_box(&garbled)).unwrap());
    });
}

fn bench_load_fragments(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_fragments");
    let config = IngestConfig::new().with_zone(Zone::Utc);

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let json = generate_fragment(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let conv = load_fragments(&[black_box(json.as_str())], &config).unwrap();
                black_box(conv)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Aggregation Benchmarks
// =============================================================================

fn bench_time_repartition(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_repartition");

    for size in [1_000_usize, 10_000, 100_000] {
        let conv = generate_conversation(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &conv, |b, conv| {
            b.iter(|| black_box(conv.time_repartition()));
        });
    }
    group.finish();
}

fn bench_named_zone(c: &mut Criterion) {
    let utc = generate_conversation(10_000);
    let paris = Conversation::new(
        utc.messages().to_vec(),
        BTreeSet::new(),
        Calendar::new("Europe/Paris".parse().unwrap()),
    );

    let mut group = c.benchmark_group("messages_per_date");
    group.bench_function("utc", |b| b.iter(|| black_box(utc.messages_per_date())));
    group.bench_function("europe_paris", |b| {
        b.iter(|| black_box(paris.messages_per_date()))
    });
    group.finish();
}

fn bench_top_words(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_words");

    for size in [1_000_usize, 10_000, 100_000] {
        let conv = generate_conversation(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &conv, |b, conv| {
            b.iter(|| black_box(conv.top_words(3, 20)));
        });
    }
    group.finish();
}

fn bench_most_active_days(c: &mut Criterion) {
    let conv = generate_conversation(50_000);
    c.bench_function("most_active_days", |b| {
        b.iter(|| black_box(conv.most_active_days(10)));
    });
}

// =============================================================================
// End-to-End Pipeline Benchmark
// =============================================================================

fn bench_full_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_report");
    let config = IngestConfig::new().with_zone(Zone::Utc);
    let options = ReportOptions::new();

    for size in [1_000_usize, 10_000] {
        let json = generate_fragment(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                // Full pipeline: decode -> aggregate -> serialize
                let conv = load_fragments(&[black_box(json.as_str())], &config).unwrap();
                let report = Report::build(&conv, &options);
                black_box(report.to_json().unwrap())
            });
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_repair_text,
    bench_load_fragments,
    bench_time_repartition,
    bench_named_zone,
    bench_top_words,
    bench_most_active_days,
    bench_full_report,
);

criterion_main!(benches);
