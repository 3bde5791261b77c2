//! Synthetic Messenger export generator for stress testing convostat.
//!
//! Writes a conversation directory split into fragment files, with
//! mis-encoded names and text the way Messenger exports them, plus photos,
//! files, stickers and a former participant who only appears as a sender.
//!
//! Usage: cargo run --features gen-export --bin gen_export -- [messages] [output_dir] [fragments]
//! Example: cargo run --features gen-export --bin gen_export -- 100000 heavy_export 5

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

use convostat::encoding::mis_encode;

const PARTICIPANTS: &[&str] = &["Alice", "Bob", "Иван", "Zoë", "村上"];

/// Sends messages but is missing from every `participants` array.
const FORMER: &str = "Mallory";

const WORDS: &[&str] = &[
    "hello", "world", "tonight", "dinner", "photo", "привет", "café", "naïve", "ok", "lol",
    "maybe", "tomorrow", "🎉", "🔥", "weekend", "train", "coffee", "こんにちは",
];

const PLATFORM_TYPES: &[&str] = &["Generic", "Generic", "Generic", "Generic", "Share", "Call"];

// 2020-01-01 00:00:00 UTC
const START_MS: i64 = 1_577_836_800_000;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("heavy_export");
    let fragments: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3)
        .max(1);

    println!("🧪 Export Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages:  {}", count);
    println!("   Output:    {}", output);
    println!("   Fragments: {}", fragments);
    println!();

    let start = Instant::now();
    let dir = Path::new(output);
    fs::create_dir_all(dir)?;

    let mut rng = rand::thread_rng();
    let per_fragment = count.div_ceil(fragments);
    let mut bytes_written: u64 = 0;

    for index in 0..fragments {
        let first = index * per_fragment;
        let last = count.min(first + per_fragment);
        let messages: Vec<Value> = (first..last)
            .map(|i| generate_message(&mut rng, i))
            .collect();

        let fragment = json!({
            "participants": PARTICIPANTS
                .iter()
                .map(|name| json!({"name": mis_encode(name)}))
                .collect::<Vec<_>>(),
            "messages": messages,
            "title": "Stress test",
            "thread_type": "RegularGroup",
        });

        let path = dir.join(format!("message_{}.json", index + 1));
        let mut writer = BufWriter::with_capacity(1024 * 1024, File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &fragment)?;
        writer.flush()?;
        bytes_written += fs::metadata(&path)?.len();

        eprint!("\r   Wrote {}/{} fragments", index + 1, fragments);
    }

    let elapsed = start.elapsed();
    let mb = bytes_written as f64 / 1_000_000.0;

    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", mb);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    println!(
        "   Speed: {:.0} msg/s",
        count as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}

fn generate_message(rng: &mut impl Rng, i: usize) -> Value {
    let sender = if rng.gen_ratio(1, 20) {
        FORMER
    } else {
        PARTICIPANTS.choose(rng).copied().unwrap_or(FORMER)
    };
    // Spread messages over roughly three years, a few minutes apart
    let timestamp_ms = START_MS + (i as i64) * 180_000 + rng.gen_range(0..120_000);
    let platform = PLATFORM_TYPES.choose(rng).copied().unwrap_or("Generic");

    let mut record = json!({
        "sender_name": mis_encode(sender),
        "timestamp_ms": timestamp_ms,
        "type": platform,
    });

    let payload = match rng.gen_range(0..20) {
        0 | 1 => (
            "photos",
            json!((0..rng.gen_range(1..=4))
                .map(|n| json!({"uri": format!("messages/photos/{}_{}.jpg", i, n)}))
                .collect::<Vec<_>>()),
        ),
        2 => ("files", json!([{"uri": format!("messages/files/report_{}.pdf", i)}])),
        3 => ("sticker", json!({"uri": format!("messages/stickers/{}.png", i % 37)})),
        _ => ("content", json!(mis_encode(&generate_text(rng)))),
    };
    record[payload.0] = payload.1;

    if rng.gen_ratio(1, 10) {
        record["reactions"] = json!([{"reaction": mis_encode("❤"), "actor": mis_encode(sender)}]);
    }
    record
}

fn generate_text(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(1..12);
    (0..len)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}
