//! Example: Using convostat as a library
//!
//! This example demonstrates how to use convostat in your own projects.
//!
//! Run with: cargo run --example library_usage

use std::collections::BTreeSet;

use convostat::encoding::{mis_encode, repair_text};
use convostat::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== convostat Library Usage Examples ===\n");

    // Example 1: Repairing Messenger mojibake
    println!("1. Repairing mis-encoded text:");
    let garbled = mis_encode("Привет, Zoë!");
    println!("   Exported: {}", garbled);
    println!("   Repaired: {}", repair_text(&garbled)?);

    // Example 2: Loading fragments from memory
    println!("\n2. Loading two fragments:");
    let first = r#"{
        "participants": [{"name": "Alice"}, {"name": "Bob"}],
        "messages": [
            {"sender_name": "Alice", "timestamp_ms": 1705315800000, "type": "Generic", "content": "hello world"},
            {"sender_name": "Bob", "timestamp_ms": 1705319400000, "type": "Generic", "photos": [{"uri": "a.jpg"}, {"uri": "b.jpg"}]}
        ]
    }"#;
    let second = r#"{
        "messages": [
            {"sender_name": "Carol", "timestamp_ms": 1705402200000, "type": "Generic", "content": "hi there everyone"}
        ]
    }"#;

    let config = IngestConfig::new().with_zone(Zone::Utc);
    let conv = load_fragments(&[first, second], &config)?;
    println!("   Participants: {:?}", conv.participants());
    println!("   Messages:     {}", conv.message_count());

    // Example 3: Per-participant aggregates
    println!("\n3. Per-participant counts:");
    let chars = conv.chars_per_participant();
    let photos = conv.pics_per_participant(ContentType::Photos);
    for (name, count) in conv.messages_per_participant() {
        println!(
            "   {:<6} {} msgs, {} chars, {} photos",
            name, count, chars[&name], photos[&name]
        );
    }

    // Example 4: The same data in another time zone
    println!("\n4. Hour distribution, UTC vs Asia/Tokyo:");
    let tokyo = Conversation::new(
        conv.messages().to_vec(),
        BTreeSet::new(),
        Calendar::new("Asia/Tokyo".parse()?),
    );
    println!("   UTC:   {:?}", conv.messages_per_hour());
    println!("   Tokyo: {:?}", tokyo.messages_per_hour());

    // Example 5: Rankings
    println!("\n5. Rankings:");
    println!("   Most active days: {:?}", conv.most_active_days(3));
    println!("   Top words:        {:?}", conv.top_words(3, 5));
    println!(
        "   Alice said 'hello' in {} messages",
        conv.word_occurrence_for("Alice", "HELLO")
    );

    // Example 6: A full report
    println!("\n6. Report as JSON:");
    let report = Report::build(&conv, &ReportOptions::new().with_top_words(3));
    println!("{}", report.to_json()?);

    println!("\n=== All examples completed successfully! ===");

    Ok(())
}
