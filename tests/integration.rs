//! Integration tests for loading conversation directories from disk

use convostat::encoding::mis_encode;
use convostat::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

// 2024-01-15 10:50:00 UTC, Monday
const MON: i64 = 1705315800000;
const HOUR: i64 = 3_600_000;
const DAY: i64 = 24 * HOUR;

fn utc() -> IngestConfig {
    IngestConfig::new().with_zone(Zone::Utc)
}

fn write_fragment(dir: &Path, name: &str, fragment: &serde_json::Value) {
    fs::write(dir.join(name), fragment.to_string()).unwrap();
}

/// The two-file conversation used throughout:
/// file 1 declares Alice and Bob, file 2 only has a message from Carol.
fn two_file_conversation() -> TempDir {
    let dir = tempdir().unwrap();
    write_fragment(
        dir.path(),
        "message_1.json",
        &json!({
            "participants": [{"name": "Alice"}, {"name": "Bob"}],
            "messages": [
                {"sender_name": "Alice", "timestamp_ms": MON, "type": "Generic", "content": "hello world"}
            ],
            "title": "Friends",
            "is_still_participant": true
        }),
    );
    write_fragment(
        dir.path(),
        "message_2.json",
        &json!({
            "participants": [],
            "messages": [
                {"sender_name": "Carol", "timestamp_ms": MON + HOUR, "type": "Generic", "content": "hi"}
            ]
        }),
    );
    dir
}

/// A realistic export: mojibake everywhere, every content type, two years.
fn realistic_conversation() -> TempDir {
    let dir = tempdir().unwrap();
    write_fragment(
        dir.path(),
        "message_1.json",
        &json!({
            "participants": [{"name": mis_encode("Zoë")}, {"name": "Bob"}],
            "messages": [
                {"sender_name": mis_encode("Zoë"), "timestamp_ms": MON, "type": "Generic",
                 "content": mis_encode("On se voit au café ce soir ?")},
                {"sender_name": "Bob", "timestamp_ms": MON + 5 * 60_000, "type": "Generic",
                 "photos": [{"uri": "photos/1.jpg", "creation_timestamp": 1705315}, {"uri": "photos/2.jpg"}]},
                {"sender_name": "Bob", "timestamp_ms": MON + 6 * 60_000, "type": "Generic",
                 "sticker": {"uri": "stickers/thumbs.png"},
                 "reactions": [{"reaction": mis_encode("👍"), "actor": mis_encode("Zoë")}]},
                {"sender_name": mis_encode("Zoë"), "timestamp_ms": MON + DAY, "type": "Share",
                 "content": "https://example.com/article"}
            ]
        }),
    );
    write_fragment(
        dir.path(),
        "message_2.json",
        &json!({
            "participants": [{"name": mis_encode("Zoë")}, {"name": "Bob"}],
            "messages": [
                {"sender_name": "Eve", "timestamp_ms": MON - 300 * DAY, "type": "Generic",
                 "content": mis_encode("Привет всем")},
                {"sender_name": "Eve", "timestamp_ms": MON - 299 * DAY, "type": "Generic",
                 "files": [{"uri": "files/notes.pdf"}]},
                {"sender_name": "Bob", "timestamp_ms": MON - 299 * DAY, "type": "Call",
                 "content": "Bob started a call."}
            ]
        }),
    );
    dir
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_participants_union_across_files() {
    let dir = two_file_conversation();
    let conv = load(dir.path(), &utc()).unwrap();

    let names: Vec<_> = conv.participants().iter().map(String::as_str).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

    let per = conv.messages_per_participant();
    assert_eq!(per["Alice"], 1);
    assert_eq!(per["Bob"], 0);
    assert_eq!(per["Carol"], 1);
    assert_eq!(conv.chars_per_participant()["Alice"], 11);
}

#[test]
fn test_first_file_participant_source() {
    let dir = two_file_conversation();
    let config = utc().with_participants(ParticipantSource::FirstFile);
    let conv = load(dir.path(), &config).unwrap();
    assert_eq!(conv.participants().len(), 3);
}

#[test]
fn test_record_without_payload_discards_conversation() {
    let dir = two_file_conversation();
    write_fragment(
        dir.path(),
        "message_3.json",
        &json!({
            "messages": [
                {"sender_name": "Alice", "timestamp_ms": MON, "type": "Generic",
                 "reactions": [{"reaction": "x", "actor": "Bob"}]}
            ]
        }),
    );

    let conv = load(dir.path(), &utc()).unwrap();
    assert_eq!(conv.message_count(), 0);
    assert!(conv.participants().is_empty());

    let conv = load(dir.path(), &utc().with_on_invalid(InvalidRecordPolicy::Skip)).unwrap();
    assert_eq!(conv.message_count(), 2);
}

#[test]
fn test_sticker_is_not_a_photo() {
    let dir = tempdir().unwrap();
    write_fragment(
        dir.path(),
        "message_1.json",
        &json!({
            "participants": [{"name": "Bob"}],
            "messages": [
                {"sender_name": "Bob", "timestamp_ms": MON, "type": "Generic", "sticker": {"uri": "s.png"}}
            ]
        }),
    );

    let conv = load(dir.path(), &utc()).unwrap();
    assert_eq!(conv.messages()[0].content, "s.png;");
    assert_eq!(conv.messages()[0].content_type, ContentType::Sticker);
    assert_eq!(conv.total_pics(), 0);
    assert_eq!(conv.pics_per_participant(ContentType::Sticker)["Bob"], 1);
}

// =========================================================================
// Realistic export
// =========================================================================

#[test]
fn test_realistic_export_repairs_text() {
    let dir = realistic_conversation();
    let conv = load(dir.path(), &utc()).unwrap();

    assert!(conv.participants().contains("Zoë"));
    assert!(conv.participants().contains("Eve"));
    assert!(
        conv.messages()
            .iter()
            .any(|m| m.content == "On se voit au café ce soir ?")
    );
    assert!(conv.messages().iter().any(|m| m.content == "Привет всем"));
}

#[test]
fn test_realistic_export_aggregates() {
    let dir = realistic_conversation();
    let conv = load(dir.path(), &utc()).unwrap();

    assert_eq!(conv.message_count(), 7);
    assert_eq!(
        conv.messages_per_participant().values().sum::<usize>(),
        conv.message_count()
    );
    assert_eq!(conv.total_pics(), 2);
    assert_eq!(conv.pics_per_participant(ContentType::Files)["Eve"], 1);

    // Only Generic text counts towards characters
    let chars = conv.chars_per_participant();
    assert_eq!(chars["Zoë"], "On se voit au café ce soir ?".chars().count());
    assert_eq!(chars["Bob"], 0);
    assert_eq!(chars["Eve"], "Привет всем".chars().count());

    let years = conv.messages_per_year();
    assert_eq!(years.keys().copied().collect::<Vec<_>>(), vec![2023, 2024]);
    assert_eq!(years.values().sum::<usize>(), 7);

    let rep = conv.time_repartition();
    assert_eq!(rep.weekday.total(), 7);
    assert_eq!(rep.hour.values().sum::<usize>(), 7);
}

#[test]
fn test_grid_matches_dates() {
    let dir = realistic_conversation();
    let conv = load(dir.path(), &utc()).unwrap();
    let grids = conv.messages_per_day_grid();

    for (date, count) in conv.messages_per_date() {
        let year: i32 = date[..4].parse().unwrap();
        let month: usize = date[5..7].parse().unwrap();
        let day: usize = date[8..].parse().unwrap();
        assert_eq!(grids[&year][month - 1][day - 1], count, "date {date}");
    }
    let grid_total: usize = grids.values().flatten().flatten().sum();
    assert_eq!(grid_total, conv.message_count());
}

#[test]
fn test_most_active_days() {
    let dir = realistic_conversation();
    let conv = load(dir.path(), &utc()).unwrap();
    let days = conv.most_active_days(2);
    assert_eq!(days[0], ("2024-01-15".to_string(), 3));
    assert_eq!(days[1].1, 2);
}

#[test]
fn test_report_from_directory() {
    let dir = realistic_conversation();
    let conv = load(dir.path(), &utc()).unwrap();
    let options = ReportOptions::new().with_word("Eve=привет".parse().unwrap());
    let report = Report::build(&conv, &options);

    assert_eq!(report.message_count, 7);
    assert_eq!(report.word_occurrences[0].messages, 1);
    assert!(report.to_json().unwrap().contains("\"2024-01-15\""));
}

// =========================================================================
// Time zones
// =========================================================================

#[test]
fn test_zone_changes_day_boundaries() {
    let dir = tempdir().unwrap();
    // 2023-12-31 23:30 UTC
    write_fragment(
        dir.path(),
        "message_1.json",
        &json!({
            "participants": [],
            "messages": [
                {"sender_name": "A", "timestamp_ms": 1704065400000_i64, "type": "Generic", "content": "late"}
            ]
        }),
    );

    let utc_conv = load(dir.path(), &utc()).unwrap();
    assert_eq!(utc_conv.messages_per_date().keys().next().unwrap(), "2023-12-31");

    let tokyo = IngestConfig::new().with_zone("Asia/Tokyo".parse().unwrap());
    let tokyo_conv = load(dir.path(), &tokyo).unwrap();
    assert_eq!(tokyo_conv.messages_per_date().keys().next().unwrap(), "2024-01-01");
    assert_eq!(tokyo_conv.messages_per_hour().keys().next(), Some(&8));

    let offset = IngestConfig::new().with_zone("-05:00".parse().unwrap());
    let offset_conv = load(dir.path(), &offset).unwrap();
    assert_eq!(offset_conv.messages_per_hour().keys().next(), Some(&18));
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn test_missing_directory() {
    let dir = tempdir().unwrap();
    let err = load(&dir.path().join("nope"), &utc()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_file_instead_of_directory() {
    let dir = two_file_conversation();
    let err = load(&dir.path().join("message_1.json"), &utc()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_malformed_fragment_names_file() {
    let dir = two_file_conversation();
    fs::write(dir.path().join("message_3.json"), "{\"messages\": [").unwrap();
    let err = load(dir.path(), &utc()).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("message_3.json"));
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();
    let conv = load(dir.path(), &utc()).unwrap();
    assert!(conv.is_empty());
    assert!(conv.participants().is_empty());
}
