use tflat_backend::{build, Dictionary, EntryOutcome, RowStatus};
use tflat_backend::types::SkipReason;

mod helpers;
use helpers as h;

#[test]
fn test_scrambled_row_end_to_end() {
    let payload = h::scrambled("<d1m>run<d3><d1e>I run<d3><d1em>Tôi chạy<d3>");
    assert_eq!(&payload[..3], &[h::MARKER; 3]);

    let outcome = build("run", &payload, "").unwrap();
    let EntryOutcome::Parsed(entry) = outcome else {
        panic!("expected a parsed entry, got {:?}", outcome);
    };

    assert_eq!(entry.parts["_"].meanings["run"]["I run"], "Tôi chạy");
}

#[test]
fn test_restored_quote_form() {
    let mut dict = Dictionary::new();
    dict.ingest(&h::entry_row("run", r#"<d1m">run<d3><d1e">I run<d3><d1em">Tôi chạy<d3>"#));
    assert_eq!(dict.entries["run"].parts["_"].meanings["run"]["I run"], "Tôi chạy");
}

#[test]
fn test_full_record_with_parts_phrases_and_pronunciation() {
    let markup = concat!(
        r#"<d1p5l fl">/rʌn/<d3>"#,
        r#"<d1ub">Danh từ<d3>"#,
        r#"<d1m">sự chạy<d3><d1e">at a run<d3><d1em">đang chạy<d3>"#,
        r#"<d1b">Động từ<d3>"#,
        r#"<ul><li><d1m">chạy<d3></li><li><d1m">vận hành<d3></li></ul>"#,
        r#"<d1id">to run away<d3><d1im">bỏ chạy<d3>"#,
        "##english tab##",
        r#"<d1m">(máy tính) chạy chương trình<d3>"#,
        "##syn##grammar",
    );

    let mut dict = Dictionary::new();
    let status = dict.ingest(&h::entry_row("run", markup));
    assert!(matches!(status, RowStatus::Entry));

    let entry = dict.entry("run").unwrap();
    assert_eq!(entry.pronunciation.as_deref(), Some("/rʌn/"));
    assert_eq!(h::keys(&entry.parts), vec!["_", "danh từ", "động từ"]);

    let noun = &entry.parts["danh từ"];
    assert_eq!(noun.meanings["sự chạy"]["at a run"], "đang chạy");

    let verb = &entry.parts["động từ"];
    assert_eq!(h::keys(&verb.meanings), vec!["chạy", "vận hành"]);
    assert_eq!(verb.phrases["to run away"], "bỏ chạy");

    // The technical tab starts again from the default part.
    assert!(entry.parts["_"].meanings.contains_key("(máy tính) chạy chương trình"));
}

#[test]
fn test_meaning_order_across_two_meanings() {
    let mut dict = Dictionary::new();
    dict.ingest(&h::entry_row(
        "bank",
        "<d1m>ngân hàng<d3><d1e>bank loan<d3><d1em>khoản vay<d3><d1m>bờ sông<d3><d1e>river bank<d3><d1em>bờ sông<d3>",
    ));

    let meanings = &dict.entries["bank"].parts["_"].meanings;
    assert_eq!(h::keys(meanings), vec!["ngân hàng", "bờ sông"]);
    assert_eq!(meanings["bờ sông"]["river bank"], "bờ sông");
}

#[test]
fn test_unstructured_payload_is_committed_empty() {
    let mut dict = Dictionary::new();
    let status = dict.ingest(&h::plain_row("abc", r#"<div class="zz">nothing here</div>"#));
    assert!(matches!(status, RowStatus::Entry));
    assert!(dict.entries["abc"].parts.is_empty());
}

#[test]
fn test_plain_text_payload() {
    let mut dict = Dictionary::new();
    dict.ingest(&h::plain_row("hi", "xin   chào ,  chào"));
    assert!(dict.entries["hi"].parts["_"].meanings.contains_key("xin chào, chào"));
}

#[test]
fn test_empty_payload_produces_nothing() {
    let mut dict = Dictionary::new();
    let status = dict.ingest(&h::plain_row("nothing", ""));
    assert!(matches!(status, RowStatus::Skipped(SkipReason::EmptyPayload)));
    assert!(dict.entries.is_empty());
    assert!(dict.inflections.is_empty());
}

#[test]
fn test_failed_row_does_not_stop_the_run() {
    let bad = vec![1u8, 1, 1, 0x10, 0x20, 0x30, 0x40];

    let rows = vec![
        h::entry_row("before", "<d1m>trước<d3>"),
        tflat_backend::RawRow::new("bad", bad, ""),
        h::entry_row("after", "<d1m>sau<d3>"),
    ];

    let mut dict = Dictionary::new();
    let stats = dict.ingest_all(rows);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.entries, 2);
    assert!(dict.entry("bad").is_none());
    assert!(dict.entry("after").is_some());
}
