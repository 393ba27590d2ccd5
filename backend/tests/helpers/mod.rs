use tflat_backend::payload;
use tflat_backend::types::RawRow;

/// Marker byte used for scrambled fixture payloads.
#[allow(dead_code)]
pub const MARKER: u8 = 0x1f;

/// A scrambled, gzip-compressed payload holding `text`.
pub fn scrambled(text: &str) -> Vec<u8> {
    payload::encode(text, MARKER).expect("encode fixture payload")
}

pub fn entry_row(word: &str, markup: &str) -> RawRow {
    RawRow::new(word, scrambled(markup), "")
}

#[allow(dead_code)]
pub fn plain_row(word: &str, markup: &str) -> RawRow {
    RawRow::new(word, markup, "")
}

#[allow(dead_code)]
pub fn inflection_row(word: &str, secondary: &str) -> RawRow {
    RawRow::new(word, Vec::new(), secondary)
}

/// Keys of an ordered map, for order assertions.
#[allow(dead_code)]
pub fn keys<V>(map: &indexmap::IndexMap<String, V>) -> Vec<&str> {
    map.keys().map(|k| k.as_str()).collect()
}
