use crate::classifier::parse_section;
use crate::markup::{restore, TabSections};
use crate::payload::decode;
use crate::types::{DecodeError, Entry, EntryOutcome, SkipReason};

/// Prefixes of the secondary field marking the row as an inflected form.
pub const INFLECTION_PREFIXES: [&str; 2] = ["(xem)", "@"];

/// Base headword of an inflection reference such as `@chạy#` or `(xem)đi_học`.
///
/// Returns `None` if `secondary` is not an inflection reference. Returns
/// `Some("")` if it is one but no base form is left after cleanup.
pub fn inflection_base(secondary: &str) -> Option<String> {
    let rest = INFLECTION_PREFIXES
        .iter()
        .find_map(|prefix| secondary.strip_prefix(prefix))?;

    let base = rest.trim().trim_end_matches('#').trim_end();
    Some(base.replace('_', " "))
}

/// Parse decoded markup into an entry: the primary tab, then the technical
/// tab merged into the same entry.
pub fn parse_markup(text: &str) -> Entry {
    let tabs = TabSections::from_markup(&restore(text));

    let mut entry = parse_section(tabs.primary(), Entry::default());
    if let Some(technical) = tabs.technical() {
        entry = parse_section(technical, entry);
    }
    entry
}

/// Turn one source row into an entry, an inflection reference, or a skip.
///
/// A payload that fails to decode is an error for this row only.
pub fn build(word: &str, payload: &[u8], secondary: &str) -> Result<EntryOutcome, DecodeError> {
    if let Some(base) = inflection_base(secondary) {
        if base.is_empty() {
            return Ok(EntryOutcome::Skip(SkipReason::InvalidInflectionBase));
        }
        return Ok(EntryOutcome::Inflection {
            base,
            word: word.to_string(),
        });
    }

    if payload.is_empty() {
        return Ok(EntryOutcome::Skip(SkipReason::EmptyPayload));
    }

    let text = decode(payload)?;
    Ok(EntryOutcome::Parsed(parse_markup(&text)))
}
