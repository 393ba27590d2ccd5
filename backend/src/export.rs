use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::dictionary::Dictionary;

/// Serialize as `{"entries": {...}, "inflections": {...}}`.
///
/// Non-ASCII text is written as is. `pretty` indents with two spaces.
pub fn write_json<W: Write>(dict: &Dictionary, writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, dict)?;
    } else {
        serde_json::to_writer(writer, dict)?;
    }
    Ok(())
}

pub fn write_json_file(dict: &Dictionary, path: &Path, pretty: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_json(dict, &mut writer, pretty)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRow;

    #[test]
    fn test_write_json_shape() {
        let mut dict = Dictionary::new();
        dict.ingest(&RawRow::new("chạy", "<d1m>run<d3>", ""));
        dict.ingest(&RawRow::new("chạy chạy", "", "@chạy"));

        let mut out: Vec<u8> = Vec::new();
        write_json(&dict, &mut out, false).unwrap();
        let json = String::from_utf8(out).unwrap();

        assert_eq!(
            json,
            r#"{"entries":{"chạy":{"parts":{"_":{"meanings":{"run":{}},"phrases":{}}}}},"inflections":{"chạy":["chạy chạy"]}}"#
        );
    }

    #[test]
    fn test_write_json_pretty_indent() {
        let dict = Dictionary::new();
        let mut out: Vec<u8> = Vec::new();
        write_json(&dict, &mut out, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"entries\": {},\n  \"inflections\": {}\n}");
    }
}
