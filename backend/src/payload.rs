//! Payload blobs of the `av` table.
//!
//! A blob is either plain UTF-8 markup, or a scrambled gzip stream prefixed
//! with three identical marker bytes. The scrambling swaps adjacent byte
//! pairs in a prefix window and leaves the tail untouched.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::types::DecodeError;

/// Divisor for the half length of the buffer.
pub const BLOB_KEY_A: usize = 2;
/// Offset of the unscrambled tail window, in byte pairs.
pub const BLOB_KEY_B: usize = 7;

/// Length of the marker prefix on scrambled payloads.
pub const MARKER_LEN: usize = 3;

/// True if the payload carries the scrambled-and-compressed marker.
pub fn is_scrambled(payload: &[u8]) -> bool {
    payload.len() > MARKER_LEN && payload[0] == payload[1] && payload[1] == payload[2]
}

/// Applies the windowed pair swap.
///
/// Pairs at even offsets `i < 2 * (len / A)` are swapped while
/// `i <= 2 * B + len / A`, copied as-is after that. An odd trailing byte is
/// always copied.
///
/// The swap only depends on the offset and the buffer length, so the
/// operation is its own inverse.
pub fn descramble(data: &[u8]) -> Vec<u8> {
    let len = data.len();
    let half_len = len / BLOB_KEY_A;
    let window_end = BLOB_KEY_B * 2 + half_len;

    let mut out = vec![0u8; len];
    for i in (0..half_len * 2).step_by(2) {
        if i > window_end {
            out[i] = data[i];
            out[i + 1] = data[i + 1];
        } else {
            out[i] = data[i + 1];
            out[i + 1] = data[i];
        }
    }

    if len % 2 == 1 {
        out[len - 1] = data[len - 1];
    }

    out
}

/// Forward cipher, see [`descramble`].
pub fn scramble(data: &[u8]) -> Vec<u8> {
    descramble(data)
}

/// Decodes a payload blob into markup text.
pub fn decode(payload: &[u8]) -> Result<String, DecodeError> {
    if !is_scrambled(payload) {
        let text = std::str::from_utf8(payload)?;
        return Ok(text.to_string());
    }

    let body = &payload[MARKER_LEN..];
    tracing::trace!("Descrambling {} bytes", body.len());
    let compressed = descramble(body);

    let mut decoder = MultiGzDecoder::new(compressed.as_slice());
    let mut bytes: Vec<u8> = Vec::new();
    decoder.read_to_end(&mut bytes)?;

    tracing::trace!("Decompressed {} -> {} bytes", compressed.len(), bytes.len());

    String::from_utf8(bytes).map_err(|e| DecodeError::Encoding(e.utf8_error()))
}

/// Produces a scrambled payload for `text`: gzip, scramble, then prefix with
/// `marker` three times.
pub fn encode(text: &str, marker: u8) -> Result<Vec<u8>, DecodeError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let compressed = encoder.finish()?;

    let mut payload = vec![marker; MARKER_LEN];
    payload.extend(scramble(&compressed));
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn test_descramble_swaps_pairs_in_window() {
        // len 4: half_len 2, window_end 16, every pair is swapped
        assert_eq!(descramble(&[1, 2, 3, 4]), vec![2, 1, 4, 3]);
        // odd trailing byte is kept
        assert_eq!(descramble(&[1, 2, 3, 4, 5]), vec![2, 1, 4, 3, 5]);
        assert_eq!(descramble(&[9]), vec![9]);
        assert!(descramble(&[]).is_empty());
    }

    #[test]
    fn test_descramble_leaves_tail_after_window() {
        // len 40: half_len 20, window_end 34. Pairs at 0..=34 swap, 36 and 38 don't.
        let data = sample(40);
        let out = descramble(&data);
        assert_eq!(out[34], data[35]);
        assert_eq!(out[35], data[34]);
        assert_eq!(&out[36..], &data[36..]);
    }

    #[test]
    fn test_scramble_round_trip() {
        for len in [0, 1, 2, 3, 7, 16, 29, 30, 31, 33, 64, 101, 1000, 1001] {
            let data = sample(len);
            assert_eq!(descramble(&scramble(&data)), data, "len {}", len);
        }
    }

    #[test]
    fn test_is_scrambled() {
        assert!(is_scrambled(&[7, 7, 7, 1]));
        assert!(!is_scrambled(&[7, 7, 7]));
        assert!(!is_scrambled(&[7, 7, 8, 1]));
        assert!(!is_scrambled(b"<d1m>"));
    }

    #[test]
    fn test_decode_raw_text() {
        assert_eq!(decode("<d1m>chạy<d3>".as_bytes()).unwrap(), "<d1m>chạy<d3>");
    }

    #[test]
    fn test_decode_raw_invalid_utf8() {
        let err = decode(&[0xff, 0xfe, 0x41]).unwrap_err();
        assert!(matches!(err, DecodeError::Encoding(_)));
    }

    #[test]
    fn test_decode_scrambled() {
        let text = "<d1m>run<d3><d1e>I run<d3><d1em>Tôi chạy<d3>";
        let payload = encode(text, 0x5a).unwrap();
        assert_eq!(&payload[..3], &[0x5a, 0x5a, 0x5a]);
        assert_eq!(decode(&payload).unwrap(), text);
    }

    #[test]
    fn test_decode_scrambled_not_gzip() {
        let payload = [1u8, 1, 1, 10, 20, 30, 40, 50];
        let err = decode(&payload).unwrap_err();
        assert!(matches!(err, DecodeError::Compression(_)));
    }

    #[test]
    fn test_decode_scrambled_invalid_utf8() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xc3, 0x28]).unwrap();
        let compressed = encoder.finish().unwrap();
        let mut payload = vec![0u8; 3];
        payload.extend(scramble(&compressed));

        let err = decode(&payload).unwrap_err();
        assert!(matches!(err, DecodeError::Encoding(_)));
    }
}
