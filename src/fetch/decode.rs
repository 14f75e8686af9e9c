//! Text decoding for fetched file contents.
//!
//! Strategy:
//! 1. An explicit encoding label wins (unknown labels fall back to UTF-8)
//! 2. BOM markers (UTF-8, UTF-16 LE/BE)
//! 3. Strict UTF-8
//! 4. chardetng guess
//!
//! Invalid sequences are replaced with U+FFFD rather than failing.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

const DETECTION_SAMPLE_SIZE: usize = 8192;

/// Decode `bytes` to text, returning the content and the encoding used.
pub fn decode_bytes(bytes: &[u8], encoding: Option<&str>) -> (String, &'static Encoding) {
    if let Some(label) = encoding {
        let encoding = Encoding::for_label(label.trim().as_bytes()).unwrap_or(UTF_8);
        let (decoded, _had_errors) = encoding.decode_with_bom_removal(bytes);
        return (decoded.into_owned(), encoding);
    }

    let detected = detect_encoding(bytes);
    let (decoded, used, _had_errors) = detected.decode(bytes);
    (decoded.into_owned(), used)
}

/// Guess the encoding of `bytes` from a leading sample.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if bytes.is_empty() || std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let sample = &bytes[..bytes.len().min(DETECTION_SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    let guess = detector.guess(None, true);

    // chardetng never guesses UTF-16; those only arrive with a BOM.
    if guess == UTF_16LE || guess == UTF_16BE {
        UTF_8
    } else {
        guess
    }
}
