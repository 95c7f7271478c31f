//! Text sanitisation for narrative and field input.
//!
//! Text reaching the report comes from the form subsystem and from an external text-generation
//! service, so it may carry a byte-order mark, stray control characters, decomposed Unicode or
//! malformed encodings. Every function here is total: bad input degrades, it never errors.
//!
//! Steps applied by [`normalize`], in order:
//! 1. leading byte-order marks are stripped
//! 2. C0 control characters other than `\t`, `\n` and `\r` are removed
//! 3. the text is put in Unicode canonical composed form (NFC)
//! 4. the result is re-encoded as UTF-8; if that fails, code points outside the BMP are dropped

use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Normalises optional input text into well-formed NFC text.
///
/// `None` and empty input yield an empty string. The function is idempotent.
pub fn normalize(input: Option<&str>) -> String {
    let Some(text) = input.filter(|text| !text.is_empty()) else {
        return String::new();
    };

    let text = strip_byte_order_marks(text);
    let text = strip_control_characters(text);
    // Removing a control character can expose a mark that was hidden behind it.
    let text = strip_byte_order_marks(&text);
    let composed: String = text.nfc().collect();

    reencode(composed)
}

/// Decodes raw bytes non-strictly and normalises the result.
///
/// Malformed UTF-8 sequences become U+FFFD rather than failing the decode.
pub fn normalize_bytes(input: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(input);
    normalize(Some(&decoded))
}

/// Decodes UTF-16 code units and normalises the result.
///
/// Unpaired surrogate code units are dropped.
pub fn normalize_utf16(input: &[u16]) -> String {
    let decoded: String = char::decode_utf16(input.iter().copied())
        .filter_map(Result::ok)
        .collect();
    normalize(Some(&decoded))
}

fn strip_byte_order_marks(text: &str) -> &str {
    text.trim_start_matches(BYTE_ORDER_MARK)
}

fn is_dropped_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}')
}

fn strip_control_characters(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_dropped_control) {
        Cow::Owned(text.chars().filter(|c| !is_dropped_control(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

fn reencode(text: String) -> String {
    match String::from_utf8(text.into_bytes()) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("text failed UTF-8 re-encode, dropping non-BMP code points: {err}");
            strip_outside_bmp(&String::from_utf8_lossy(err.as_bytes()))
        }
    }
}

fn strip_outside_bmp(text: &str) -> String {
    text.chars().filter(|c| u32::from(*c) <= 0xFFFF).collect()
}
