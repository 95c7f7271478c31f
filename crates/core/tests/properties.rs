//! Property tests for the sanitiser and the block parser over generated input.

use proptest::prelude::*;
use report_core::{normalize, normalize_utf16, parse_blocks};

/// Text biased towards what the sanitiser and parser act on: byte order marks, C0 controls,
/// combining marks and the markdown markers.
const NOISY_TEXT: &str = r"[\x{FEFF}\x00-\x1Fa-zа-я0-9\x{301}\x{306}#*•. \n\t-]{0,300}";

#[test]
fn normalize_is_idempotent_for_any_string() {
    proptest!(|(text in any::<String>())| {
        let once = normalize(Some(&text));
        prop_assert_eq!(normalize(Some(&once)), once);
    });
}

#[test]
fn normalize_is_idempotent_for_noisy_text() {
    proptest!(|(text in NOISY_TEXT)| {
        let once = normalize(Some(&text));
        prop_assert!(!once.starts_with('\u{feff}'), "output starts with a BOM");
        prop_assert_eq!(normalize(Some(&once)), once);
    });
}

#[test]
fn utf16_input_never_yields_lone_surrogates() {
    proptest!(|(units in prop::collection::vec(any::<u16>(), 0..200))| {
        let text = normalize_utf16(&units);
        let encoded: Vec<u16> = text.encode_utf16().collect();
        let decoded = String::from_utf16(&encoded);
        prop_assert!(decoded.is_ok());
        prop_assert_eq!(decoded.unwrap_or_default(), text.clone());
        prop_assert_eq!(normalize(Some(&text)), text);
    });
}

#[test]
fn parse_blocks_covers_any_normalised_text() {
    proptest!(|(raw in NOISY_TEXT)| {
        let text = normalize(Some(&raw));
        let blocks = parse_blocks(&text);

        prop_assert_eq!(blocks.is_empty(), text.is_empty());
        if !text.trim().is_empty() {
            for block in &blocks {
                prop_assert!(
                    !block.plain_text().trim().is_empty(),
                    "blank block {:?} from {:?}",
                    block,
                    text
                );
            }
        }
    });
}
