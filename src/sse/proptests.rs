//! Property-based tests for stream framing and decoding
//!
//! These tests verify invariants that must hold no matter how the network
//! slices a response into chunks:
//! - The same bytes always frame into the same lines
//! - Fragments concatenate in order regardless of chunk grouping
//! - The partial-line buffer never holds a line terminator
//! - Arbitrary bytes never panic the pipeline

use super::{decode_line, DecodedEvent, DeltaAccumulator, LineFramer};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Line content without terminators; mixes ASCII with multi-byte characters
fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 :{}\\[\\]\",._-]{0,40}",
        "[äöüéñ日本語😀 a-z]{0,20}",
        Just(String::new()),
        Just(":keepalive".to_string()),
    ]
}

/// Non-empty delta text, including whitespace and multi-byte characters
fn arb_fragment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?äöü日本😀\\n\"\\\\]{1,16}"
}

/// Cut points as fractions of the input length
fn arb_cuts() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1.0, 0..12)
}

// ============================================================================
// Helpers
// ============================================================================

fn split(bytes: &[u8], cuts: &[f64]) -> Vec<Vec<u8>> {
    let mut offsets: Vec<usize> = cuts
        .iter()
        .map(|c| (c * bytes.len() as f64) as usize)
        .collect();
    offsets.sort_unstable();
    offsets.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for offset in offsets {
        if offset > start {
            chunks.push(bytes[start..offset].to_vec());
            start = offset;
        }
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

fn frame(chunks: &[Vec<u8>]) -> (Vec<String>, Option<String>) {
    let mut framer = LineFramer::new();
    let mut lines = Vec::new();
    for chunk in chunks {
        lines.extend(framer.push_lines(chunk));
    }
    let rest = framer.finish();
    (lines, rest)
}

fn delta_line(fragment: &str) -> String {
    format!(
        "data: {}\n",
        serde_json::json!({"choices": [{"delta": {"content": fragment}}]})
    )
}

fn accumulate(chunks: &[Vec<u8>]) -> (String, bool) {
    let mut framer = LineFramer::new();
    let mut acc = DeltaAccumulator::new();
    for chunk in chunks {
        for line in framer.push_lines(chunk) {
            match decode_line(&line) {
                DecodedEvent::Terminator => return (acc.into_text(), true),
                DecodedEvent::Data(payload) => {
                    acc.apply(&payload);
                }
                DecodedEvent::Ignorable(_) => {}
            }
        }
    }
    (acc.into_text(), false)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_framing_is_independent_of_chunking(
        lines in prop::collection::vec(arb_line(), 0..12),
        crlf in any::<bool>(),
        trailing in arb_line(),
        cuts in arb_cuts(),
    ) {
        let terminator = if crlf { "\r\n" } else { "\n" };
        let mut text: String = lines.iter().map(|l| format!("{}{}", l, terminator)).collect();
        text.push_str(&trailing);
        let bytes = text.as_bytes();

        let whole = frame(&[bytes.to_vec()]);
        let sliced = frame(&split(bytes, &cuts));

        prop_assert_eq!(&whole.0, &lines);
        prop_assert_eq!(sliced, whole);
    }

    #[test]
    fn prop_fragments_concatenate_in_order(
        fragments in prop::collection::vec(arb_fragment(), 1..20),
        cuts in arb_cuts(),
    ) {
        let mut stream: String = fragments.iter().map(|f| delta_line(f)).collect();
        stream.push_str("data: [DONE]\n");

        let (text, terminated) = accumulate(&split(stream.as_bytes(), &cuts));

        prop_assert!(terminated);
        prop_assert_eq!(text, fragments.concat());
    }

    #[test]
    fn prop_partial_buffer_never_holds_a_terminator(
        bytes in prop::collection::vec(any::<u8>(), 0..256),
        cuts in arb_cuts(),
    ) {
        let mut framer = LineFramer::new();
        for chunk in split(&bytes, &cuts) {
            for line in framer.push_lines(&chunk) {
                prop_assert!(!line.contains('\n'));
            }
        }
        if let Some(rest) = framer.finish() {
            prop_assert!(!rest.contains('\n'));
        }
    }

    #[test]
    fn prop_arbitrary_lines_never_panic(line in "\\PC{0,80}") {
        let _ = decode_line(&line);
        let _ = decode_line(&format!("data: {}", line));
    }
}
