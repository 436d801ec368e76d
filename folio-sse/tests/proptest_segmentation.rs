//! Property-based tests: decoder output does not depend on how input is cut.

use folio_sse::{SseDecoder, StreamFrame};
use proptest::prelude::*;

fn arb_payload() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?é中ß]{0,24}"
}

/// Render payloads as an event stream terminated by the sentinel.
fn render(payloads: &[String], crlf: bool) -> Vec<u8> {
    let eol = if crlf { "\r\n" } else { "\n" };
    let mut body = String::new();
    for p in payloads {
        body.push_str(&format!("data: {p}{eol}{eol}"));
    }
    body.push_str(&format!("data: [DONE]{eol}{eol}"));
    body.into_bytes()
}

/// Feed `bytes` cut at the given points and collect the frames.
fn decode_split(bytes: &[u8], mut cuts: Vec<usize>) -> Vec<StreamFrame> {
    cuts.retain(|c| *c <= bytes.len());
    cuts.sort_unstable();
    cuts.dedup();

    let mut decoder = SseDecoder::new();
    let mut frames = Vec::new();
    let mut start = 0;
    for cut in cuts {
        frames.extend(decoder.push_bytes(&bytes[start..cut]));
        start = cut;
    }
    frames.extend(decoder.push_bytes(&bytes[start..]));
    frames
}

fn expected(payloads: &[String]) -> Vec<StreamFrame> {
    let mut frames: Vec<StreamFrame> = payloads.iter().map(StreamFrame::data).collect();
    frames.push(StreamFrame::terminal());
    frames
}

proptest! {
    #[test]
    fn segmentation_invariant(
        payloads in proptest::collection::vec(arb_payload(), 0..12),
        cuts in proptest::collection::vec(0usize..2048, 0..32),
        crlf in any::<bool>(),
    ) {
        let bytes = render(&payloads, crlf);
        let whole = decode_split(&bytes, Vec::new());
        let split = decode_split(&bytes, cuts);
        prop_assert_eq!(&whole, &expected(&payloads));
        prop_assert_eq!(split, whole);
    }

    #[test]
    fn byte_at_a_time_matches_whole(
        payloads in proptest::collection::vec(arb_payload(), 0..8),
    ) {
        let bytes = render(&payloads, false);
        let every_byte: Vec<usize> = (0..bytes.len()).collect();
        prop_assert_eq!(decode_split(&bytes, every_byte), expected(&payloads));
    }

    #[test]
    fn trailing_garbage_after_sentinel_is_ignored(
        payloads in proptest::collection::vec(arb_payload(), 0..6),
        garbage in "[a-z: \n]{0,64}",
    ) {
        let mut bytes = render(&payloads, false);
        bytes.extend_from_slice(garbage.as_bytes());
        prop_assert_eq!(decode_split(&bytes, Vec::new()), expected(&payloads));
    }
}
