#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the chunk size; the rest is the stream body.
    let Some((&size, body)) = data.split_first() else {
        return;
    };
    let size = usize::from(size).max(1);

    let mut whole = folio_sse::SseDecoder::new();
    let expected = whole.push_bytes(body);

    let mut chunked = folio_sse::SseDecoder::new();
    let mut frames = Vec::new();
    for chunk in body.chunks(size) {
        frames.extend(chunked.push_bytes(chunk));
    }
    assert_eq!(frames, expected);
});
