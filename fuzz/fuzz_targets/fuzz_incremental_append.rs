#![no_main]

use incremental_decoder::{ImageCrateBackend, IncrementalDecodeSession};
use libfuzzer_sys::fuzz_target;

// First byte picks the chunk size; the rest is fed in that many pieces.
// Frame count must never shrink as bytes arrive.
fuzz_target!(|data: &[u8]| {
    let Some((&step, body)) = data.split_first() else {
        return;
    };
    let step = usize::from(step).max(1) * 16;

    let mut session = IncrementalDecodeSession::<ImageCrateBackend>::new();
    let mut previous = 0;
    let chunks: Vec<&[u8]> = body.chunks(step).collect();

    for (i, chunk) in chunks.iter().enumerate() {
        session.append_data(chunk, i + 1 == chunks.len());
        let count = session.frame_count();
        assert!(count >= previous);
        previous = count;
    }
});
