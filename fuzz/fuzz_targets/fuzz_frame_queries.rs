#![no_main]

use incremental_decoder::{
    DecodingOptions, DrawingSize, ImageCrateBackend, IncrementalDecodeSession, SubsamplingLevel,
};
use libfuzzer_sys::fuzz_target;

// Every query on a session holding arbitrary bytes must answer without
// panicking, whatever the bytes are.
fuzz_target!(|data: &[u8]| {
    let mut session = IncrementalDecodeSession::<ImageCrateBackend>::new();
    session.append_data(data, data.len() % 2 == 0);

    let _ = session.repetition_count();
    for index in 0..session.frame_count().min(4) {
        let _ = session.is_frame_complete(index);
        let _ = session.frame_duration(index);
        for level in SubsamplingLevel::ALL {
            let _ = session.frame_size(index, level);
        }
        let _ = session.create_frame_image(index, SubsamplingLevel::Level1, DecodingOptions::synchronous());
        let options = DecodingOptions::asynchronous(Some(DrawingSize::new(16.0, 16.0)));
        let _ = session.create_frame_image(index, SubsamplingLevel::DEFAULT, options);
    }
});
