//! Stream decode use case
//!
//! Feeds a source into a session chunk by chunk, the way bytes would trickle
//! in from a network fetch, and reports what the session can tell after
//! each step.

use crate::application::dto::{FrameReport, StreamOptions, StreamProgress, StreamReport};
use crate::application::IncrementalDecodeSession;
use crate::domain::repositories::{DataProvider, DecodeBackend};
use tracing::{debug, info};

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(&StreamProgress) + Send + Sync>;

/// Stream decode use case
pub struct StreamDecodeUseCase {
    options: StreamOptions,
}

impl StreamDecodeUseCase {
    pub fn new(options: StreamOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    /// Appends `data` in chunks, the last one marked final
    ///
    /// # Panics
    ///
    /// Panics if the session already received its final data.
    pub fn execute<B: DecodeBackend>(
        &self,
        session: &mut IncrementalDecodeSession<B>,
        data: &[u8],
        progress_callback: Option<ProgressCallback>,
    ) -> StreamReport {
        let total_bytes = data.len() as u64;
        let chunk_size = self.options.chunk_size.max(1);
        let mut bytes_received = 0u64;
        let mut chunks = 0usize;

        info!("Streaming {} bytes in {} byte chunks", total_bytes, chunk_size);

        if data.is_empty() {
            session.append_data(&[], true);
            chunks = 1;
        }

        let chunk_total = data.len().div_ceil(chunk_size);
        for (i, chunk) in data.chunks(chunk_size).enumerate() {
            let is_final = i + 1 == chunk_total;
            session.append_data(chunk, is_final);
            bytes_received += chunk.len() as u64;
            chunks += 1;

            let progress = Self::progress(session, bytes_received, total_bytes);
            debug!(
                "Chunk {}: {} / {} bytes, {} frames ({} complete)",
                i, bytes_received, total_bytes, progress.frame_count, progress.complete_frames
            );

            if let Some(ref callback) = progress_callback {
                callback(&progress);
            }
        }

        let report = self.report(session, total_bytes, chunks);
        info!(
            "Stream complete: {} frames, {} complete, repetition {}",
            report.frame_count(),
            report.complete_frames(),
            report.repetition
        );
        report
    }

    /// Hands the session everything `provider` holds, as final data
    ///
    /// # Panics
    ///
    /// Panics if the session already received its final data.
    pub fn execute_from_provider<B: DecodeBackend>(
        &self,
        session: &mut IncrementalDecodeSession<B>,
        provider: &dyn DataProvider,
        total_bytes: u64,
    ) -> StreamReport {
        info!("Reading {} bytes from provider", total_bytes);
        session.append_from_provider(provider, true);
        self.report(session, total_bytes, 1)
    }

    /// Describes every frame the session currently knows about
    pub fn report<B: DecodeBackend>(
        &self,
        session: &IncrementalDecodeSession<B>,
        bytes: u64,
        chunks: usize,
    ) -> StreamReport {
        let frames = (0..session.frame_count())
            .map(|index| {
                let size = session.frame_size(index, self.options.subsampling);
                FrameReport {
                    index,
                    width: size.map(|s| s.width),
                    height: size.map(|s| s.height),
                    complete: session.is_frame_complete(index),
                    duration: session.frame_duration(index),
                }
            })
            .collect();

        StreamReport {
            bytes,
            chunks,
            state: session.state(),
            repetition: session.repetition_count(),
            frames,
        }
    }

    fn progress<B: DecodeBackend>(
        session: &IncrementalDecodeSession<B>,
        bytes_received: u64,
        total_bytes: u64,
    ) -> StreamProgress {
        let frame_count = session.frame_count();
        let complete_frames = (0..frame_count)
            .filter(|&i| session.is_frame_complete(i))
            .count();

        StreamProgress {
            bytes_received,
            total_bytes,
            frame_count,
            complete_frames,
        }
    }
}

impl Default for StreamDecodeUseCase {
    fn default() -> Self {
        Self::new(StreamOptions::default())
    }
}
