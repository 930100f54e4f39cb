//! Progress reporting for CLI

use crate::application::dto::StreamProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

const TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes}";

/// Progress reporter using indicatif
pub struct ProgressReporter {
    bar: Arc<ProgressBar>,
}

impl ProgressReporter {
    /// Creates a reporter for streaming `total_bytes`
    pub fn for_stream(total_bytes: u64) -> Self {
        let bar = ProgressBar::new(total_bytes);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message("Streaming image data...".to_string());

        Self { bar: Arc::new(bar) }
    }

    /// Finishes with a message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Gets a callback for stream progress
    pub fn stream_callback(&self) -> Box<dyn Fn(&StreamProgress) + Send + Sync> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |progress: &StreamProgress| {
            bar.set_position(progress.bytes_received);
            bar.set_message(format!(
                "{} frames known | {} complete",
                progress.frame_count, progress.complete_frames
            ));
        })
    }
}
