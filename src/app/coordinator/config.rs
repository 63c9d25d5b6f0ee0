//! Configuration structures for the download coordinator

use crate::constants::{tags, workers};

/// Configuration for the download coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Episodes downloaded concurrently per batch
    pub batch_size: usize,
    /// Album written into every episode tag
    pub album: String,
    /// Genre written into every episode tag
    pub genre: String,
    /// Print one progress line per finished item to stdout
    pub show_progress: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            batch_size: workers::DEFAULT_BATCH_SIZE,
            album: tags::DEFAULT_ALBUM.to_string(),
            genre: tags::DEFAULT_GENRE.to_string(),
            show_progress: true,
        }
    }
}

impl CoordinatorConfig {
    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enable or disable progress lines
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }

        Ok(())
    }
}
