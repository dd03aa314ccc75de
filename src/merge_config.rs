use crate::MergeError;
use tracing::info;

/// Bytes read ahead per input file unless configured otherwise.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1_000_000;

/// Tunables for one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Initial read buffer per input, in bytes. A buffer grows past this only when a
    /// single record does not fit.
    pub buffer_capacity: usize,
    /// Number of leading inputs treated as exclusion sources
    pub exclude: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            exclude: 0,
        }
    }
}

impl MergeConfig {
    pub fn new(buffer_capacity: usize, exclude: usize) -> Self {
        Self { buffer_capacity, exclude }
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.buffer_capacity == 0 {
            return Err(MergeError::Config("buffer size must be at least one byte".to_string()));
        }
        Ok(())
    }

    /// Resident buffer memory for `files` inputs before any buffer grows.
    pub fn buffer_memory(&self, files: usize) -> usize {
        self.buffer_capacity.saturating_mul(files)
    }

    pub fn log_summary(&self, files: usize) {
        info!(
            files,
            exclude = self.exclude,
            buffer_capacity = self.buffer_capacity,
            "Merging {} file(s), ~{} MB of read buffers",
            files,
            self.buffer_memory(files) / 1_048_576
        );
        if self.exclude > files {
            info!(
                "Exclusion count {} covers every input; nothing will be written",
                self.exclude
            );
        }
    }
}
