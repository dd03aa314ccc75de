pub mod cli;
pub mod error;
pub mod fd_limit;
pub mod logging;
pub mod merge;
pub mod merge_config;
pub mod ordering;
pub mod record_stream;

pub use error::*;
pub use merge::{MergeStats, Merger};
pub use merge_config::MergeConfig;
pub use record_stream::RecordStream;
