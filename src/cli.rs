use crate::merge_config::{DEFAULT_BUFFER_CAPACITY, MergeConfig};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "comb")]
#[command(about = "Merge sorted files into one sorted, de-duplicated stream", long_about = None)]
pub struct Cli {
    /// Drop every line found in the first N files (also accepted as a leading `-N`)
    #[arg(short = 'x', long, value_name = "N", default_value_t = 0)]
    pub exclude: usize,

    /// Initial read buffer per file, in bytes
    #[arg(long, value_name = "BYTES", env = "COMB_BUFFER_SIZE", default_value_t = DEFAULT_BUFFER_CAPACITY)]
    pub buffer_size: usize,

    /// Also print the final statistics as JSON on stderr
    #[arg(long)]
    pub stats_json: bool,

    /// Sorted input files
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Parse the process arguments, accepting the legacy `-N` exclusion form.
    pub fn from_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn config(&self) -> MergeConfig {
        MergeConfig::new(self.buffer_size, self.exclude)
    }
}

/// Rewrite a first argument such as `-3` into `--exclude=3`.
///
/// Only a dash directly followed by a digit qualifies, so `-h` and `-x 3` pass through
/// untouched. Anything after the leading digits is ignored.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let rewritten = args.get(1).and_then(|first| {
        let rest = first.to_str()?.strip_prefix('-')?;
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            None
        } else {
            Some(OsString::from(format!("--exclude={}", digits)))
        }
    });
    if let Some(replacement) = rewritten {
        args[1] = replacement;
    }
    args
}
