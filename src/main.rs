use comb::cli::Cli;
use comb::{fd_limit, logging, MergeError, Merger};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing::error;

fn run(cli: &Cli) -> Result<(), MergeError> {
    let config = cli.config();

    fd_limit::check_file_count(cli.files.len());
    config.log_summary(cli.files.len());

    let merger = Merger::open(&cli.files, &config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = merger.run(&mut out)?;
    out.flush()?;

    if cli.stats_json {
        eprintln!("{}", serde_json::to_string(&stats)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::from_args();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
