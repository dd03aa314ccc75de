use crate::merge_config::MergeConfig;
use crate::ordering::{Permutation, Strategy};
use crate::record_stream::RecordStream;
use crate::MergeError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Counters reported once the merge finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Calls into the ordering engine
    pub rounds: u64,
    /// Records emitted by running ahead on the minimum stream without reordering
    pub skips: u64,
    /// Lines written to the output
    pub written: u64,
    pub pair_swaps: u64,
    pub binary_insertions: u64,
    pub shell_sorts: u64,
}

impl MergeStats {
    fn record_round(&mut self, strategy: Strategy) {
        self.rounds += 1;
        match strategy {
            Strategy::PairSwap => self.pair_swaps += 1,
            Strategy::BinaryInsertion => self.binary_insertions += 1,
            Strategy::ShellSort => self.shell_sorts += 1,
        }
    }
}

/// N-way merge of sorted record streams into one sorted, de-duplicated output.
///
/// The first `exclude` streams are exclusion sources: a record present in any of them is
/// never written, whichever other streams also contain it.
pub struct Merger<R = File> {
    streams: Vec<RecordStream<R>>,
    order: Permutation,
    exclude: usize,
    /// Last distinct record consumed, written or not. Catches repeats inside one input.
    previous: Option<Vec<u8>>,
    stats: MergeStats,
}

impl Merger<File> {
    /// Open every input, in order. Fails on the first path that cannot be opened.
    pub fn open<P: AsRef<Path>>(paths: &[P], config: &MergeConfig) -> Result<Self, MergeError> {
        config.validate()?;
        let streams = paths
            .iter()
            .map(|path| RecordStream::open(path, config.buffer_capacity))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_streams(streams, config.exclude))
    }
}

impl<R: Read> Merger<R> {
    pub fn from_streams(streams: Vec<RecordStream<R>>, exclude: usize) -> Self {
        let order = Permutation::identity(streams.len());
        Self {
            streams,
            order,
            exclude,
            previous: None,
            stats: MergeStats::default(),
        }
    }

    /// Drain every stream into `out`, one line per distinct record.
    pub fn run<W: Write>(mut self, out: &mut W) -> Result<MergeStats, MergeError> {
        let total = self.streams.len();
        let mut exhausted = self.streams.iter().filter(|s| s.is_exhausted()).count();
        // Force a full sort on the first round
        let mut advanced = total;
        let mut active = total;

        debug!(files = total, exclude = self.exclude, "starting merge");

        while exhausted < total {
            let streams = &self.streams;
            let strategy = self
                .order
                .reorder(advanced, active, |a, b| streams[a].cmp_current(&streams[b]));
            self.stats.record_round(strategy);
            active = total - exhausted;

            let head = self.order.at(0);
            let Some(min) = self.streams[head].current() else {
                break;
            };

            let mut keep = head >= self.exclude;
            let mut duplicates = 0;
            for position in 1..total {
                let idx = self.order.at(position);
                if self.streams[idx].current() != Some(min) {
                    break;
                }
                if idx < self.exclude {
                    keep = false;
                }
                duplicates += 1;
            }

            emit(out, &mut self.previous, &mut self.stats, min, keep)?;

            for position in 0..=duplicates {
                let idx = self.order.at(position);
                self.streams[idx].advance()?;
                if self.streams[idx].is_exhausted() {
                    exhausted += 1;
                }
            }
            advanced = duplicates + 1;

            if total > 1 && duplicates == 0 {
                exhausted += self.run_ahead(head, out)?;
            }
        }

        info!(
            rounds = self.stats.rounds,
            skips = self.stats.skips,
            written = self.stats.written,
            "merge complete"
        );
        debug!(
            pair_swaps = self.stats.pair_swaps,
            binary_insertions = self.stats.binary_insertions,
            shell_sorts = self.stats.shell_sorts,
            "reorder strategies"
        );

        Ok(self.stats)
    }

    /// Keep emitting from `head` while it stays strictly below the runner-up. Nothing else
    /// moved this round, so the runner-up is still the second smallest stream.
    /// Returns how many streams became exhausted.
    fn run_ahead<W: Write>(&mut self, head: usize, out: &mut W) -> Result<usize, MergeError> {
        let runner_up = self.order.at(1);
        while self.streams[head].cmp_current(&self.streams[runner_up]) == Ordering::Less {
            let stream = &mut self.streams[head];
            self.stats.skips += 1;
            if let Some(record) = stream.current() {
                emit(out, &mut self.previous, &mut self.stats, record, head >= self.exclude)?;
            }
            stream.advance()?;
            if stream.is_exhausted() {
                return Ok(1);
            }
        }
        Ok(0)
    }
}

/// Write `record` as one line when `keep` is set, unless it repeats the previous record.
fn emit<W: Write>(
    out: &mut W,
    previous: &mut Option<Vec<u8>>,
    stats: &mut MergeStats,
    record: &[u8],
    keep: bool,
) -> Result<(), MergeError> {
    if previous.as_deref() == Some(record) {
        return Ok(());
    }
    if keep {
        out.write_all(record)?;
        out.write_all(b"\n")?;
        stats.written += 1;
    }
    match previous {
        Some(buf) => {
            buf.clear();
            buf.extend_from_slice(record);
        }
        None => *previous = Some(record.to_vec()),
    }
    Ok(())
}
