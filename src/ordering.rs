//! Keeps a permutation of stream indices ordered by current record.
//!
//! Every round the merge advances the minimum stream and whatever was tied with it, which
//! only ever moves those streams later in sort order. The rest of the permutation is still
//! ordered, so most rounds can be repaired far more cheaply than a full sort:
//!
//! * **pair swap**: at most two streams moved and both still sit at or before position 2,
//!   so only positions 0 and 1 can be out of order.
//! * **binary insertion**: at most two streams moved and many are active; each moved
//!   stream is binary searched into the ordered tail and rotated into place.
//! * **shell sort**: everything else, including the very first round.

use std::cmp::Ordering;

const SHELL_GAPS: [usize; 8] = [1, 4, 10, 23, 57, 132, 301, 701];

/// Binary insertion only pays off over a long enough tail.
const BINARY_INSERTION_MIN_ACTIVE: usize = 8;

/// Fast paths apply when at most this many streams advanced last round.
const FAST_PATH_MAX_ADVANCED: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    PairSwap,
    BinaryInsertion,
    ShellSort,
}

#[derive(Debug, Clone)]
pub struct Permutation {
    order: Vec<usize>,
}

impl Permutation {
    pub fn identity(len: usize) -> Self {
        Self { order: (0..len).collect() }
    }

    /// Stream index held at `position`.
    pub fn at(&self, position: usize) -> usize {
        self.order[position]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Restore ascending order over the first `active` positions.
    ///
    /// `advanced` is how many streams, starting at position 0, moved since the last call.
    /// Positions `advanced..active` must already be in order. `cmp` compares two stream
    /// indices. Returns the strategy that was used.
    pub fn reorder<F>(&mut self, advanced: usize, active: usize, mut cmp: F) -> Strategy
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        let active = active.min(self.order.len());
        let o = &self.order;

        if advanced <= FAST_PATH_MAX_ADVANCED
            && active > 2
            && cmp(o[0], o[2]) != Ordering::Greater
            && cmp(o[1], o[2]) != Ordering::Greater
        {
            if cmp(o[0], o[1]) == Ordering::Greater {
                self.order.swap(0, 1);
            }
            Strategy::PairSwap
        } else if advanced <= FAST_PATH_MAX_ADVANCED && active >= BINARY_INSERTION_MIN_ACTIVE {
            for k in (0..advanced).rev() {
                self.insert_into_tail(k, active, &mut cmp);
            }
            Strategy::BinaryInsertion
        } else {
            self.shell_sort(active, &mut cmp);
            Strategy::ShellSort
        }
    }

    /// Move the entry at `k` into the ordered run `k+1..active`, in front of any equal
    /// entries.
    fn insert_into_tail<F>(&mut self, k: usize, active: usize, cmp: &mut F)
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        let key = self.order[k];
        let offset = self.order[k + 1..active].partition_point(|&other| cmp(other, key) == Ordering::Less);
        let place = k + offset;
        if place > k {
            self.order[k..=place].rotate_left(1);
        }
    }

    fn shell_sort<F>(&mut self, active: usize, cmp: &mut F)
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        for &gap in SHELL_GAPS.iter().rev() {
            if gap > active / 2 {
                continue;
            }
            for i in gap..active {
                let mut j = i;
                while j >= gap && cmp(self.order[j - gap], self.order[j]) == Ordering::Greater {
                    self.order.swap(j - gap, j);
                    j -= gap;
                }
            }
        }
    }
}
