// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Run-length encoded judgement sequences, and their computation from a tally.
//!
//! The judgement sequence of a tally is obtained by repeatedly removing one
//! vote from the current lower median grade. Rather than removing votes one by
//! one, each round of [`Trail::build`] removes the largest batch of votes that
//! keeps the same median, so that the number of rounds doesn't depend on the
//! number of votes.

use crate::compare::compare_runs;
use crate::tally::Tally;
use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt::{self, Display};

/// A run of consecutive steps in a judgement sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Run {
    /// `count` consecutive steps all selecting `grade`.
    Single {
        /// Selected grade.
        grade: usize,
        /// Number of steps.
        count: u64,
    },
    /// `count` consecutive pairs of steps, each pair selecting `low` and then
    /// `high`. This happens when the remaining votes split exactly in half
    /// between two grades.
    Pair {
        /// Grade selected first in each pair.
        low: usize,
        /// Grade selected second in each pair.
        high: usize,
        /// Number of pairs.
        count: u64,
    },
}

impl Run {
    /// Returns the number of repetitions of this run's pattern.
    #[inline(always)]
    pub fn count(&self) -> u64 {
        match *self {
            Run::Single { count, .. } | Run::Pair { count, .. } => count,
        }
    }

    /// Returns the number of steps in this run, i.e. the number of grades it
    /// expands to.
    pub fn len(&self) -> u128 {
        match *self {
            Run::Single { count, .. } => u128::from(count),
            Run::Pair { count, .. } => 2 * u128::from(count),
        }
    }

    /// Whether this run expands to no grade at all.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns the first grade of this run.
    #[inline(always)]
    pub fn first_grade(&self) -> usize {
        match *self {
            Run::Single { grade, .. } => grade,
            Run::Pair { low, .. } => low,
        }
    }

    /// Returns the grade at the given step of this run. The index must be
    /// smaller than [`Run::len()`].
    pub fn grade_at(&self, index: u128) -> usize {
        match *self {
            Run::Single { grade, .. } => grade,
            Run::Pair { low, high, .. } => {
                if index % 2 == 0 {
                    low
                } else {
                    high
                }
            }
        }
    }

    /// Whether the given grade appears in this run.
    pub fn contains(&self, grade: usize) -> bool {
        !self.is_empty()
            && match *self {
                Run::Single { grade: g, .. } => g == grade,
                Run::Pair { low, high, .. } => low == grade || high == grade,
            }
    }

    /// Returns the grades this run expands to, in order.
    pub fn grades(self) -> impl DoubleEndedIterator<Item = usize> {
        (0..self.len()).map(move |i| self.grade_at(i))
    }

    /// Whether both runs repeat the same pattern of grades, regardless of
    /// their counts.
    pub fn same_pattern(&self, other: &Run) -> bool {
        match (*self, *other) {
            (Run::Single { grade: a, .. }, Run::Single { grade: b, .. }) => a == b,
            (
                Run::Pair {
                    low: la, high: ha, ..
                },
                Run::Pair {
                    low: lb, high: hb, ..
                },
            ) => la == lb && ha == hb,
            _ => false,
        }
    }

    /// Returns the same pattern of grades, repeated `count` times.
    pub fn with_count(self, count: u64) -> Run {
        match self {
            Run::Single { grade, .. } => Run::Single { grade, count },
            Run::Pair { low, high, .. } => Run::Pair { low, high, count },
        }
    }
}

impl Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Run::Single { grade, count: 1 } => write!(f, "{grade}"),
            Run::Single { grade, count } => write!(f, "{grade}x{count}"),
            Run::Pair {
                low,
                high,
                count: 1,
            } => write!(f, "({low} {high})"),
            Run::Pair { low, high, count } => write!(f, "({low} {high})x{count}"),
        }
    }
}

/// Run-length encoded judgement sequence.
///
/// Trails are compared as the sequences of grades they expand to, in
/// lexicographic order, so two trails with different runs can be equal.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    /// Non-empty runs, with pairs starting with their lower grade. Two
    /// consecutive runs repeat the same pattern only if the first one has the
    /// maximal count.
    runs: Vec<Run>,
}

impl Trail {
    /// Computes the judgement trail of the given tally.
    pub fn build(tally: &Tally) -> Self {
        let mut builder = TrailBuilder::new(tally.counts());
        while builder.round() {}
        debug!(
            "Built a trail of {} runs in {} rounds, for {} votes over {} grades",
            builder.trail.runs.len(),
            builder.rounds,
            tally.total(),
            tally.num_grades()
        );
        builder.trail
    }

    /// Creates a trail from arbitrary runs. Empty runs are dropped,
    /// consecutive runs with the same pattern are merged, and pairs repeating
    /// the same grade become single runs. Pairs starting with their higher
    /// grade are shifted by one step, e.g. `(1 0)x3` becomes `1 (0 1)x2 0`.
    pub fn from_runs(runs: impl IntoIterator<Item = Run>) -> Self {
        let mut trail = Trail::default();
        for run in runs {
            trail.push(run);
        }
        trail
    }

    /// Returns the runs of this trail.
    #[inline(always)]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Returns the number of runs in this trail.
    pub fn num_runs(&self) -> usize {
        self.runs.len()
    }

    /// Returns the number of grades this trail expands to.
    pub fn len(&self) -> u128 {
        self.runs.iter().map(Run::len).sum()
    }

    /// Whether this trail expands to no grade at all.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Returns the grades this trail expands to, in order.
    pub fn grades(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.runs.iter().flat_map(|run| run.grades())
    }

    /// Appends a run, merging it into the last run if they repeat the same
    /// pattern.
    fn push(&mut self, run: Run) {
        match run {
            _ if run.is_empty() => (),
            Run::Pair { low, high, count } if low == high => {
                let run = Run::Single { grade: low, count };
                self.push_merged(run);
                self.push_merged(run);
            }
            Run::Pair { low, high, count } if low > high => {
                self.push_merged(Run::Single {
                    grade: low,
                    count: 1,
                });
                self.push_merged(Run::Pair {
                    low: high,
                    high: low,
                    count: count - 1,
                });
                self.push_merged(Run::Single {
                    grade: high,
                    count: 1,
                });
            }
            _ => self.push_merged(run),
        }
    }

    /// Appends a run as is, merging as many steps as fit into the last run.
    fn push_merged(&mut self, mut run: Run) {
        if run.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.same_pattern(&run) {
                let merged = last.count().saturating_add(run.count());
                let rest = run.count() - (merged - last.count());
                *last = last.with_count(merged);
                if rest == 0 {
                    return;
                }
                run = run.with_count(rest);
            }
        }
        self.runs.push(run);
    }
}

impl PartialEq for Trail {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Trail {}

impl PartialOrd for Trail {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Trail {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_runs(self.runs.iter().copied(), other.runs.iter().copied())
    }
}

impl Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.runs.is_empty() {
            return f.write_str("-");
        }
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{run}")?;
        }
        Ok(())
    }
}

/// Working state while computing a trail.
struct TrailBuilder {
    /// Votes not consumed yet. The last grade, if any, always has votes.
    votes: Vec<u64>,
    /// Sum of the remaining votes, which may not fit in a single count.
    remaining: u128,
    /// Number of rounds run so far.
    rounds: usize,
    /// Trail computed so far.
    trail: Trail,
}

impl TrailBuilder {
    fn new(counts: &[u64]) -> Self {
        let mut builder = TrailBuilder {
            votes: counts.to_vec(),
            remaining: counts.iter().copied().map(u128::from).sum(),
            rounds: 0,
            trail: Trail::default(),
        };
        builder.trim();
        builder
    }

    /// Consumes the next batch of votes. Returns false once no vote remains.
    fn round(&mut self) -> bool {
        debug_assert_eq!(
            self.votes.iter().copied().map(u128::from).sum::<u128>(),
            self.remaining
        );
        let Some((grade, preceding)) = self.lower_median() else {
            return false;
        };
        self.rounds += 1;

        let cumulative = preceding + u128::from(self.votes[grade]);
        let run = if cumulative == self.remaining - cumulative {
            // The remaining votes split exactly in half: the judgement then
            // alternates between this grade and the next one with votes.
            match self.next_grade_with_votes(grade) {
                Some(next) => self.pair_round(grade, next, preceding),
                None => self.single_round(grade, preceding),
            }
        } else {
            self.single_round(grade, preceding)
        };

        trace!(
            "Round {}: {run}, {} votes remaining over {} grades",
            self.rounds,
            self.remaining,
            self.votes.len()
        );
        self.trail.push(run);
        self.trim();
        true
    }

    /// Returns the lower median grade of the remaining votes, together with
    /// the number of votes for lower grades.
    fn lower_median(&self) -> Option<(usize, u128)> {
        let mut preceding = 0;
        for (grade, &count) in self.votes.iter().enumerate() {
            let cumulative = preceding + u128::from(count);
            if cumulative >= self.remaining - cumulative {
                return Some((grade, preceding));
            }
            preceding = cumulative;
        }
        None
    }

    fn next_grade_with_votes(&self, grade: usize) -> Option<usize> {
        self.votes[grade + 1..]
            .iter()
            .position(|&count| count > 0)
            .map(|offset| grade + 1 + offset)
    }

    /// Consumes votes for the given median grade, as long as it remains the
    /// median.
    fn single_round(&mut self, grade: usize, preceding: u128) -> Run {
        let votes = self.votes[grade];
        let batch = batch_size(preceding, u128::from(votes), self.remaining);
        let count = narrow(batch, votes);
        self.votes[grade] -= count;
        self.remaining -= u128::from(count);
        Run::Single { grade, count }
    }

    /// Consumes pairs of votes for two tied median grades, as long as they
    /// remain tied.
    fn pair_round(&mut self, low: usize, high: usize, preceding: u128) -> Run {
        let batch = batch_size(
            preceding,
            u128::from(self.votes[low]) + u128::from(self.votes[high]),
            self.remaining,
        );
        let count = narrow(batch / 2, self.votes[low].min(self.votes[high]));
        if count == 0 {
            return self.single_round(low, preceding);
        }
        self.votes[low] -= count;
        self.votes[high] -= count;
        self.remaining -= 2 * u128::from(count);
        Run::Pair { low, high, count }
    }

    /// Drops trailing grades without votes.
    fn trim(&mut self) {
        while self.votes.last() == Some(&0) {
            self.votes.pop();
        }
    }
}

/// Returns the maximal number of votes that can be consumed from a median block
/// of `count` votes preceded by `preceding` votes, out of `total` remaining
/// votes, before the lower median leaves the block.
///
/// Requires `2 * preceding < total <= 2 * (preceding + count)`.
fn batch_size(preceding: u128, count: u128, total: u128) -> u128 {
    let cumulative = preceding + count;
    let below = (total - preceding) - preceding - 1;
    let above = cumulative - (total - cumulative);
    1 + below.min(above)
}

/// Converts a batch back to a vote count. The batch never exceeds the votes
/// it is taken from, given as `bound`.
fn narrow(batch: u128, bound: u64) -> u64 {
    u64::try_from(batch).map_or(bound, |batch| batch.min(bound))
}
