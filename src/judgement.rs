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

//! The majority judgement of a candidate, ordered by its judgement sequence.

use crate::tally::{Tally, ValidationError};
use crate::trail::Trail;
use num::{FromPrimitive, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::num::NonZeroU128;
use std::ops::Range;

/// Majority judgement of a candidate, computed from the tally of grades it
/// received.
///
/// Values are ordered as their judgement sequences, i.e. the grades obtained
/// by repeatedly removing one vote from the lower median grade, compared in
/// lexicographic order. The best candidate is therefore the maximum.
///
/// The judgement trail is computed once at construction, after which the
/// value is immutable: it behaves like a frozen list of grades, which can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct MajorityJudgement {
    /// Tally this judgement was computed from.
    tally: Tally,
    /// Run-length encoded judgement sequence.
    trail: Trail,
}

impl MajorityJudgement {
    /// Computes the majority judgement of the given tally.
    pub fn new(tally: impl Into<Tally>) -> Self {
        let tally = tally.into();
        let trail = Trail::build(&tally);
        MajorityJudgement { tally, trail }
    }

    /// Validates the given values as vote counts (see
    /// [`Tally::try_from_values()`]) and computes their majority judgement.
    pub fn try_from_values<T>(values: impl IntoIterator<Item = T>) -> Result<Self, ValidationError>
    where
        T: ToPrimitive + FromPrimitive + Zero + PartialOrd,
    {
        Ok(Self::new(Tally::try_from_values(values)?))
    }

    /// Returns the tally this judgement was computed from.
    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Returns the run-length encoded judgement sequence.
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Returns the number of grades in the judgement sequence, i.e. the
    /// number of votes.
    ///
    /// Positions in the judgement sequence are `u128`, as the number of votes
    /// may not fit in a single count.
    pub fn len(&self) -> u128 {
        self.trail.len()
    }

    /// Whether the candidate received no vote.
    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    /// Returns the majority grade, i.e. the first grade of the judgement
    /// sequence.
    pub fn first(&self) -> Option<usize> {
        self.trail.runs().first().map(|run| run.first_grade())
    }

    /// Iterates over the judgement sequence. Use [`Iterator::rev()`] to
    /// iterate from the last grade.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.trail.grades()
    }

    /// Returns the grade at the given position of the judgement sequence.
    pub fn get(&self, mut index: u128) -> Option<usize> {
        for run in self.trail.runs() {
            if index < run.len() {
                return Some(run.grade_at(index));
            }
            index -= run.len();
        }
        None
    }

    /// Returns the grade at the given position counted from the end of the
    /// judgement sequence, `1` being the last grade.
    pub fn get_from_end(&self, index: u128) -> Option<usize> {
        if index == 0 {
            return None;
        }
        self.get(self.len().checked_sub(index)?)
    }

    /// Returns the grades at positions `range.start`, `range.start + step`,
    /// etc. below `range.end` in the judgement sequence.
    pub fn slice(&self, range: Range<u128>, step: NonZeroU128) -> Vec<usize> {
        let mut grades = Vec::new();
        let mut index = range.start;
        // Position of the first step of the current run.
        let mut offset = 0;
        for run in self.trail.runs() {
            if index >= range.end {
                break;
            }
            let run_end = offset + run.len();
            while index < run_end && index < range.end {
                grades.push(run.grade_at(index - offset));
                index = match index.checked_add(step.get()) {
                    Some(next) => next,
                    None => return grades,
                };
            }
            offset = run_end;
        }
        grades
    }

    /// Whether the given grade appears in the judgement sequence.
    pub fn contains(&self, grade: usize) -> bool {
        self.trail.runs().iter().any(|run| run.contains(grade))
    }
}

impl From<Tally> for MajorityJudgement {
    fn from(tally: Tally) -> Self {
        MajorityJudgement::new(tally)
    }
}

impl PartialEq for MajorityJudgement {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MajorityJudgement {}

impl PartialOrd for MajorityJudgement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MajorityJudgement {
    fn cmp(&self, other: &Self) -> Ordering {
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        self.trail.cmp(&other.trail)
    }
}

impl Display for MajorityJudgement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} => {}", self.tally.counts(), self.trail)
    }
}
