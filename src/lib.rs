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

//! Majority judgement, a voting method proposed by Michel Balinski and Rida
//! Laraki in "A theory of measuring, electing, and ranking".
//!
//! Voters assign a grade to each candidate. Grades are ordinal values, numbered
//! from 0 (the worst grade) upwards. A candidate is described by its tally,
//! i.e. the number of votes it received for each grade.
//!
//! The judgement sequence of a candidate is obtained by repeatedly removing
//! one vote from the lower median grade of its remaining votes. For example,
//! the grades `Bad, OK, OK, Good` yield the sequence `OK, Bad, OK, Good`.
//! Candidates are ordered by comparing their judgement sequences in
//! lexicographic order, and the winner is the maximum.
//!
//! ```
//! use majority_judgement::MajorityJudgement;
//!
//! let apple = MajorityJudgement::new([1, 3, 2]);
//! let banana = MajorityJudgement::new([10, 0, 10]);
//! assert!(apple > banana);
//! assert_eq!(apple.first(), Some(1));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod compare;
pub mod judgement;
pub mod parse;
pub mod pushback;
pub mod tally;
pub mod trail;
#[cfg(test)]
mod util;

pub use judgement::MajorityJudgement;
pub use tally::{Tally, ValidationError};
pub use trail::{Run, Trail};
