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

//! Tallies of grades, and validation of the counts they are built from.

use num::{FromPrimitive, ToPrimitive, Zero};
use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Error returned when a value cannot be used as a vote count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The count for a grade is negative.
    NegativeCount {
        /// Grade whose count is invalid.
        grade: usize,
    },
    /// The count for a grade is not an integer, or doesn't fit in a vote count.
    NonIntegerCount {
        /// Grade whose count is invalid.
        grade: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::NegativeCount { grade } => {
                write!(f, "Negative vote count for grade {grade}")
            }
            ValidationError::NonIntegerCount { grade } => {
                write!(f, "Vote count for grade {grade} is not an integer")
            }
        }
    }
}

impl Error for ValidationError {}

/// Number of votes received by a candidate for each grade, from the lowest
/// grade (index 0) to the highest one.
///
/// Grades without any vote are allowed anywhere, including at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<u64>,
}

impl Tally {
    /// Creates a tally from vote counts, which are valid by construction.
    pub fn new(counts: impl Into<Vec<u64>>) -> Self {
        Tally {
            counts: counts.into(),
        }
    }

    /// Creates a tally from arbitrary numeric values, checking that each of
    /// them is a non-negative integer.
    ///
    /// Any primitive number or numeric type of the [`num`] crate can be used.
    /// The first invalid value determines the returned error.
    pub fn try_from_values<T>(values: impl IntoIterator<Item = T>) -> Result<Self, ValidationError>
    where
        T: ToPrimitive + FromPrimitive + Zero + PartialOrd,
    {
        let counts = values
            .into_iter()
            .enumerate()
            .map(|(grade, value)| validate_count(grade, &value))
            .collect::<Result<Vec<u64>, _>>()?;
        Ok(Tally { counts })
    }

    /// Returns the vote counts, indexed by grade.
    #[inline(always)]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Returns the number of grades in this tally, including grades without
    /// votes.
    #[inline(always)]
    pub fn num_grades(&self) -> usize {
        self.counts.len()
    }

    /// Returns the number of votes for the given grade. Grades beyond the end
    /// of the tally have no votes.
    pub fn count(&self, grade: usize) -> u64 {
        self.counts.get(grade).copied().unwrap_or(0)
    }

    /// Returns the total number of votes, which may not fit in a single
    /// count.
    pub fn total(&self) -> u128 {
        self.counts.iter().copied().map(u128::from).sum()
    }
}

impl From<Vec<u64>> for Tally {
    fn from(counts: Vec<u64>) -> Self {
        Tally::new(counts)
    }
}

impl From<&[u64]> for Tally {
    fn from(counts: &[u64]) -> Self {
        Tally::new(counts)
    }
}

impl<const N: usize> From<[u64; N]> for Tally {
    fn from(counts: [u64; N]) -> Self {
        Tally::new(counts)
    }
}

/// Parses a list of counts separated by whitespace and/or commas, such as
/// `"1 3 2"` or `"1, 3, 2"`.
impl FromStr for Tally {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let counts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .enumerate()
            .map(|(grade, token)| parse_count(grade, token))
            .collect::<Result<Vec<u64>, _>>()?;
        Ok(Tally { counts })
    }
}

fn validate_count<T>(grade: usize, value: &T) -> Result<u64, ValidationError>
where
    T: ToPrimitive + FromPrimitive + Zero + PartialOrd,
{
    if *value < T::zero() {
        return Err(ValidationError::NegativeCount { grade });
    }
    // Conversion to u64 truncates floats and ratios, so the count must convert
    // back to the exact same value. NaN and infinities don't convert at all.
    let count = value
        .to_u64()
        .ok_or(ValidationError::NonIntegerCount { grade })?;
    match T::from_u64(count) {
        Some(exact) if exact == *value => Ok(count),
        _ => Err(ValidationError::NonIntegerCount { grade }),
    }
}

fn parse_count(grade: usize, token: &str) -> Result<u64, ValidationError> {
    if let Ok(count) = token.parse::<u64>() {
        return Ok(count);
    }
    match token.parse::<f64>() {
        Ok(value) => validate_count(grade, &value),
        Err(_) => Err(ValidationError::NonIntegerCount { grade }),
    }
}
