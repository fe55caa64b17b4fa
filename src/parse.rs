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

//! Module to parse files of candidate tallies.
//!
//! Each line of a tally file contains the name of a candidate followed by a
//! colon and by the number of votes for each grade, from the lowest grade to
//! the highest one:
//!
//! ```text
//! # Vegetable contest
//! apple: 1 3 2
//! banana: 10, 0, 10
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::tally::{Tally, ValidationError};
use log::{info, warn};
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{self, Display};
use std::io::{self, BufRead};

/// Candidate read from a tally file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Name of the candidate.
    pub name: String,
    /// Votes received by the candidate for each grade.
    pub tally: Tally,
}

impl Candidate {
    /// Creates a new candidate.
    pub fn new(name: impl Into<String>, tally: impl Into<Tally>) -> Self {
        Candidate {
            name: name.into(),
            tally: tally.into(),
        }
    }
}

/// Error returned when a tally file cannot be parsed.
#[derive(Debug)]
pub enum ParseError {
    /// The input could not be read.
    Io(io::Error),
    /// The counts on the given line (starting at 1) are invalid.
    Validation {
        /// Line number.
        line: usize,
        /// Invalid count.
        error: ValidationError,
    },
    /// The same candidate appears on multiple lines.
    DuplicateCandidate {
        /// Line number of the repeated candidate.
        line: usize,
        /// Name of the candidate.
        name: String,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "Failed to read tallies: {e}"),
            ParseError::Validation { line, error } => write!(f, "Line {line}: {error}"),
            ParseError::DuplicateCandidate { line, name } => {
                write!(f, "Line {line}: duplicate candidate {name:?}")
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Validation { error, .. } => Some(error),
            ParseError::DuplicateCandidate { .. } => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Parses a tally file into a list of candidates, in the order of the file.
pub fn parse_tallies(input: impl BufRead) -> Result<Vec<Candidate>, ParseError> {
    let re_candidate = Regex::new(r"^\s*([^\s:#][^:#]*?)\s*:([^:]*)$").unwrap();

    let mut names = HashSet::new();
    let mut candidates = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let line_number = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some(cap) = re_candidate.captures(&line) else {
            warn!("Ignored line {line_number}: {line:?}");
            continue;
        };
        let name = cap[1].to_owned();
        let tally = cap[2]
            .parse::<Tally>()
            .map_err(|error| ParseError::Validation {
                line: line_number,
                error,
            })?;
        if !names.insert(name.clone()) {
            return Err(ParseError::DuplicateCandidate {
                line: line_number,
                name,
            });
        }

        info!("Candidate {name}: {:?}", tally.counts());
        candidates.push(Candidate { name, tally });
    }

    info!("Number of candidates: {}", candidates.len());
    Ok(candidates)
}
