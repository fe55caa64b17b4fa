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

//! Command-line program ranking candidates by majority judgement.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use clap::Parser;
use log::info;
use majority_judgement::parse::{parse_tallies, Candidate};
use majority_judgement::MajorityJudgement;
use rayon::prelude::*;
use std::error::Error;
use std::io::{self, BufRead};
use std::process::ExitCode;

/// Ranks candidates by majority judgement. Tallies are read from the standard
/// input, one candidate per line, formatted as `name: c0 c1 ...` where `ci` is
/// the number of votes for grade `i` (grade 0 being the worst).
#[derive(Parser, Debug, PartialEq, Eq)]
struct Cli {
    /// Print the judgement trail of each candidate.
    #[arg(long)]
    show_trail: bool,

    /// Only print the first candidates of the ranking.
    #[arg(long)]
    top: Option<usize>,

    /// Compute the judgements in parallel based on the rayon crate.
    #[arg(long, action = clap::ArgAction::Set, default_value = "true")]
    parallel: bool,
}

impl Cli {
    /// Reads the tallies from the given input and writes their ranking.
    fn rank(
        &self,
        input: impl BufRead,
        output: &mut impl io::Write,
    ) -> Result<(), Box<dyn Error>> {
        let candidates = parse_tallies(input)?;
        self.run(candidates, output)?;
        Ok(())
    }

    /// Ranks the given candidates based on the command-line parameters.
    fn run(&self, candidates: Vec<Candidate>, output: &mut impl io::Write) -> io::Result<()> {
        let judge = |candidate: Candidate| {
            (candidate.name, MajorityJudgement::new(candidate.tally))
        };
        let mut ranking: Vec<(String, MajorityJudgement)> = if self.parallel {
            candidates.into_par_iter().map(judge).collect()
        } else {
            candidates.into_iter().map(judge).collect()
        };
        info!("Computed the judgements of {} candidates", ranking.len());

        // Best first. The sort is stable, so tied candidates keep the input
        // order.
        ranking.sort_by(|a, b| b.1.cmp(&a.1));

        let mut rank = 0;
        for (i, (name, judgement)) in ranking.iter().enumerate() {
            if self.top.is_some_and(|top| i >= top) {
                break;
            }
            if i == 0 || ranking[i - 1].1 != *judgement {
                rank = i + 1;
            }
            write!(output, "{rank}. {name}")?;
            match judgement.first() {
                Some(grade) => write!(output, " (majority grade {grade})")?,
                None => write!(output, " (no vote)")?,
            }
            if self.show_trail {
                write!(output, ": {}", judgement.trail())?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match cli.rank(io::stdin().lock(), &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
