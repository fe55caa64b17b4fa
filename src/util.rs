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

//! Test helpers shared across modules.

use crate::trail::Run;

/// Reference judgement sequence, obtained by removing one vote at a time from
/// the lower median grade.
pub fn naive_judgement(counts: &[u64]) -> Vec<usize> {
    let mut counts = counts.to_vec();
    let mut remaining: u64 = counts.iter().sum();
    let mut result = Vec::new();
    while remaining > 0 {
        let mut cumulative = 0;
        for (grade, count) in counts.iter_mut().enumerate() {
            cumulative += *count;
            if 2 * cumulative >= remaining {
                *count -= 1;
                remaining -= 1;
                result.push(grade);
                break;
            }
        }
    }
    result
}

/// Returns all the tallies with at most `max_grades` grades, each having at
/// most `max_count` votes.
pub fn all_tallies(max_grades: usize, max_count: u64) -> Vec<Vec<u64>> {
    let mut result = vec![vec![]];
    let mut last = vec![vec![]];
    for _ in 0..max_grades {
        last = last
            .iter()
            .flat_map(|prefix: &Vec<u64>| {
                (0..=max_count).map(move |count| {
                    let mut tally = prefix.clone();
                    tally.push(count);
                    tally
                })
            })
            .collect();
        result.extend(last.iter().cloned());
    }
    result
}

/// Counts the maximal runs of equal grades.
pub fn count_runs(grades: &[usize]) -> usize {
    run_length_encode(grades).len()
}

/// Run-length encodes a list of grades into single runs.
pub fn run_length_encode(grades: &[usize]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for &grade in grades {
        match runs.last_mut() {
            Some(Run::Single { grade: g, count }) if *g == grade => *count += 1,
            _ => runs.push(Run::Single { grade, count: 1 }),
        }
    }
    runs
}

pub mod log_tester {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::cell::{Cell, RefCell};

    thread_local! {
        static CAPTURING: Cell<bool> = const { Cell::new(false) };
        static RECORDS: RefCell<Vec<(Level, String, String)>> = const { RefCell::new(Vec::new()) };
    }

    /// Captures the logs emitted on the current thread, until dropped.
    pub struct LogCapture;

    impl LogCapture {
        pub fn start() -> Self {
            // Only the first call installs the logger, which is fine.
            let _ = log::set_logger(&CaptureLogger);
            log::set_max_level(LevelFilter::Trace);
            let was_capturing = CAPTURING.replace(true);
            assert!(!was_capturing, "Logs are already captured on this thread");
            LogCapture
        }

        /// Checks that the logs captured for the given target are exactly the
        /// expected ones.
        #[track_caller]
        pub fn check_target_logs<'a>(
            self,
            target: &str,
            expected: impl IntoIterator<Item = (Level, &'a str)>,
        ) {
            let actual: Vec<(Level, String)> = RECORDS.with_borrow(|records| {
                records
                    .iter()
                    .filter(|(_, t, _)| t == target)
                    .map(|(level, _, message)| (*level, message.clone()))
                    .collect()
            });
            let expected: Vec<(Level, String)> = expected
                .into_iter()
                .map(|(level, message)| (level, message.to_owned()))
                .collect();
            assert_eq!(actual, expected);
        }
    }

    impl Drop for LogCapture {
        fn drop(&mut self) {
            CAPTURING.set(false);
            RECORDS.with_borrow_mut(Vec::clear);
        }
    }

    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            CAPTURING.get()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                RECORDS.with_borrow_mut(|records| {
                    records.push((
                        record.level(),
                        record.target().to_owned(),
                        record.args().to_string(),
                    ))
                });
            }
        }

        fn flush(&self) {}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_naive_judgement() {
        assert_eq!(naive_judgement(&[]), Vec::<usize>::new());
        assert_eq!(naive_judgement(&[1, 1, 1, 1]), vec![1, 2, 0, 3]);
        assert_eq!(naive_judgement(&[1, 3, 2]), vec![1, 1, 1, 2, 0, 2]);
        assert_eq!(naive_judgement(&[0, 2]), vec![1, 1]);
    }

    #[test]
    fn test_all_tallies() {
        let tallies = all_tallies(2, 1);
        assert_eq!(
            tallies,
            vec![
                vec![],
                vec![0],
                vec![1],
                vec![0, 0],
                vec![0, 1],
                vec![1, 0],
                vec![1, 1]
            ]
        );
        assert_eq!(all_tallies(4, 3).len(), 1 + 4 + 16 + 64 + 256);
    }

    #[test]
    fn test_run_length_encode() {
        assert_eq!(
            run_length_encode(&[1, 1, 2, 1]),
            vec![
                Run::Single { grade: 1, count: 2 },
                Run::Single { grade: 2, count: 1 },
                Run::Single { grade: 1, count: 1 },
            ]
        );
        assert_eq!(count_runs(&[1, 1, 2, 1]), 3);
        assert_eq!(count_runs(&[]), 0);
    }
}
