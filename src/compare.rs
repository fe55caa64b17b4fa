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

//! Lexicographic comparison of run-length encoded judgement sequences.

use crate::pushback::Pushback;
use crate::trail::Run;
use std::cmp::Ordering;

/// Compares the grade sequences that two sequences of runs expand to, in
/// lexicographic order. A sequence that is a strict prefix of the other one is
/// smaller.
///
/// Overlapping runs with the same pattern are consumed in a single step, and
/// runs are only split where the two sequences don't line up. When all pairs
/// start with their lower grade, as in a [`Trail`](crate::Trail), each split
/// is followed by a step that decides the comparison or consumes a run, so the
/// number of steps is proportional to the number of runs. Other runs are
/// compared correctly, but a pair starting with its higher grade may be walked
/// one pair at a time.
pub fn compare_runs(
    a: impl IntoIterator<Item = Run>,
    b: impl IntoIterator<Item = Run>,
) -> Ordering {
    let mut a = Pushback::new(a.into_iter().filter(|run| !run.is_empty()));
    let mut b = Pushback::new(b.into_iter().filter(|run| !run.is_empty()));

    loop {
        let (x, y) = match (a.next(), b.next()) {
            (Some(x), Some(y)) => (x, y),
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        };

        if x.same_pattern(&y) {
            let overlap = x.count().min(y.count());
            if x.count() > overlap {
                a.push_back(x.with_count(x.count() - overlap));
            }
            if y.count() > overlap {
                b.push_back(y.with_count(y.count() - overlap));
            }
            continue;
        }

        match x.first_grade().cmp(&y.first_grade()) {
            Ordering::Equal => (),
            ordering => return ordering,
        }
        if let (Run::Pair { high: hx, .. }, Run::Pair { high: hy, .. }) = (x, y) {
            // Same low grade, so the high grades differ.
            return hx.cmp(&hy);
        }

        // One single run against a pair run starting with the same grade: they
        // only agree on their first step.
        skip_first_step(&mut a, x);
        skip_first_step(&mut b, y);
    }
}

/// Pushes back what remains of a run after its first step.
fn skip_first_step<I: Iterator<Item = Run>>(cursor: &mut Pushback<I>, run: Run) {
    match run {
        Run::Single { grade, count } => {
            if count > 1 {
                cursor.push_back(Run::Single {
                    grade,
                    count: count - 1,
                });
            }
        }
        Run::Pair { low, high, count } => {
            if count > 1 {
                cursor.push_back(Run::Pair {
                    low,
                    high,
                    count: count - 1,
                });
            }
            // The high grade of the split pair is pending before the remaining
            // pairs.
            cursor.push_back(Run::Single {
                grade: high,
                count: 1,
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::{all_tallies, naive_judgement, run_length_encode};
    use crate::{Tally, Trail};
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn single(grade: usize, count: u64) -> Run {
        Run::Single { grade, count }
    }

    fn pair(low: usize, high: usize, count: u64) -> Run {
        Run::Pair { low, high, count }
    }

    fn compare_lists(x: &[usize], y: &[usize]) -> Ordering {
        compare_runs(run_length_encode(x), run_length_encode(y))
    }

    #[test]
    fn test_run_length_preserves_order() {
        assert_eq!(compare_lists(&[1, 1, 1, 1, 5], &[1, 1, 1, 1]), Ordering::Greater);
        assert_eq!(compare_lists(&[1, 1, 1, 1, 5], &[1, 1, 1, 1, 4]), Ordering::Greater);
        assert_eq!(compare_lists(&[1, 2, 1, 2, 1], &[1, 2, 2, 1, 2]), Ordering::Less);
        assert_eq!(compare_lists(&[], &[0]), Ordering::Less);
        assert_eq!(compare_lists(&[], &[]), Ordering::Equal);
        assert_eq!(compare_lists(&[3, 3, 2], &[3, 3, 2]), Ordering::Equal);
    }

    #[test]
    fn test_compare_ignores_empty_runs() {
        assert_eq!(
            compare_runs([single(0, 0), single(1, 2)], [single(1, 2), pair(0, 1, 0)]),
            Ordering::Equal
        );
        assert_eq!(compare_runs([single(4, 0)], []), Ordering::Equal);
    }

    #[test]
    fn test_compare_pairs() {
        // Identical pairs with different counts.
        assert_eq!(compare_runs([pair(0, 1, 10)], [pair(0, 1, 9)]), Ordering::Greater);
        // Same low grade, different high grade.
        assert_eq!(compare_runs([pair(0, 2, 10)], [pair(0, 1, 10)]), Ordering::Greater);
        assert_eq!(compare_runs([pair(0, 1, 1)], [pair(1, 2, 1)]), Ordering::Less);
        // Pairs and their expansion are equal.
        assert_eq!(
            compare_runs(
                [pair(0, 1, 3)],
                [single(0, 1), pair(1, 0, 2), single(1, 1)]
            ),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_single_against_pair() {
        // 0 0 0 ... vs 0 1 0 1 ...
        assert_eq!(compare_runs([single(0, 10)], [pair(0, 1, 5)]), Ordering::Less);
        // 1 1 vs 1 0 1 0
        assert_eq!(compare_runs([single(1, 2)], [pair(1, 0, 2)]), Ordering::Greater);
        // 0 vs 0 1: the pending high grade makes the pair greater.
        assert_eq!(compare_runs([single(0, 1)], [pair(0, 1, 1)]), Ordering::Less);
        // 0 1 0 vs 0 1 0 1
        assert_eq!(
            compare_runs([single(0, 1), single(1, 1), single(0, 1)], [pair(0, 1, 2)]),
            Ordering::Less
        );
        // 0 1 0 1 2 vs 0 1 0 1 1
        assert_eq!(
            compare_runs(
                [single(0, 1), pair(1, 0, 1), single(1, 1), single(2, 1)],
                [pair(0, 1, 2), single(1, 1)]
            ),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_matches_lists_exhaustive() {
        let tallies = all_tallies(4, 3);
        let sequences: Vec<Vec<usize>> = tallies.iter().map(|t| naive_judgement(t)).collect();
        let trails: Vec<Trail> = tallies
            .iter()
            .map(|t| Trail::build(&Tally::new(t.clone())))
            .collect();
        for (i, x) in trails.iter().enumerate() {
            for (j, y) in trails.iter().enumerate() {
                assert_eq!(
                    compare_runs(x.runs().iter().copied(), y.runs().iter().copied()),
                    sequences[i].cmp(&sequences[j]),
                    "Mismatch for {:?} vs {:?}: {x} vs {y}",
                    tallies[i],
                    tallies[j]
                );
            }
        }
    }

    #[test]
    fn test_compare_random_lists() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..2000 {
            let mut x: Vec<usize> = [0, 0, 0, 1, 1, 2]
                .choose_multiple(&mut rng, 4)
                .copied()
                .collect();
            let mut y = x.clone();
            y.shuffle(&mut rng);
            x.truncate(rng.gen_range(0..=4));
            assert_eq!(
                compare_lists(&x, &y),
                x.cmp(&y),
                "Mismatch for {x:?} vs {y:?}"
            );
        }
    }
}
