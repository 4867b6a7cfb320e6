use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A maximal run of sequence positions covered by the same number of
/// minimizer intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageInterval {
    pub begin: usize,
    pub end: usize,
    pub count: usize,
}

/// Sweep the deduplicated minimizer begin/end arrays and report how many
/// intervals cover each position: +1 at every begin, -1 one past every
/// inclusive end, one interval per maximal run of constant non-zero
/// coverage. Events landing on the same coordinate collapse into a single
/// transition.
///
/// Input arrays must be the same length and non-empty; callers guard the
/// empty case.
pub fn coverage_intervals(begins: &[usize], ends: &[usize]) -> Vec<CoverageInterval> {
    debug_assert_eq!(begins.len(), ends.len());
    debug_assert!(!begins.is_empty());

    let mut transitions: BTreeMap<usize, isize> = BTreeMap::new();
    for (&begin, &end) in begins.iter().zip(ends) {
        *transitions.entry(begin).or_insert(0) += 1;
        *transitions.entry(end + 1).or_insert(0) -= 1;
    }

    let mut intervals = Vec::new();
    let mut count: isize = 0;
    let mut run_start = 0;
    // Net-zero coordinates are no transition at all and must not split a run
    for (coord, delta) in transitions.into_iter().filter(|&(_, delta)| delta != 0) {
        if count > 0 {
            intervals.push(CoverageInterval {
                begin: run_start,
                end: coord - 1,
                count: count as usize,
            });
        }
        count += delta;
        run_start = coord;
    }
    intervals
}

/// Worst-case number of minimizers surviving `errors` single-point errors,
/// assuming each error lands in the densest remaining coverage interval and
/// destroys every minimizer touching it.
///
/// Each iteration recomputes coverage over the current set, accumulates the
/// maximum coverage count (ties to the earliest interval) into the
/// destroyed total, and removes every minimizer whose begin or end falls
/// inside that interval. Removal happens on every iteration including the
/// last; the working set is discarded afterwards, so this is equivalent to
/// skipping the final removal. Returns `available - destroyed`, floored at
/// zero.
pub fn reduce_for_errors(begins: &[usize], ends: &[usize], errors: usize) -> usize {
    debug_assert_eq!(begins.len(), ends.len());
    let available = begins.len();
    let mut destroyed = 0usize;

    let mut intervals: Vec<(usize, usize)> = begins
        .iter()
        .copied()
        .zip(ends.iter().copied())
        .collect();

    for _ in 0..errors {
        if intervals.is_empty() {
            break;
        }
        let (current_begins, current_ends): (Vec<usize>, Vec<usize>) =
            intervals.iter().copied().unzip();
        let coverage = coverage_intervals(&current_begins, &current_ends);

        let mut densest = coverage[0];
        for interval in &coverage[1..] {
            if interval.count > densest.count {
                densest = *interval;
            }
        }
        destroyed += densest.count;

        intervals.retain(|&(begin, end)| {
            let begin_inside = begin >= densest.begin && begin <= densest.end;
            let end_inside = end >= densest.begin && end <= densest.end;
            !(begin_inside || end_inside)
        });
    }

    available.saturating_sub(destroyed)
}
