use rayon::prelude::*;

use crate::hash::encode_sequence;
use crate::minimizers::{possible_windows, sweep_windows, Minimizer, SketchParams};

/// Sharded minimizer computation with output bit-identical to
/// `compute_minimizers`.
///
/// The window-start range is divided into `shards` contiguous partitions of
/// `possible / shards` windows, the last absorbing the remainder. Every
/// shard re-derives its rolling-hash state at its first window and runs the
/// full sliding-window sweep into its own disjoint slice of the pre-sized
/// output, so no state is shared beyond the read-only sequence and the
/// seed. A panicking shard propagates and fails the whole computation; no
/// partial result is observable.
pub fn compute_minimizers_parallel(
    seq: &[u8],
    params: &SketchParams,
    threads: usize,
) -> Vec<Minimizer> {
    let codes = encode_sequence(seq);
    if params.k > codes.len() {
        return Vec::new();
    }

    let possible = possible_windows(codes.len(), params.w);
    // Fall back to fewer shards rather than produce empty partitions
    let shards = threads.max(1).min(possible);
    let offset = possible / shards;

    let mut out = vec![Minimizer::default(); possible];

    // Carve the output into one disjoint slice per shard
    let mut slices: Vec<(usize, &mut [Minimizer])> = Vec::with_capacity(shards);
    let mut rest = out.as_mut_slice();
    let mut first_window = 0;
    for shard in 0..shards {
        let len = if shard == shards - 1 {
            rest.len()
        } else {
            offset
        };
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(len);
        slices.push((first_window, chunk));
        first_window += len;
        rest = tail;
    }

    slices
        .into_par_iter()
        .for_each(|(first_window, chunk)| sweep_windows(&codes, params, first_window, chunk));

    out
}
