use std::collections::VecDeque;

use anyhow::Result;

use crate::hash::{encode_sequence, KmerCursor, KmerHasher, DEFAULT_HASH_SEED, MAX_KMER_LENGTH};

pub const DEFAULT_KMER_LENGTH: usize = 19;
pub const DEFAULT_WINDOW_SIZE: usize = 25;

/// One minimizer: the canonical hash of the minimal k-mer in a window and
/// the inclusive span it occupies, always in forward-sequence coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minimizer {
    pub hash: u64,
    pub begin: usize,
    pub end: usize,
}

/// Sketch parameters: k-mer length, window size and the XOR seed applied to
/// both strand hashes before comparison.
#[derive(Debug, Clone, Copy)]
pub struct SketchParams {
    pub k: usize,
    pub w: usize,
    pub seed: u64,
}

impl SketchParams {
    /// Create parameters, requiring 1 <= k <= w and k <= 32.
    pub fn new(k: usize, w: usize) -> Result<Self> {
        if k == 0 || k > MAX_KMER_LENGTH {
            return Err(anyhow::anyhow!(
                "Invalid k-mer length {} (must be 1-{})",
                k,
                MAX_KMER_LENGTH
            ));
        }
        if w < k {
            return Err(anyhow::anyhow!(
                "Window size {} is smaller than k-mer length {}",
                w,
                k
            ));
        }
        Ok(Self {
            k,
            w,
            seed: DEFAULT_HASH_SEED,
        })
    }

    /// Substitute the XOR seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SketchParams {
    fn default() -> Self {
        Self {
            k: DEFAULT_KMER_LENGTH,
            w: DEFAULT_WINDOW_SIZE,
            seed: DEFAULT_HASH_SEED,
        }
    }
}

/// Number of windows over a sequence of length `n`: max(1, n - w + 1).
pub(crate) fn possible_windows(n: usize, w: usize) -> usize {
    if n > w { n - w + 1 } else { 1 }
}

/// Advance the cursor one k-mer and select the canonical strand: the
/// smaller of the two seeded hashes, forward winning ties.
#[inline]
fn canonical_kmer(cursor: &mut KmerCursor, seed: u64) -> Minimizer {
    let (fwd, rc) = cursor.next();
    let begin = cursor.begin();
    let fwd = fwd ^ seed;
    let rc = rc ^ seed;
    Minimizer {
        hash: if fwd <= rc { fwd } else { rc },
        begin,
        end: begin + cursor.k() - 1,
    }
}

/// Scan for the index of the minimal hash, ties going to the earliest
/// position.
fn scan_min(window: &VecDeque<Minimizer>) -> usize {
    let mut min_idx = 0;
    for (i, m) in window.iter().enumerate().skip(1) {
        if m.hash < window[min_idx].hash {
            min_idx = i;
        }
    }
    min_idx
}

/// Run the sliding-window-minimum sweep over `out.len()` consecutive
/// windows starting at window index `first_window`, writing one record per
/// window.
///
/// Amortised cost contract: O(w) auxiliary memory and O(1) amortised work
/// per window. The buffer is rescanned only when the tracked minimum is
/// evicted; a new k-mer that strictly undercuts the minimum replaces it
/// without a rescan.
pub(crate) fn sweep_windows(
    codes: &[u8],
    params: &SketchParams,
    first_window: usize,
    out: &mut [Minimizer],
) {
    if out.is_empty() {
        return;
    }
    let hasher = KmerHasher::new(params.k);
    // K-mers per window; a single window wider than the sequence is clamped
    // to the sequence end
    let window_kmers = params.w.min(codes.len()) - params.k + 1;

    let mut window: VecDeque<Minimizer> = VecDeque::with_capacity(window_kmers);
    let mut cursor = KmerCursor::new(hasher, codes, first_window);

    // First window: hash every k-mer, then one scan for the minimum
    for _ in 0..window_kmers {
        window.push_back(canonical_kmer(&mut cursor, params.seed));
    }
    let mut min_idx = scan_min(&window);
    out[0] = window[min_idx];

    // Each following window evicts the front k-mer and appends the next one
    for slot in out.iter_mut().skip(1) {
        let evicted_min = min_idx == 0;
        window.pop_front();
        let next = canonical_kmer(&mut cursor, params.seed);
        window.push_back(next);
        if evicted_min {
            min_idx = scan_min(&window);
        } else {
            min_idx -= 1;
            if next.hash < window[min_idx].hash {
                min_idx = window.len() - 1;
            }
        }
        *slot = window[min_idx];
    }
}

pub(crate) fn minimizers_of_codes(codes: &[u8], params: &SketchParams) -> Vec<Minimizer> {
    if params.k > codes.len() {
        return Vec::new();
    }
    let possible = possible_windows(codes.len(), params.w);
    let mut out = vec![Minimizer::default(); possible];
    sweep_windows(codes, params, 0, &mut out);
    out
}

/// Compute the minimizer stream of a sequence: one record per window,
/// exactly max(1, N-w+1) records with non-decreasing begin positions.
/// Returns an empty stream when k exceeds the sequence length.
pub fn compute_minimizers(seq: &[u8], params: &SketchParams) -> Vec<Minimizer> {
    minimizers_of_codes(&encode_sequence(seq), params)
}

/// Collapse runs of identical records. Adjacent windows frequently share
/// their minimal k-mer; uniqueness is positional, so consecutive duplicates
/// are dropped rather than using a set.
pub fn collapse_duplicates(stream: &[Minimizer]) -> Vec<Minimizer> {
    let mut unique: Vec<Minimizer> = Vec::new();
    for &m in stream {
        if unique.last() != Some(&m) {
            unique.push(m);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{KmerHasher, RevComp};

    /// Reference canonical hash of every k-mer, recomputed from scratch
    fn brute_canonical(seq: &[u8], k: usize, seed: u64) -> Vec<Minimizer> {
        let codes = encode_sequence(seq);
        let hasher = KmerHasher::new(k);
        let view = RevComp::new(&codes);
        let n = codes.len();
        (0..=(n - k))
            .map(|pos| {
                let fwd = hasher.hash_at(&codes, pos) ^ seed;
                let rc = hasher.hash_view_at(view, n - k - pos) ^ seed;
                Minimizer {
                    hash: if fwd <= rc { fwd } else { rc },
                    begin: pos,
                    end: pos + k - 1,
                }
            })
            .collect()
    }

    /// Reference minimizers: scan each window of the brute canonical stream
    fn brute_minimizers(seq: &[u8], params: &SketchParams) -> Vec<Minimizer> {
        if params.k > seq.len() {
            return Vec::new();
        }
        let kmers = brute_canonical(seq, params.k, params.seed);
        let window_kmers = params.w.min(seq.len()) - params.k + 1;
        let possible = possible_windows(seq.len(), params.w);
        (0..possible)
            .map(|start| {
                *kmers[start..start + window_kmers]
                    .iter()
                    .min_by_key(|m| (m.hash, m.begin))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_record_count_and_span() {
        let seq = b"ACGTGCATTACGAACGTGCATTACGAACGTGCATTACGAA";
        let params = SketchParams::new(5, 9).unwrap();
        let stream = compute_minimizers(seq, &params);

        assert_eq!(stream.len(), seq.len() - 9 + 1);
        for m in &stream {
            assert_eq!(m.end - m.begin + 1, 5);
        }
        // Begin positions are non-decreasing
        for pair in stream.windows(2) {
            assert!(pair[0].begin <= pair[1].begin);
        }
    }

    #[test]
    fn test_kmer_longer_than_sequence() {
        let params = SketchParams::new(20, 25).unwrap();
        assert!(compute_minimizers(b"ACGTACGT", &params).is_empty());
    }

    #[test]
    fn test_window_wider_than_sequence() {
        // One window spanning the whole sequence
        let seq = b"ACGTGCATTACG";
        let params = SketchParams::new(4, 100).unwrap();
        let stream = compute_minimizers(seq, &params);
        assert_eq!(stream.len(), 1);

        let kmers = brute_canonical(seq, 4, params.seed);
        let expected = *kmers.iter().min_by_key(|m| (m.hash, m.begin)).unwrap();
        assert_eq!(stream[0], expected);
    }

    #[test]
    fn test_window_equals_k() {
        // Every window holds exactly one k-mer, so the stream is the plain
        // canonical stream
        let seq = b"ACGTGCATTACGAACG";
        let params = SketchParams::new(6, 6).unwrap();
        let stream = compute_minimizers(seq, &params);
        assert_eq!(stream, brute_canonical(seq, 6, params.seed));
    }

    #[test]
    fn test_against_brute_force_acgt_repeat() {
        let seq = b"ACGTACGTACGT";
        let params = SketchParams::new(4, 6).unwrap();
        let stream = compute_minimizers(seq, &params);
        assert_eq!(stream.len(), 7);
        assert_eq!(stream, brute_minimizers(seq, &params));
    }

    #[test]
    fn test_against_brute_force_mixed() {
        let seq = b"TTGACGTTGCAATGCCGTAACGGTTACGCATTGCAAGGCCTTAAGCGT";
        for (k, w) in [(3, 5), (4, 4), (5, 12), (11, 20), (1, 1), (1, 7)] {
            let params = SketchParams::new(k, w).unwrap();
            assert_eq!(
                compute_minimizers(seq, &params),
                brute_minimizers(seq, &params),
                "k={} w={}",
                k,
                w
            );
        }
    }

    #[test]
    fn test_homopolymer_tie_break() {
        // All k-mer hashes are equal, so every window's minimum is its
        // leftmost k-mer and begins increase strictly
        let seq = [b'A'; 20];
        let params = SketchParams::new(3, 5).unwrap();
        let stream = compute_minimizers(&seq, &params);
        assert_eq!(stream.len(), 16);

        let first_hash = stream[0].hash;
        for (i, m) in stream.iter().enumerate() {
            assert_eq!(m.hash, first_hash);
            assert_eq!(m.begin, i);
        }
    }

    #[test]
    fn test_strand_symmetry() {
        // Sketching the reverse complement yields the same hashes in
        // reverse window order
        let seq = b"TTGACGTTGCAATGCCGTAACGGTTACGCATT";
        let revcomp: Vec<u8> = seq
            .iter()
            .rev()
            .map(|&b| match b {
                b'A' => b'T',
                b'C' => b'G',
                b'G' => b'C',
                _ => b'A',
            })
            .collect();

        let params = SketchParams::new(5, 8).unwrap();
        let fwd_hashes: Vec<u64> = compute_minimizers(seq, &params)
            .iter()
            .map(|m| m.hash)
            .collect();
        let mut rc_hashes: Vec<u64> = compute_minimizers(&revcomp, &params)
            .iter()
            .map(|m| m.hash)
            .collect();
        rc_hashes.reverse();
        assert_eq!(fwd_hashes, rc_hashes);
    }

    #[test]
    fn test_seed_is_substitutable() {
        let seq = b"TTGACGTTGCAATGCCGTAACGGTTACGCATT";
        let params = SketchParams::new(5, 8).unwrap().with_seed(0);
        assert_eq!(params.seed, 0);
        assert_eq!(
            compute_minimizers(seq, &params),
            brute_minimizers(seq, &params)
        );
    }

    #[test]
    fn test_collapse_duplicates() {
        let seq = b"ACGTACGTACGT";
        let params = SketchParams::new(4, 6).unwrap();
        let stream = compute_minimizers(seq, &params);
        let unique = collapse_duplicates(&stream);

        assert!(!unique.is_empty());
        assert!(unique.len() <= stream.len());
        for pair in unique.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        // Every stream record survives into the collapsed set
        for m in &stream {
            assert!(unique.contains(m));
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(SketchParams::new(0, 5).is_err());
        assert!(SketchParams::new(33, 40).is_err());
        assert!(SketchParams::new(10, 9).is_err());
        assert!(SketchParams::new(10, 10).is_ok());
    }
}
