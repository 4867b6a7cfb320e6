//! # Sift
//!
//! Canonical (w,k)-minimizer sketching for nucleotide sequences in FASTA or
//! FASTQ format: an incremental rolling hash over both strands, a sliding
//! window minimum with amortised O(1) upkeep, optional sharded computation
//! with bit-identical output, and a coverage-based estimate of sketch
//! robustness under an error budget.
//!
//! This crate provides both a library and a binary.
//!
#![doc = include_str!("../README.md")]

pub mod coverage;
pub mod hash;
pub mod minimizers;
pub mod parallel;
pub mod report;
pub mod sketch;

// Re-export the important structures and functions for library users
pub use coverage::{coverage_intervals, reduce_for_errors, CoverageInterval};
pub use hash::{full_kmer_hashes, DEFAULT_HASH_SEED, MAX_KMER_LENGTH};
pub use minimizers::{
    collapse_duplicates, compute_minimizers, Minimizer, SketchParams, DEFAULT_KMER_LENGTH,
    DEFAULT_WINDOW_SIZE,
};
pub use parallel::compute_minimizers_parallel;
pub use report::{OutputFormat, Parameters, RecordSummary, Report, TimingStats};
pub use sketch::run as run_sketch;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Configuration for sketching operations
pub struct SketchConfig {
    /// Path to input fastx file (or - for stdin)
    pub input_path: String,

    /// K-mer length
    pub kmer_length: usize,

    /// Minimizer window size
    pub window_size: usize,

    /// Number of execution threads (0 = auto)
    pub threads: usize,

    /// Optional single-point error budget for survivability estimation
    pub error_budget: Option<usize>,

    /// Path to output file (None for stdout)
    pub output_path: Option<PathBuf>,

    /// Output format
    pub output_format: OutputFormat,

    /// Suppress progress reporting
    pub quiet: bool,

    /// XOR seed applied to both strand hashes before comparison
    pub seed: u64,
}

impl SketchConfig {
    /// Create a new sketch configuration for the given input path
    pub fn new<S: Into<String>>(input_path: S) -> Self {
        Self {
            input_path: input_path.into(),
            kmer_length: DEFAULT_KMER_LENGTH,
            window_size: DEFAULT_WINDOW_SIZE,
            threads: 0,
            error_budget: None,
            output_path: None,
            output_format: OutputFormat::Table,
            quiet: false,
            seed: DEFAULT_HASH_SEED,
        }
    }

    /// Set k-mer length
    pub fn with_kmer_length(mut self, kmer_length: usize) -> Self {
        self.kmer_length = kmer_length;
        self
    }

    /// Set window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the num threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the error budget
    pub fn with_error_budget(mut self, error_budget: usize) -> Self {
        self.error_budget = Some(error_budget);
        self
    }

    /// Set output path
    pub fn with_output<P: AsRef<Path>>(mut self, output_path: P) -> Self {
        self.output_path = Some(output_path.as_ref().to_path_buf());
        self
    }

    /// Set output format
    pub fn with_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Set quiet mode
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the hash seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Execute the sketching operation with this configuration
    pub fn execute(&self) -> Result<()> {
        sketch::run(self)
    }
}
