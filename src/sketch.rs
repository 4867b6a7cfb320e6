use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use needletail::{parse_fastx_file, parse_fastx_stdin};
use rustc_hash::FxHashSet;

use crate::coverage::reduce_for_errors;
use crate::hash::full_kmer_hashes;
use crate::minimizers::{collapse_duplicates, compute_minimizers, SketchParams};
use crate::parallel::compute_minimizers_parallel;
use crate::report::{
    format_bp, write_report, Parameters, RecordSummary, Report, TimingStats,
};
use crate::SketchConfig;

fn open_fastx(path: &str) -> Result<Box<dyn needletail::FastxReader>> {
    if path == "-" {
        parse_fastx_stdin().context("Failed to read fastx from stdin")
    } else {
        parse_fastx_file(path).with_context(|| format!("Failed to open input file {}", path))
    }
}

fn progress_spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner} {msg}")?,
    );
    spinner.set_message("Sketching: 0 records (0bp)");
    Ok(spinner)
}

/// Sketch every record of a fastx input one at a time and write the report.
pub fn run(config: &SketchConfig) -> Result<()> {
    let start_time = Instant::now();
    let params = SketchParams::new(config.kmer_length, config.window_size)?
        .with_seed(config.seed);
    let threads = if config.threads == 0 {
        rayon::current_num_threads()
    } else {
        config.threads
    };

    if !config.quiet {
        eprintln!(
            "Sift v{}; sketch: k={}, w={}, threads={}",
            env!("CARGO_PKG_VERSION"),
            params.k,
            params.w,
            threads
        );
    }

    let mut reader = open_fastx(&config.input_path)?;

    let spinner = if !config.quiet {
        Some(progress_spinner()?)
    } else {
        None
    };

    let mut records = Vec::new();
    let mut total_bp = 0usize;

    while let Some(record_result) = reader.next() {
        let record = record_result.context("Error reading fastx record")?;
        let seq = record.seq();
        let id = String::from_utf8_lossy(record.id()).to_string();

        let stream = if threads == 1 {
            compute_minimizers(&seq, &params)
        } else {
            compute_minimizers_parallel(&seq, &params, threads)
        };
        let unique = collapse_duplicates(&stream);
        let distinct_hashes: FxHashSet<u64> = unique.iter().map(|m| m.hash).collect();

        let surviving_minimizers = config.error_budget.map(|errors| {
            // Coverage reduction is undefined on an empty set
            if unique.is_empty() {
                0
            } else {
                let begins: Vec<usize> = unique.iter().map(|m| m.begin).collect();
                let ends: Vec<usize> = unique.iter().map(|m| m.end).collect();
                reduce_for_errors(&begins, &ends, errors)
            }
        });

        let density = if seq.is_empty() {
            0.0
        } else {
            unique.len() as f64 / seq.len() as f64
        };

        total_bp += seq.len();
        records.push(RecordSummary {
            id,
            length: seq.len(),
            windows: stream.len(),
            minimizers: unique.len(),
            distinct_hashes: distinct_hashes.len(),
            density,
            surviving_minimizers,
        });

        if let Some(ref spinner) = spinner {
            spinner.set_message(format!(
                "Sketching: {} records ({})",
                records.len(),
                format_bp(total_bp)
            ));
            spinner.tick();
        }
    }

    if let Some(ref spinner) = spinner {
        spinner.finish_and_clear();
    }

    let elapsed = start_time.elapsed();
    let timing = TimingStats {
        seconds: elapsed.as_secs_f64(),
        bp_per_second: total_bp as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
    };

    let report = Report {
        version: env!("CARGO_PKG_VERSION").to_string(),
        parameters: Parameters {
            kmer_length: params.k,
            window_size: params.w,
            threads,
            error_budget: config.error_budget,
        },
        records,
        timing,
    };

    write_report(&report, config.output_path.as_ref(), config.output_format)?;

    if !config.quiet {
        let total_minimizers: usize = report.records.iter().map(|r| r.minimizers).sum();
        eprintln!(
            "Sketched {} record(s) ({}): {} minimizers",
            report.records.len(),
            format_bp(total_bp),
            total_minimizers
        );
        eprintln!("Completed in {:.2?}", elapsed);
    }

    Ok(())
}

/// Count plain forward k-mer hashes per record, without windowing or
/// canonicalisation. Comparison baseline for the sketch.
pub fn run_kmers(
    input_path: &str,
    k: usize,
    output_path: Option<&PathBuf>,
    quiet: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let mut reader = open_fastx(input_path)?;

    let writer: Box<dyn Write> = if let Some(path) = output_path {
        Box::new(BufWriter::new(
            File::create(path).context("Failed to create output file")?,
        ))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    let mut writer = writer;

    let mut seq_count = 0usize;
    let mut total_kmers = 0usize;

    writeln!(writer, "record\tlength_bp\tkmers")?;
    while let Some(record_result) = reader.next() {
        let record = record_result.context("Error reading fastx record")?;
        let seq = record.seq();
        let id = String::from_utf8_lossy(record.id()).to_string();

        let kmers = full_kmer_hashes(&seq, k).len();
        writeln!(writer, "{}\t{}\t{}", id, seq.len(), kmers)?;

        seq_count += 1;
        total_kmers += kmers;
    }
    writer.flush()?;

    if !quiet {
        eprintln!(
            "Hashed {} {}-mers from {} record(s) in {:.2?}",
            total_kmers,
            k,
            seq_count,
            start_time.elapsed()
        );
    }

    Ok(())
}
