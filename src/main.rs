use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sift::{OutputFormat, SketchConfig, DEFAULT_HASH_SEED};

#[derive(Parser)]
#[command(author, version, about = "Canonical minimizer sketching for nucleotide sequences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sketch minimizers for each record in a fastx file or stream
    Sketch {
        /// Path to fastx file (or - for stdin)
        input: String,

        /// K-mer length (1-32)
        #[arg(short = 'k', long = "kmer-length", default_value_t = 19, value_parser = clap::value_parser!(u8).range(1..=32))]
        kmer_length: u8,

        /// Minimizer window size (>= k)
        #[arg(short = 'w', long = "window-size", default_value_t = 25)]
        window_size: u16,

        /// Number of execution threads (0 = auto)
        #[arg(short = 't', long = "threads", default_value_t = 0)]
        threads: usize,

        /// Single-point error budget for survivability estimation
        #[arg(short = 'e', long = "errors")]
        errors: Option<usize>,

        /// Path to output file (- for stdout)
        #[arg(short = 'o', long = "output", default_value = "-")]
        output: String,

        /// Output format
        #[arg(short = 'f', long = "format", default_value = "table", value_parser = ["table", "csv", "json"])]
        format: String,

        /// Suppress progress reporting
        #[arg(short = 'q', long = "quiet", default_value_t = false)]
        quiet: bool,

        /// XOR seed applied to both strand hashes before comparison
        #[arg(short = 's', long = "seed", default_value_t = DEFAULT_HASH_SEED)]
        seed: u64,
    },

    /// Count plain forward k-mer hashes per record (comparison baseline)
    Kmers {
        /// Path to fastx file (or - for stdin)
        input: String,

        /// K-mer length (1-32)
        #[arg(short = 'k', long = "kmer-length", default_value_t = 19, value_parser = clap::value_parser!(u8).range(1..=32))]
        kmer_length: u8,

        /// Path to output file (- for stdout)
        #[arg(short = 'o', long = "output", default_value = "-")]
        output: String,

        /// Suppress progress reporting
        #[arg(short = 'q', long = "quiet", default_value_t = false)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Sketch {
            input,
            kmer_length,
            window_size,
            threads,
            errors,
            output,
            format,
            quiet,
            seed,
        } => {
            let k = *kmer_length as usize;
            let w = *window_size as usize;
            if w < k {
                return Err(anyhow::anyhow!(
                    "Invalid k-w combination: k={}, w={} (window size must be >= k)",
                    k,
                    w
                ));
            }

            // Configure thread pool if specified (non-zero)
            if *threads > 0 {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(*threads)
                    .build_global()
                    .context("Failed to initialize thread pool")?;
            }

            let output_format = match format.as_str() {
                "table" => OutputFormat::Table,
                "csv" => OutputFormat::Csv,
                "json" => OutputFormat::Json,
                _ => unreachable!("clap should have validated the format"),
            };

            let mut config = SketchConfig::new(input.as_str())
                .with_kmer_length(k)
                .with_window_size(w)
                .with_threads(*threads)
                .with_format(output_format)
                .with_quiet(*quiet)
                .with_seed(*seed);
            if let Some(errors) = errors {
                config = config.with_error_budget(*errors);
            }
            if output != "-" {
                config = config.with_output(PathBuf::from(output));
            }

            config.execute().context("Failed to sketch input")?;
        }

        Commands::Kmers {
            input,
            kmer_length,
            output,
            quiet,
        } => {
            let output_path = if output == "-" {
                None
            } else {
                Some(PathBuf::from(output))
            };
            sift::sketch::run_kmers(input, *kmer_length as usize, output_path.as_ref(), *quiet)
                .context("Failed to count k-mers")?;
        }
    }

    Ok(())
}
