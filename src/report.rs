use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    pub kmer_length: usize,
    pub window_size: usize,
    pub threads: usize,
    pub error_budget: Option<usize>,
}

/// Per-record sketch summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: String,
    pub length: usize,
    pub windows: usize,
    pub minimizers: usize,
    pub distinct_hashes: usize,
    pub density: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surviving_minimizers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingStats {
    pub seconds: f64,
    pub bp_per_second: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub version: String,
    pub parameters: Parameters,
    pub records: Vec<RecordSummary>,
    pub timing: TimingStats,
}

pub fn write_report(
    report: &Report,
    output_path: Option<&PathBuf>,
    output_format: OutputFormat,
) -> Result<()> {
    let writer: Box<dyn Write> = if let Some(path) = output_path {
        Box::new(BufWriter::new(File::create(path)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    let mut writer = writer;

    match output_format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            writeln!(
                writer,
                "record,length_bp,windows,minimizers,distinct_hashes,density,surviving_minimizers"
            )?;
            for record in &report.records {
                writeln!(
                    writer,
                    "{},{},{},{},{},{:.6},{}",
                    record.id,
                    record.length,
                    record.windows,
                    record.minimizers,
                    record.distinct_hashes,
                    record.density,
                    record
                        .surviving_minimizers
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                )?;
            }
        }
        OutputFormat::Table => {
            writeln!(writer)?;
            writeln!(
                writer,
                "{:<30} | {:>10} | {:>10} | {:>10} | {:>10} | {:>10}",
                "Record", "Length", "Windows", "Minimizers", "Density", "Surviving"
            )?;
            writeln!(writer, "{}", "-".repeat(96))?;
            for record in &report.records {
                writeln!(
                    writer,
                    "{:<30} | {:>10} | {:>10} | {:>10} | {:>10.4} | {:>10}",
                    truncate_string(&record.id, 30),
                    format_bp(record.length),
                    record.windows,
                    record.minimizers,
                    record.density,
                    record
                        .surviving_minimizers
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

pub(crate) fn format_bp(bp: usize) -> String {
    if bp >= 1_000_000_000 {
        format!("{:.1}Gbp", bp as f64 / 1_000_000_000.0)
    } else if bp >= 1_000_000 {
        format!("{:.1}Mbp", bp as f64 / 1_000_000.0)
    } else if bp >= 1_000 {
        format!("{:.1}Kbp", bp as f64 / 1_000.0)
    } else {
        format!("{}bp", bp)
    }
}
