use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use decode::{compare, read_reference_file, ComparisonReport, H264Decoder};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod remux;

/// Exit status of `verify --strict-exit` when the mapping is not strict.
const STRICT_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "seicheck")]
#[command(about = "Checks per-frame SEI metadata of an H.264 stream against reference rows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare the SEI metadata sequence with the reference rows, position by position
    Verify(VerifyArgs),

    /// List every user data unregistered SEI message of the stream
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct StreamArgs {
    /// Raw H.264 Annex B elementary stream
    #[arg(long, conflicts_with = "video", required_unless_present = "video")]
    stream: Option<PathBuf>,

    /// Container file, remuxed to Annex B with ffmpeg before parsing
    #[arg(long)]
    video: Option<PathBuf>,

    /// ffmpeg executable used with --video
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    #[command(flatten)]
    input: StreamArgs,

    /// Reference rows, `frame_id,timestamp_ms` per line in encode order
    #[arg(long)]
    metadata: PathBuf,

    /// Also write the JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Exit with status 2 unless the mapping is strict
    #[arg(long)]
    strict_exit: bool,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    #[command(flatten)]
    input: StreamArgs,

    /// Also write the JSON listing to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_stream(input: &StreamArgs) -> Result<H264Decoder> {
    match (&input.stream, &input.video) {
        (Some(stream), _) => H264Decoder::from_file_path(stream)
            .with_context(|| format!("failed to open stream {}", stream.display())),
        (None, Some(video)) => {
            let bytes = remux::pull_annexb(&input.ffmpeg, video)
                .with_context(|| format!("failed to extract Annex B from {}", video.display()))?;
            Ok(H264Decoder::from_bytes(bytes))
        }
        (None, None) => anyhow::bail!("either --stream or --video is required"),
    }
}

/// Prints `value` as pretty JSON and, when asked, writes it to `output` as well.
fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(output) = output {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(output, &json).with_context(|| format!("failed to write {}", output.display()))?;
    }

    println!("{json}");
    Ok(())
}

fn verify(args: &VerifyArgs) -> Result<ComparisonReport> {
    let reference = read_reference_file(&args.metadata).with_context(|| {
        format!("failed to read reference metadata {}", args.metadata.display())
    })?;
    let decoder = load_stream(&args.input)?;
    let extracted = decoder.decode();

    let report = compare(&reference, &extracted);
    info!(
        metadata_rows = report.reference_count,
        sei_entries = report.extracted_count,
        mismatches = report.mismatch_count,
        strict_ok = report.strict_ok,
        "compared SEI metadata"
    );
    if let Some(index) = report.first_mismatch {
        warn!(
            index,
            expected = ?reference[index],
            found = ?extracted[index].key(),
            "first mismatching frame"
        );
    }

    emit_json(&report, args.output.as_deref())?;
    Ok(report)
}

fn exit_status(report: &ComparisonReport, strict_exit: bool) -> u8 {
    if strict_exit && !report.strict_ok {
        STRICT_FAILURE
    } else {
        0
    }
}

fn extract(args: &ExtractArgs) -> Result<usize> {
    let decoder = load_stream(&args.input)?;
    let entries = decoder.user_data();
    info!(sei_messages = entries.len(), "listed user data unregistered SEI");

    emit_json(&entries, args.output.as_deref())?;
    Ok(entries.len())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Verify(args) => {
            let report = verify(&args)?;
            let status = exit_status(&report, args.strict_exit);
            if status != 0 {
                warn!("strict SEI mapping failed");
            }
            Ok(ExitCode::from(status))
        }
        Commands::Extract(args) => {
            extract(&args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
