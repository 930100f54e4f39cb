use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use incremental_decoder::application::dto::{StreamOptions, StreamReport};
use incremental_decoder::infrastructure::providers::MappedFileProvider;
use incremental_decoder::presentation::cli::{decoding_options, Cli, Commands, ProgressReporter};
use incremental_decoder::{
    DrawingSize, ImageCrateBackend, IncrementalDecodeSession, StreamDecodeUseCase,
    SubsamplingLevel,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    match cli.command {
        Commands::Inspect {
            file,
            chunk_size,
            subsample,
            json,
            mmap,
        } => run_inspect(&file, chunk_size, subsample, json, mmap),
        Commands::Decode {
            file,
            output,
            frame,
            subsample,
            sync,
            size,
            chunk_size,
        } => run_decode(&file, &output, frame, subsample, sync, size, chunk_size),
    }
}

fn init_tracing(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_inspect(
    file: &Path,
    chunk_size: usize,
    subsample: SubsamplingLevel,
    json: bool,
    mmap: bool,
) -> Result<()> {
    let options = StreamOptions::new()
        .with_chunk_size(chunk_size)
        .with_subsampling(subsample);
    let use_case = StreamDecodeUseCase::new(options);
    let mut session = IncrementalDecodeSession::<ImageCrateBackend>::new();

    let report = if mmap {
        let provider = MappedFileProvider::open(file)
            .with_context(|| format!("Failed to open {:?}", file))?;
        let len = provider.len().context("Failed to stat file")?;
        use_case.execute_from_provider(&mut session, &provider, len)
    } else {
        let data = fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
        let reporter = ProgressReporter::for_stream(data.len() as u64);
        let report = use_case.execute(&mut session, &data, Some(reporter.stream_callback()));
        reporter.finish("Stream complete");
        report
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(file, subsample, &report);
    }

    if let Some(error) = session.backend().last_error() {
        eprintln!("[!] Backend reported: {}", error);
    }

    Ok(())
}

fn run_decode(
    file: &Path,
    output: &Path,
    frame: usize,
    subsample: SubsamplingLevel,
    sync: bool,
    size: Option<DrawingSize>,
    chunk_size: usize,
) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;

    let decoding = decoding_options(sync, size);
    let options = StreamOptions::new()
        .with_chunk_size(chunk_size)
        .with_subsampling(subsample)
        .with_decoding(decoding);
    let use_case = StreamDecodeUseCase::new(options);
    let mut session = IncrementalDecodeSession::<ImageCrateBackend>::new();
    use_case.execute(&mut session, &data, None);

    let Some(image) = session.create_frame_image(frame, subsample, decoding) else {
        if let Some(error) = session.backend().last_error() {
            eprintln!("[!] Backend reported: {}", error);
        }
        bail!(
            "Frame {} unavailable ({} frames known)",
            frame,
            session.frame_count()
        );
    };

    image
        .save(output)
        .with_context(|| format!("Failed to write {:?}", output))?;

    println!(
        "Frame {} ({}x{}) written to {:?}",
        frame,
        image.width(),
        image.height(),
        output
    );

    Ok(())
}

fn print_report(file: &Path, subsample: SubsamplingLevel, report: &StreamReport) {
    println!();
    println!("File:       {:?}", file);
    println!("Bytes:      {} in {} chunks", report.bytes, report.chunks);
    println!("State:      {:?}", report.state);
    println!("Frames:     {} ({} complete)", report.frame_count(), report.complete_frames());
    println!("Repetition: {}", report.repetition);
    println!("Subsample:  {}", subsample);
    println!();
    println!("{:<6} {:>12} {:>9} {:>10}", "FRAME", "SIZE", "COMPLETE", "DURATION");
    println!("{}", "-".repeat(40));

    for frame in &report.frames {
        let size = match (frame.width, frame.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "?".to_string(),
        };
        let duration = frame
            .duration
            .map(|d| format!("{:.3}s", d))
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:<6} {:>12} {:>9} {:>10}",
            frame.index,
            size,
            if frame.complete { "yes" } else { "no" },
            duration
        );
    }

    if report.frame_count() > 1 {
        println!();
        println!("Total duration: {:.3}s", report.total_duration());
    }
}
