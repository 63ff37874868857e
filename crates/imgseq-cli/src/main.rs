//! imgseq - walk an image sequence and print per-frame timing
//!
//! Entry point: parses arguments, builds a sequence configuration, then
//! drives the source in pull mode (default) or through the push worker.

mod args;
mod output;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use imgseq_source::{ImageSequenceSource, PushEvent, PushSource};
use output::Printer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = cli.sequence_config()?;
    if config.looping && cli.max_frames.is_none() {
        warn!("looping without --max-frames runs until interrupted");
    }

    let mut source = ImageSequenceSource::new(config);
    source
        .activate()
        .with_context(|| format!("Failed to activate {}", source.config().location))?;

    let mut printer = Printer::new(cli.json);
    if let Some(sequence) = source.resolved() {
        info!(
            units = sequence.unit_count(),
            rate = %sequence.rate(),
            "imgseq starting"
        );
        printer.header(sequence.unit_count(), sequence.rate())?;
    }
    if cli.push {
        run_push(source, &cli, &mut printer)
    } else {
        run_pull(source, &cli, &mut printer)
    }
}

fn run_pull(mut source: ImageSequenceSource, cli: &Cli, printer: &mut Printer) -> Result<()> {
    while !printer.reached(cli.max_frames) {
        match source.next_frame()? {
            Some(frame) => printer.frame(&frame)?,
            None => break,
        }
    }
    printer.summary(source.current_format(), source.duration())
}

fn run_push(source: ImageSequenceSource, cli: &Cli, printer: &mut Printer) -> Result<()> {
    // The worker hands back a deactivated source, so take what the summary
    // needs now.
    let duration = source
        .resolved()
        .filter(|_| !source.config().looping)
        .map(|sequence| sequence.total_duration());
    let push = PushSource::spawn(source, cli.buffer)?;

    while !printer.reached(cli.max_frames) {
        match push.recv() {
            Some(PushEvent::Frame(frame)) => printer.frame(&frame)?,
            Some(PushEvent::EndOfSequence) | None => break,
            Some(PushEvent::Error(e)) => return Err(e.into()),
        }
    }

    let stats = push.stats();
    info!(
        frames = stats.frames_pushed,
        bytes = stats.bytes_pushed,
        "push worker finished"
    );
    push.stop();
    printer.summary(None, duration)
}
