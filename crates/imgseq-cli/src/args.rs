//! Command line arguments.

use anyhow::{bail, Context, Result};
use clap::Parser;
use imgseq_core::FrameRate;
use imgseq_source::SequenceConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "imgseq",
    version,
    about = "Walk an image sequence and print per-frame timing"
)]
pub struct Cli {
    /// Location pattern (e.g. frames/img_%05d.png) or playlist file
    pub location: Option<String>,

    /// JSON file holding a sequence configuration; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// First index to play
    #[arg(long)]
    pub start: Option<u32>,

    /// Last index to play, -1 for unbounded
    #[arg(long, allow_negative_numbers = true)]
    pub stop: Option<i32>,

    /// Restart from the start index at the end
    #[arg(long = "loop")]
    pub looping: bool,

    /// Units per second as N/D (a playlist's own rate wins)
    #[arg(long)]
    pub framerate: Option<FrameRate>,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Print one JSON object per frame
    #[arg(long)]
    pub json: bool,

    /// Drive the source from the push worker instead of pulling
    #[arg(long)]
    pub push: bool,

    /// Frames buffered ahead in push mode
    #[arg(long, default_value_t = 4)]
    pub buffer: usize,
}

impl Cli {
    /// Build the sequence configuration from the config file and flags.
    pub fn sequence_config(&self) -> Result<SequenceConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_slice(&data)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => {
                let Some(location) = &self.location else {
                    bail!("a location or --config is required");
                };
                SequenceConfig::new(location)
            }
        };

        if let Some(location) = &self.location {
            config.set_location(location);
        }
        if let Some(start) = self.start {
            config.set_start_index(start);
        }
        if let Some(stop) = self.stop {
            config.set_stop_index(stop);
        }
        if self.looping {
            config.set_loop(true);
        }
        if let Some(rate) = self.framerate {
            config.set_rate(Some(rate));
        }
        Ok(config)
    }
}
