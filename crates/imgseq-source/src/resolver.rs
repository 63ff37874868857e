//! Location resolution: configuration in, ordered unit list out.

use crate::bounds::{validate_bounds, Bounds};
use crate::config::{LocationSpec, SequenceConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::pattern::LocationPattern;
use crate::playlist::Playlist;
use imgseq_core::{FrameRate, RationalTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The units an activation plays, with a validated window and rate.
///
/// Always holds at least one location and
/// `start <= stop <= locations.len() - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSequence {
    locations: Vec<PathBuf>,
    bounds: Bounds,
    rate: FrameRate,
}

impl ResolvedSequence {
    /// Build from parts, validating bounds and rate.
    pub fn new(
        locations: Vec<PathBuf>,
        start: u32,
        stop: Option<u32>,
        rate: FrameRate,
    ) -> ConfigResult<Self> {
        check_rate(rate)?;
        let bounds = validate_bounds(locations.len(), start, stop)?;
        Ok(Self {
            locations,
            bounds,
            rate,
        })
    }

    /// All resolved locations, in playback order.
    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Location at `index`.
    pub fn location(&self, index: usize) -> Option<&Path> {
        self.locations.get(index).map(PathBuf::as_path)
    }

    /// First index played.
    pub fn start(&self) -> usize {
        self.bounds.start
    }

    /// Last index played (inclusive).
    pub fn stop(&self) -> usize {
        self.bounds.stop
    }

    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// Number of resolved locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Units between start and stop, inclusive.
    pub fn unit_count(&self) -> usize {
        self.bounds.unit_count()
    }

    /// Display time of one unit.
    pub fn unit_duration(&self) -> RationalTime {
        self.rate.frame_duration()
    }

    /// Presentation time of the unit at `index`.
    pub fn timestamp(&self, index: usize) -> RationalTime {
        self.unit_duration() * (index as i64 - self.bounds.start as i64)
    }

    /// Length of one pass from start to stop.
    pub fn total_duration(&self) -> RationalTime {
        self.unit_duration() * self.unit_count() as i64
    }
}

/// Resolve a configuration into a sequence.
pub fn resolve(config: &SequenceConfig) -> ConfigResult<ResolvedSequence> {
    let sequence = match &config.location {
        LocationSpec::Pattern(pattern) => resolve_pattern(pattern, config)?,
        LocationSpec::Playlist(path) => resolve_playlist(path, config)?,
        LocationSpec::List(locations) => resolve_list(locations, config)?,
    };
    info!(
        mode = config.location.mode(),
        location = %config.location,
        units = sequence.len(),
        start = sequence.start(),
        stop = sequence.stop(),
        rate = %sequence.rate(),
        "resolved sequence"
    );
    Ok(sequence)
}

/// Probe numbered files from `start_index` until the first gap.
///
/// The resulting index space is zero-based at the first file found.
fn resolve_pattern(pattern: &str, config: &SequenceConfig) -> ConfigResult<ResolvedSequence> {
    let pattern = LocationPattern::parse(pattern)?;
    let start = config.start_index;
    if let Some(stop) = config.stop_index {
        if stop < start {
            return Err(ConfigError::InvalidBounds {
                start,
                stop: config.stop_index,
                len: 0,
            });
        }
    }

    let mut locations = Vec::new();
    for index in start..=u32::MAX {
        if config.stop_index.is_some_and(|stop| index > stop) {
            break;
        }
        let path = absolutize(&pattern.path_for(index));
        if !path.exists() {
            debug!(index, path = %path.display(), "pattern probe stopped at missing file");
            break;
        }
        locations.push(path);
    }

    if locations.is_empty() {
        return Err(ConfigError::EmptySequence {
            location: pattern.format(start),
        });
    }

    let rate = config.rate.unwrap_or_default();
    ResolvedSequence::new(locations, 0, None, rate)
}

fn resolve_playlist(path: &Path, config: &SequenceConfig) -> ConfigResult<ResolvedSequence> {
    let playlist = Playlist::load(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let locations: Vec<PathBuf> = playlist
        .image_locations()
        .map(|location| absolutize(&base.join(location)))
        .collect();

    if locations.is_empty() {
        return Err(ConfigError::EmptySequence {
            location: path.display().to_string(),
        });
    }

    let rate = playlist.frame_rate().or(config.rate).unwrap_or_default();
    ResolvedSequence::new(locations, config.start_index, config.stop_index, rate)
}

fn resolve_list(locations: &[PathBuf], config: &SequenceConfig) -> ConfigResult<ResolvedSequence> {
    if locations.is_empty() {
        return Err(ConfigError::EmptySequence {
            location: "empty location list".to_string(),
        });
    }
    let locations = locations.iter().map(|p| absolutize(p)).collect();
    let rate = config.rate.unwrap_or_default();
    ResolvedSequence::new(locations, config.start_index, config.stop_index, rate)
}

fn check_rate(rate: FrameRate) -> ConfigResult<()> {
    if rate.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate {
            numerator: rate.numerator,
            denominator: rate.denominator,
        })
    }
}

/// Anchor a relative path at the current directory.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
