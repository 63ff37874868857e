//! Typed configuration for a sequence source.
//!
//! A [`SequenceConfig`] is plain data. The source copies it when activated,
//! so changing it afterwards only affects the next activation.

use crate::pattern::LocationPattern;
use imgseq_core::FrameRate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Location used when nothing else was configured.
pub const DEFAULT_LOCATION: &str = "%05d";

/// Where the units of a sequence come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSpec {
    /// printf-style pattern with one integer placeholder, e.g. `shot_%04d.png`
    Pattern(String),
    /// Text playlist listing unit locations and an optional rate
    Playlist(PathBuf),
    /// Locations supplied directly, in playback order
    List(Vec<PathBuf>),
}

impl LocationSpec {
    /// Classify a location string: a valid integer placeholder makes it a
    /// pattern, everything else names a playlist file (which may itself
    /// contain `%`, e.g. `my%20shots/show.playlist`).
    pub fn parse(location: &str) -> Self {
        if LocationPattern::parse(location).is_ok() {
            Self::Pattern(location.to_string())
        } else {
            Self::Playlist(PathBuf::from(location))
        }
    }

    /// Short name of the resolution mode, for logs.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Pattern(_) => "pattern",
            Self::Playlist(_) => "playlist",
            Self::List(_) => "list",
        }
    }
}

impl Default for LocationSpec {
    fn default() -> Self {
        Self::Pattern(DEFAULT_LOCATION.to_string())
    }
}

impl fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => write!(f, "{}", pattern),
            Self::Playlist(path) => write!(f, "{}", path.display()),
            Self::List(paths) => write!(f, "[{} location(s)]", paths.len()),
        }
    }
}

/// Configuration consumed at activation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Pattern, playlist or explicit list
    pub location: LocationSpec,
    /// First index to play. In pattern mode this is where probing begins.
    pub start_index: u32,
    /// Last index to play, `None` for "up to the last unit found"
    pub stop_index: Option<u32>,
    /// Restart from the start index instead of ending
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Rate override; a playlist's own rate takes precedence
    pub rate: Option<FrameRate>,
}

impl SequenceConfig {
    /// Configuration for a location string (pattern or playlist path).
    pub fn new(location: &str) -> Self {
        Self {
            location: LocationSpec::parse(location),
            ..Self::default()
        }
    }

    /// Configuration playing an explicit list of locations.
    pub fn from_locations<I, P>(locations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            location: LocationSpec::List(locations.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_start_index(mut self, start: u32) -> Self {
        self.start_index = start;
        self
    }

    pub fn with_stop_index(mut self, stop: u32) -> Self {
        self.stop_index = Some(stop);
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_rate(mut self, rate: FrameRate) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Replace the location with a pattern or playlist path.
    pub fn set_location(&mut self, location: &str) {
        self.location = LocationSpec::parse(location);
    }

    /// Replace the location with an explicit list.
    pub fn set_locations(&mut self, locations: Vec<PathBuf>) {
        self.location = LocationSpec::List(locations);
    }

    pub fn set_start_index(&mut self, start: u32) {
        self.start_index = start;
    }

    /// Set the stop index; any negative value means unbounded.
    pub fn set_stop_index(&mut self, stop: i32) {
        self.stop_index = u32::try_from(stop).ok();
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_rate(&mut self, rate: Option<FrameRate>) {
        self.rate = rate;
    }
}
