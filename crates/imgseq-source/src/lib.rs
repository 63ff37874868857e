//! imgseq source - sequenced frame source over image files
//!
//! This crate handles:
//! - Location resolution from a numeric pattern, a playlist or a list
//! - Start/stop bound validation
//! - Frame sequencing with exact timestamps, looping and seek-to-start
//! - Format discovery by content sniffing
//! - A push-mode worker around the pull interface

pub mod bounds;
pub mod config;
pub mod error;
pub mod pattern;
pub mod playlist;
pub mod push;
pub mod resolver;
pub mod sequencer;
pub mod sniff;

pub use bounds::{validate_bounds, Bounds};
pub use config::{LocationSpec, SequenceConfig, DEFAULT_LOCATION};
pub use error::{ConfigError, ConfigResult, SequenceError, SequenceResult};
pub use pattern::LocationPattern;
pub use playlist::{Playlist, PlaylistRecord};
pub use push::{PushEvent, PushSource, PushStats};
pub use resolver::{resolve, ResolvedSequence};
pub use sequencer::{ImageSequenceSource, SourceState};
pub use sniff::{ContentSniffer, ImageSniffer};
