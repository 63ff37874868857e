//! imgseq core - foundation types for sequenced frame sources
//!
//! This crate provides the types shared by the source and its consumers:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - Emitted frames and their byte ranges
//! - Format descriptors produced by content sniffing

pub mod error;
pub mod format;
pub mod frame;
pub mod time;

pub use error::{CoreError, Result};
pub use format::FormatDescriptor;
pub use frame::{ByteRange, FrameInfo, SequenceFrame};
pub use time::{FrameRate, RationalTime, TimeRange, NANOS_PER_SECOND};
