//! Frames emitted by a sequence source.
//!
//! A frame carries the raw bytes of one unit exactly as they were read from
//! disk, plus the timing and byte-position metadata the sequencer stamped on
//! it. Decoding is left to whoever consumes the frame.

use crate::time::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Half-open byte range `[start, end)` in the cumulative byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// One unit of a sequence, read into memory and stamped.
#[derive(Debug, Clone)]
pub struct SequenceFrame {
    /// Raw unit bytes
    pub data: Arc<[u8]>,
    /// Index of the unit in the resolved location list
    pub index: usize,
    /// Location the bytes were read from
    pub location: PathBuf,
    /// Presentation timestamp (also the decode timestamp)
    pub pts: RationalTime,
    /// Display duration of this unit
    pub duration: RationalTime,
    /// Position of the bytes in the cumulative stream
    pub offset: ByteRange,
}

impl SequenceFrame {
    /// Size of the unit in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Interval of stream time this frame covers.
    #[inline]
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.pts, self.duration)
    }

    /// Metadata of this frame without the payload.
    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            index: self.index,
            location: self.location.clone(),
            pts: self.pts,
            duration: self.duration,
            pts_nanos: self.pts.to_nanos(),
            offset: self.offset,
            size: self.data.len(),
        }
    }
}

/// Serializable summary of a [`SequenceFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub index: usize,
    pub location: PathBuf,
    pub pts: RationalTime,
    pub duration: RationalTime,
    pub pts_nanos: i64,
    pub offset: ByteRange,
    pub size: usize,
}
