//! Output format descriptors.

use crate::time::FrameRate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Media type reported when content sniffing cannot identify a unit.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Describes what a sequence emits, as discovered from its first unit.
///
/// The source never decodes units; width and height are only filled in when
/// the sniffer can read them from the container header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// MIME type of each unit (e.g. `image/png`)
    pub media_type: String,
    /// Width in pixels, if known
    pub width: Option<u32>,
    /// Height in pixels, if known
    pub height: Option<u32>,
    /// Nominal units per second of the stream
    pub frame_rate: Option<FrameRate>,
}

impl FormatDescriptor {
    /// Create a descriptor for a media type with no further detail.
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            width: None,
            height: None,
            frame_rate: None,
        }
    }

    /// Descriptor for content nothing recognized.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_MEDIA_TYPE)
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_frame_rate(mut self, rate: FrameRate) -> Self {
        self.frame_rate = Some(rate);
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.media_type == UNKNOWN_MEDIA_TYPE
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_type)?;
        if let (Some(w), Some(h)) = (self.width, self.height) {
            write!(f, ", {}x{}", w, h)?;
        }
        if let Some(rate) = self.frame_rate {
            write!(f, ", framerate={}", rate)?;
        }
        Ok(())
    }
}
