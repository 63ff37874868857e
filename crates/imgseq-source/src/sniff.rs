//! Content sniffing to discover the output format without a full decode.

use image::{ImageFormat, ImageReader};
use imgseq_core::FormatDescriptor;
use std::io::Cursor;
use tracing::debug;

/// Identifies a unit's format from its bytes.
///
/// Called once per activation, on the first unit read.
pub trait ContentSniffer: Send {
    /// Describe `data`, or `None` if the content is not recognized.
    fn sniff(&self, data: &[u8]) -> Option<FormatDescriptor>;
}

/// Magic-byte sniffer for still image formats.
///
/// Reports the MIME type and, when the header can be read, the dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSniffer;

impl ContentSniffer for ImageSniffer {
    fn sniff(&self, data: &[u8]) -> Option<FormatDescriptor> {
        let format = image::guess_format(data).ok()?;
        let descriptor = FormatDescriptor::new(format.to_mime_type());

        match read_dimensions(data, format) {
            Some((width, height)) => Some(descriptor.with_dimensions(width, height)),
            None => Some(descriptor),
        }
    }
}

fn read_dimensions(data: &[u8], format: ImageFormat) -> Option<(u32, u32)> {
    match ImageReader::with_format(Cursor::new(data), format).into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            debug!(?format, error = %e, "could not read image header");
            None
        }
    }
}

impl<F> ContentSniffer for F
where
    F: Fn(&[u8]) -> Option<FormatDescriptor> + Send,
{
    fn sniff(&self, data: &[u8]) -> Option<FormatDescriptor> {
        self(data)
    }
}
