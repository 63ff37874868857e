//! Frame and summary printing.

use anyhow::Result;
use imgseq_core::{FormatDescriptor, FrameRate, RationalTime, SequenceFrame};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct Summary<'a> {
    frames: u64,
    bytes: u64,
    format: Option<&'a FormatDescriptor>,
    duration: Option<RationalTime>,
}

/// Writes one line per frame and a closing summary to a sink (stdout by
/// default).
pub struct Printer<W: Write = io::Stdout> {
    out: W,
    json: bool,
    frames: u64,
    bytes: u64,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self::with_writer(io::stdout(), json)
    }
}

impl<W: Write> Printer<W> {
    pub fn with_writer(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            frames: 0,
            bytes: 0,
        }
    }

    /// Resolved unit count and rate. JSON output has no header line.
    pub fn header(&mut self, units: usize, rate: FrameRate) -> Result<()> {
        if !self.json {
            writeln!(self.out, "{units} units at {rate} fps")?;
        }
        Ok(())
    }

    /// True once `max` frames have been printed.
    pub fn reached(&self, max: Option<u64>) -> bool {
        max.is_some_and(|max| self.frames >= max)
    }

    pub fn frame(&mut self, frame: &SequenceFrame) -> Result<()> {
        self.frames += 1;
        self.bytes += frame.size() as u64;

        if self.json {
            let line = serde_json::to_string(&frame.info())?;
            writeln!(self.out, "{line}")?;
        } else {
            writeln!(
                self.out,
                "#{:<5} pts={:>10.4}s dur={} bytes={}..{} {}",
                frame.index,
                frame.pts.to_seconds_f64(),
                frame.duration,
                frame.offset.start,
                frame.offset.end,
                frame.location.display()
            )?;
        }
        Ok(())
    }

    pub fn summary(
        &mut self,
        format: Option<&FormatDescriptor>,
        duration: Option<RationalTime>,
    ) -> Result<()> {
        if self.json {
            let summary = Summary {
                frames: self.frames,
                bytes: self.bytes,
                format,
                duration,
            };
            writeln!(self.out, "{}", serde_json::to_string(&summary)?)?;
        } else {
            write!(self.out, "{} frames, {} bytes", self.frames, self.bytes)?;
            if let Some(format) = format {
                write!(self.out, ", {format}")?;
            }
            match duration {
                Some(duration) => {
                    writeln!(self.out, ", duration {:.4}s", duration.to_seconds_f64())?
                }
                None => writeln!(self.out)?,
            }
        }
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
