//! The image sequence source.
//!
//! [`ImageSequenceSource`] walks a resolved sequence one unit per call,
//! reading each file whole and stamping it with an exact rational
//! timestamp. Its lifecycle is an explicit state machine:
//!
//! ```text
//! Idle --activate--> Ready --next_frame--> Streaming --past stop--> Ended
//!                      ^                       |  (loop: wrap to start)
//!                      +------seek_to_start----+------------------+
//! ```
//!
//! `deactivate` returns to `Idle` from anywhere.

use crate::config::SequenceConfig;
use crate::error::{SequenceError, SequenceResult};
use crate::resolver::{resolve, ResolvedSequence};
use crate::sniff::{ContentSniffer, ImageSniffer};
use imgseq_core::{ByteRange, FormatDescriptor, RationalTime, SequenceFrame};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Observable lifecycle state of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// No resolved sequence.
    Idle,
    /// Resolved, cursor at the start, nothing emitted since activation or seek.
    Ready,
    /// Emitting frames.
    Streaming,
    /// A non-looping stream ran past its stop index.
    Ended,
}

/// Per-activation cursor.
#[derive(Debug)]
struct Cursor {
    index: usize,
    byte_offset: u64,
    format: Option<FormatDescriptor>,
    duration: Option<RationalTime>,
}

/// Everything owned between activation and deactivation.
#[derive(Debug)]
struct Session {
    sequence: ResolvedSequence,
    looping: bool,
    cursor: Cursor,
}

enum State {
    Idle,
    Ready(Session),
    Streaming(Session),
    Ended(Session),
}

impl State {
    fn session(&self) -> Option<&Session> {
        match self {
            Self::Idle => None,
            Self::Ready(s) | Self::Streaming(s) | Self::Ended(s) => Some(s),
        }
    }

    fn tag(&self) -> SourceState {
        match self {
            Self::Idle => SourceState::Idle,
            Self::Ready(_) => SourceState::Ready,
            Self::Streaming(_) => SourceState::Streaming,
            Self::Ended(_) => SourceState::Ended,
        }
    }
}

impl Session {
    fn new(sequence: ResolvedSequence, looping: bool) -> Self {
        let index = sequence.start();
        Self {
            sequence,
            looping,
            cursor: Cursor {
                index,
                byte_offset: 0,
                format: None,
                duration: None,
            },
        }
    }

    /// Produce the frame under the cursor, or `None` once a non-looping
    /// sequence is exhausted. On a read error the cursor is not moved.
    fn advance(&mut self, sniffer: &dyn ContentSniffer) -> SequenceResult<Option<SequenceFrame>> {
        let seq = &self.sequence;

        if self.cursor.index > seq.stop() {
            if !self.looping {
                self.cursor.index = seq.stop();
                return Ok(None);
            }
            debug!(start = seq.start(), "wrapping to start of sequence");
            self.cursor.index = seq.start();
        }

        let index = self.cursor.index;
        let path = &seq.locations()[index];
        let data = std::fs::read(path).map_err(|source| {
            warn!(index, path = %path.display(), error = %source, "failed to read unit");
            SequenceError::Read {
                path: path.clone(),
                source,
            }
        })?;
        debug!(index, path = %path.display(), size = data.len(), "read unit");

        if self.cursor.format.is_none() {
            let format = sniffer.sniff(&data).unwrap_or_else(|| {
                warn!(path = %path.display(), "unrecognized unit content");
                FormatDescriptor::unknown()
            });
            let format = format.with_frame_rate(seq.rate());
            info!(format = %format, "discovered output format");
            self.cursor.format = Some(format);
            self.cursor.duration = Some(seq.total_duration());
        }

        let size = data.len() as u64;
        let offset = ByteRange::new(self.cursor.byte_offset, self.cursor.byte_offset + size);
        let frame = SequenceFrame {
            data: Arc::from(data),
            index,
            location: path.clone(),
            pts: seq.timestamp(index),
            duration: seq.unit_duration(),
            offset,
        };

        self.cursor.byte_offset = offset.end;
        self.cursor.index += 1;
        Ok(Some(frame))
    }

    fn position(&self) -> RationalTime {
        self.sequence.timestamp(self.cursor.index)
    }
}

/// Pull-driven source of timed frames from numbered files, a playlist or an
/// explicit location list.
///
/// Not internally synchronized: every mutating call takes `&mut self`.
pub struct ImageSequenceSource {
    config: SequenceConfig,
    sniffer: Box<dyn ContentSniffer>,
    state: State,
}

impl ImageSequenceSource {
    /// Create an idle source that sniffs still image formats.
    pub fn new(config: SequenceConfig) -> Self {
        Self::with_sniffer(config, ImageSniffer)
    }

    /// Create an idle source with a custom content sniffer.
    pub fn with_sniffer(config: SequenceConfig, sniffer: impl ContentSniffer + 'static) -> Self {
        Self {
            config,
            sniffer: Box::new(sniffer),
            state: State::Idle,
        }
    }

    /// Pending configuration, used by the next activation.
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Mutable access to the pending configuration.
    ///
    /// Changes take effect at the next [`activate`](Self::activate).
    pub fn config_mut(&mut self) -> &mut SequenceConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: SequenceConfig) {
        self.config = config;
    }

    /// Resolve the configuration and move to `Ready`.
    ///
    /// An active source is deactivated first. On failure the source is left
    /// idle.
    pub fn activate(&mut self) -> SequenceResult<()> {
        if !matches!(self.state, State::Idle) {
            self.deactivate();
        }
        let sequence = resolve(&self.config)?;
        info!(
            units = sequence.unit_count(),
            looping = self.config.looping,
            "source activated"
        );
        self.state = State::Ready(Session::new(sequence, self.config.looping));
        Ok(())
    }

    /// Drop the resolved sequence and cursor.
    pub fn deactivate(&mut self) {
        if !matches!(self.state, State::Idle) {
            debug!(from = ?self.state.tag(), "source deactivated");
        }
        self.state = State::Idle;
    }

    /// Emit the next frame.
    ///
    /// Returns `Ok(None)` at the end of a non-looping sequence, and keeps
    /// doing so until a seek. A read error leaves the cursor on the failing
    /// unit.
    pub fn next_frame(&mut self) -> SequenceResult<Option<SequenceFrame>> {
        let sniffer = self.sniffer.as_ref();
        let (state, result) = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => (State::Idle, Err(SequenceError::NotActive)),
            State::Ended(session) => (State::Ended(session), Ok(None)),
            State::Ready(session) => step(session, sniffer, State::Ready),
            State::Streaming(session) => step(session, sniffer, State::Streaming),
        };
        self.state = state;
        result
    }

    /// Move the cursor back to the start index.
    ///
    /// Only seeking to the beginning is supported. The discovered format is
    /// kept. Returns `false` when idle.
    pub fn seek_to_start(&mut self) -> bool {
        let mut session = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => return false,
            State::Ready(s) | State::Streaming(s) | State::Ended(s) => s,
        };
        session.cursor.index = session.sequence.start();
        debug!(index = session.cursor.index, "seeked to start");
        self.state = State::Ready(session);
        true
    }

    /// Whether [`seek_to_start`](Self::seek_to_start) can succeed.
    pub fn is_seekable(&self) -> bool {
        self.state
            .session()
            .is_some_and(|s| !s.sequence.is_empty() && s.sequence.rate().is_valid())
    }

    /// Total stream duration.
    ///
    /// Known once the first unit has been read, and never for looping
    /// streams.
    pub fn duration(&self) -> Option<RationalTime> {
        let session = self.state.session()?;
        if session.looping {
            return None;
        }
        session.cursor.duration
    }

    /// Format discovered from the first unit read.
    pub fn current_format(&self) -> Option<&FormatDescriptor> {
        self.state.session()?.cursor.format.as_ref()
    }

    /// Stream time of the cursor.
    pub fn position(&self) -> Option<RationalTime> {
        self.state.session().map(Session::position)
    }

    /// Index of the next unit to read.
    pub fn current_index(&self) -> Option<usize> {
        self.state.session().map(|s| s.cursor.index)
    }

    /// Bytes emitted since activation.
    pub fn bytes_emitted(&self) -> Option<u64> {
        self.state.session().map(|s| s.cursor.byte_offset)
    }

    pub fn state(&self) -> SourceState {
        self.state.tag()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// The sequence resolved at activation.
    pub fn resolved(&self) -> Option<&ResolvedSequence> {
        self.state.session().map(|s| &s.sequence)
    }
}

impl std::fmt::Debug for ImageSequenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSequenceSource")
            .field("config", &self.config)
            .field("state", &self.state.tag())
            .field("current_index", &self.current_index())
            .finish()
    }
}

/// Advance an active session and pick the follow-up state.
/// `resume` rebuilds the state the session came from when a read fails.
fn step(
    mut session: Session,
    sniffer: &dyn ContentSniffer,
    resume: fn(Session) -> State,
) -> (State, SequenceResult<Option<SequenceFrame>>) {
    match session.advance(sniffer) {
        Ok(Some(frame)) => (State::Streaming(session), Ok(Some(frame))),
        Ok(None) => {
            info!(index = session.cursor.index, "end of sequence");
            (State::Ended(session), Ok(None))
        }
        Err(e) => (resume(session), Err(e)),
    }
}
