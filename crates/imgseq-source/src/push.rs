//! Push-mode driver.
//!
//! Moves an activated [`ImageSequenceSource`] onto a worker thread that
//! pulls frames as fast as the consumer accepts them and delivers them over
//! a bounded channel. The channel capacity is the only pacing: no clock
//! synchronization is done here.

use crate::error::{SequenceError, SequenceResult};
use crate::sequencer::ImageSequenceSource;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use imgseq_core::SequenceFrame;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What the worker delivers.
#[derive(Debug)]
pub enum PushEvent {
    Frame(SequenceFrame),
    EndOfSequence,
    /// The stream stopped on this error; nothing else is pushed until a seek.
    Error(SequenceError),
}

/// Counters maintained by the worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushStats {
    pub frames_pushed: u64,
    pub bytes_pushed: u64,
    pub seeks: u64,
    /// Frames read but thrown away because a seek arrived while they were
    /// waiting for channel space.
    pub frames_discarded: u64,
}

enum PushCommand {
    SeekToStart,
    Stop,
}

/// Handle to a running push worker.
///
/// Dropping the handle stops the worker and discards the source.
pub struct PushSource {
    events: Receiver<PushEvent>,
    commands: Sender<PushCommand>,
    stats: Arc<Mutex<PushStats>>,
    worker: Option<JoinHandle<ImageSequenceSource>>,
}

impl PushSource {
    /// Start pushing frames from an activated source.
    ///
    /// `capacity` is the number of frames buffered ahead of the consumer
    /// (at least one).
    pub fn spawn(source: ImageSequenceSource, capacity: usize) -> SequenceResult<Self> {
        if !source.is_active() {
            return Err(SequenceError::NotActive);
        }

        let (event_tx, event_rx) = crossbeam_channel::bounded(capacity.max(1));
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let stats = Arc::new(Mutex::new(PushStats::default()));

        let worker_stats = Arc::clone(&stats);
        let worker =
            std::thread::spawn(move || push_worker_main(source, event_tx, cmd_rx, worker_stats));

        info!(capacity, "push worker started");
        Ok(Self {
            events: event_rx,
            commands: cmd_tx,
            stats,
            worker: Some(worker),
        })
    }

    /// The event channel, for use with `select!` or iteration.
    pub fn events(&self) -> &Receiver<PushEvent> {
        &self.events
    }

    /// Block until the next event.
    pub fn recv(&self) -> Option<PushEvent> {
        self.events.recv().ok()
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PushEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Ask the worker to restart from the start index.
    ///
    /// Frames already buffered in the channel are still delivered. A frame
    /// the worker has read but not yet queued is discarded; its bytes still
    /// count toward the stream offset, so the first frame after the seek
    /// starts past it (see [`PushStats::frames_discarded`]). Also resumes a
    /// worker that stopped at the end of the sequence or on an error.
    pub fn seek_to_start(&self) -> bool {
        self.commands.send(PushCommand::SeekToStart).is_ok()
    }

    pub fn stats(&self) -> PushStats {
        *self.stats.lock()
    }

    /// Stop the worker and take the source back, deactivated.
    pub fn stop(mut self) -> Option<ImageSequenceSource> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<ImageSequenceSource> {
        let worker = self.worker.take()?;
        let _ = self.commands.send(PushCommand::Stop);
        match worker.join() {
            Ok(source) => Some(source),
            Err(_) => {
                warn!("push worker panicked");
                None
            }
        }
    }
}

impl Drop for PushSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn push_worker_main(
    mut source: ImageSequenceSource,
    events: Sender<PushEvent>,
    commands: Receiver<PushCommand>,
    stats: Arc<Mutex<PushStats>>,
) -> ImageSequenceSource {
    let seek = |source: &mut ImageSequenceSource| {
        source.seek_to_start();
        stats.lock().seeks += 1;
    };
    // Set after end of sequence or an error; only a command wakes us.
    let mut halted = false;

    loop {
        let command = if halted {
            commands.recv().ok()
        } else {
            match commands.try_recv() {
                Ok(cmd) => Some(cmd),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(PushCommand::Stop),
            }
        };
        match command {
            Some(PushCommand::SeekToStart) => {
                seek(&mut source);
                halted = false;
            }
            Some(PushCommand::Stop) => break,
            None if halted => break,
            None => {}
        }

        let (event, bytes) = match source.next_frame() {
            Ok(Some(frame)) => {
                let size = frame.size() as u64;
                (PushEvent::Frame(frame), Some(size))
            }
            Ok(None) => {
                halted = true;
                (PushEvent::EndOfSequence, None)
            }
            Err(e) => {
                warn!(error = %e, "push stream stopped");
                halted = true;
                (PushEvent::Error(e), None)
            }
        };

        crossbeam_channel::select! {
            send(events, event) -> res => {
                if res.is_err() {
                    debug!("event receiver gone");
                    break;
                }
                if let Some(bytes) = bytes {
                    let mut stats = stats.lock();
                    stats.frames_pushed += 1;
                    stats.bytes_pushed += bytes;
                }
            }
            recv(commands) -> cmd => match cmd {
                Ok(PushCommand::SeekToStart) => {
                    if bytes.is_some() {
                        debug!("discarding frame read before seek");
                        stats.lock().frames_discarded += 1;
                    }
                    seek(&mut source);
                    halted = false;
                }
                Ok(PushCommand::Stop) | Err(_) => break,
            },
        }
    }

    source.deactivate();
    info!("push worker stopped");
    source
}
