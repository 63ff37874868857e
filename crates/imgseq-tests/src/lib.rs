//! Integration test crate for imgseq.
//!
//! This crate exists solely to hold cross-crate integration tests that drive
//! the source against real files on disk.


#[cfg(test)]
mod playback;

#[cfg(test)]
mod formats;
