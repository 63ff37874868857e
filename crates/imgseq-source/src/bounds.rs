//! Start/stop bound validation shared by every resolution mode.

use crate::error::{ConfigError, ConfigResult};

/// Validated, inclusive index window into a location list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: usize,
    pub stop: usize,
}

impl Bounds {
    /// Number of units in the window.
    #[inline]
    pub fn unit_count(self) -> usize {
        self.stop - self.start + 1
    }
}

/// Check `start`/`stop` against a list of `len` locations.
///
/// An unset `stop` selects the last location. Both indices must lie in
/// `[0, len - 1]` and `stop >= start`.
pub fn validate_bounds(len: usize, start: u32, stop: Option<u32>) -> ConfigResult<Bounds> {
    let invalid = || ConfigError::InvalidBounds { start, stop, len };

    let last = len.checked_sub(1).ok_or_else(invalid)?;
    let start_idx = start as usize;
    let stop_idx = stop.map_or(last, |s| s as usize);

    if start_idx > last || stop_idx > last || stop_idx < start_idx {
        return Err(invalid());
    }
    Ok(Bounds {
        start: start_idx,
        stop: stop_idx,
    })
}
