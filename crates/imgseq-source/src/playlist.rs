//! Playlist files.
//!
//! A playlist is UTF-8 text with one record per line:
//!
//! ```text
//! # comment lines start with '#'
//! metadata,framerate=(fraction)3/1
//! image,location=/path/to/a.png
//! image,location="/path/with, comma/b.png"
//! image,\
//!     location=/path/to/c.png
//! ```
//!
//! A backslash at the end of a line joins it with the next one. Records are
//! `kind,key=value,...`; values may carry a `(type)` prefix and may be
//! double-quoted. Any record that fails to parse rejects the whole file.

use crate::error::{ConfigError, ConfigResult};
use imgseq_core::FrameRate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One parsed playlist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistRecord {
    /// Stream-wide settings.
    Metadata { framerate: Option<FrameRate> },
    /// One unit of the sequence.
    Image { location: PathBuf },
}

/// Parsed playlist, records in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    pub records: Vec<PlaylistRecord>,
}

/// A malformed line, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

impl Playlist {
    /// Read and parse a playlist file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let invalid = |reason: String| ConfigError::InvalidPlaylist {
            path: path.to_path_buf(),
            reason,
        };

        debug!(path = %path.display(), "loading playlist");
        let bytes = std::fs::read(path).map_err(|e| invalid(format!("cannot read: {e}")))?;
        let text = String::from_utf8(bytes).map_err(|_| invalid("not valid UTF-8".to_string()))?;
        if text.trim().is_empty() {
            return Err(invalid("playlist is empty".to_string()));
        }

        Self::parse(&text).map_err(|e| invalid(format!("line {}: {}", e.line, e.reason)))
    }

    /// Parse playlist text.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut records = Vec::new();
        for (line, content) in logical_lines(text) {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record = parse_record(trimmed).map_err(|reason| ParseError { line, reason })?;
            records.push(record);
        }
        Ok(Self { records })
    }

    /// Unit locations in playback order.
    pub fn image_locations(&self) -> impl Iterator<Item = &Path> {
        self.records.iter().filter_map(|r| match r {
            PlaylistRecord::Image { location } => Some(location.as_path()),
            PlaylistRecord::Metadata { .. } => None,
        })
    }

    /// The rate of the last metadata record that carries one.
    pub fn frame_rate(&self) -> Option<FrameRate> {
        self.records.iter().rev().find_map(|r| match r {
            PlaylistRecord::Metadata { framerate } => *framerate,
            PlaylistRecord::Image { .. } => None,
        })
    }
}

/// Join escaped continuations; yields (first physical line number, text).
///
/// Comment lines are dropped here, so a trailing `\` on a comment never
/// pulls the next record into it, and a comment inside a continued record
/// does not end it.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (i, raw) in text.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.trim_start().starts_with('#') {
            continue;
        }
        let (number, mut buf) = pending.take().unwrap_or_else(|| (i + 1, String::new()));
        match raw.strip_suffix('\\') {
            Some(head) => {
                buf.push_str(head);
                pending = Some((number, buf));
            }
            None => {
                buf.push_str(raw);
                lines.push((number, buf));
            }
        }
    }
    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}

fn parse_record(line: &str) -> Result<PlaylistRecord, String> {
    let line = line.strip_suffix(';').unwrap_or(line);
    let mut fields = split_fields(line)?.into_iter();

    let kind = fields.next().map(|k| k.trim().to_string()).unwrap_or_default();
    if kind.is_empty() || kind.contains('=') {
        return Err("record has no kind".to_string());
    }

    let mut framerate = None;
    let mut location = None;
    for field in fields {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| format!("field {:?} is not key=value", field.trim()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err("field with empty key".to_string());
        }
        let (type_name, value) = split_type(value.trim())?;

        match (kind.as_str(), key) {
            ("metadata", "framerate") => {
                check_type(key, type_name, &["fraction", "GstFraction"])?;
                let rate = value
                    .parse::<FrameRate>()
                    .map_err(|_| format!("invalid framerate {value:?}"))?;
                framerate = Some(rate);
            }
            ("image", "location") => {
                check_type(key, type_name, &["string", "str", "s", "gchararray"])?;
                let value = unquote(value)?;
                if value.is_empty() {
                    return Err("empty location".to_string());
                }
                location = Some(PathBuf::from(value));
            }
            ("metadata" | "image", _) => {
                debug!(kind = %kind, key, "ignoring unknown playlist field")
            }
            _ => return Err(format!("unknown record kind {kind:?}")),
        }
    }

    match kind.as_str() {
        "metadata" => Ok(PlaylistRecord::Metadata { framerate }),
        "image" => location
            .map(|location| PlaylistRecord::Image { location })
            .ok_or_else(|| "image record without location".to_string()),
        _ => Err(format!("unknown record kind {kind:?}")),
    }
}

/// Split on commas outside double quotes.
fn split_fields(line: &str) -> Result<Vec<&str>, String> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    fields.push(&line[start..]);
    Ok(fields)
}

/// Split an optional `(type)` prefix off a value.
fn split_type(value: &str) -> Result<(Option<&str>, &str), String> {
    match value.strip_prefix('(') {
        Some(rest) => {
            let (type_name, rest) = rest
                .split_once(')')
                .ok_or_else(|| "unterminated type annotation".to_string())?;
            Ok((Some(type_name.trim()), rest.trim()))
        }
        None => Ok((None, value)),
    }
}

fn check_type(key: &str, type_name: Option<&str>, accepted: &[&str]) -> Result<(), String> {
    match type_name {
        Some(t) if !accepted.contains(&t) => Err(format!("field {key} cannot have type {t}")),
        _ => Ok(()),
    }
}

fn unquote(value: &str) -> Result<String, String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Ok(value.to_string());
    };
    let inner = inner
        .strip_suffix('"')
        .ok_or_else(|| "text after closing quote".to_string())?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return Err("dangling escape".to_string()),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}
