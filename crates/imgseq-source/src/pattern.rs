//! printf-style location patterns.
//!
//! Supports the integer conversions people actually put in frame names:
//! `%d`, `%i`, `%u`, with an optional `0` flag and field width (`%05d`,
//! `%4d`). `%%` is a literal percent sign. Exactly one placeholder is
//! required.

use crate::error::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Widest field accepted in a placeholder.
const MAX_WIDTH: usize = 32;

/// A parsed pattern, ready to produce the name for any index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPattern {
    raw: String,
    prefix: String,
    suffix: String,
    width: usize,
    zero_pad: bool,
}

impl LocationPattern {
    /// Parse a pattern string.
    pub fn parse(pattern: &str) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut placeholder: Option<(usize, bool)> = None;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if placeholder.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }

            let zero_pad = chars.peek() == Some(&'0');
            if zero_pad {
                chars.next();
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            match chars.next() {
                Some('d' | 'i' | 'u') => {}
                Some(_) => return Err(invalid("only %d, %i and %u conversions are supported")),
                None => return Err(invalid("pattern ends inside a placeholder")),
            }
            let width = if digits.is_empty() {
                0
            } else {
                digits.parse().map_err(|_| invalid("field width is not a number"))?
            };
            if width > MAX_WIDTH {
                return Err(invalid("field width is too large"));
            }
            if placeholder.replace((width, zero_pad)).is_some() {
                return Err(invalid("more than one placeholder"));
            }
        }

        let (width, zero_pad) = placeholder.ok_or_else(|| invalid("no integer placeholder"))?;
        Ok(Self {
            raw: pattern.to_string(),
            prefix,
            suffix,
            width,
            zero_pad,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitute `index` into the placeholder.
    pub fn format(&self, index: u32) -> String {
        let number = if self.zero_pad {
            format!("{:0width$}", index, width = self.width)
        } else {
            format!("{:>width$}", index, width = self.width)
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }

    /// Substitute `index` and return the result as a path.
    pub fn path_for(&self, index: u32) -> PathBuf {
        PathBuf::from(self.format(index))
    }
}
