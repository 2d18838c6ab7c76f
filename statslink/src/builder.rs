// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{LinkError, LinkResult, MetricKind};
use std::borrow::Cow;
use std::fmt::{self, Write};

mod byte_str;
pub(crate) mod sample_rate;
pub(crate) mod sampler;

pub(crate) use self::sample_rate::SampleRate;

/// Characters with a meaning in the StatsD line format.
const DELIMITERS: [char; 3] = [':', '|', '@'];

/// Replacement for any delimiter found in a stat name.
const REPLACEMENT: &str = "_";

/// Replace every StatsD delimiter (`:`, `|`, `@`) in a stat name with `_`.
///
/// Names without delimiters are borrowed as-is. The caller's string is never
/// modified. Sanitizing an already sanitized name returns it unchanged.
///
/// # Example
///
/// ```
/// use statslink::sanitize;
///
/// assert_eq!("calls_total_c", sanitize("calls:total|c"));
/// assert_eq!("user_host", sanitize("user@host"));
/// assert_eq!("already.clean", sanitize("already.clean"));
/// ```
pub fn sanitize(stat: &str) -> Cow<'_, str> {
    if has_delimiters(stat) {
        Cow::Owned(stat.replace(DELIMITERS, REPLACEMENT))
    } else {
        Cow::Borrowed(stat)
    }
}

/// True when `s` contains a character with a meaning in the line format.
pub(crate) fn has_delimiters(s: &str) -> bool {
    s.contains(DELIMITERS)
}

/// Holder for primitive metric values that knows how to display itself
///
/// Values are rendered as plain decimal integers: no padding, no digit
/// separators, no locale formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Signed(i64),
    Unsigned(u64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Signed(v) => v.fmt(f),
            MetricValue::Unsigned(v) => v.fmt(f),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Signed(v)
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Unsigned(v)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MetricFormatter<'a> {
    prefix: &'a str,
    key: Cow<'a, str>,
    val: MetricValue,
    kind: MetricKind,
    sample_rate: Option<SampleRate>,
    newline: bool,
    base_size: usize,
}

impl<'a> MetricFormatter<'a> {
    pub(crate) fn new(prefix: &'a str, key: &'a str, val: MetricValue, kind: MetricKind) -> Self {
        let key = sanitize(key);
        MetricFormatter {
            prefix,
            val,
            kind,
            sample_rate: None,
            newline: false,
            // name, separator, value (at most 20 digits for an i64/u64), pipe and type
            base_size: prefix.len() + key.len() + 1 + 20 + 1 + 2,
            key,
        }
    }

    /// Attach a sample rate. It is only written for metric kinds that may be
    /// sampled, and only when it isn't full sampling.
    pub(crate) fn with_sample_rate(&mut self, rate: SampleRate) {
        if rate.is_applicable_to_metric(self.kind) {
            self.sample_rate = Some(rate);
        }
    }

    /// Terminate the line with `\n`, for callers that pack several lines
    /// into one payload themselves.
    pub(crate) fn with_newline(&mut self) {
        self.newline = true;
    }

    fn size_hint(&self) -> usize {
        let rate = self.sample_rate.map_or(0, |r| 1 /* | */ + r.kv_size());
        self.base_size + rate + usize::from(self.newline)
    }

    pub(crate) fn format(&self) -> String {
        let mut out = String::with_capacity(self.size_hint());
        let _ = write!(out, "{}{}:{}|{}", self.prefix, self.key, self.val, self.kind);
        if let Some(rate) = self.sample_rate {
            out.push('|');
            out.push_str(rate.as_str());
        }
        if self.newline {
            out.push('\n');
        }
        out
    }

    /// Format the line, rejecting it when it would be longer than `max`
    /// bytes. Lines are never truncated since that would corrupt the stat.
    pub(crate) fn format_bounded(&self, max: usize) -> LinkResult<String> {
        let line = self.format();
        if line.len() > max {
            Err(LinkError::MessageTooLong { len: line.len(), max })
        } else {
            Ok(line)
        }
    }
}
