// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::io;
use thiserror::Error;

/// Type of metric that knows how to display itself as a wire token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Timer,
}

impl MetricKind {
    /// Only counters carry a `|@rate` suffix. Gauges and timers are always
    /// sent at full rate.
    pub(crate) fn is_sampled(self) -> bool {
        matches!(self, MetricKind::Counter)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricKind::Counter => "c".fmt(f),
            MetricKind::Gauge => "g".fmt(f),
            MetricKind::Timer => "ms".fmt(f),
        }
    }
}

/// Outcome of a metric operation that didn't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// The metric was encoded and written as a single datagram.
    Sent { bytes: usize },
    /// The sampler decided not to emit this metric.
    Skipped,
}

impl Emission {
    pub fn is_sent(&self) -> bool {
        matches!(self, Emission::Sent { .. })
    }
}

/// Broad category of a `LinkError`, useful for matching without caring
/// about the context carried by each error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEndpoint,
    ResolutionFailed,
    SocketCreateFailed,
    InvalidNamespace,
    LinkUnavailable,
    SendFailed,
    MessageTooLong,
    InvalidInput,
}

/// Errors raised while opening a `Link` or emitting metrics through it.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid endpoint {host:?}:{port}, host must be non-empty and port non-zero")]
    InvalidEndpoint { host: String, port: u16 },

    #[error("failed to resolve {host}: {source}")]
    ResolutionFailed {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to create UDP socket: {0}")]
    SocketCreateFailed(#[source] io::Error),

    #[error("namespace must be non-empty and must not contain ':', '|' or '@'")]
    InvalidNamespace,

    #[error("link is closed")]
    LinkUnavailable,

    #[error("failed to send metric: {0}")]
    SendFailed(#[source] io::Error),

    #[error("encoded metric is {len} bytes, limit is {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl LinkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkError::InvalidEndpoint { .. } => ErrorKind::InvalidEndpoint,
            LinkError::ResolutionFailed { .. } => ErrorKind::ResolutionFailed,
            LinkError::SocketCreateFailed(_) => ErrorKind::SocketCreateFailed,
            LinkError::InvalidNamespace => ErrorKind::InvalidNamespace,
            LinkError::LinkUnavailable => ErrorKind::LinkUnavailable,
            LinkError::SendFailed(_) => ErrorKind::SendFailed,
            LinkError::MessageTooLong { .. } => ErrorKind::MessageTooLong,
            LinkError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Integer status for hosts that expect C style return codes: `-2` when
    /// the link is unavailable and `-1` for every other failure.
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::LinkUnavailable => -2,
            _ => -1,
        }
    }
}

pub type LinkResult<T> = Result<T, LinkError>;
