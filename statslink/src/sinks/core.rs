// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the datagrams a sink has written or dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub bytes_sent: u64,
    pub packets_sent: u64,
    pub bytes_dropped: u64,
    pub packets_dropped: u64,
}

#[derive(Debug, Default)]
pub(crate) struct SocketStats {
    bytes_sent: AtomicU64,
    packets_sent: AtomicU64,
    bytes_dropped: AtomicU64,
    packets_dropped: AtomicU64,
}

impl SocketStats {
    pub(crate) fn update(&self, res: io::Result<usize>, len: usize) -> io::Result<usize> {
        match res {
            Ok(written) => {
                self.bytes_sent.fetch_add(written as u64, Ordering::Relaxed);
                self.packets_sent.fetch_add(1, Ordering::Relaxed);
                Ok(written)
            }
            Err(e) => {
                self.bytes_dropped.fetch_add(len as u64, Ordering::Relaxed);
                self.packets_dropped.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}

impl From<&SocketStats> for SinkStats {
    fn from(stats: &SocketStats) -> Self {
        SinkStats {
            bytes_sent: stats.bytes_sent.load(Ordering::Relaxed),
            packets_sent: stats.packets_sent.load(Ordering::Relaxed),
            bytes_dropped: stats.bytes_dropped.load(Ordering::Relaxed),
            packets_dropped: stats.packets_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Trait for the backends a `Link` writes encoded lines to.
///
/// Each call to `emit` is given exactly one complete StatsD line with no
/// trailing newline, and should write it as one unit (for UDP, one
/// datagram). Sinks never retry and never queue: a line that can't be
/// written right away is reported as an error and dropped.
///
/// ``` text
/// pbx.sessions_count:12|g
/// pbx.calls.started:1|c|@0.50
/// pbx.calls.duration:61000|ms
/// ```
pub trait MetricSink {
    /// Write a single line and return the number of bytes written or an I/O
    /// error.
    ///
    /// Sinks that don't touch the network (such as `NopMetricSink`) may
    /// return `0`. Callers should *NOT* interpret that as an error.
    fn emit(&self, metric: &str) -> io::Result<usize>;

    /// Return I/O telemetry like bytes / packets sent or dropped.
    ///
    /// Note that not all sinks implement this method and the default
    /// implementation returns zeros.
    fn stats(&self) -> SinkStats {
        SinkStats::default()
    }
}

/// Implementation of a `MetricSink` that discards all metrics.
///
/// Useful for disabling metric collection or unit tests.
#[derive(Debug, Clone)]
pub struct NopMetricSink;

impl MetricSink for NopMetricSink {
    fn emit(&self, _metric: &str) -> io::Result<usize> {
        Ok(0)
    }
}
