// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sinks::core::{MetricSink, SinkStats, SocketStats};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::io;

/// `MetricSink` implementation that writes every line to the `Sender` half of
/// a channel while callers are given ownership of the `Receiver` half.
///
/// This is not a general purpose sink, rather it's a sink meant for verifying
/// metrics written during the course of integration tests. By default, the
/// channel used is unbounded. The channel size can be limited using the
/// `with_capacity` method, in which case writes to a full channel fail just
/// like a UDP send would.
#[derive(Debug)]
pub struct SpyMetricSink {
    sender: Sender<String>,
    stats: SocketStats,
}

impl SpyMetricSink {
    pub fn new() -> (Receiver<String>, Self) {
        Self::with_queue_capacity(None)
    }

    pub fn with_capacity(queue: usize) -> (Receiver<String>, Self) {
        Self::with_queue_capacity(Some(queue))
    }

    fn with_queue_capacity(queue: Option<usize>) -> (Receiver<String>, Self) {
        let (tx, rx) = match queue {
            Some(sz) => bounded(sz),
            None => unbounded(),
        };
        let sink = SpyMetricSink {
            sender: tx,
            stats: SocketStats::default(),
        };
        (rx, sink)
    }
}

impl MetricSink for SpyMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        let res = match self.sender.try_send(metric.to_owned()) {
            Err(TrySendError::Disconnected(_)) => Err(io::Error::new(io::ErrorKind::Other, "channel disconnected")),
            Err(TrySendError::Full(_)) => Err(io::Error::new(io::ErrorKind::Other, "channel full")),
            Ok(_) => Ok(metric.len()),
        };
        self.stats.update(res, metric.len())
    }

    fn stats(&self) -> SinkStats {
        (&self.stats).into()
    }
}

#[cfg(test)]
mod test {
    use super::{MetricSink, SpyMetricSink};

    #[test]
    fn test_spy_metric_sink() {
        let (rx, sink) = SpyMetricSink::new();
        sink.emit("buz:1|c").unwrap();

        assert_eq!("buz:1|c", rx.recv().unwrap());
    }

    #[test]
    fn test_spy_metric_sink_full() {
        let (_rx, sink) = SpyMetricSink::with_capacity(1);
        sink.emit("foo:1|c").unwrap();

        assert!(sink.emit("foo:2|c").is_err());
        assert_eq!(1, sink.stats().packets_sent);
        assert_eq!(1, sink.stats().packets_dropped);
    }

    #[test]
    fn test_spy_metric_sink_disconnected() {
        let (rx, sink) = SpyMetricSink::new();
        drop(rx);

        assert!(sink.emit("foo:1|c").is_err());
    }
}
