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
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::debug;

use crate::sinks::core::{MetricSink, SinkStats, SocketStats};
use crate::types::{LinkError, LinkResult};

/// Local address the sending socket binds to. Only IPv4 destinations are
/// supported so the wildcard IPv4 address is enough.
const BIND_ADDR: (&str, u16) = ("0.0.0.0", 0);

/// Reject endpoints that can't possibly be valid before doing any DNS or
/// socket work.
pub(crate) fn check_endpoint(host: &str, port: u16) -> LinkResult<()> {
    if host.is_empty() || port == 0 {
        Err(LinkError::InvalidEndpoint {
            host: host.to_owned(),
            port,
        })
    } else {
        Ok(())
    }
}

/// Resolve anything implementing `ToSocketAddrs` and keep the first IPv4
/// address. There's no round-robin and no fallback to later results.
fn get_ipv4_addr<A: ToSocketAddrs>(addr: A, host: &str) -> LinkResult<SocketAddr> {
    let resolution_failed = |source| LinkError::ResolutionFailed {
        host: host.to_owned(),
        source,
    };

    let mut addrs = addr.to_socket_addrs().map_err(resolution_failed)?;
    addrs.find(SocketAddr::is_ipv4).ok_or_else(|| {
        resolution_failed(io::Error::new(
            io::ErrorKind::NotFound,
            "no IPv4 address yielded",
        ))
    })
}

/// Implementation of a `MetricSink` that emits metrics over UDP.
///
/// The socket is never connected to the StatsD server. Every line is sent
/// with an explicit destination, so an ICMP port-unreachable reported for
/// an earlier datagram doesn't make later sends fail.
///
/// Each metric is sent to the StatsD server when the `.emit()` method is
/// called, in the thread of the caller. The socket is closed when the sink
/// is dropped.
#[derive(Debug)]
pub struct UdpMetricSink {
    addr: SocketAddr,
    socket: UdpSocket,
    stats: SocketStats,
}

impl UdpMetricSink {
    /// Resolve `host` once and open a non-blocking UDP socket for sending to
    /// it.
    ///
    /// # Failures
    ///
    /// * `InvalidEndpoint` if the host is empty or the port is zero, before
    ///   any lookup is attempted.
    /// * `ResolutionFailed` if the host doesn't resolve to an IPv4 address.
    /// * `SocketCreateFailed` if the local socket can't be created.
    pub fn open(host: &str, port: u16) -> LinkResult<UdpMetricSink> {
        check_endpoint(host, port)?;
        let addr = get_ipv4_addr((host, port), host)?;

        let socket = UdpSocket::bind(BIND_ADDR).map_err(LinkError::SocketCreateFailed)?;
        socket.set_nonblocking(true).map_err(LinkError::SocketCreateFailed)?;

        debug!(%addr, host, "opened UDP metric socket");
        Ok(UdpMetricSink {
            addr,
            socket,
            stats: SocketStats::default(),
        })
    }

    /// Construct a sink from an already bound socket.
    ///
    /// The socket should already be bound to a local address with any desired
    /// configuration applied (blocking vs non-blocking, timeouts, etc.). The
    /// endpoint is checked and resolved the same way `open` does it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::net::UdpSocket;
    /// use statslink::{UdpMetricSink, DEFAULT_PORT};
    ///
    /// let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
    /// let sink = UdpMetricSink::from("metrics.example.com", DEFAULT_PORT, socket);
    /// ```
    pub fn from(host: &str, port: u16, socket: UdpSocket) -> LinkResult<UdpMetricSink> {
        check_endpoint(host, port)?;
        let addr = get_ipv4_addr((host, port), host)?;
        Ok(UdpMetricSink {
            addr,
            socket,
            stats: SocketStats::default(),
        })
    }

    /// The resolved destination every datagram is sent to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn send_datagram(&self, metric: &[u8]) -> io::Result<usize> {
        let written = self.socket.send_to(metric, self.addr)?;
        if written != metric.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram write, {} of {} bytes", written, metric.len()),
            ));
        }
        Ok(written)
    }
}

impl MetricSink for UdpMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        self.stats.update(self.send_datagram(metric.as_bytes()), metric.len())
    }

    fn stats(&self) -> SinkStats {
        (&self.stats).into()
    }
}
