// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A best-effort StatsD link for Rust.
//!
//! Statslink sends counters, gauges and timings to a StatsD server over UDP,
//! one plain-text line per datagram. It is meant for telemetry from hosts
//! that can't afford to block on metrics: nothing is retried, nothing is
//! queued, and a lost datagram is simply a lost sample.
//!
//! ## Features
//!
//! * Counters, gauges and timings in the standard StatsD line format.
//! * Optional namespace prepended to every stat name.
//! * Client side sampling for counters, with the rate written on the wire.
//! * Stat name sanitizing so a name can never break the line format.
//! * Alternate backends via the `MetricSink` trait.
//!
//! ## Usage
//!
//! ### Simple Use
//!
//! Open a link to a StatsD server and send a few metrics. The host is
//! resolved once, when the link is opened.
//!
//! ```rust,no_run
//! use statslink::prelude::*;
//! use statslink::{Link, DEFAULT_HOST, DEFAULT_PORT};
//!
//! let link = Link::open_with_namespace(DEFAULT_HOST, DEFAULT_PORT, "pbx01").unwrap();
//!
//! // pbx01.calls.started:1|c
//! link.increment("calls.started", 1.0).unwrap();
//!
//! // pbx01.sessions_count:12|g
//! link.gauge("sessions_count", 12_u64).unwrap();
//!
//! // pbx01.calls.duration:61000|ms
//! link.timing("calls.duration", 61_000_u64).unwrap();
//!
//! link.close();
//! ```
//!
//! ### Sampling
//!
//! Counters accept a sample rate in `(0, 1]`. Below `1.0` only that fraction
//! of calls is sent, each carrying the rate so the server can scale the
//! count back up. Calls that are sampled out return `Emission::Skipped`.
//!
//! ```rust,no_run
//! use statslink::prelude::*;
//! use statslink::{Emission, Link, DEFAULT_PORT};
//!
//! let link = Link::open("127.0.0.1", DEFAULT_PORT).unwrap();
//!
//! // calls.routed:1|c|@0.10, about one call in ten
//! match link.increment("calls.routed", 0.1) {
//!     Ok(Emission::Sent { bytes }) => println!("sent {} bytes", bytes),
//!     Ok(Emission::Skipped) => {}
//!     Err(e) => eprintln!("metric failed: {}", e),
//! }
//! ```
//!
//! ### Custom Sinks
//!
//! A `Link` writes every encoded line to a `MetricSink`. `UdpMetricSink` is
//! used by `Link::open`. `NopMetricSink` discards everything and
//! `SpyMetricSink` hands each line to a channel, which is handy in tests.
//!
//! ```rust
//! use statslink::prelude::*;
//! use statslink::{Link, SpyMetricSink};
//!
//! let (rx, sink) = SpyMetricSink::new();
//! let link = Link::builder(sink).namespace("test").build().unwrap();
//!
//! link.count("calls.total", 3, 1.0).unwrap();
//! assert_eq!("test.calls.total:3|c", rx.recv().unwrap());
//! ```
//!
//! ### Sharing a Link
//!
//! `Link` is `Send` and `Sync`, so a single instance wrapped in an `Arc` can
//! be used by a polling thread and by event handlers at the same time.
//! Closing the link while other threads hold it is safe: their later sends
//! fail with `LinkError::LinkUnavailable`.

#![forbid(unsafe_code)]

pub use self::builder::{sanitize, MetricValue};

pub use self::link::{Link, LinkBuilder, DEFAULT_MAX_MESSAGE_LEN};

pub use self::sinks::{MetricSink, NopMetricSink, SinkStats, SpyMetricSink, UdpMetricSink};

pub use self::types::{Emission, ErrorKind, LinkError, LinkResult, MetricKind};

pub mod ext;
pub mod prelude;

mod builder;
mod link;
mod sinks;
mod types;

/// Default port used by StatsD servers.
pub const DEFAULT_PORT: u16 = 8125;

/// Default host a StatsD server is expected to listen on.
pub const DEFAULT_HOST: &str = "127.0.0.1";
