// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export the metric operation traits for easy glob imports
//!
//! # Example
//!
//! ```
//! use statslink::prelude::*;
//! use statslink::{Link, NopMetricSink};
//!
//! let link = Link::builder(NopMetricSink).namespace("pbx").build().unwrap();
//!
//! link.count("calls.total", 1, 1.0).unwrap();
//! link.increment("calls.started", 1.0).unwrap();
//! link.decrement("calls.active", 1.0).unwrap();
//! link.gauge("sessions_count", 45_u64).unwrap();
//! link.timing("calls.duration", 23_u64).unwrap();
//! ```

pub use crate::link::{Counted, CountedExt, Gauged, MetricClient, Timed};
