// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Extension points for the Statslink library
//!
//! The `To*Value` traits mark the types that are valid for each kind of
//! metric and hold the conversion logic for them (such as turning a
//! `Duration` into whole milliseconds). Implement them for your own types
//! to pass those straight to `count`, `gauge` or `timing`.
//!
//! ```
//! use statslink::ext::ToGaugeValue;
//! use statslink::prelude::*;
//! use statslink::{Link, LinkResult, MetricValue, SpyMetricSink};
//!
//! struct Registrations(u32);
//!
//! impl ToGaugeValue for Registrations {
//!     fn try_to_value(self) -> LinkResult<MetricValue> {
//!         Ok(MetricValue::Unsigned(u64::from(self.0)))
//!     }
//! }
//!
//! let (rx, sink) = SpyMetricSink::new();
//! let link = Link::from_sink(sink);
//!
//! link.gauge("registration_count", Registrations(4)).unwrap();
//! assert_eq!("registration_count:4|g", rx.recv().unwrap());
//! ```

pub use crate::builder::MetricValue;
pub use crate::link::{ToCounterValue, ToGaugeValue, ToTimerValue};
