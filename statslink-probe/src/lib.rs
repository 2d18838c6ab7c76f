// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Telephony host telemetry over `statslink`.
//!
//! `statslink-probe` wires a `statslink::Link` into a telephony host. It
//! reads where to send metrics from a small YAML file, polls the host's
//! session and database counters on an interval, and turns call start and
//! call end events into counters and timings.
//!
//! ## Usage
//!
//! The host implements `HostCounters` and loads a `StatsModule` on startup.
//! Call events are passed to the `CallHooks` handed out by the module.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use statslink_probe::{CallAttributes, ProbeConfig, StaticCounters, StatsModule};
//!
//! let config = ProbeConfig::from_yaml_str("host: 127.0.0.1\nnamespace: pbx01\n").unwrap();
//! let counters = Arc::new(StaticCounters::default());
//! let module = StatsModule::load(config, counters).unwrap();
//!
//! let hooks = module.hooks();
//! hooks.on_call_start(&CallAttributes::new());
//!
//! let mut attrs = CallAttributes::new();
//! attrs.insert("duration", "61").insert("hangup_cause", "NORMAL_CLEARING");
//! hooks.on_call_end(&attrs);
//!
//! module.shutdown();
//! ```
//!
//! ## Metrics
//!
//! Gauges, every poll interval:
//!
//! * `sessions_since_startup`, `sessions_count`, `sessions_count_peak`
//! * `sessions_per_second`, `sessions_per_second_peak`, `sessions_per_second_5min`
//! * `call_count`, `channel_count`, `registration_count` when the host has
//!   a database
//!
//! Per call:
//!
//! * `calls.started`, `calls.ended`
//! * `calls.duration`, `calls.answer_time`, `calls.hold_time` in ms
//! * `calls.hangup_cause.<cause>`, `calls.sip_disposition.<disposition>`

#![forbid(unsafe_code)]

pub use self::config::{ConfigError, ProbeConfig, DEFAULT_POLL_INTERVAL};
pub use self::counters::{poll_once, DatabaseCounts, HostCounters, StaticCounters};
pub use self::hooks::{CallAttributes, CallHooks};
pub use self::module::{ProbeError, StatsModule};
pub use self::poller::{Poller, PollerHandle};

pub mod hooks;

mod config;
mod counters;
mod module;
mod poller;
