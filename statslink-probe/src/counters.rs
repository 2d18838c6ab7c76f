// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use statslink::prelude::*;
use statslink::Link;
use tracing::{debug, warn};

/// Row counts read from the host's core database on each poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseCounts {
    pub calls: u64,
    pub channels: u64,
    pub registrations: u64,
}

/// Session and database counters exposed by the telephony host.
///
/// Implemented by the host integration. Every method is called once per
/// poll from the polling thread, so implementations must be cheap and must
/// not block for long.
pub trait HostCounters {
    /// Sessions created since the host started.
    fn sessions_since_startup(&self) -> u64;

    /// Sessions currently active.
    fn session_count(&self) -> u64;

    /// Most sessions active at once since startup.
    fn sessions_peak(&self) -> u64;

    /// Sessions created during the last second.
    fn sessions_per_second(&self) -> u64;

    /// Highest sessions per second since startup.
    fn sessions_per_second_peak(&self) -> u64;

    /// Highest sessions per second over the last five minutes.
    fn sessions_peak_five_min(&self) -> u64;

    /// Call, channel and registration counts for this host, or `None` when
    /// the host has no database handle to count them from.
    fn database_counts(&self) -> Option<DatabaseCounts>;
}

fn record_gauge(link: &Link, stat: &str, value: u64) -> bool {
    match link.gauge(stat, value) {
        Ok(_) => true,
        Err(e) => {
            debug!(stat, error = %e, "dropped gauge");
            false
        }
    }
}

/// Read every host counter once and emit it as a gauge.
///
/// Send errors are logged and the remaining gauges are still sent. Returns
/// the number of gauges that were written.
pub fn poll_once<C>(link: &Link, counters: &C) -> usize
where
    C: HostCounters + ?Sized,
{
    let mut gauges = vec![
        ("sessions_since_startup", counters.sessions_since_startup()),
        ("sessions_count", counters.session_count()),
        ("sessions_count_peak", counters.sessions_peak()),
        ("sessions_per_second", counters.sessions_per_second()),
        ("sessions_per_second_peak", counters.sessions_per_second_peak()),
        ("sessions_per_second_5min", counters.sessions_peak_five_min()),
    ];

    match counters.database_counts() {
        Some(db) => gauges.extend([
            ("call_count", db.calls),
            ("channel_count", db.channels),
            ("registration_count", db.registrations),
        ]),
        None => warn!("no database to output calls or channels"),
    }

    let sent = gauges
        .into_iter()
        .filter(|(stat, value)| record_gauge(link, stat, *value))
        .count();

    if sent == 0 {
        warn!(closed = link.is_closed(), "no host gauges could be sent");
    }
    sent
}

/// Fixed counters, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticCounters {
    pub sessions_since_startup: u64,
    pub session_count: u64,
    pub sessions_peak: u64,
    pub sessions_per_second: u64,
    pub sessions_per_second_peak: u64,
    pub sessions_peak_five_min: u64,
    pub database: Option<DatabaseCounts>,
}

impl HostCounters for StaticCounters {
    fn sessions_since_startup(&self) -> u64 {
        self.sessions_since_startup
    }

    fn session_count(&self) -> u64 {
        self.session_count
    }

    fn sessions_peak(&self) -> u64 {
        self.sessions_peak
    }

    fn sessions_per_second(&self) -> u64 {
        self.sessions_per_second
    }

    fn sessions_per_second_peak(&self) -> u64 {
        self.sessions_per_second_peak
    }

    fn sessions_peak_five_min(&self) -> u64 {
        self.sessions_peak_five_min
    }

    fn database_counts(&self) -> Option<DatabaseCounts> {
        self.database
    }
}
