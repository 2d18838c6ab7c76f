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
use statslink::{Emission, Link, LinkResult};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

pub const DURATION: &str = "duration";
pub const ANSWER_SECONDS: &str = "answersec";
pub const HOLD_SECONDS: &str = "hold_accum_seconds";
pub const HANGUP_CAUSE: &str = "hangup_cause";
pub const SIP_DISPOSITION: &str = "sip_hangup_disposition";

/// String attributes of a call, as reported by the host when a session
/// starts or ends.
///
/// ```
/// use statslink_probe::CallAttributes;
///
/// let attrs: CallAttributes = [("duration", "61"), ("hangup_cause", "NORMAL_CLEARING")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(Some("61"), attrs.get("duration"));
/// assert_eq!(None, attrs.get("answersec"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallAttributes {
    values: HashMap<String, String>,
}

impl CallAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
        self
    }

    /// The attribute's value, with surrounding whitespace removed. Empty
    /// values are treated as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    /// Parse a whole number of seconds, `None` when missing or invalid.
    fn seconds(&self, key: &str) -> Option<u64> {
        let raw = self.get(key)?;
        match raw.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                debug!(attribute = key, value = raw, error = %e, "skipping unparsable call attribute");
                None
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for CallAttributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CallAttributes {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Call lifecycle entry points for the host.
///
/// Cloning is cheap and every clone shares the same `Link`. Hooks return
/// nothing: metric failures are logged and dropped, panics are caught so
/// nothing unwinds into the host.
#[derive(Debug, Clone)]
pub struct CallHooks {
    link: Arc<Link>,
}

impl CallHooks {
    pub fn new(link: Arc<Link>) -> Self {
        CallHooks { link }
    }

    /// Count a new call.
    pub fn on_call_start(&self, _attrs: &CallAttributes) {
        self.guarded("call_start", |link| {
            record(link.increment("calls.started", 1.0), "calls.started");
        });
    }

    /// Count a finished call and record its timings, hangup cause and SIP
    /// disposition. Missing attributes are skipped.
    pub fn on_call_end(&self, attrs: &CallAttributes) {
        self.guarded("call_end", |link| {
            record(link.increment("calls.ended", 1.0), "calls.ended");

            let timings = [
                ("calls.duration", DURATION),
                ("calls.answer_time", ANSWER_SECONDS),
                ("calls.hold_time", HOLD_SECONDS),
            ];
            for (stat, key) in timings {
                if let Some(secs) = attrs.seconds(key) {
                    record(link.timing(stat, secs.saturating_mul(1_000)), stat);
                }
            }

            if let Some(cause) = attrs.get(HANGUP_CAUSE) {
                let stat = format!("calls.hangup_cause.{}", cause.to_lowercase());
                record(link.increment(&stat, 1.0), &stat);
            }

            if let Some(disposition) = attrs.get(SIP_DISPOSITION) {
                let stat = format!("calls.sip_disposition.{}", disposition);
                record(link.increment(&stat, 1.0), &stat);
            }
        });
    }

    fn guarded<F>(&self, hook: &'static str, f: F)
    where
        F: FnOnce(&Link),
    {
        let link = self.link.as_ref();
        if panic::catch_unwind(AssertUnwindSafe(|| f(link))).is_err() {
            error!(hook, "call hook panicked");
        }
    }
}

fn record(res: LinkResult<Emission>, stat: &str) {
    if let Err(e) = res {
        debug!(stat, error = %e, "dropped call metric");
    }
}
