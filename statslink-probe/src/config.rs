// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use serde::{Deserialize, Deserializer};
use statslink::{DEFAULT_HOST, DEFAULT_PORT};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Seconds between two polls of the host counters unless configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Errors loading the probe configuration. A file that exists but can't be
/// read or parsed is never silently replaced by defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Where to send metrics and how often to poll the host.
///
/// ```yaml
/// host: metrics.example.com
/// port: 8125
/// namespace: pbx01
/// poll_interval_secs: 10
/// ```
///
/// Every key is optional: missing keys take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// StatsD hostname
    pub host: String,
    /// StatsD port
    pub port: u16,
    /// Prefix for every stat. Empty is the same as unset.
    #[serde(deserialize_with = "non_empty")]
    pub namespace: Option<String>,
    #[serde(rename = "poll_interval_secs", deserialize_with = "seconds")]
    pub poll_interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            namespace: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ProbeConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping
        if yaml.trim().is_empty() {
            return Ok(ProbeConfig::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let ns = Option::<String>::deserialize(deserializer)?;
    Ok(ns.filter(|ns| !ns.is_empty()))
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = u64::deserialize(deserializer)?;
    if secs == 0 {
        return Err(serde::de::Error::custom("poll_interval_secs must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}
