// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::config::{ConfigError, ProbeConfig};
use crate::counters::HostCounters;
use crate::hooks::CallHooks;
use crate::poller::{Poller, PollerHandle};
use statslink::{Link, LinkError};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::info;

/// Reasons telemetry couldn't be started. The host should refuse to load
/// the module when it gets one of these.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not open metrics link: {0}")]
    Link(#[from] LinkError),

    #[error("could not start poller thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Telemetry for one telephony host: a `Link`, the poller feeding it host
/// counters and the hooks feeding it call events.
///
/// ```no_run
/// use std::sync::Arc;
/// use statslink_probe::{CallAttributes, ProbeConfig, StaticCounters, StatsModule};
///
/// let config = ProbeConfig::from_path("/etc/pbx/statsd.yaml").unwrap();
/// let module = StatsModule::load(config, Arc::new(StaticCounters::default())).unwrap();
///
/// let hooks = module.hooks();
/// hooks.on_call_start(&CallAttributes::new());
///
/// module.shutdown();
/// ```
#[derive(Debug)]
pub struct StatsModule {
    link: Arc<Link>,
    poller: Mutex<Option<PollerHandle>>,
}

impl StatsModule {
    /// Open the link described by `config` and start polling `counters`.
    pub fn load<C>(config: ProbeConfig, counters: Arc<C>) -> Result<StatsModule, ProbeError>
    where
        C: HostCounters + Send + Sync + 'static,
    {
        let link = match config.namespace.as_deref() {
            Some(ns) => {
                let link = Link::open_with_namespace(&config.host, config.port, ns)?;
                info!(host = %config.host, port = config.port, namespace = ns, "sending stats");
                link
            }
            None => {
                let link = Link::open(&config.host, config.port)?;
                info!(host = %config.host, port = config.port, "sending stats");
                link
            }
        };

        Self::start(Arc::new(link), counters, &config)
    }

    /// Like `load`, over an already built link (any sink).
    pub fn with_link<C>(link: Link, counters: Arc<C>, config: &ProbeConfig) -> Result<StatsModule, ProbeError>
    where
        C: HostCounters + Send + Sync + 'static,
    {
        Self::start(Arc::new(link), counters, config)
    }

    fn start<C>(link: Arc<Link>, counters: Arc<C>, config: &ProbeConfig) -> Result<StatsModule, ProbeError>
    where
        C: HostCounters + Send + Sync + 'static,
    {
        let poller = Poller::spawn(Arc::clone(&link), counters, config.poll_interval).map_err(ProbeError::Spawn)?;

        Ok(StatsModule {
            link,
            poller: Mutex::new(Some(poller)),
        })
    }

    pub fn hooks(&self) -> CallHooks {
        CallHooks::new(Arc::clone(&self.link))
    }

    pub fn link(&self) -> &Arc<Link> {
        &self.link
    }

    /// Stop the poller, then close the link. Later hook calls are harmless
    /// no-ops. Calling this more than once is safe.
    pub fn shutdown(&self) {
        let poller = self.poller.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(mut poller) = poller {
            poller.stop();
            info!("statsd telemetry stopped");
        }
        self.link.close();
    }
}

impl Drop for StatsModule {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::{ProbeError, StatsModule};
    use crate::config::ProbeConfig;
    use crate::counters::StaticCounters;
    use crate::hooks::CallAttributes;
    use statslink::{ErrorKind, Link, SpyMetricSink};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_load_invalid_endpoint() {
        let config = ProbeConfig {
            port: 0,
            ..ProbeConfig::default()
        };

        match StatsModule::load(config, Arc::new(StaticCounters::default())) {
            Err(ProbeError::Link(e)) => assert_eq!(ErrorKind::InvalidEndpoint, e.kind()),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_with_namespace() {
        let config = ProbeConfig {
            namespace: Some("pbx01".to_owned()),
            ..ProbeConfig::default()
        };
        let module = StatsModule::load(config, Arc::new(StaticCounters::default())).unwrap();

        assert_eq!("pbx01.", module.link().namespace());
        module.shutdown();
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (rx, sink) = SpyMetricSink::new();
        let config = ProbeConfig {
            poll_interval: Duration::from_secs(3600),
            ..ProbeConfig::default()
        };
        let module = StatsModule::with_link(Link::from_sink(sink), Arc::new(StaticCounters::default()), &config).unwrap();
        let hooks = module.hooks();

        module.shutdown();
        module.shutdown();
        hooks.on_call_start(&CallAttributes::new());

        assert!(module.link().is_closed());
        // Only the first poll made it out
        assert_eq!(6, rx.try_iter().count());
    }
}
