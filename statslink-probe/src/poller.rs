// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::counters::{poll_once, HostCounters};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use statslink::Link;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

const THREAD_NAME: &str = "statslink-poller";

/// Periodically emits the host counters as gauges from a dedicated thread.
///
/// The first poll happens as soon as the thread starts, the following ones
/// every `interval`. A panic raised by the host counters is logged and the
/// poller carries on with the next tick.
pub struct Poller<C>
where
    C: HostCounters + Send + Sync + 'static,
{
    link: Arc<Link>,
    counters: Arc<C>,
    interval: Duration,
}

impl<C> Poller<C>
where
    C: HostCounters + Send + Sync + 'static,
{
    pub fn new(link: Arc<Link>, counters: Arc<C>, interval: Duration) -> Self {
        Poller {
            link,
            counters,
            interval,
        }
    }

    /// Start polling in a new thread, returning a handle used to stop it.
    pub fn spawn(link: Arc<Link>, counters: Arc<C>, interval: Duration) -> io::Result<PollerHandle> {
        Self::new(link, counters, interval).start()
    }

    pub fn start(self) -> io::Result<PollerHandle> {
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_owned())
            .spawn(move || self.run(shutdown_rx))?;

        Ok(PollerHandle {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    fn run(self, shutdown: Receiver<()>) {
        debug!(interval = ?self.interval, "starting poll for metrics");
        let ticker = tick(self.interval);

        self.poll();
        loop {
            select! {
                // Either an explicit stop or the handle being dropped
                recv(shutdown) -> _ => break,
                recv(ticker) -> _ => self.poll(),
            }
        }

        debug!("poller is done");
    }

    fn poll(&self) {
        let res = panic::catch_unwind(AssertUnwindSafe(|| poll_once(&self.link, self.counters.as_ref())));
        if res.is_err() {
            error!("host counters panicked during poll");
        }
    }
}

/// Owner of a running poller thread. Stopping (or dropping) the handle ends
/// the polling loop and waits for the thread to exit.
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PollerHandle {
    /// Stop the polling loop and join its thread. Stopping more than once
    /// is a no-op.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("poller thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
