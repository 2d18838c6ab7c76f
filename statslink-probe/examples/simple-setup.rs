// Statslink - A best-effort StatsD link for Rust
//
// To the extent possible under law, the author(s) have dedicated all copyright and
// related and neighboring rights to this file to the public domain worldwide.
// This software is distributed without any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication along with this
// software. If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.

use statslink_probe::{CallAttributes, DatabaseCounts, ProbeConfig, StaticCounters, StatsModule};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let config = ProbeConfig::from_yaml_str("namespace: example.pbx\npoll_interval_secs: 1\n").unwrap();
    let counters = StaticCounters {
        sessions_since_startup: 42,
        session_count: 3,
        sessions_peak: 10,
        database: Some(DatabaseCounts {
            calls: 2,
            channels: 3,
            registrations: 17,
        }),
        ..StaticCounters::default()
    };

    let module = StatsModule::load(config, Arc::new(counters)).unwrap();
    let hooks = module.hooks();

    hooks.on_call_start(&CallAttributes::new());
    thread::sleep(Duration::from_secs(2));

    let attrs: CallAttributes = [
        ("duration", "2"),
        ("answersec", "1"),
        ("hangup_cause", "NORMAL_CLEARING"),
        ("sip_hangup_disposition", "send_bye"),
    ]
    .into_iter()
    .collect();
    hooks.on_call_end(&attrs);

    module.shutdown();
}
