use statslink::prelude::*;
use statslink::Link;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Route `tracing` output from the link through the test harness so that
/// send failures and socket events show up for failing tests.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub const NUM_THREADS: u64 = 100;
#[allow(dead_code)]
pub const NUM_ITERATIONS: u64 = 1_000;

/// Hammer a shared link from `num_threads` threads, the way a polling loop
/// and call event handlers would share one.
#[allow(dead_code)]
pub fn run_arc_threaded_test(link: Link, num_threads: u64, iterations: u64) -> Arc<Link> {
    let shared_link = Arc::new(link);

    let threads: Vec<_> = (0..num_threads)
        .map(|_| {
            let local_link = Arc::clone(&shared_link);

            thread::spawn(move || {
                for i in 0..iterations {
                    local_link.count("some.counter", i as i64, 1.0).unwrap();
                    local_link.increment("some.counter", 1.0).unwrap();
                    local_link.decrement("some.counter", 1.0).unwrap();
                    local_link.timing("some.timer", i).unwrap();
                    local_link.timing("some.timer", Duration::from_millis(i)).unwrap();
                    local_link.gauge("some.gauge", i).unwrap();
                    local_link.gauge("some.gauge", i as i64).unwrap();
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }

    shared_link
}
