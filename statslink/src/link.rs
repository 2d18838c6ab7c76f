// Statslink - A best-effort StatsD link for Rust
//
// Copyright 2026 The Statslink Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::sampler::Sampler;
use crate::builder::{has_delimiters, MetricFormatter, MetricValue, SampleRate};
use crate::sinks::{MetricSink, SinkStats, UdpMetricSink};
use crate::types::{Emission, LinkError, LinkResult, MetricKind};
use std::fmt;
use std::panic::RefUnwindSafe;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Largest encoded line a `Link` will send unless configured otherwise.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 1024;

type BoxedSink = Box<dyn MetricSink + Sync + Send + RefUnwindSafe>;

/// Conversion trait for valid values for counters
///
/// This trait must be implemented for any types that are used as counter
/// deltas (currently `i64` and `i32`).
pub trait ToCounterValue {
    fn try_to_value(self) -> LinkResult<MetricValue>;
}

impl ToCounterValue for i64 {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

impl ToCounterValue for i32 {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        Ok(MetricValue::Signed(i64::from(self)))
    }
}

/// Conversion trait for valid values for timers
///
/// Timers are sent in whole milliseconds. Plain integers are taken to
/// already be milliseconds, `Duration`s are converted (and truncated).
pub trait ToTimerValue {
    fn try_to_value(self) -> LinkResult<MetricValue>;
}

impl ToTimerValue for u64 {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToTimerValue for i64 {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

impl ToTimerValue for Duration {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        u64::try_from(self.as_millis())
            .map(MetricValue::Unsigned)
            .map_err(|_| LinkError::InvalidInput("u64 overflow"))
    }
}

/// Conversion trait for valid values for gauges
///
/// This trait must be implemented for any types that are used as gauge
/// values (currently `u64`, `i64` and `u32`).
pub trait ToGaugeValue {
    fn try_to_value(self) -> LinkResult<MetricValue>;
}

impl ToGaugeValue for u64 {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToGaugeValue for i64 {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

impl ToGaugeValue for u32 {
    fn try_to_value(self) -> LinkResult<MetricValue> {
        Ok(MetricValue::Unsigned(u64::from(self)))
    }
}

/// Trait for incrementing and decrementing counters.
///
/// Counters are simple values incremented or decremented by a client. The
/// rates at which these events occur or average values will be determined
/// by the server receiving them. Examples of counter uses include number
/// of logins to a system or requests received.
///
/// The sample rate is the probability, in `(0, 1]`, that this particular
/// call is actually sent. When it's below `1.0` the line carries a `|@rate`
/// suffix so the server can scale the count back up.
///
/// See the [StatsD metric types](https://github.com/statsd/statsd/blob/master/docs/metric_types.md) for more
/// information.
pub trait Counted<T>
where
    T: ToCounterValue,
{
    /// Add `delta` to the counter `stat`.
    fn count(&self, stat: &str, delta: T, sample_rate: f32) -> LinkResult<Emission>;
}

/// Trait for convenience methods for counters
///
/// This trait specifically implements increment and decrement convenience
/// methods for counters with `i64` types.
pub trait CountedExt: Counted<i64> {
    /// Increment the counter by 1
    fn increment(&self, stat: &str, sample_rate: f32) -> LinkResult<Emission> {
        self.count(stat, 1, sample_rate)
    }

    /// Decrement the counter by 1
    fn decrement(&self, stat: &str, sample_rate: f32) -> LinkResult<Emission> {
        self.count(stat, -1, sample_rate)
    }
}

/// Trait for recording timings in milliseconds.
///
/// Timings are a positive number of milliseconds between a start and end
/// time. Examples include the length of a call or the time before it was
/// answered. Timings are never sampled.
pub trait Timed<T>
where
    T: ToTimerValue,
{
    /// Record a timing in milliseconds with the given key
    fn timing(&self, stat: &str, ms: T) -> LinkResult<Emission>;
}

/// Trait for recording gauge values.
///
/// Gauge values are an instantaneous measurement of a value determined by
/// the client. They do not change unless changed by the client. Examples
/// include things like the number of active sessions or registrations.
/// Gauges are never sampled since a dropped gauge would leave the previous
/// value standing at the server.
pub trait Gauged<T>
where
    T: ToGaugeValue,
{
    /// Record a gauge value with the given key
    fn gauge(&self, stat: &str, value: T) -> LinkResult<Emission>;
}

/// Trait that encompasses all other traits for sending metrics.
///
/// If you wish to use `Link` with a generic type or place a `Link` instance
/// behind a pointer (such as a `Box`) this will allow you to reference all
/// the implemented methods for recording metrics, while using a single
/// trait.
///
/// ```
/// use std::sync::Arc;
/// use statslink::prelude::*;
/// use statslink::{Link, NopMetricSink};
///
/// let metrics: Arc<dyn MetricClient + Send + Sync> = Arc::new(Link::from_sink(NopMetricSink));
/// metrics.increment("calls.started", 1.0).unwrap();
/// metrics.gauge("sessions_count", 12_u64).unwrap();
/// ```
pub trait MetricClient:
    Counted<i64> + CountedExt + Timed<u64> + Timed<Duration> + Gauged<u64> + Gauged<i64>
{
}

/// Builder for creating and customizing `Link` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `Link` struct.
///
/// # Example
///
/// ```
/// use statslink::prelude::*;
/// use statslink::{Link, NopMetricSink};
///
/// let link = Link::builder(NopMetricSink)
///     .namespace("pbx01")
///     .seed(1234)
///     .build()
///     .unwrap();
///
/// assert_eq!("pbx01.", link.namespace());
/// link.increment("calls.started", 0.5).unwrap();
/// ```
#[must_use]
pub struct LinkBuilder {
    sink: BoxedSink,
    namespace: Option<String>,
    seed: Option<u64>,
    max_message_len: usize,
}

impl LinkBuilder {
    fn new<T>(sink: T) -> Self
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        LinkBuilder {
            sink: Box::new(sink),
            namespace: None,
            seed: None,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }

    /// Prefix every stat name with `ns` followed by a single `.`.
    ///
    /// The namespace is written to the wire as given, it is not sanitized.
    /// An empty namespace, or one containing `:`, `|` or `@`, is rejected
    /// with `InvalidNamespace` by `build()`.
    pub fn namespace(mut self, ns: &str) -> Self {
        self.namespace = Some(ns.to_owned());
        self
    }

    /// Seed the sampling generator with a fixed value instead of OS entropy,
    /// making sampling decisions repeatable.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject encoded lines longer than `len` bytes (default 1024).
    pub fn max_message_len(mut self, len: usize) -> Self {
        self.max_message_len = len;
        self
    }

    /// Construct a new `Link` based on current settings.
    pub fn build(self) -> LinkResult<Link> {
        let namespace = match self.namespace {
            Some(ns) if ns.is_empty() || has_delimiters(&ns) => return Err(LinkError::InvalidNamespace),
            Some(ns) => format!("{}.", ns),
            None => String::new(),
        };

        let sampler = match self.seed {
            Some(seed) => Sampler::seeded(seed),
            None => Sampler::from_entropy(),
        };

        Ok(Link {
            namespace,
            sink: RwLock::new(Some(self.sink)),
            sampler,
            max_message_len: self.max_message_len,
        })
    }
}

/// A connectionless link to a StatsD server.
///
/// The link owns the destination (resolved once), an optional namespace and
/// the socket. Metrics are sent through the `Counted`, `CountedExt`,
/// `Gauged` and `Timed` traits, each call encoding one line and writing it
/// as one datagram, in the thread of the caller. Delivery is best-effort:
/// failures are returned and logged, never retried or queued.
///
/// # Threading
///
/// `Link` is `Send` and `Sync`. Share it with an `Arc` between a polling
/// thread and any number of event handlers. Sends only take a shared lock,
/// `close()` takes it exclusively, so no send ever races a close.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::thread;
/// use statslink::prelude::*;
/// use statslink::{Link, DEFAULT_PORT};
///
/// let link = Arc::new(Link::open_with_namespace("127.0.0.1", DEFAULT_PORT, "pbx").unwrap());
///
/// let local = Arc::clone(&link);
/// let t = thread::spawn(move || {
///     local.increment("calls.started", 1.0).ok();
/// });
///
/// link.gauge("sessions_count", 3_u64).ok();
/// t.join().unwrap();
/// link.close();
/// ```
pub struct Link {
    namespace: String,
    sink: RwLock<Option<BoxedSink>>,
    sampler: Sampler,
    max_message_len: usize,
}

impl Link {
    /// Resolve `host` and open a link without a namespace.
    ///
    /// # Failures
    ///
    /// * `InvalidEndpoint` if `host` is empty or `port` is zero. No lookup
    ///   or socket is attempted in that case.
    /// * `ResolutionFailed` if `host` has no IPv4 address.
    /// * `SocketCreateFailed` if the UDP socket can't be created.
    pub fn open(host: &str, port: u16) -> LinkResult<Link> {
        let sink = UdpMetricSink::open(host, port)?;
        Self::builder(sink).build()
    }

    /// Like `open`, with every stat prefixed by `ns` and a `.`.
    ///
    /// Fails with `InvalidNamespace` if `ns` is empty or contains `:`, `|`
    /// or `@`.
    pub fn open_with_namespace(host: &str, port: u16, ns: &str) -> LinkResult<Link> {
        if ns.is_empty() || has_delimiters(ns) {
            return Err(LinkError::InvalidNamespace);
        }
        let sink = UdpMetricSink::open(host, port)?;
        Self::builder(sink).namespace(ns).build()
    }

    /// Create a link without a namespace writing to the given sink.
    ///
    /// ```
    /// use statslink::prelude::*;
    /// use statslink::{Link, SpyMetricSink};
    ///
    /// let (rx, sink) = SpyMetricSink::new();
    /// let link = Link::from_sink(sink);
    ///
    /// link.timing("t", 150_u64).unwrap();
    /// assert_eq!("t:150|ms", rx.recv().unwrap());
    /// ```
    pub fn from_sink<T>(sink: T) -> Link
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        Link {
            namespace: String::new(),
            sink: RwLock::new(Some(Box::new(sink))),
            sampler: Sampler::from_entropy(),
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }

    /// Create a new builder for a link writing to the provided sink.
    pub fn builder<T>(sink: T) -> LinkBuilder
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        LinkBuilder::new(sink)
    }

    /// The stored namespace including its trailing `.`, or `""`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Decide whether a metric with the given sample rate should be sent.
    ///
    /// Rates of `1.0` and above always send without consulting the random
    /// generator. Rates of `0.0` and below never send.
    pub fn should_send(&self, sample_rate: f32) -> bool {
        self.sampler.should_send(sample_rate)
    }

    /// Encode one StatsD line for this link's namespace.
    ///
    /// The stat name is sanitized, the sample rate is only written for
    /// counters sampled below `1.0`, and `newline` appends a trailing `\n`
    /// for callers packing several lines into one payload.
    ///
    /// ```
    /// use statslink::{Link, MetricKind, NopMetricSink};
    ///
    /// let link = Link::builder(NopMetricSink).namespace("ns").build().unwrap();
    ///
    /// assert_eq!("ns.a.b:42|c", link.prepare("a.b", 42_i64, MetricKind::Counter, 1.0, false).unwrap());
    /// assert_eq!("ns.a.b:1|c|@0.10", link.prepare("a.b", 1_i64, MetricKind::Counter, 0.1, false).unwrap());
    /// ```
    ///
    /// # Failures
    ///
    /// * `InvalidInput` if a counter's sample rate is zero, negative or NaN.
    /// * `MessageTooLong` if the line exceeds the maximum message length.
    pub fn prepare<V>(&self, stat: &str, value: V, kind: MetricKind, sample_rate: f32, newline: bool) -> LinkResult<String>
    where
        V: Into<MetricValue>,
    {
        let mut formatter = MetricFormatter::new(&self.namespace, stat, value.into(), kind);
        if kind.is_sampled() {
            formatter.with_sample_rate(SampleRate::try_from(sample_rate)?);
        }
        if newline {
            formatter.with_newline();
        }
        formatter.format_bounded(self.max_message_len)
    }

    /// Write an already encoded line as a single datagram.
    ///
    /// Fails with `LinkUnavailable` once the link is closed, without touching
    /// the socket. Send failures are logged and returned as `SendFailed`.
    pub fn send(&self, message: &str) -> LinkResult<usize> {
        let guard = self.sink.read().unwrap_or_else(PoisonError::into_inner);
        let sink = guard.as_ref().ok_or(LinkError::LinkUnavailable)?;

        sink.emit(message).map_err(|e| {
            warn!(error = %e, metric = message, "failed to send metric");
            LinkError::SendFailed(e)
        })
    }

    /// Close the link, releasing the socket.
    ///
    /// Closing more than once is a no-op. Any send after this fails with
    /// `LinkUnavailable`.
    pub fn close(&self) {
        let mut guard = self.sink.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!(namespace = %self.namespace, "closed metrics link");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sink.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    /// I/O telemetry from the underlying sink, or zeros once closed.
    pub fn stats(&self) -> SinkStats {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|sink| sink.stats())
            .unwrap_or_default()
    }

    // Closed check, then the sampling gate, then encode and send
    fn send_stat(&self, stat: &str, value: MetricValue, kind: MetricKind, sample_rate: f32) -> LinkResult<Emission> {
        if self.is_closed() {
            return Err(LinkError::LinkUnavailable);
        }

        // Validate a counter's rate before sampling so an unencodable rate
        // fails on every call, not only on the calls that get sampled in
        if kind.is_sampled() && sample_rate > 0.0 {
            SampleRate::try_from(sample_rate)?;
        }

        if !self.should_send(sample_rate) {
            return Ok(Emission::Skipped);
        }

        let line = self.prepare(stat, value, kind, sample_rate, false)?;
        let bytes = self.send(&line)?;
        Ok(Emission::Sent { bytes })
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Link {{ namespace: {:?}, sink: ..., closed: {}, max_message_len: {} }}",
            self.namespace,
            self.is_closed(),
            self.max_message_len,
        )
    }
}

impl<T> Counted<T> for Link
where
    T: ToCounterValue,
{
    fn count(&self, stat: &str, delta: T, sample_rate: f32) -> LinkResult<Emission> {
        let value = delta.try_to_value()?;
        self.send_stat(stat, value, MetricKind::Counter, sample_rate)
    }
}

impl CountedExt for Link {}

impl<T> Timed<T> for Link
where
    T: ToTimerValue,
{
    fn timing(&self, stat: &str, ms: T) -> LinkResult<Emission> {
        let value = ms.try_to_value()?;
        self.send_stat(stat, value, MetricKind::Timer, SampleRate::FULL)
    }
}

impl<T> Gauged<T> for Link
where
    T: ToGaugeValue,
{
    fn gauge(&self, stat: &str, value: T) -> LinkResult<Emission> {
        let value = value.try_to_value()?;
        self.send_stat(stat, value, MetricKind::Gauge, SampleRate::FULL)
    }
}

impl MetricClient for Link {}

#[cfg(test)]
mod tests {
    use super::{Counted, CountedExt, Gauged, Link, MetricClient, Timed, DEFAULT_MAX_MESSAGE_LEN};
    use crate::sinks::{MetricSink, NopMetricSink, SpyMetricSink};
    use crate::types::{Emission, ErrorKind, MetricKind};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Sink that counts how many times it was asked to write.
    #[derive(Debug, Clone, Default)]
    struct CountingSink {
        calls: Arc<AtomicUsize>,
    }

    impl MetricSink for CountingSink {
        fn emit(&self, metric: &str) -> io::Result<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(metric.len())
        }
    }

    /// Sink that always fails, like a socket on a downed network.
    #[derive(Debug)]
    struct ErrorSink;

    impl MetricSink for ErrorSink {
        fn emit(&self, _metric: &str) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "network is down"))
        }
    }

    fn spy_link(ns: Option<&str>) -> (crossbeam_channel::Receiver<String>, Link) {
        let (rx, sink) = SpyMetricSink::new();
        let builder = Link::builder(sink).seed(17);
        let builder = match ns {
            Some(ns) => builder.namespace(ns),
            None => builder,
        };
        (rx, builder.build().unwrap())
    }

    #[test]
    fn test_link_builder_empty_namespace() {
        let err = Link::builder(NopMetricSink).namespace("").build().unwrap_err();
        assert_eq!(ErrorKind::InvalidNamespace, err.kind());
    }

    #[test]
    fn test_link_builder_namespace_with_delimiters() {
        for ns in ["pbx:01", "pbx|01", "pbx@01"] {
            let err = Link::builder(NopMetricSink).namespace(ns).build().unwrap_err();
            assert_eq!(ErrorKind::InvalidNamespace, err.kind());
        }
    }

    #[test]
    fn test_open_with_namespace_delimiters() {
        let err = Link::open_with_namespace("127.0.0.1", 8125, "pbx:01").unwrap_err();
        assert_eq!(ErrorKind::InvalidNamespace, err.kind());
    }

    #[test]
    fn test_tiny_sample_rate_rejected_every_call() {
        let sink = CountingSink::default();
        let calls = Arc::clone(&sink.calls);
        let link = Link::builder(sink).seed(3).build().unwrap();

        for _ in 0..1_000 {
            let err = link.increment("x", 0.004).unwrap_err();
            assert_eq!(ErrorKind::InvalidInput, err.kind());
        }
        assert_eq!(0, calls.load(Ordering::SeqCst));
        assert_eq!("x:1|c|@0.01", link.prepare("x", 1_i64, MetricKind::Counter, 0.006, false).unwrap());
    }

    #[test]
    fn test_link_builder_namespace_gets_one_separator() {
        let link = Link::builder(NopMetricSink).namespace("pbx").build().unwrap();
        assert_eq!("pbx.", link.namespace());
    }

    #[test]
    fn test_link_no_namespace() {
        let link = Link::from_sink(NopMetricSink);
        assert_eq!("", link.namespace());
    }

    #[test]
    fn test_open_with_namespace_empty() {
        let err = Link::open_with_namespace("127.0.0.1", 8125, "").unwrap_err();
        assert_eq!(ErrorKind::InvalidNamespace, err.kind());
    }

    #[test]
    fn test_open_invalid_endpoint() {
        assert_eq!(ErrorKind::InvalidEndpoint, Link::open("", 8125).unwrap_err().kind());
        assert_eq!(ErrorKind::InvalidEndpoint, Link::open("127.0.0.1", 0).unwrap_err().kind());
        assert_eq!(
            ErrorKind::InvalidEndpoint,
            Link::open_with_namespace("", 8125, "ns").unwrap_err().kind()
        );
    }

    #[test]
    fn test_prepare_counter() {
        let link = Link::from_sink(NopMetricSink);
        assert_eq!("a.b:42|c", link.prepare("a.b", 42_i64, MetricKind::Counter, 1.0, false).unwrap());
    }

    #[test]
    fn test_prepare_counter_namespaced() {
        let link = Link::builder(NopMetricSink).namespace("ns").build().unwrap();
        assert_eq!("ns.a.b:42|c", link.prepare("a.b", 42_i64, MetricKind::Counter, 1.0, false).unwrap());
    }

    #[test]
    fn test_prepare_sampled_counter_with_newline() {
        let link = Link::from_sink(NopMetricSink);
        assert_eq!(
            "a.b:3|c|@0.25\n",
            link.prepare("a.b", 3_i64, MetricKind::Counter, 0.25, true).unwrap()
        );
    }

    #[test]
    fn test_prepare_gauge_ignores_rate() {
        let link = Link::from_sink(NopMetricSink);
        assert_eq!("g:5|g", link.prepare("g", 5_u64, MetricKind::Gauge, 0.5, false).unwrap());
        assert_eq!("g:5|g", link.prepare("g", 5_u64, MetricKind::Gauge, 0.0, false).unwrap());
    }

    #[test]
    fn test_prepare_counter_bad_rate() {
        let link = Link::from_sink(NopMetricSink);
        let err = link.prepare("a", 1_i64, MetricKind::Counter, 0.0, false).unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_prepare_too_long() {
        let link = Link::builder(NopMetricSink).max_message_len(16).build().unwrap();
        let err = link.prepare("a.very.long.stat.name", 1_i64, MetricKind::Counter, 1.0, false).unwrap_err();
        assert_eq!(ErrorKind::MessageTooLong, err.kind());
    }

    #[test]
    fn test_count_too_long_sends_nothing() {
        let sink = CountingSink::default();
        let calls = Arc::clone(&sink.calls);
        let link = Link::from_sink(sink);

        let stat = "s".repeat(DEFAULT_MAX_MESSAGE_LEN);
        let err = link.count(&stat, 1, 1.0).unwrap_err();

        assert_eq!(ErrorKind::MessageTooLong, err.kind());
        assert_eq!(0, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn test_count_increment_decrement() {
        let (rx, link) = spy_link(Some("pbx"));

        link.count("calls.total", 5, 1.0).unwrap();
        link.increment("calls.total", 1.0).unwrap();
        link.decrement("calls.total", 1.0).unwrap();

        assert_eq!("pbx.calls.total:5|c", rx.recv().unwrap());
        assert_eq!("pbx.calls.total:1|c", rx.recv().unwrap());
        assert_eq!("pbx.calls.total:-1|c", rx.recv().unwrap());
    }

    #[test]
    fn test_count_i32_delta() {
        let (rx, link) = spy_link(None);
        link.count("calls.total", 3_i32, 1.0).unwrap();

        assert_eq!("calls.total:3|c", rx.recv().unwrap());
    }

    #[test]
    fn test_gauge_and_timing_never_sampled() {
        let (rx, link) = spy_link(None);

        link.gauge("sessions_count", 12_u64).unwrap();
        link.gauge("delta", -3_i64).unwrap();
        link.timing("t", 150_u64).unwrap();
        link.timing("call", Duration::from_millis(1_500)).unwrap();

        let lines: Vec<String> = rx.try_iter().collect();
        assert_eq!(vec!["sessions_count:12|g", "delta:-3|g", "t:150|ms", "call:1500|ms"], lines);
        assert!(lines.iter().all(|l| !l.contains("|@")));
    }

    #[test]
    fn test_timing_duration_overflow() {
        let link = Link::from_sink(NopMetricSink);
        let err = link.timing("t", Duration::from_secs(u64::MAX)).unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_sampled_counter_carries_rate() {
        let (rx, link) = spy_link(None);

        let sent = (0..200)
            .map(|_| link.increment("calls.started", 0.5).unwrap())
            .filter(Emission::is_sent)
            .count();

        let lines: Vec<String> = rx.try_iter().collect();
        assert_eq!(sent, lines.len());
        assert!(sent > 0 && sent < 200);
        assert!(lines.iter().all(|l| l == "calls.started:1|c|@0.50"));
    }

    #[test]
    fn test_zero_rate_never_sends() {
        let sink = CountingSink::default();
        let calls = Arc::clone(&sink.calls);
        let link = Link::from_sink(sink);

        for _ in 0..1_000 {
            assert_eq!(Emission::Skipped, link.increment("x", 0.0).unwrap());
        }
        assert_eq!(0, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn test_full_rate_always_sends() {
        let link = Link::from_sink(NopMetricSink);
        assert!((0..10_000).all(|_| link.should_send(1.0)));
    }

    #[test]
    fn test_send_error() {
        let link = Link::from_sink(ErrorSink);
        let err = link.increment("x", 1.0).unwrap_err();

        assert_eq!(ErrorKind::SendFailed, err.kind());
        assert_eq!(-1, err.code());
    }

    #[test]
    fn test_close_twice_is_safe() {
        let link = Link::from_sink(NopMetricSink);
        assert!(!link.is_closed());

        link.close();
        link.close();
        assert!(link.is_closed());
    }

    #[test]
    fn test_send_after_close() {
        let sink = CountingSink::default();
        let calls = Arc::clone(&sink.calls);
        let link = Link::from_sink(sink);
        link.close();

        let err = link.send("a:1|c").unwrap_err();
        assert_eq!(ErrorKind::LinkUnavailable, err.kind());
        assert_eq!(-2, err.code());

        assert_eq!(ErrorKind::LinkUnavailable, link.increment("a", 1.0).unwrap_err().kind());
        assert_eq!(ErrorKind::LinkUnavailable, link.gauge("a", 1_u64).unwrap_err().kind());
        assert_eq!(ErrorKind::LinkUnavailable, link.timing("a", 1_u64).unwrap_err().kind());
        assert_eq!(0, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stats_after_close() {
        let (_rx, link) = spy_link(None);
        link.increment("a", 1.0).unwrap();
        assert_eq!(1, link.stats().packets_sent);

        link.close();
        assert_eq!(0, link.stats().packets_sent);
    }

    #[test]
    fn test_link_as_metric_client() {
        let (rx, link) = spy_link(Some("ns"));
        let client: Box<dyn MetricClient> = Box::new(link);

        client.increment("a.b", 1.0).unwrap();
        Gauged::<u64>::gauge(&*client, "g", 1).unwrap();
        Timed::<u64>::timing(&*client, "t", 2).unwrap();

        assert_eq!("ns.a.b:1|c", rx.recv().unwrap());
        assert_eq!("ns.g:1|g", rx.recv().unwrap());
        assert_eq!("ns.t:2|ms", rx.recv().unwrap());
    }

    #[test]
    fn test_link_debug() {
        let link = Link::builder(NopMetricSink).namespace("ns").build().unwrap();
        let debug = format!("{:?}", link);

        assert!(debug.contains("namespace: \"ns.\""));
        assert!(debug.contains("closed: false"));
    }
}
