use statslink::prelude::*;
use statslink::{ErrorKind, Link, UdpMetricSink};
use std::net::UdpSocket;
use std::thread;
use std::time::Duration;

mod utils;
use utils::{init_tracing, run_arc_threaded_test};

fn new_receiver() -> UdpSocket {
    init_tracing();
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    socket
}

fn recv_line(receiver: &UdpSocket) -> String {
    let mut buf = [0u8; 1024];
    let n = receiver.recv(&mut buf).unwrap();
    String::from_utf8_lossy(&buf[..n]).into_owned()
}

#[test]
fn test_link_udp_one_datagram_per_metric() {
    let receiver = new_receiver();
    let port = receiver.local_addr().unwrap().port();
    let link = Link::open_with_namespace("127.0.0.1", port, "pbx01").unwrap();

    link.increment("calls.started", 1.0).unwrap();
    link.gauge("sessions_count", 12_u64).unwrap();
    link.timing("calls.duration", 61_000_u64).unwrap();

    assert_eq!("pbx01.calls.started:1|c", recv_line(&receiver));
    assert_eq!("pbx01.sessions_count:12|g", recv_line(&receiver));
    assert_eq!("pbx01.calls.duration:61000|ms", recv_line(&receiver));
}

#[test]
fn test_link_udp_without_namespace() {
    let receiver = new_receiver();
    let port = receiver.local_addr().unwrap().port();
    let link = Link::open("127.0.0.1", port).unwrap();

    link.count("a.b", 42, 1.0).unwrap();
    assert_eq!("a.b:42|c", recv_line(&receiver));
}

#[test]
fn test_link_udp_send_prepared_line() {
    let receiver = new_receiver();
    let port = receiver.local_addr().unwrap().port();
    let sink = UdpMetricSink::open("localhost", port).unwrap();
    let link = Link::from_sink(sink);

    assert_eq!(11, link.send("raw.set:1|c").unwrap());
    assert_eq!("raw.set:1|c", recv_line(&receiver));
}

#[test]
fn test_link_udp_invalid_endpoint() {
    assert_eq!(ErrorKind::InvalidEndpoint, Link::open("", 8125).unwrap_err().kind());
    assert_eq!(ErrorKind::InvalidEndpoint, Link::open("127.0.0.1", 0).unwrap_err().kind());
}

#[test]
fn test_link_udp_unresolvable_host() {
    let err = Link::open("statslink.invalid", 8125).unwrap_err();
    assert_eq!(ErrorKind::ResolutionFailed, err.kind());
}

#[test]
fn test_link_udp_nobody_listening() {
    let receiver = new_receiver();
    let port = receiver.local_addr().unwrap().port();
    drop(receiver);

    // Nothing is bound. The ICMP port-unreachable from the first datagram
    // must not fail the second send, since the socket is never connected.
    let link = Link::open("127.0.0.1", port).unwrap();
    let first = link.increment("a", 1.0);
    thread::sleep(Duration::from_millis(50));
    let second = link.increment("b", 1.0);

    assert!(first.is_ok(), "first send failed: {:?}", first);
    assert!(second.is_ok(), "second send failed: {:?}", second);
    assert_eq!(2, link.stats().packets_sent);

    link.close();
    assert!(link.is_closed());
}

#[test]
fn test_link_udp_single_threaded() {
    let receiver = new_receiver();
    let port = receiver.local_addr().unwrap().port();
    let link = Link::open_with_namespace("127.0.0.1", port, "link").unwrap();

    let link = run_arc_threaded_test(link, 1, 1);
    assert_eq!(7, link.stats().packets_sent);
}
