use beacon::config::SessionConfig;
use beacon::error::Error;
use beacon::flags::PendingFlags;
use beacon::host::{ClosureReason, CorrelationTag, Status};
use beacon::session::{CloseCause, Session, SessionState};

use beacon_mock::{CannedResponse, MockHost, MockLink, Op};

const DEAD_TIME_MS: u32 = 15_000;

fn config() -> SessionConfig {
    SessionConfig::new()
        .correlation_tag(CorrelationTag::new(3))
        .dead_time(DEAD_TIME_MS)
}

fn session(host: MockHost) -> Session<MockHost, MockLink> {
    Session::new(host, MockLink::connected(9), config())
}

#[test]
fn scenario_a_response_cycle() {
    let mut host = MockHost::new();
    host.respond_with(CannedResponse::ok(
        b"Hello, world!",
        &["content-type: application/json", "content-length: 13"],
    ));
    let mut session = session(host);
    let flags = PendingFlags::new();

    let _ = session.open(0).unwrap();
    session.send_next(0).unwrap();
    assert_eq!(session.state(), SessionState::Open);

    let request = &session.host().sent()[0];
    assert_eq!(request.method, "GET");
    assert_eq!(
        request.url,
        "https://jsonplaceholder.typicode.com/todos/1"
    );
    assert_eq!(request.timeout_ms, 10_000);

    flags.raise_data_readable();
    assert_eq!(session.service(10, &flags), Some(CloseCause::ResponseReady));
    assert_eq!(session.state(), SessionState::AwaitingClose);

    session.close().unwrap();
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.handle().is_none());

    let ops = session.host().ops();
    assert_eq!(
        ops,
        [
            Op::Open,
            Op::Send,
            Op::ResponseData,
            Op::ReadBody,
            Op::ReadHeader,
            Op::ReadHeader,
            Op::Close,
        ]
    );
}

#[test]
fn scenario_b_dead_time_force_close() {
    let mut session = session(MockHost::new());
    let flags = PendingFlags::new();

    let _ = session.open(0).unwrap();
    session.send_next(0).unwrap();

    // One tick short of the budget keeps the channel open.
    assert_eq!(session.service(DEAD_TIME_MS - 1, &flags), None);
    assert_eq!(session.state(), SessionState::Open);

    assert_eq!(
        session.service(DEAD_TIME_MS, &flags),
        Some(CloseCause::DeadTime)
    );
    assert_eq!(session.state(), SessionState::AwaitingClose);

    session.close().unwrap();
    assert!(session.handle().is_none());
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn scenario_c_remote_closure_then_fresh_handle() {
    let mut host = MockHost::new();
    host.closed_because(ClosureReason::NetworkLost);
    let mut session = session(host);
    let flags = PendingFlags::new();

    let first = session.open(0).unwrap();
    session.send_next(0).unwrap();

    flags.raise_channel_closed();
    assert_eq!(session.service(5, &flags), Some(CloseCause::RemoteClosed));
    assert_eq!(session.host().closure_queries(), 1);

    session.close().unwrap();
    assert!(session.handle().is_none());

    let second = session.open(10).unwrap();
    assert_ne!(first, second);
    assert_eq!(session.state(), SessionState::Open);
}

#[test]
fn close_is_idempotent() {
    let mut session = session(MockHost::new());

    let _ = session.open(0).unwrap();
    session.close().unwrap();
    session.close().unwrap();

    assert!(session.handle().is_none());
    let closes = session
        .host()
        .ops()
        .iter()
        .filter(|op| **op == Op::Close)
        .count();
    assert_eq!(closes, 1);
}

#[test]
fn already_closed_status_counts_as_success() {
    let mut host = MockHost::new();
    host.reject_close(Status::ChannelClosed);
    let mut session = session(host);

    let _ = session.open(0).unwrap();
    session.close().unwrap();
    assert!(session.handle().is_none());
}

#[test]
fn rejected_close_still_drops_the_handle() {
    let mut host = MockHost::new();
    host.reject_close(Status::Unavailable);
    let mut session = session(host);

    let _ = session.open(0).unwrap();
    assert_eq!(
        session.close(),
        Err(Error::CloseRejected(Status::Unavailable))
    );
    assert!(session.handle().is_none());
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn send_failure_forces_teardown() {
    let mut host = MockHost::new();
    host.reject_send(Status::Unavailable);
    let mut session = session(host);

    assert_eq!(
        session.request(0),
        Err(Error::SendRejected(Status::Unavailable))
    );
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.handle().is_none());
    assert_eq!(session.host().ops(), [Op::Open, Op::Send, Op::Close]);
}

#[test]
fn open_requires_a_network() {
    let mut session = Session::new(MockHost::new(), MockLink::down(), config());

    assert_eq!(session.open(0), Err(Error::NetworkUnavailable));
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.host().ops().is_empty());
}

#[test]
fn open_rejects_a_second_channel() {
    let mut session = session(MockHost::new());

    let _ = session.open(0).unwrap();
    assert_eq!(session.open(1), Err(Error::AlreadyOpen));
    assert_eq!(session.state(), SessionState::Open);
}

#[test]
fn rotation_advances_and_wraps() {
    let config = config().item_count(3);
    let mut session = Session::new(MockHost::new(), MockLink::connected(9), config);

    for _ in 0..4 {
        session.request(0).unwrap();
        session.close().unwrap();
    }

    let urls: Vec<&str> = session
        .host()
        .sent()
        .iter()
        .map(|request| request.url.as_str())
        .collect();
    assert_eq!(
        urls,
        [
            "https://jsonplaceholder.typicode.com/todos/1",
            "https://jsonplaceholder.typicode.com/todos/2",
            "https://jsonplaceholder.typicode.com/todos/3",
            "https://jsonplaceholder.typicode.com/todos/1",
        ]
    );
}

#[test]
fn not_found_restarts_the_rotation() {
    let mut host = MockHost::new();
    host.respond_with(CannedResponse::status(404));
    let mut session = session(host);
    let flags = PendingFlags::new();

    session.request(0).unwrap();
    assert_eq!(session.next_item(), 2);

    flags.raise_data_readable();
    assert_eq!(session.service(5, &flags), Some(CloseCause::ResponseReady));
    assert_eq!(session.next_item(), 1);
}

#[test]
fn not_found_reset_can_be_disabled() {
    let mut host = MockHost::new();
    host.respond_with(CannedResponse::status(404));
    let config = config().reset_item_on_not_found(false);
    let mut session = Session::new(host, MockLink::connected(9), config);
    let flags = PendingFlags::new();

    session.request(0).unwrap();
    flags.raise_data_readable();
    let _ = session.service(5, &flags).unwrap();

    assert_eq!(session.next_item(), 2);
}

#[test]
fn draining_never_blocks_closing() {
    let mut host = MockHost::new();
    host.respond_with(CannedResponse::ok(b"{}", &[]));
    let mut session = session(host);
    let flags = PendingFlags::new();

    let _ = session.open(0).unwrap();
    session.send_next(0).unwrap();

    // Data readable and dead time expired in the same cycle: the response
    // is drained, then the channel closes anyway.
    flags.raise_data_readable();
    assert_eq!(
        session.service(DEAD_TIME_MS, &flags),
        Some(CloseCause::ResponseReady)
    );
    session.close().unwrap();

    assert_eq!(
        session.host().ops(),
        [Op::Open, Op::Send, Op::ResponseData, Op::ReadBody, Op::Close]
    );
}

#[test]
fn metadata_read_failure_is_not_fatal() {
    let mut host = MockHost::new();
    host.reject_response(Status::Unavailable);
    let mut session = session(host);
    let flags = PendingFlags::new();

    let _ = session.open(0).unwrap();
    session.send_next(0).unwrap();

    flags.raise_data_readable();
    assert_eq!(session.service(5, &flags), Some(CloseCause::ResponseReady));
    session.close().unwrap();
    assert!(session.handle().is_none());
}

#[test]
fn stale_flags_are_consumed_without_a_session() {
    let mut session = session(MockHost::new());
    let flags = PendingFlags::new();

    flags.raise_data_readable();
    flags.raise_channel_closed();
    assert_eq!(session.service(0, &flags), None);

    assert!(!flags.take_data_readable());
    assert!(!flags.take_channel_closed());
}

#[test]
fn poll_drives_a_full_cycle() {
    let mut host = MockHost::new();
    host.respond_with(CannedResponse::ok(b"Hello, world!", &[]));
    let config = config().send_period(1_000).dead_time(500);
    let mut session = Session::new(host, MockLink::connected(9), config);
    let flags = PendingFlags::new();

    // Before the first period elapses nothing happens.
    session.poll(500, &flags);
    assert!(session.host().ops().is_empty());

    session.poll(1_000, &flags);
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(session.host().sent().len(), 1);

    flags.raise_data_readable();
    session.poll(1_010, &flags);
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.handle().is_none());

    // The next period opens a fresh channel.
    session.poll(2_000, &flags);
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(session.host().sent().len(), 2);
}

#[test]
fn poll_force_closes_on_dead_time() {
    let config = config().send_period(1_000).dead_time(500);
    let mut session = Session::new(MockHost::new(), MockLink::connected(9), config);
    let flags = PendingFlags::new();

    session.poll(1_000, &flags);
    assert_eq!(session.state(), SessionState::Open);

    session.poll(1_400, &flags);
    assert_eq!(session.state(), SessionState::Open);

    session.poll(1_500, &flags);
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.handle().is_none());
}
