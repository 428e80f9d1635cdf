use alloc::format;
use alloc::string::String;
use alloc::vec;

use log::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::flags::PendingFlags;
use crate::host::{ChannelConfig, ChannelHandle, ChannelHost, HttpRequest, NetworkLink};

/// Lifecycle state of the channel session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No channel is open.
    Closed,
    /// A channel open has been issued and not yet answered.
    Opening,
    /// A channel is open; requests may be sent and responses drained.
    Open,
    /// A close trigger fired; the channel is waiting for teardown.
    AwaitingClose,
}

/// Why the session decided to close its channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CloseCause {
    /// A response was drained; the channel's work is done.
    ResponseReady,
    /// The supervisor closed the channel from its side.
    RemoteClosed,
    /// The channel sat open past the dead-time budget.
    DeadTime,
}

/// The channel-session controller.
///
/// Owns the one in-flight channel: open, send, await the notification,
/// drain the response, tear down. The handle lives in a single
/// `Option<ChannelHandle>` field that nothing else may hold or mutate, so
/// "at most one channel open" and "close leaves the handle null" are
/// properties of this struct rather than conventions spread across
/// modules.
///
/// All methods run on the cooperative session loop; the interrupt path
/// communicates exclusively through the [`PendingFlags`] passed into
/// [`Session::service`] and [`Session::poll`].
pub struct Session<H, N> {
    host: H,
    link: N,
    config: SessionConfig,
    state: SessionState,
    handle: Option<ChannelHandle>,
    /// Base tick for the dead-time budget; refreshed on open and on every
    /// accepted send.
    opened_at: u32,
    last_send: u32,
    next_item: u32,
    ping_count: u32,
}

impl<H, N> Session<H, N>
where
    H: ChannelHost,
    N: NetworkLink,
{
    /// Creates a closed session over the given host and network link.
    pub const fn new(host: H, link: N, config: SessionConfig) -> Self {
        Self {
            host,
            link,
            config,
            state: SessionState::Closed,
            handle: None,
            opened_at: 0,
            last_send: 0,
            next_item: 1,
            ping_count: 0,
        }
    }

    /// Opens a channel for the next request/response exchange.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyOpen`] if a channel is already open,
    /// [`Error::NetworkUnavailable`] if the network collaborator has no
    /// handle, or [`Error::OpenRejected`] if the supervisor declines. On
    /// any error the session remains `Closed` with a null handle.
    pub fn open(&mut self, now: u32) -> Result<ChannelHandle> {
        if self.handle.is_some() {
            return Err(Error::AlreadyOpen);
        }

        let Some(network) = self.link.handle() else {
            error!("channel open refused: network is not established");
            return Err(Error::NetworkUnavailable);
        };
        debug!("network handle: {}", network.into_raw());

        self.state = SessionState::Opening;
        let channel_config = ChannelConfig {
            network,
            endpoint: self.config.endpoint,
            tag: self.config.tag,
        };

        match self.host.open(&channel_config) {
            Ok(handle) => {
                debug!("channel handle: {}", handle.into_raw());
                self.handle = Some(handle);
                self.opened_at = now;
                self.state = SessionState::Open;
                Ok(handle)
            }
            Err(status) => {
                error!("channel open rejected: {status:?}");
                self.state = SessionState::Closed;
                Err(Error::OpenRejected(status))
            }
        }
    }

    /// Sends a GET for the current rotation item and advances the rotation.
    ///
    /// The item advances on every attempt, accepted or not, wrapping back
    /// to 1 past the configured width. Acceptance refreshes the dead-time
    /// base tick; it does not mean a response has arrived.
    ///
    /// # Errors
    ///
    /// [`Error::NotOpen`] with no open channel, or [`Error::SendRejected`]
    /// if the supervisor declines the request. After a rejected send the
    /// caller is expected to close; this method never reopens on its own.
    pub fn send_next(&mut self, now: u32) -> Result<()> {
        let Some(handle) = self.handle else {
            return Err(Error::NotOpen);
        };

        let item = self.next_item;
        self.next_item = if item >= self.config.item_count {
            1
        } else {
            item + 1
        };

        let url = format!("{}/{item}", self.config.resource_base);
        let request = HttpRequest {
            method: "GET",
            url: &url,
            headers: &[],
            body: b"",
            timeout_ms: self.config.request_timeout_ms,
        };

        debug!("sending request for {url}");
        match self.host.send(handle, &request) {
            Ok(()) => {
                self.opened_at = now;
                Ok(())
            }
            Err(status) => {
                error!("request send rejected: {status:?}");
                Err(Error::SendRejected(status))
            }
        }
    }

    /// Runs one request cycle: open the channel if none is open, then send.
    ///
    /// At most one open attempt and one send attempt per call. A rejected
    /// send tears the channel down before returning, so a failed cycle
    /// always lands back in `Closed` and the next periodic tick starts
    /// clean.
    ///
    /// # Errors
    ///
    /// Whatever [`Session::open`] or [`Session::send_next`] reported.
    pub fn request(&mut self, now: u32) -> Result<()> {
        if self.handle.is_none() {
            let _ = self.open(now)?;
        }

        if let Err(error) = self.send_next(now) {
            let _ = self.close();
            return Err(error);
        }
        Ok(())
    }

    /// Evaluates the close triggers against the pending flags and the
    /// clock.
    ///
    /// The triggers are, in diagnostic order: response data readable, the
    /// channel closed from the supervisor side (its reason is queried
    /// best-effort), and the dead-time budget elapsing with no observed
    /// activity. When any fired, a readable response is drained first
    /// (draining never blocks closing) and the session moves to
    /// `AwaitingClose`; the caller completes teardown with
    /// [`Session::close`]. Flags are consumed exactly once per call even
    /// when no channel is open, so a stale raise cannot leak into the next
    /// cycle.
    pub fn service(&mut self, now: u32, flags: &PendingFlags) -> Option<CloseCause> {
        let readable = flags.take_data_readable();
        let remote_closed = flags.take_channel_closed();

        let Some(handle) = self.handle else {
            return None;
        };

        let expired = now.wrapping_sub(self.opened_at) >= self.config.dead_time_ms;
        if !readable && !remote_closed && !expired {
            return None;
        }

        if remote_closed {
            match self.host.closure_reason(handle) {
                Ok(reason) => warn!("channel closed by the supervisor: {reason:?}"),
                Err(status) => {
                    warn!("channel closed by the supervisor, reason query rejected: {status:?}");
                }
            }
        }
        if expired {
            warn!("channel idle past the dead-time budget, force-closing");
        }

        self.state = SessionState::AwaitingClose;

        if readable {
            if let Ok(status_code) = self.drain_response() {
                if status_code == 404 && self.config.reset_item_on_not_found {
                    info!("resource series exhausted, restarting rotation at 1");
                    self.next_item = 1;
                }
            }
        }

        if readable {
            Some(CloseCause::ResponseReady)
        } else if remote_closed {
            Some(CloseCause::RemoteClosed)
        } else {
            Some(CloseCause::DeadTime)
        }
    }

    /// Reads and logs the readable response on the open channel.
    ///
    /// Metadata is read first; on a completed transfer with status 200 the
    /// body is read into a buffer sized one past its length (the trailing
    /// byte stays free for the supervisor's terminator) and logged, then up
    /// to the configured number of headers are read and logged
    /// individually. Transport or HTTP failures are logged as warnings and
    /// read failures as errors; none of them is fatal to the session,
    /// which proceeds to teardown either way.
    ///
    /// # Errors
    ///
    /// [`Error::NotOpen`] with no open channel, or
    /// [`Error::ResponseRejected`] if the metadata read itself is
    /// rejected.
    pub fn drain_response(&mut self) -> Result<u32> {
        let Some(handle) = self.handle else {
            return Err(Error::NotOpen);
        };

        let data = match self.host.response_data(handle) {
            Ok(data) => data,
            Err(status) => {
                error!("response metadata read rejected: {status:?}");
                return Err(Error::ResponseRejected(status));
            }
        };

        if !data.result.is_complete() {
            warn!("request did not complete: {:?}", data.result);
            return Ok(data.status_code);
        }
        if data.status_code != 200 {
            warn!("unexpected HTTP status {}", data.status_code);
            return Ok(data.status_code);
        }

        let body_length = data.body_length as usize;
        let mut body = vec![0u8; body_length + 1];
        match self.host.read_body(handle, 0, &mut body[..body_length]) {
            Ok(read) => {
                info!("response headers: {}", data.header_count);
                info!("response body length: {}", data.body_length);
                info!("{}", String::from_utf8_lossy(&body[..read]));
            }
            Err(status) => {
                error!("response body read rejected: {status:?}");
            }
        }

        self.log_headers(handle, data.header_count);
        Ok(data.status_code)
    }

    fn log_headers(&mut self, handle: ChannelHandle, available: u32) {
        let count = available.min(self.config.max_logged_headers);
        for index in 0..count {
            let mut line = [0u8; 256];
            match self.host.read_header(handle, index, &mut line[..255]) {
                Ok(read) => {
                    info!("{}. {}", index + 1, String::from_utf8_lossy(&line[..read]));
                }
                Err(status) => {
                    error!("header {} read rejected: {status:?}", index + 1);
                }
            }
        }
    }

    /// Closes the channel. Idempotent.
    ///
    /// With no handle held this is a no-op. Otherwise the close request is
    /// issued, "already closed" counts as success, and the handle is null
    /// afterwards on every path: a rejected close still drops the handle
    /// rather than leaving it dangling on a dead channel.
    ///
    /// # Errors
    ///
    /// [`Error::CloseRejected`] for a rejection other than "already
    /// closed".
    pub fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            self.state = SessionState::Closed;
            return Ok(());
        };
        self.state = SessionState::Closed;

        let result = match self.host.close(handle) {
            Ok(()) => Ok(()),
            Err(status) if status.means_closed() => Ok(()),
            Err(status) => {
                error!("channel close rejected: {status:?}");
                Err(Error::CloseRejected(status))
            }
        };

        debug!("channel closed");
        debug_assert!(self.handle.is_none());
        result
    }

    /// One iteration of the periodic session loop.
    ///
    /// Starts a new request cycle when the send period has elapsed and no
    /// channel is open, then evaluates the close triggers and completes any
    /// pending teardown. Every failure is logged here rather than
    /// propagated; the loop itself never stops.
    pub fn poll(&mut self, now: u32, flags: &PendingFlags) {
        if now.wrapping_sub(self.last_send) >= self.config.send_period_ms {
            self.last_send = now;
            self.ping_count += 1;
            debug!("ping {}", self.ping_count);

            if self.handle.is_none() {
                if let Err(error) = self.request(now) {
                    warn!("request cycle failed: {error}");
                }
            } else {
                error!("previous channel still open, skipping send");
            }
        }

        if self.service(now, flags).is_some() {
            if let Err(error) = self.close() {
                warn!("channel teardown failed: {error}");
            }
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The open channel handle, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<ChannelHandle> {
        self.handle
    }

    /// The rotation item the next send will target.
    #[must_use]
    pub const fn next_item(&self) -> u32 {
        self.next_item
    }

    /// The host, for inspection.
    pub const fn host(&self) -> &H {
        &self.host
    }
}
