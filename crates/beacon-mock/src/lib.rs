//! Scripted test doubles for the `beacon` platform traits.
//!
//! [`MockHost`] stands in for the supervisor's channel surface and
//! [`MockLink`] for the network bring-up collaborator, so the session state
//! machine can be exercised on the host with no device in sight. The mock
//! records every operation in order, serves one canned response per
//! channel cycle, and injects rejections on demand.

use beacon::host::{
    ChannelConfig, ChannelHandle, ChannelHost, ClosureReason, HttpRequest, NetworkHandle,
    ResponseData, Status, TransferResult,
};

/// A platform operation observed by [`MockHost`], in call order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    /// A channel open.
    Open,
    /// A request send.
    Send,
    /// A response metadata read.
    ResponseData,
    /// A response body read.
    ReadBody,
    /// A response header read.
    ReadHeader,
    /// A channel close.
    Close,
    /// A closure reason query.
    ClosureReason,
}

/// A request captured by [`MockHost::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRequest {
    /// Request verb.
    pub method: String,
    /// Target URI.
    pub url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u32,
}

/// The response the mock serves while a channel is open.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    /// Transport-level outcome.
    pub result: TransferResult,
    /// HTTP status code.
    pub status_code: u32,
    /// Response header lines, one string per header.
    pub headers: Vec<String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl CannedResponse {
    /// A completed 200 response with the given body and header lines.
    #[must_use]
    pub fn ok(body: &[u8], headers: &[&str]) -> Self {
        Self {
            result: TransferResult::Complete,
            status_code: 200,
            headers: headers.iter().map(|header| (*header).to_string()).collect(),
            body: body.to_vec(),
        }
    }

    /// A completed response with the given status code and empty body.
    #[must_use]
    pub fn status(status_code: u32) -> Self {
        Self {
            result: TransferResult::Complete,
            status_code,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A transport-level failure with no usable response.
    #[must_use]
    pub fn failed(result: TransferResult) -> Self {
        Self {
            result,
            status_code: 0,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

/// The network bring-up double.
#[derive(Debug, Copy, Clone)]
pub struct MockLink {
    handle: Option<NetworkHandle>,
}

impl MockLink {
    /// A link with an established network.
    #[must_use]
    pub fn connected(raw: u32) -> Self {
        Self {
            handle: NetworkHandle::new(raw),
        }
    }

    /// A link with no network.
    #[must_use]
    pub const fn down() -> Self {
        Self { handle: None }
    }
}

impl beacon::host::NetworkLink for MockLink {
    fn handle(&self) -> Option<NetworkHandle> {
        self.handle
    }
}

/// The supervisor channel-surface double.
///
/// Handles are allocated from a counter so every open yields a fresh,
/// distinct handle. At most one channel may be open, matching the real
/// supervisor's behavior for this channel type.
#[derive(Debug, Default)]
pub struct MockHost {
    next_handle: u32,
    open: Option<ChannelHandle>,
    ops: Vec<Op>,
    sent: Vec<SentRequest>,
    response: Option<CannedResponse>,
    open_error: Option<Status>,
    send_error: Option<Status>,
    response_error: Option<Status>,
    close_error: Option<Status>,
    closure_reason: Option<ClosureReason>,
    closure_queries: usize,
}

impl MockHost {
    /// Creates a host double with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response served for the current and later channel
    /// cycles.
    pub fn respond_with(&mut self, response: CannedResponse) {
        self.response = Some(response);
    }

    /// Makes the next opens fail with `status`.
    pub fn reject_open(&mut self, status: Status) {
        self.open_error = Some(status);
    }

    /// Makes the next sends fail with `status`.
    pub fn reject_send(&mut self, status: Status) {
        self.send_error = Some(status);
    }

    /// Makes the next response metadata reads fail with `status`.
    pub fn reject_response(&mut self, status: Status) {
        self.response_error = Some(status);
    }

    /// Makes the next closes fail with `status`.
    pub fn reject_close(&mut self, status: Status) {
        self.close_error = Some(status);
    }

    /// Scripts the closure reason served to queries.
    pub fn closed_because(&mut self, reason: ClosureReason) {
        self.closure_reason = Some(reason);
    }

    /// Every operation observed so far, in call order.
    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Every request captured so far.
    #[must_use]
    pub fn sent(&self) -> &[SentRequest] {
        &self.sent
    }

    /// The channel the mock currently considers open.
    #[must_use]
    pub const fn open_channel(&self) -> Option<ChannelHandle> {
        self.open
    }

    /// How many closure reason queries were made.
    #[must_use]
    pub const fn closure_queries(&self) -> usize {
        self.closure_queries
    }

    fn check(&self, channel: ChannelHandle) -> Result<(), Status> {
        if self.open == Some(channel) {
            Ok(())
        } else {
            Err(Status::InvalidHandle)
        }
    }
}

impl ChannelHost for MockHost {
    fn open(&mut self, _config: &ChannelConfig<'_>) -> Result<ChannelHandle, Status> {
        self.ops.push(Op::Open);
        if let Some(status) = self.open_error {
            return Err(status);
        }
        if self.open.is_some() {
            return Err(Status::Unavailable);
        }

        self.next_handle += 1;
        let handle = ChannelHandle::new(self.next_handle).ok_or(Status::Unavailable)?;
        self.open = Some(handle);
        Ok(handle)
    }

    fn send(&mut self, channel: ChannelHandle, request: &HttpRequest<'_>) -> Result<(), Status> {
        self.ops.push(Op::Send);
        self.check(channel)?;
        if let Some(status) = self.send_error {
            return Err(status);
        }

        self.sent.push(SentRequest {
            method: request.method.to_string(),
            url: request.url.to_string(),
            timeout_ms: request.timeout_ms,
        });
        Ok(())
    }

    fn response_data(&mut self, channel: ChannelHandle) -> Result<ResponseData, Status> {
        self.ops.push(Op::ResponseData);
        self.check(channel)?;
        if let Some(status) = self.response_error {
            return Err(status);
        }

        let response = self.response.as_ref().ok_or(Status::Unavailable)?;
        Ok(ResponseData {
            result: response.result,
            status_code: response.status_code,
            header_count: u32::try_from(response.headers.len()).map_err(|_| Status::Unavailable)?,
            body_length: u32::try_from(response.body.len()).map_err(|_| Status::Unavailable)?,
        })
    }

    fn read_body(
        &mut self,
        channel: ChannelHandle,
        offset: u32,
        into: &mut [u8],
    ) -> Result<usize, Status> {
        self.ops.push(Op::ReadBody);
        self.check(channel)?;

        let response = self.response.as_ref().ok_or(Status::Unavailable)?;
        let offset = offset as usize;
        if offset > response.body.len() {
            return Err(Status::InvalidParameters);
        }

        let available = &response.body[offset..];
        let count = available.len().min(into.len());
        into[..count].copy_from_slice(&available[..count]);
        Ok(count)
    }

    fn read_header(
        &mut self,
        channel: ChannelHandle,
        index: u32,
        into: &mut [u8],
    ) -> Result<usize, Status> {
        self.ops.push(Op::ReadHeader);
        self.check(channel)?;

        let response = self.response.as_ref().ok_or(Status::Unavailable)?;
        let header = response
            .headers
            .get(index as usize)
            .ok_or(Status::InvalidParameters)?;

        let bytes = header.as_bytes();
        let count = bytes.len().min(into.len());
        into[..count].copy_from_slice(&bytes[..count]);
        Ok(count)
    }

    fn close(&mut self, channel: ChannelHandle) -> Result<(), Status> {
        self.ops.push(Op::Close);
        if let Some(status) = self.close_error {
            self.open = None;
            return Err(status);
        }
        self.check(channel)?;
        self.open = None;
        Ok(())
    }

    fn closure_reason(&mut self, channel: ChannelHandle) -> Result<ClosureReason, Status> {
        self.ops.push(Op::ClosureReason);
        self.check(channel)?;
        self.closure_queries += 1;
        self.closure_reason.ok_or(Status::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_allocate_fresh_handles() {
        let mut host = MockHost::new();
        let config = ChannelConfig {
            network: NetworkHandle::new(1).unwrap(),
            endpoint: "",
            tag: beacon::host::CorrelationTag::new(3),
        };

        let first = host.open(&config).unwrap();
        host.close(first).unwrap();
        let second = host.open(&config).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn one_channel_at_a_time() {
        let mut host = MockHost::new();
        let config = ChannelConfig {
            network: NetworkHandle::new(1).unwrap(),
            endpoint: "",
            tag: beacon::host::CorrelationTag::new(3),
        };

        let _ = host.open(&config).unwrap();
        assert_eq!(host.open(&config), Err(Status::Unavailable));
    }

    #[test]
    fn body_reads_respect_offsets() {
        let mut host = MockHost::new();
        host.respond_with(CannedResponse::ok(b"Hello, world!", &[]));
        let config = ChannelConfig {
            network: NetworkHandle::new(1).unwrap(),
            endpoint: "",
            tag: beacon::host::CorrelationTag::new(3),
        };
        let channel = host.open(&config).unwrap();

        let mut buffer = [0u8; 16];
        let read = host.read_body(channel, 7, &mut buffer).unwrap();
        assert_eq!(&buffer[..read], b"world!");
    }
}
