use core::num::NonZeroU32;

/// Handle to a registered notification center.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NotificationHandle(NonZeroU32);

/// Handle to an established network.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NetworkHandle(NonZeroU32);

/// Handle to an open channel.
///
/// A handle exists exactly while the owning session is active; "no channel"
/// is `Option::<ChannelHandle>::None`, never a reserved value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChannelHandle(NonZeroU32);

macro_rules! impl_handle {
    ($name:ident) => {
        impl $name {
            /// Creates a handle from its raw value. Zero is "no handle".
            #[must_use]
            pub const fn new(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(raw) => Some(Self(raw)),
                    None => None,
                }
            }

            /// Returns the raw handle value.
            #[must_use]
            pub const fn into_raw(self) -> u32 {
                self.0.get()
            }
        }
    };
}

impl_handle!(NotificationHandle);
impl_handle!(NetworkHandle);
impl_handle!(ChannelHandle);

/// Application-chosen tag passed at channel open and echoed in every
/// notification record, disambiguating which logical operation a
/// notification pertains to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CorrelationTag(u32);

impl CorrelationTag {
    /// Creates a [`CorrelationTag`].
    #[must_use]
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    /// Returns the raw tag value.
    #[must_use]
    pub const fn into_raw(self) -> u32 {
        self.0
    }
}

/// Rejection status reported by the supervisor for a syscall.
///
/// Zero is success on the wire and never constructs a [`Status`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// A parameter block was malformed or out of range.
    InvalidParameters,
    /// The referenced handle is unknown to the supervisor.
    InvalidHandle,
    /// The channel exists but has already been closed.
    ChannelClosed,
    /// The supervisor cannot service the request right now.
    Unavailable,
    /// A status code this firmware does not know about.
    Unknown(u32),
}

impl Status {
    /// Maps a raw non-zero syscall status onto a [`Status`].
    #[must_use]
    pub const fn from_raw(code: u32) -> Self {
        match code {
            1 => Self::InvalidParameters,
            2 => Self::InvalidHandle,
            3 => Self::ChannelClosed,
            4 => Self::Unavailable,
            other => Self::Unknown(other),
        }
    }

    /// Whether this status means the channel is already gone, which a close
    /// request treats as success.
    #[must_use]
    pub const fn means_closed(self) -> bool {
        matches!(self, Self::InvalidHandle | Self::ChannelClosed)
    }
}

/// Transport-level outcome of an HTTP exchange, distinct from the HTTP
/// status code carried inside it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransferResult {
    /// The exchange ran to completion; the HTTP status code is meaningful.
    Complete,
    /// The URI scheme is not supported by the channel type.
    UnsupportedScheme,
    /// The response did not fit the channel's receive buffer.
    ResponseTooLarge,
    /// No response arrived within the request timeout.
    TimedOut,
    /// A result code this firmware does not know about.
    Unknown(u32),
}

impl TransferResult {
    /// Maps the raw result discriminant onto a [`TransferResult`].
    #[must_use]
    pub const fn from_raw(code: u32) -> Self {
        match code {
            0 => Self::Complete,
            1 => Self::UnsupportedScheme,
            2 => Self::ResponseTooLarge,
            3 => Self::TimedOut,
            other => Self::Unknown(other),
        }
    }

    /// Whether the exchange completed and produced a response.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Why the supervisor closed a channel from its side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClosureReason {
    /// Network connectivity was lost underneath the channel.
    NetworkLost,
    /// The supervisor tore the channel down (shutdown, policy).
    Terminated,
    /// A reason code this firmware does not know about.
    Unknown(u32),
}

impl ClosureReason {
    /// Maps the raw reason code onto a [`ClosureReason`].
    #[must_use]
    pub const fn from_raw(code: u32) -> Self {
        match code {
            1 => Self::NetworkLost,
            2 => Self::Terminated,
            other => Self::Unknown(other),
        }
    }
}

/// Parameters for opening a channel.
#[derive(Debug, Copy, Clone)]
pub struct ChannelConfig<'a> {
    /// Handle of the established network the channel rides on.
    pub network: NetworkHandle,
    /// Endpoint selector. Empty for the HTTP channel type.
    pub endpoint: &'a str,
    /// Tag echoed back in notifications for this channel.
    pub tag: CorrelationTag,
}

/// A single request header.
#[derive(Debug, Copy, Clone)]
pub struct HttpHeader<'a> {
    /// Header name.
    pub name: &'a str,
    /// Header value.
    pub value: &'a str,
}

/// An outbound HTTP request descriptor.
///
/// Acceptance of a send means "accepted for transmission"; the response
/// arrives later through the notification ring.
#[derive(Debug, Copy, Clone)]
pub struct HttpRequest<'a> {
    /// Request verb, e.g. `"GET"`.
    pub method: &'a str,
    /// Absolute target URI.
    pub url: &'a str,
    /// Request headers, possibly empty.
    pub headers: &'a [HttpHeader<'a>],
    /// Request body, possibly empty.
    pub body: &'a [u8],
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u32,
}

/// Response metadata read back from an open channel.
///
/// Valid only while the owning channel handle is non-null.
#[derive(Debug, Copy, Clone)]
pub struct ResponseData {
    /// Transport-level outcome of the exchange.
    pub result: TransferResult,
    /// HTTP status code of the response.
    pub status_code: u32,
    /// Number of response headers available for reading.
    pub header_count: u32,
    /// Response body length in bytes.
    pub body_length: u32,
}

/// The supervised platform's channel surface.
///
/// All methods are synchronous syscall-shaped operations: the return status
/// reports acceptance or rejection, completion is signalled through the
/// notification ring. Implementations own the channel's transmit and
/// receive scratch buffers (see [`RxBuffer`] and [`TxBuffer`]) and the
/// notification center the channel is registered with.
pub trait ChannelHost {
    /// Opens a channel and returns its handle.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if the supervisor declines the open.
    fn open(&mut self, config: &ChannelConfig<'_>) -> Result<ChannelHandle, Status>;

    /// Submits an HTTP request on an open channel.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if the request is not accepted for
    /// transmission.
    fn send(&mut self, channel: ChannelHandle, request: &HttpRequest<'_>) -> Result<(), Status>;

    /// Reads the metadata of the response currently readable on `channel`.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if no response metadata can be read.
    fn response_data(&mut self, channel: ChannelHandle) -> Result<ResponseData, Status>;

    /// Reads `into.len()` body bytes starting at `offset`, returning the
    /// number of bytes written.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if the body cannot be read.
    fn read_body(
        &mut self,
        channel: ChannelHandle,
        offset: u32,
        into: &mut [u8],
    ) -> Result<usize, Status>;

    /// Reads the response header at `index`, returning the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if the header cannot be read.
    fn read_header(
        &mut self,
        channel: ChannelHandle,
        index: u32,
        into: &mut [u8],
    ) -> Result<usize, Status>;

    /// Closes a channel. The supervisor invalidates the handle even when it
    /// reports the channel as already closed.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`]; see [`Status::means_closed`].
    fn close(&mut self, channel: ChannelHandle) -> Result<(), Status>;

    /// Best-effort query for why the supervisor closed `channel`.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if no reason is available.
    fn closure_reason(&mut self, channel: ChannelHandle) -> Result<ClosureReason, Status>;
}

/// The network bring-up collaborator.
///
/// Bring-up itself is outside the session's scope; the session only asks
/// whether a valid network handle currently exists.
pub trait NetworkLink {
    /// The established network handle, or `None` while disconnected.
    fn handle(&self) -> Option<NetworkHandle>;
}

/// Required alignment of the channel scratch buffers.
pub const BUFFER_ALIGN: usize = 512;

/// Receive scratch capacity the HTTP channel type requires.
pub const RX_BUFFER_LEN: usize = 2560;

/// Transmit scratch capacity the HTTP channel type requires.
pub const TX_BUFFER_LEN: usize = 512;

/// A channel scratch region with the supervisor's alignment constraint.
///
/// The buffer is lent to the supervisor for the lifetime of an open channel
/// and reused across channel cycles.
#[repr(align(512))]
pub struct IoBuffer<const N: usize>([u8; N]);

impl<const N: usize> IoBuffer<N> {
    /// Creates a zeroed buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; N])
    }

    /// Buffer capacity in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the buffer has zero capacity.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// The buffer contents.
    #[must_use]
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// The buffer contents, mutably.
    #[must_use]
    pub const fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<const N: usize> Default for IoBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive scratch buffer for one HTTP channel.
pub type RxBuffer = IoBuffer<RX_BUFFER_LEN>;

/// Transmit scratch buffer for one HTTP channel.
pub type TxBuffer = IoBuffer<TX_BUFFER_LEN>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_no_handle() {
        assert!(ChannelHandle::new(0).is_none());
        assert!(NetworkHandle::new(0).is_none());
        assert!(NotificationHandle::new(0).is_none());

        let handle = ChannelHandle::new(7).unwrap();
        assert_eq!(handle.into_raw(), 7);
    }

    #[test]
    fn close_statuses() {
        assert!(Status::from_raw(2).means_closed());
        assert!(Status::from_raw(3).means_closed());
        assert!(!Status::from_raw(1).means_closed());
        assert_eq!(Status::from_raw(99), Status::Unknown(99));
    }

    #[test]
    fn transfer_results() {
        assert!(TransferResult::from_raw(0).is_complete());
        assert!(!TransferResult::from_raw(3).is_complete());
        assert_eq!(TransferResult::from_raw(3), TransferResult::TimedOut);
    }

    #[test]
    fn buffers_are_aligned() {
        assert_eq!(core::mem::align_of::<RxBuffer>(), BUFFER_ALIGN);
        assert_eq!(core::mem::align_of::<TxBuffer>(), BUFFER_ALIGN);

        let rx = RxBuffer::new();
        let tx = TxBuffer::new();
        assert_eq!(rx.len(), RX_BUFFER_LEN);
        assert_eq!(tx.len(), TX_BUFFER_LEN);
    }
}
