//! Raw supervisor syscall bindings.
//!
//! Everything here is wire-accurate and unsafe; the rest of the crate goes
//! through the safe wrappers in [`crate::platform`]. Syscalls return a raw
//! status word where zero is success; non-zero maps through
//! [`beacon::host::Status::from_raw`].

use beacon::notify::NotificationRecord;

/// Raw status word for an accepted syscall.
pub const STATUS_OKAY: u32 = 0;

/// Network status word reported once connectivity is established.
pub const NETWORK_STATUS_CONNECTED: u32 = 1;

/// Channel type carrying opaque bytes, used for the log stream.
pub const CHANNEL_TYPE_BYTE_STREAM: u32 = 1;

/// Channel type carrying HTTP exchanges.
pub const CHANNEL_TYPE_HTTP: u32 = 2;

/// Notification center registration block.
#[repr(C)]
pub struct NotificationSetup {
    /// Interrupt line the supervisor raises after writing a record.
    pub irq: u32,
    /// Base of the record ring the supervisor writes into.
    pub buffer: *mut NotificationRecord,
    /// Ring size in bytes.
    pub buffer_size: u32,
}

/// Network request block.
#[repr(C)]
pub struct RequestNetworkParams {
    /// Parameter block version; currently 1.
    pub version: u32,
    /// Notification center the network reports through.
    pub notification_handle: u32,
    /// Tag echoed in network notifications.
    pub notification_tag: u32,
}

/// Channel open block.
#[repr(C)]
pub struct OpenChannelParams {
    /// Parameter block version; currently 1.
    pub version: u32,
    /// Notification center the channel reports through.
    pub notification_handle: u32,
    /// Tag echoed in channel notifications.
    pub notification_tag: u32,
    /// Established network the channel rides on.
    pub network_handle: u32,
    /// Receive scratch region, 512-byte aligned.
    pub receive_buffer: *mut u8,
    /// Receive scratch capacity in bytes.
    pub receive_buffer_len: u32,
    /// Transmit scratch region, 512-byte aligned.
    pub send_buffer: *mut u8,
    /// Transmit scratch capacity in bytes.
    pub send_buffer_len: u32,
    /// One of the `CHANNEL_TYPE_*` values.
    pub channel_type: u32,
    /// Endpoint selector; empty for HTTP channels.
    pub endpoint: *const u8,
    /// Endpoint length in bytes.
    pub endpoint_len: u32,
}

/// One request header as the supervisor expects it.
#[repr(C)]
pub struct RawHttpHeader {
    /// Header line bytes.
    pub data: *const u8,
    /// Header line length.
    pub length: u32,
}

/// HTTP request block.
#[repr(C)]
pub struct RawHttpRequest {
    /// Request verb bytes.
    pub method: *const u8,
    /// Request verb length.
    pub method_len: u32,
    /// Target URI bytes.
    pub url: *const u8,
    /// Target URI length.
    pub url_len: u32,
    /// Number of entries behind `headers`.
    pub num_headers: u32,
    /// Request headers.
    pub headers: *const RawHttpHeader,
    /// Request body bytes.
    pub body: *const u8,
    /// Request body length.
    pub body_len: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u32,
}

/// HTTP response metadata block filled in by the supervisor.
#[repr(C)]
#[derive(Default)]
pub struct RawResponseData {
    /// Transport-level result discriminant.
    pub result: u32,
    /// HTTP status code.
    pub status_code: u32,
    /// Number of readable response headers.
    pub num_headers: u32,
    /// Response body length in bytes.
    pub body_length: u32,
}

unsafe extern "C" {
    /// Registers a notification record ring and yields the center handle.
    pub fn sv_setup_notifications(setup: *const NotificationSetup, handle: *mut u32) -> u32;
    /// Tears down a notification center, zeroing the handle.
    pub fn sv_close_notifications(handle: *mut u32) -> u32;
    /// Requests the network and yields its handle once accepted.
    pub fn sv_request_network(params: *const RequestNetworkParams, handle: *mut u32) -> u32;
    /// Reads the current network status word.
    pub fn sv_get_network_status(handle: u32, status: *mut u32) -> u32;
    /// Releases the network, zeroing the handle.
    pub fn sv_release_network(handle: *mut u32) -> u32;
    /// Opens a channel and yields its handle.
    pub fn sv_open_channel(params: *const OpenChannelParams, handle: *mut u32) -> u32;
    /// Closes a channel, zeroing the handle.
    pub fn sv_close_channel(handle: *mut u32) -> u32;
    /// Submits an HTTP request on an open channel.
    pub fn sv_send_http_request(handle: u32, request: *const RawHttpRequest) -> u32;
    /// Reads the readable response's metadata.
    pub fn sv_read_http_response_data(handle: u32, data: *mut RawResponseData) -> u32;
    /// Reads `length` response body bytes starting at `offset`.
    pub fn sv_read_http_response_body(handle: u32, offset: u32, buffer: *mut u8, length: u32)
    -> u32;
    /// Reads the response header at `index`.
    pub fn sv_read_http_response_header(
        handle: u32,
        index: u32,
        buffer: *mut u8,
        length: u32,
    ) -> u32;
    /// Reads why the supervisor closed a channel.
    pub fn sv_get_channel_closure_reason(handle: u32, reason: *mut u32) -> u32;
    /// Writes bytes to a byte-stream channel, reporting how many were
    /// accepted.
    pub fn sv_write_channel_stream(
        handle: u32,
        buffer: *const u8,
        length: u32,
        written: *mut u32,
    ) -> u32;
    /// Reads the device identity string.
    pub fn sv_get_device_id(buffer: *mut u8, length: u32) -> u32;
}
