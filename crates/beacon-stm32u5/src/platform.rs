use beacon::host::{
    ChannelConfig, ChannelHandle, ChannelHost, ClosureReason, HttpRequest, NotificationHandle,
    ResponseData, RxBuffer, Status, TransferResult, TxBuffer,
};
use beacon::notify::{NotificationRecord, NotificationRing};

use crate::sys;

/// Notification ring slots registered for the HTTP channel center.
pub const NOTIFICATION_SLOTS: usize = 8;

fn check(status: u32) -> Result<(), Status> {
    if status == sys::STATUS_OKAY {
        Ok(())
    } else {
        Err(Status::from_raw(status))
    }
}

/// A registered notification center.
pub struct NotificationCenter {
    handle: NotificationHandle,
}

impl NotificationCenter {
    /// Registers `records` as a notification ring raised on `irq` and
    /// returns the center together with the armed reader.
    ///
    /// The supervisor keeps writing the registered memory for the lifetime
    /// of the center; the returned ring is the only reader and must only be
    /// driven from the registered interrupt.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if the supervisor declines the
    /// registration.
    pub fn register(
        records: &'static mut [NotificationRecord],
        irq: u32,
    ) -> Result<(Self, NotificationRing<'static>), Status> {
        let buffer = records.as_mut_ptr();
        let buffer_size = core::mem::size_of_val(records) as u32;
        let ring = NotificationRing::new(records);

        let setup = sys::NotificationSetup {
            irq,
            buffer,
            buffer_size,
        };
        let mut handle = 0u32;
        check(unsafe { sys::sv_setup_notifications(&setup, &mut handle) })?;

        let handle = NotificationHandle::new(handle).ok_or(Status::Unknown(0))?;
        Ok((Self { handle }, ring))
    }

    /// The center's handle.
    #[must_use]
    pub const fn handle(&self) -> NotificationHandle {
        self.handle
    }
}

/// The supervisor's channel surface for HTTP exchanges.
///
/// Owns the channel scratch buffers and the notification center handle the
/// channels are registered with; the session state machine drives it
/// through [`ChannelHost`].
pub struct Supervisor {
    notification: NotificationHandle,
    rx: &'static mut RxBuffer,
    tx: &'static mut TxBuffer,
}

impl Supervisor {
    /// Creates the channel surface over a registered center and the
    /// statically allocated scratch buffers.
    pub fn new(
        center: &NotificationCenter,
        rx: &'static mut RxBuffer,
        tx: &'static mut TxBuffer,
    ) -> Self {
        Self {
            notification: center.handle(),
            rx,
            tx,
        }
    }
}

impl ChannelHost for Supervisor {
    fn open(&mut self, config: &ChannelConfig<'_>) -> Result<ChannelHandle, Status> {
        let params = sys::OpenChannelParams {
            version: 1,
            notification_handle: self.notification.into_raw(),
            notification_tag: config.tag.into_raw(),
            network_handle: config.network.into_raw(),
            receive_buffer: self.rx.as_mut_slice().as_mut_ptr(),
            receive_buffer_len: self.rx.len() as u32,
            send_buffer: self.tx.as_mut_slice().as_mut_ptr(),
            send_buffer_len: self.tx.len() as u32,
            channel_type: sys::CHANNEL_TYPE_HTTP,
            endpoint: config.endpoint.as_ptr(),
            endpoint_len: config.endpoint.len() as u32,
        };

        let mut handle = 0u32;
        check(unsafe { sys::sv_open_channel(&params, &mut handle) })?;
        ChannelHandle::new(handle).ok_or(Status::Unknown(0))
    }

    fn send(&mut self, channel: ChannelHandle, request: &HttpRequest<'_>) -> Result<(), Status> {
        let raw = sys::RawHttpRequest {
            method: request.method.as_ptr(),
            method_len: request.method.len() as u32,
            url: request.url.as_ptr(),
            url_len: request.url.len() as u32,
            num_headers: 0,
            headers: core::ptr::null(),
            body: request.body.as_ptr(),
            body_len: request.body.len() as u32,
            timeout_ms: request.timeout_ms,
        };
        check(unsafe { sys::sv_send_http_request(channel.into_raw(), &raw) })
    }

    fn response_data(&mut self, channel: ChannelHandle) -> Result<ResponseData, Status> {
        let mut raw = sys::RawResponseData::default();
        check(unsafe { sys::sv_read_http_response_data(channel.into_raw(), &mut raw) })?;
        Ok(ResponseData {
            result: TransferResult::from_raw(raw.result),
            status_code: raw.status_code,
            header_count: raw.num_headers,
            body_length: raw.body_length,
        })
    }

    fn read_body(
        &mut self,
        channel: ChannelHandle,
        offset: u32,
        into: &mut [u8],
    ) -> Result<usize, Status> {
        check(unsafe {
            sys::sv_read_http_response_body(
                channel.into_raw(),
                offset,
                into.as_mut_ptr(),
                into.len() as u32,
            )
        })?;
        Ok(into.len())
    }

    fn read_header(
        &mut self,
        channel: ChannelHandle,
        index: u32,
        into: &mut [u8],
    ) -> Result<usize, Status> {
        check(unsafe {
            sys::sv_read_http_response_header(
                channel.into_raw(),
                index,
                into.as_mut_ptr(),
                into.len() as u32,
            )
        })?;
        // The supervisor terminates the line; report up to the terminator.
        let read = into.iter().position(|byte| *byte == 0).unwrap_or(into.len());
        Ok(read)
    }

    fn close(&mut self, channel: ChannelHandle) -> Result<(), Status> {
        let mut raw = channel.into_raw();
        check(unsafe { sys::sv_close_channel(&mut raw) })
    }

    fn closure_reason(&mut self, channel: ChannelHandle) -> Result<ClosureReason, Status> {
        let mut reason = 0u32;
        check(unsafe { sys::sv_get_channel_closure_reason(channel.into_raw(), &mut reason) })?;
        Ok(ClosureReason::from_raw(reason))
    }
}
