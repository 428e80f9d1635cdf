use alloc::format;

use core::sync::atomic::{AtomicU32, Ordering};

use beacon::host::{CorrelationTag, IoBuffer, Status, TxBuffer};
use beacon::notify::NotificationRecord;

use log::{LevelFilter, Log, Metadata, Record};

use static_cell::StaticCell;

use crate::network::Network;
use crate::platform::NotificationCenter;
use crate::sys;

// The log transport registers its own notification center and owns the
// first two correlation tags; the HTTP channel uses the next one.
const TAG_NETWORK: CorrelationTag = CorrelationTag::new(1);
const TAG_LOG_CHANNEL: CorrelationTag = CorrelationTag::new(2);

const LOG_NOTIFICATION_SLOTS: usize = 16;
const LOG_ENDPOINT: &str = "log";

static RECORDS: StaticCell<[NotificationRecord; LOG_NOTIFICATION_SLOTS]> = StaticCell::new();
static RX: StaticCell<IoBuffer<16>> = StaticCell::new();
static TX: StaticCell<TxBuffer> = StaticCell::new();

// Raw handle of the open log channel; zero until `init` succeeds.
static LOG_CHANNEL: AtomicU32 = AtomicU32::new(0);

static LOGGER: StreamLogger = StreamLogger;

struct StreamLogger;

impl Log for StreamLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        LOG_CHANNEL.load(Ordering::Relaxed) != 0
    }

    fn log(&self, record: &Record<'_>) {
        let channel = LOG_CHANNEL.load(Ordering::Relaxed);
        if channel == 0 {
            return;
        }

        let line = format!("[{}] {}\r\n", record.level(), record.args());
        let mut written = 0u32;
        // Fire and forget: a rejected write must never stall the caller.
        let _ = unsafe {
            sys::sv_write_channel_stream(channel, line.as_ptr(), line.len() as u32, &mut written)
        };
    }

    fn flush(&self) {}
}

/// Brings up the log transport and installs the global logger.
///
/// The supervisor is asked for the network here, well before the first
/// HTTP channel needs it; the established [`Network`] is returned so the
/// session shares the same handle. The log channel's notification center
/// is registered on `irq`, which can stay masked; its events need no
/// servicing.
///
/// # Errors
///
/// The rejecting [`Status`] if any bring-up step is declined, or
/// [`Status::Unavailable`] if a logger is already installed.
pub async fn init(level: LevelFilter, irq: u32) -> Result<Network, Status> {
    let records = RECORDS.init([NotificationRecord::EMPTY; LOG_NOTIFICATION_SLOTS]);
    let (center, _ring) = NotificationCenter::register(records, irq)?;

    let network = Network::bring_up(&center, TAG_NETWORK).await?;

    let rx = RX.init(IoBuffer::new());
    let tx = TX.init(TxBuffer::new());
    let params = sys::OpenChannelParams {
        version: 1,
        notification_handle: center.handle().into_raw(),
        notification_tag: TAG_LOG_CHANNEL.into_raw(),
        network_handle: network.handle().into_raw(),
        receive_buffer: rx.as_mut_slice().as_mut_ptr(),
        receive_buffer_len: rx.len() as u32,
        send_buffer: tx.as_mut_slice().as_mut_ptr(),
        send_buffer_len: tx.len() as u32,
        channel_type: sys::CHANNEL_TYPE_BYTE_STREAM,
        endpoint: LOG_ENDPOINT.as_ptr(),
        endpoint_len: LOG_ENDPOINT.len() as u32,
    };

    let mut channel = 0u32;
    let status = unsafe { sys::sv_open_channel(&params, &mut channel) };
    if status != sys::STATUS_OKAY {
        return Err(Status::from_raw(status));
    }
    if channel == 0 {
        return Err(Status::Unknown(0));
    }

    LOG_CHANNEL.store(channel, Ordering::Relaxed);
    log::set_logger(&LOGGER).map_err(|_| Status::Unavailable)?;
    log::set_max_level(level);
    Ok(network)
}
