use beacon::host::{CorrelationTag, NetworkHandle, NetworkLink, Status};

use embassy_time::Timer;

use log::info;

use crate::platform::NotificationCenter;
use crate::sys;

const MILLISECONDS_TO_WAIT: u64 = 100;

/// An established supervisor network.
///
/// Bring-up happens once at startup; afterwards the handle is simply
/// reported to the session through [`NetworkLink`].
#[derive(Debug, Copy, Clone)]
pub struct Network {
    handle: NetworkHandle,
}

impl Network {
    /// Requests the network from the supervisor and polls until it reports
    /// connected.
    ///
    /// # Errors
    ///
    /// The rejecting [`Status`] if the request or a status read is
    /// declined.
    pub async fn bring_up(
        center: &NotificationCenter,
        tag: CorrelationTag,
    ) -> Result<Self, Status> {
        let params = sys::RequestNetworkParams {
            version: 1,
            notification_handle: center.handle().into_raw(),
            notification_tag: tag.into_raw(),
        };

        let mut raw = 0u32;
        let status = unsafe { sys::sv_request_network(&params, &mut raw) };
        if status != sys::STATUS_OKAY {
            return Err(Status::from_raw(status));
        }
        let handle = NetworkHandle::new(raw).ok_or(Status::Unknown(0))?;

        info!("Waiting for the network to connect...");
        loop {
            let mut network_status = 0u32;
            let status =
                unsafe { sys::sv_get_network_status(handle.into_raw(), &mut network_status) };
            if status != sys::STATUS_OKAY {
                return Err(Status::from_raw(status));
            }
            if network_status == sys::NETWORK_STATUS_CONNECTED {
                break;
            }
            Timer::after_millis(MILLISECONDS_TO_WAIT).await;
        }

        info!("Network connected, handle {}", handle.into_raw());
        Ok(Self { handle })
    }

    /// The established network handle.
    #[must_use]
    pub const fn handle(&self) -> NetworkHandle {
        self.handle
    }
}

impl NetworkLink for Network {
    fn handle(&self) -> Option<NetworkHandle> {
        Some(self.handle)
    }
}
