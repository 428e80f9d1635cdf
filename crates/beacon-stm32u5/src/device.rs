use alloc::string::String;

use log::info;

use crate::sys;

// Longest device identity string the supervisor reports.
const DEVICE_ID_LEN: usize = 34;

/// Logs the device identity and the firmware name and version.
pub fn log_device_info() {
    let mut id = [0u8; DEVICE_ID_LEN];
    let status = unsafe { sys::sv_get_device_id(id.as_mut_ptr(), id.len() as u32) };
    if status == sys::STATUS_OKAY {
        let end = id.iter().position(|byte| *byte == 0).unwrap_or(id.len());
        info!("Device: {}", String::from_utf8_lossy(&id[..end]));
    }
    info!("App: {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}
