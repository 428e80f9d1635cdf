//! `beacon-stm32u5` binds the `beacon` core to the supervised STM32U5
//! platform.
//!
//! On this target the application does not own the radio or the TLS stack;
//! a supervisor does, and the firmware reaches it through syscalls. This
//! crate provides:
//!
//! - The raw syscall surface and its parameter records
//! - Notification center registration over a statically allocated record
//!   ring
//! - Network bring-up (request, then poll until connected)
//! - The [`beacon::host::ChannelHost`] implementation owning the channel
//!   scratch buffers
//! - A [`log`] backend writing to a supervisor byte-stream channel
//! - Device-identity logging
//!
//! The demo firmware binary under `src/bin/` wires these into two
//! cooperative tasks (the session loop and an LED blinker) plus the
//! notification interrupt handler, which only drains the record ring into
//! the pending flags and returns.

#![no_std]

extern crate alloc;

/// Device-identity logging.
pub mod device;
/// The supervisor byte-stream log backend.
pub mod logging;
/// Network bring-up.
pub mod network;
/// Safe wrappers over the supervisor surface.
pub mod platform;
/// Raw supervisor syscall bindings.
pub mod sys;
