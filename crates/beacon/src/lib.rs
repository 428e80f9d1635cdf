//! `beacon` is the core library for firmware that periodically issues
//! outbound HTTP requests through a *supervised platform*: an execution
//! environment that owns the radio and the TCP/TLS stack and exposes
//! channels to the application through a syscall-shaped interface.
//!
//! The supervisor reports channel activity by writing fixed-size records
//! into a ring buffer the application registered and raising an interrupt.
//! This crate owns the interpretation of those records and the lifecycle of
//! the one in-flight channel; it deliberately owns nothing else. Network
//! bring-up, log transport, clocks, and pin wiggling live with the device
//! crate and reach this one only through the traits in [`host`].
//!
//! ## Architecture
//!
//! ```text
//!  interrupt context          │        session loop (cooperative task)
//!                             │
//!  ┌──────────────────┐       │   ┌──────────────────────────────┐
//!  │ NotificationRing ├──►────┼──►│ PendingFlags (test-and-clear)│
//!  │  (ring reader)   │ raise │   └──────────────┬───────────────┘
//!  └──────────────────┘       │                  ▼
//!                             │   ┌──────────────────────────────┐
//!                             │   │ Session (state machine)      │
//!                             │   │ Closed → Opening → Open      │
//!                             │   │        → AwaitingClose       │
//!                             │   └──────────────┬───────────────┘
//!                             │                  ▼
//!                             │        ChannelHost (syscalls)
//! ```
//!
//! ## Concurrency model
//!
//! One cooperative polling loop per logical task, pre-emptible by the
//! notification interrupt. The interrupt path runs only the ring reader
//! and flag raises; it never allocates, blocks, or makes a syscall. All state
//! transitions and every supervisor call happen on the session loop. Each
//! shared field has exactly one writer (the interrupt raises flags and
//! advances the ring cursor, the loop clears flags and owns the handle),
//! which is the entire locking story on a single-core target.
//!
//! ## Timeouts
//!
//! The only timeout the session itself enforces is the dead-time budget: a
//! channel left open with no observed activity past the budget is
//! force-closed. In-flight supervisor calls are never cancelled; they
//! complete synchronously with a status.

#![no_std]

extern crate alloc;

/// Session behavior configuration.
pub mod config;
/// Error management.
pub mod error;
/// Interrupt-to-loop pending flags.
pub mod flags;
/// The supervised platform surface: handles, traits, value types.
pub mod host;
/// The notification record ring and its reader.
pub mod notify;
/// The channel-session state machine.
pub mod session;
