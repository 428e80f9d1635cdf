use core::sync::atomic::{AtomicBool, Ordering};

/// Interrupt-to-loop pending event flags.
///
/// The interrupt path only ever raises a flag; the session loop only ever
/// takes one. That single-producer/single-consumer split is the whole
/// synchronization story on a single-core target, so plain atomics replace
/// the volatile booleans such firmware traditionally carries.
///
/// Each flag is consumed at most once per raise: [`PendingFlags::take_data_readable`]
/// and [`PendingFlags::take_channel_closed`] clear as they read.
pub struct PendingFlags {
    data_readable: AtomicBool,
    channel_closed: AtomicBool,
}

impl PendingFlags {
    /// Creates the flag set with both flags lowered.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data_readable: AtomicBool::new(false),
            channel_closed: AtomicBool::new(false),
        }
    }

    /// Raises the "response data is readable" flag. Interrupt-safe.
    pub fn raise_data_readable(&self) {
        self.data_readable.store(true, Ordering::Release);
    }

    /// Raises the "channel closed unexpectedly" flag. Interrupt-safe.
    pub fn raise_channel_closed(&self) {
        self.channel_closed.store(true, Ordering::Release);
    }

    /// Takes and clears the data-readable flag.
    #[must_use]
    pub fn take_data_readable(&self) -> bool {
        self.data_readable.swap(false, Ordering::AcqRel)
    }

    /// Takes and clears the channel-closed flag.
    #[must_use]
    pub fn take_channel_closed(&self) -> bool {
        self.channel_closed.swap(false, Ordering::AcqRel)
    }
}

impl Default for PendingFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_at_most_once() {
        let flags = PendingFlags::new();
        assert!(!flags.take_data_readable());

        flags.raise_data_readable();
        assert!(flags.take_data_readable());
        assert!(!flags.take_data_readable());
    }

    #[test]
    fn flags_are_independent() {
        let flags = PendingFlags::new();
        flags.raise_channel_closed();

        assert!(!flags.take_data_readable());
        assert!(flags.take_channel_closed());
        assert!(!flags.take_channel_closed());
    }
}
