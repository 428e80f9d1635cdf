use crate::flags::PendingFlags;

/// Sentinel discriminant of an empty or consumed record slot.
pub const KIND_CONSUMED: u32 = 0;

/// Discriminant of a "channel data readable" record.
pub const KIND_DATA_READABLE: u32 = 1;

// Discriminant 2 is the channel write-space event, which this firmware
// never registers for.

/// Discriminant of a "channel no longer connected" record.
pub const KIND_CHANNEL_CLOSED: u32 = 3;

/// One notification record, written by the supervisor into the registered
/// ring and raised with the notification interrupt.
///
/// Ownership is split: the supervisor writes a slot, the reader clears it.
/// Sixteen bytes, layout-stable so the same type backs the registered ring.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Supervisor timestamp of the event, in microseconds.
    pub microseconds: u64,
    /// Event discriminant; [`KIND_CONSUMED`] when the slot is empty.
    pub kind: u32,
    /// Correlation tag of the channel the event pertains to.
    pub tag: u32,
}

impl NotificationRecord {
    /// An empty slot.
    pub const EMPTY: Self = Self {
        microseconds: 0,
        kind: KIND_CONSUMED,
        tag: 0,
    };
}

impl Default for NotificationRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A notification mapped to what the session cares about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RingEvent {
    /// Response data is readable on the channel.
    DataReadable,
    /// The supervisor closed the channel from its side.
    ChannelClosed,
    /// An event kind this firmware does not interpret. Ignored for
    /// forward compatibility, never an error.
    Unrecognized(u32),
}

/// Reader over the notification record ring.
///
/// The supervisor writes records and advances on its own; this reader owns
/// the consume cursor. Exactly one party may drive it; in firmware that is
/// the notification interrupt handler, which defers all further work to
/// [`PendingFlags`]. Nothing here allocates, blocks, or takes a lock, so
/// every entry point is safe in interrupt context.
pub struct NotificationRing<'a> {
    records: &'a mut [NotificationRecord],
    cursor: usize,
}

impl<'a> NotificationRing<'a> {
    /// Takes ownership of the record slots and arms every slot to the
    /// consumed sentinel, ready for registration with the supervisor.
    pub fn new(records: &'a mut [NotificationRecord]) -> Self {
        for slot in records.iter_mut() {
            *slot = NotificationRecord::EMPTY;
        }
        Self { records, cursor: 0 }
    }

    /// Consumes the record under the cursor, if one has been written.
    ///
    /// A consumed slot's `kind` is cleared back to [`KIND_CONSUMED`] before
    /// the cursor advances, so a supervisor overrun (reusing a slot before
    /// the reader caught up) shows up as an unexpected sentinel rather
    /// than as silent re-delivery.
    pub fn poll_next(&mut self) -> Option<RingEvent> {
        let slot = &mut self.records[self.cursor];
        let event = match slot.kind {
            KIND_CONSUMED => return None,
            KIND_DATA_READABLE => RingEvent::DataReadable,
            KIND_CHANNEL_CLOSED => RingEvent::ChannelClosed,
            other => RingEvent::Unrecognized(other),
        };

        slot.kind = KIND_CONSUMED;
        self.cursor = (self.cursor + 1) % self.records.len();
        Some(event)
    }

    /// Drains all pending records into the flag set and returns how many
    /// were consumed.
    ///
    /// At most one full ring sweep per call, keeping interrupt time
    /// bounded even if the supervisor keeps writing while we drain.
    pub fn dispatch(&mut self, flags: &PendingFlags) -> usize {
        let mut consumed = 0;
        for _ in 0..self.records.len() {
            match self.poll_next() {
                Some(RingEvent::DataReadable) => flags.raise_data_readable(),
                Some(RingEvent::ChannelClosed) => flags.raise_channel_closed(),
                Some(RingEvent::Unrecognized(_)) => {}
                None => break,
            }
            consumed += 1;
        }
        consumed
    }

    /// Current cursor position.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots in the ring.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(records: &mut [NotificationRecord], index: usize, kind: u32) {
        records[index] = NotificationRecord {
            microseconds: 1_000 * index as u64,
            kind,
            tag: 3,
        };
    }

    #[test]
    fn empty_ring_yields_nothing() {
        let mut records = [NotificationRecord::EMPTY; 4];
        let mut ring = NotificationRing::new(&mut records);

        assert_eq!(ring.poll_next(), None);
        assert_eq!(ring.cursor(), 0);
    }

    #[test]
    fn consumed_slot_is_cleared_to_sentinel() {
        let mut records = [NotificationRecord::EMPTY; 4];
        let mut ring = NotificationRing::new(&mut records);

        write(ring.records, 0, KIND_DATA_READABLE);
        assert_eq!(ring.poll_next(), Some(RingEvent::DataReadable));
        assert_eq!(ring.records[0].kind, KIND_CONSUMED);
        assert_eq!(ring.poll_next(), None);
    }

    #[test]
    fn cursor_advances_once_per_record_and_wraps() {
        let mut records = [NotificationRecord::EMPTY; 4];
        let mut ring = NotificationRing::new(&mut records);

        for round in 0..4 {
            write(ring.records, round, KIND_DATA_READABLE);
            assert!(ring.poll_next().is_some());
            assert_eq!(ring.cursor(), (round + 1) % 4);
        }
        assert_eq!(ring.cursor(), 0);
    }

    #[test]
    fn unrecognized_kind_is_reported_not_dropped() {
        let mut records = [NotificationRecord::EMPTY; 4];
        let mut ring = NotificationRing::new(&mut records);

        write(ring.records, 0, 2);
        write(ring.records, 1, KIND_CHANNEL_CLOSED);

        assert_eq!(ring.poll_next(), Some(RingEvent::Unrecognized(2)));
        assert_eq!(ring.poll_next(), Some(RingEvent::ChannelClosed));
    }

    #[test]
    fn dispatch_raises_matching_flags() {
        let mut records = [NotificationRecord::EMPTY; 8];
        let mut ring = NotificationRing::new(&mut records);
        let flags = PendingFlags::new();

        write(ring.records, 0, KIND_DATA_READABLE);
        write(ring.records, 1, 2);
        write(ring.records, 2, KIND_CHANNEL_CLOSED);

        assert_eq!(ring.dispatch(&flags), 3);
        assert!(flags.take_data_readable());
        assert!(flags.take_channel_closed());
        assert_eq!(ring.cursor(), 3);
    }

    #[test]
    fn dispatch_is_bounded_to_one_sweep() {
        let mut records = [NotificationRecord::EMPTY; 4];
        let mut ring = NotificationRing::new(&mut records);
        let flags = PendingFlags::new();

        for index in 0..4 {
            write(ring.records, index, KIND_DATA_READABLE);
        }
        assert_eq!(ring.dispatch(&flags), 4);
        assert_eq!(ring.cursor(), 0);
    }
}
