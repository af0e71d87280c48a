use crate::{Message, MAX_MESSAGES};

/// A half-open range of slot indices into [`MessageQueue`]'s ring buffer.
#[derive(Debug, Clone, Copy)]
struct MessageRange {
    read: usize,
    write: usize,
}

impl MessageRange {
    const fn empty() -> Self {
        Self { read: 0, write: 0 }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.read == self.write
    }
}

/// Fixed-capacity ring buffer of pending [`Message`]s, split into a
/// `current` tick range and a `previous` tick range.
///
/// Messages a component emits while the network is draining `previous` are
/// appended to `current` instead of being delivered immediately — this is
/// what gives every node in a tick a consistent view of "what arrived this
/// tick" regardless of delivery order. [`MessageQueue::new_tick`] rotates
/// `current` into `previous` once the previous range has been fully drained.
#[derive(Debug)]
pub struct MessageQueue {
    slots: [Option<Message>; MAX_MESSAGES],
    current: MessageRange,
    previous: MessageRange,
    overflow_count: u32,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_MESSAGES],
            current: MessageRange::empty(),
            previous: MessageRange::empty(),
            overflow_count: 0,
        }
    }

    #[inline]
    fn next(index: usize) -> usize {
        (index + 1) % MAX_MESSAGES
    }

    /// Enqueue a message into the `current` range. Always succeeds, matching
    /// the original, which writes at `current.write` unconditionally (its
    /// own comment marks this `FIXME: prevent overwriting` rather than
    /// guarding it). If the write is about to lap an unread slot,
    /// [`MessageQueue::overflow_count`] is bumped so the collision is at
    /// least observable, even though the slot is overwritten either way.
    pub fn push(&mut self, message: Message) -> bool {
        let write = self.current.write;
        let advanced = Self::next(write);
        if advanced == self.previous.read {
            self.overflow_count += 1;
        }
        self.slots[write] = Some(message);
        self.current.write = advanced;
        true
    }

    /// Pop the next message from the `previous` range, if any remain.
    pub fn pop(&mut self) -> Option<Message> {
        if self.previous.is_empty() {
            return None;
        }
        let read = self.previous.read;
        let message = self.slots[read].take();
        self.previous.read = Self::next(read);
        message
    }

    /// True once `previous` has been fully drained by [`MessageQueue::pop`].
    #[inline]
    pub fn previous_drained(&self) -> bool {
        self.previous.is_empty()
    }

    /// Roll `current` into `previous`, starting a new tick's delivery window.
    ///
    /// Must only be called once `previous` is fully drained; the network's
    /// scheduler loop enforces this by draining with `pop` to exhaustion
    /// before calling `new_tick`.
    pub fn new_tick(&mut self) {
        debug_assert!(self.previous_drained());
        self.previous = self.current;
        self.current = MessageRange { read: self.previous.write, write: self.current.write };
    }

    /// Drop all pending messages and reset to empty, as on `Network::reset`.
    pub fn clear(&mut self) {
        self.slots = [None; MAX_MESSAGES];
        self.current = MessageRange::empty();
        self.previous = MessageRange::empty();
    }

    /// Count of messages dropped due to the ring being full, since the last
    /// [`MessageQueue::clear`].
    #[inline]
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Packet;

    fn msg(n: i32) -> Message {
        Message::to_target(1, 0, Packet::integer(n))
    }

    #[test]
    fn push_then_tick_then_pop_drains_in_order() {
        let mut q = MessageQueue::new();
        assert!(q.push(msg(1)));
        assert!(q.push(msg(2)));
        q.new_tick();
        assert_eq!(q.pop().unwrap().packet.as_integer(), 1);
        assert_eq!(q.pop().unwrap().packet.as_integer(), 2);
        assert!(q.pop().is_none());
    }

    #[test]
    fn messages_pushed_during_drain_defer_to_next_tick() {
        let mut q = MessageQueue::new();
        assert!(q.push(msg(1)));
        q.new_tick();
        assert!(q.push(msg(2)));
        assert_eq!(q.pop().unwrap().packet.as_integer(), 1);
        assert!(q.pop().is_none());
        q.new_tick();
        assert_eq!(q.pop().unwrap().packet.as_integer(), 2);
    }

    #[test]
    fn overflow_is_counted_but_push_still_succeeds() {
        let mut q = MessageQueue::new();
        for n in 0..MAX_MESSAGES as i32 + 2 {
            assert!(q.push(msg(n)));
        }
        assert!(q.overflow_count() >= 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut q = MessageQueue::new();
        q.push(msg(1));
        q.new_tick();
        q.clear();
        assert!(q.pop().is_none());
        assert_eq!(q.overflow_count(), 0);
    }
}
