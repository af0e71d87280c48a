use std::sync::{Arc, Mutex};

use crate::{Message, NodeId, Packet, PortId, MAX_MESSAGES};

/// A narrow, push-only handle to a [`crate::Network`]'s inbound edge, safe to
/// clone and hand to a producer that runs outside the scheduler loop (a GPIO
/// edge handler, a timer callback).
///
/// Everything else about `Network` — wiring, node management, ticking — is
/// only ever touched from the scheduler thread; this is the one operation
/// the original spec calls out as needing to tolerate a concurrent caller.
/// Host builds model that producer as a second thread guarded by a
/// `Mutex`, in the style the teacher uses for its own cross-thread device
/// state (`Arc<Mutex<_>>`, see `runtime::j1939::NetDriverContext`), rather
/// than the disable-interrupts discipline a real microcontroller build
/// would use.
#[derive(Clone)]
pub struct InterruptSafeSender {
    staged: Arc<Mutex<Vec<Message>>>,
}

impl InterruptSafeSender {
    pub(crate) fn new() -> Self {
        Self { staged: Arc::new(Mutex::new(Vec::with_capacity(MAX_MESSAGES))) }
    }

    /// Stage a source-referred packet for delivery. Bounded by
    /// [`crate::MAX_MESSAGES`]; returns `false` if the staging buffer is
    /// already full (the scheduler hasn't drained it in time).
    pub fn send(&self, node: NodeId, port: PortId, packet: Packet) -> bool {
        let mut staged = self.staged.lock().unwrap();
        if staged.len() >= MAX_MESSAGES {
            return false;
        }
        staged.push(Message::from_source(node, port, packet));
        true
    }

    /// Take every staged message, leaving the buffer empty. Called by
    /// `Network` once per tick from the scheduler thread.
    pub(crate) fn take_staged(&self) -> Vec<Message> {
        let mut staged = self.staged.lock().unwrap();
        std::mem::take(&mut *staged)
    }
}

impl Default for InterruptSafeSender {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_messages_are_drained_exactly_once() {
        let sender = InterruptSafeSender::new();
        assert!(sender.send(1, 0, Packet::integer(5)));
        assert!(sender.send(1, 0, Packet::integer(6)));

        let staged = sender.take_staged();
        assert_eq!(staged.len(), 2);
        assert!(sender.take_staged().is_empty());
    }

    #[test]
    fn send_is_usable_from_another_thread() {
        let sender = InterruptSafeSender::new();
        let producer = sender.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..4 {
                producer.send(1, 0, Packet::integer(i));
            }
        });
        handle.join().unwrap();
        assert_eq!(sender.take_staged().len(), 4);
    }
}
