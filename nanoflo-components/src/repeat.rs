use nanoflo_core::{Component, ComponentId, Packet, PortId, ProcessContext, BROADCAST_PORT};

use crate::ids;

/// Like [`crate::Forward`], but also remembers the last packet it forwarded
/// and re-sends it on every `Tick` once at least one packet has arrived.
///
/// The minimal stateful component: one field, no allocation beyond it.
#[derive(Debug, Default)]
pub struct Repeat {
    last: Option<Packet>,
}

impl Component for Repeat {
    fn n_ports(&self) -> usize {
        1
    }

    fn component_id(&self) -> ComponentId {
        ids::REPEAT
    }

    fn process(&mut self, ctx: &mut ProcessContext, packet: Packet, port: PortId) {
        if port == BROADCAST_PORT {
            if packet.kind() == nanoflo_core::Msg::Tick {
                if let Some(last) = self.last {
                    ctx.send(0, last);
                }
            }
            return;
        }
        self.last = Some(packet);
        ctx.send(0, packet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoflo_core::MessageQueue;

    #[test]
    fn replays_last_packet_on_tick() {
        let mut notify = nanoflo_core::NullNotificationHandler;
        let mut queue = MessageQueue::new();
        let mut repeat = Repeat::default();

        {
            let mut ctx = ProcessContext::new(1, 1, &mut queue, &mut notify);
            repeat.process(&mut ctx, Packet::integer(9), 0);
        }
        queue.new_tick();
        assert_eq!(queue.pop().unwrap().packet.as_integer(), 9);

        {
            let mut ctx = ProcessContext::new(1, 1, &mut queue, &mut notify);
            repeat.process(&mut ctx, Packet::tick(), BROADCAST_PORT);
        }
        queue.new_tick();
        assert_eq!(queue.pop().unwrap().packet.as_integer(), 9);
    }

    #[test]
    fn stays_quiet_on_tick_before_anything_received() {
        let mut notify = nanoflo_core::NullNotificationHandler;
        let mut queue = MessageQueue::new();
        let mut repeat = Repeat::default();
        let mut ctx = ProcessContext::new(1, 1, &mut queue, &mut notify);
        repeat.process(&mut ctx, Packet::tick(), BROADCAST_PORT);
        queue.new_tick();
        assert!(queue.pop().is_none());
    }
}
