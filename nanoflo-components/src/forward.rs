use nanoflo_core::{Component, ComponentId, Packet, PortId, ProcessContext, BROADCAST_PORT};

use crate::ids;

/// Re-emits whatever it receives on port 0 out of its own port 0.
///
/// The minimal possible `Component`: no state, no behavior on `Setup`/`Tick`.
/// Used throughout wiring examples and tests as a stand-in for "some node
/// downstream of this wire".
#[derive(Debug, Default)]
pub struct Forward;

impl Component for Forward {
    fn n_ports(&self) -> usize {
        1
    }

    fn component_id(&self) -> ComponentId {
        ids::FORWARD
    }

    fn process(&mut self, ctx: &mut ProcessContext, packet: Packet, port: PortId) {
        if port != BROADCAST_PORT {
            ctx.send(0, packet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoflo_core::{MessageQueue, Network, NullNotificationHandler};

    #[test]
    fn forwards_received_packet_to_its_own_port_zero() {
        let mut notify = NullNotificationHandler;
        let mut queue = MessageQueue::new();
        let mut ctx = ProcessContext::new(1, 1, &mut queue, &mut notify);
        let mut forward = Forward;
        forward.process(&mut ctx, Packet::integer(3), 0);

        let msg = queue_peek(&mut queue);
        assert_eq!(msg.packet.as_integer(), 3);
        assert_eq!(msg.port, 0);
    }

    fn queue_peek(queue: &mut MessageQueue) -> nanoflo_core::Message {
        queue.new_tick();
        queue.pop().expect("message queued")
    }

    #[test]
    fn ignores_broadcasts() {
        let mut net = Network::new();
        let id = net.add_node(ids::FORWARD, Box::new(Forward)).unwrap();
        net.run_setup();
        net.run_tick();
        // No panic, no emitted packet to observe here; Setup/Tick on port -1
        // are simply dropped by the `port != BROADCAST_PORT` guard.
        let _ = id;
    }
}
