use nanoflo_core::{Component, ComponentId, Packet, PortId, ProcessContext, BROADCAST_PORT};

use crate::ids;

/// Counts `process` invocations on port 0 and emits the running total as an
/// `Integer` packet on its own port 0.
#[derive(Debug, Default)]
pub struct Counter {
    count: i32,
}

impl Component for Counter {
    fn n_ports(&self) -> usize {
        1
    }

    fn component_id(&self) -> ComponentId {
        ids::COUNTER
    }

    fn process(&mut self, ctx: &mut ProcessContext, _packet: Packet, port: PortId) {
        if port == BROADCAST_PORT {
            return;
        }
        self.count += 1;
        ctx.send(0, Packet::integer(self.count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoflo_core::{MessageQueue, NullNotificationHandler};

    #[test]
    fn counts_up_from_one() {
        let mut notify = NullNotificationHandler;
        let mut queue = MessageQueue::new();
        let mut counter = Counter::default();

        for expected in 1..=3 {
            let mut ctx = ProcessContext::new(1, 1, &mut queue, &mut notify);
            counter.process(&mut ctx, Packet::void(), 0);
            queue.new_tick();
            assert_eq!(queue.pop().unwrap().packet.as_integer(), expected);
        }
    }
}
