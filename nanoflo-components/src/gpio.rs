use std::cell::RefCell;
use std::rc::Rc;

use nanoflo_core::{Component, ComponentId, Packet, PortId, ProcessContext, BROADCAST_PORT};

use crate::ids;
use crate::io::Io;

/// On receiving a `Bool` or `Byte` packet on port 0, writes the corresponding
/// level to `pin` through an [`Io`] facade.
///
/// Unlike [`crate::Forward`]/[`crate::Repeat`]/[`crate::Counter`], this one
/// isn't registered in [`crate::register_all`]: it needs a pin number and an
/// `Io` handle bound at construction time, which a zero-argument
/// `ComponentFactory` can't supply. Callers that want one wired into a graph
/// driven by the host protocol construct it directly and `add_node` it
/// themselves, the same way `nanoflo`'s bootstrap wires any other
/// host-specific device.
pub struct GpioWrite<I: Io> {
    pin: u8,
    io: Rc<RefCell<I>>,
}

impl<I: Io> GpioWrite<I> {
    pub fn new(pin: u8, io: Rc<RefCell<I>>) -> Self {
        Self { pin, io }
    }
}

impl<I: Io> std::fmt::Debug for GpioWrite<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpioWrite").field("pin", &self.pin).finish()
    }
}

impl<I: Io> Component for GpioWrite<I> {
    fn n_ports(&self) -> usize {
        1
    }

    fn component_id(&self) -> ComponentId {
        ids::GPIO_WRITE
    }

    fn process(&mut self, _ctx: &mut ProcessContext, packet: Packet, port: PortId) {
        if port == BROADCAST_PORT {
            return;
        }
        if packet.is_bool() || packet.is_byte() {
            self.io.borrow_mut().digital_write(self.pin, packet.as_bool());
        } else {
            log::debug!("GpioWrite: ignoring non-bool/byte packet {:?}", packet.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SimulatedIo;
    use nanoflo_core::{MessageQueue, NullNotificationHandler};

    #[test]
    fn writes_bool_packets_to_the_bound_pin() {
        let io = SimulatedIo::shared();
        let mut gpio = GpioWrite::new(4, io.clone());
        let mut notify = NullNotificationHandler;
        let mut queue = MessageQueue::new();
        let mut ctx = ProcessContext::new(1, 1, &mut queue, &mut notify);

        gpio.process(&mut ctx, Packet::bool(true), 0);
        assert_eq!(io.borrow().read(4), Some(true));

        gpio.process(&mut ctx, Packet::bool(false), 0);
        assert_eq!(io.borrow().read(4), Some(false));
    }

    #[test]
    fn ignores_non_bool_byte_packets() {
        let io = SimulatedIo::shared();
        let mut gpio = GpioWrite::new(2, io.clone());
        let mut notify = NullNotificationHandler;
        let mut queue = MessageQueue::new();
        let mut ctx = ProcessContext::new(1, 1, &mut queue, &mut notify);

        gpio.process(&mut ctx, Packet::float(1.0), 0);
        assert_eq!(io.borrow().read(2), None);
    }
}
