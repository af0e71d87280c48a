use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The digital-output side of the platform IO boundary `GpioWrite` drives.
///
/// A real build backs this with actual pin registers; this crate only
/// provides [`SimulatedIo`], a host-side recorder used by tests and by
/// `nanoflo --sim`.
pub trait Io {
    fn digital_write(&mut self, pin: u8, value: bool);
}

/// Records the last value written to each pin, for test assertions.
#[derive(Debug, Default)]
pub struct SimulatedIo {
    pins: HashMap<u8, bool>,
}

impl SimulatedIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The last value written to `pin`, if any.
    pub fn read(&self, pin: u8) -> Option<bool> {
        self.pins.get(&pin).copied()
    }
}

impl Io for SimulatedIo {
    fn digital_write(&mut self, pin: u8, value: bool) {
        self.pins.insert(pin, value);
    }
}
