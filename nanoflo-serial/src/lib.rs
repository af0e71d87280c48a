//! A [`nanoflo_proto::HostTransport`] backed by a real TTY.
//!
//! Opens the device non-blocking and talks to it with raw `read`/`write`
//! syscalls rather than a buffered `std::fs::File`, the same way the
//! teacher's own serial driver avoids buffering getting in the way of a
//! byte-at-a-time protocol parser.

mod baud;
mod uart;

pub use baud::BaudRate;
pub use uart::Uart;

use nanoflo_proto::{Command, HostTransport};

impl HostTransport for Uart {
    fn poll_byte(&mut self) -> Option<u8> {
        Uart::poll_byte(self)
    }

    fn send_command(&mut self, cmd: &Command) {
        self.write_all_lossy(cmd);
    }
}
