//! Byte-oriented protocol that lets an off-device host observe and drive a
//! [`nanoflo_core::Network`] over any [`HostTransport`] (a serial port, a USB
//! CDC endpoint, or — for tests and simulation — [`LoopbackTransport`]).
//!
//! [`HostCommunication`] parses the inbound byte stream and dispatches
//! commands against the network; [`WireNotifier`], installed as the
//! network's own notification sink, encodes every graph event back into the
//! same wire format. The two share an [`event::OutboundQueue`] rather than
//! referencing each other directly — see [`WireNotifier`]'s doc comment for
//! why.

mod cmd;
mod event;
mod frame;
mod host_communication;
mod notify;
mod transport;

pub use cmd::GraphCmd;
pub use event::OutboundQueue;
pub use frame::{build, Command, CMD_SIZE, MAGIC};
pub use host_communication::HostCommunication;
pub use notify::WireNotifier;
pub use transport::{HostTransport, LoopbackTransport};
