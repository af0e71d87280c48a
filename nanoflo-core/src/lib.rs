//! Runtime kernel of a small flow-based programming (FBP) engine.
//!
//! A [`Network`] owns a fixed-capacity table of [`Component`] instances
//! (nodes), routes [`Packet`] messages between their ports through a
//! [`MessageQueue`], and drives them on a scheduler-provided tick. See the
//! crate's sibling `nanoflo-proto` for the byte-oriented host protocol that
//! drives a `Network` from off-device.

mod component;
mod consts;
mod interrupt;
mod library;
mod message;
mod network;
mod notify;
mod packet;
mod queue;

#[cfg(feature = "subgraph")]
mod subgraph;

pub use component::{Component, ComponentHeader, ComponentId, Connection, ProcessContext};
pub use consts::{FIRST_NODE_ID, MAX_MESSAGES, MAX_NODES, NO_PARENT, SUBGRAPH_MAXPORTS};
pub use interrupt::InterruptSafeSender;
pub use library::{ComponentFactory, ComponentLibrary};
pub use message::{Message, NodeId, PortId, BROADCAST_PORT};
pub use network::{Network, NetworkError, NetworkState};
pub use notify::{DebugId, DebugLevel, NetworkNotificationHandler, NullNotificationHandler};
pub use packet::{Msg, Packet};
pub use queue::MessageQueue;

#[cfg(feature = "subgraph")]
pub use subgraph::SubgraphTables;
