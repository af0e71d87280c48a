use crate::Packet;

/// Identifies a live node within a [`crate::Network`].
///
/// Node `0` is reserved as the "no parent" sentinel; live nodes start at
/// [`crate::FIRST_NODE_ID`].
pub type NodeId = u16;

/// Identifies an input or output port on a component.
///
/// Non-negative on any real port; [`BROADCAST_PORT`] (`-1`) denotes the
/// `Setup`/`Tick` broadcast sentinel port.
pub type PortId = i16;

/// The port value used for broadcast sentinels (`Setup`, `Tick`).
pub const BROADCAST_PORT: PortId = -1;

/// A pending delivery in the [`crate::MessageQueue`].
///
/// When `target_referred` is `false`, `node`/`port` identify the message's
/// *source* and the queue's consumer is responsible for resolving the
/// destination through the source's outbound connection. When `true`,
/// `node`/`port` already identify the destination directly (used for
/// externally injected packets, and for messages past resolution).
#[derive(Debug, Clone, Copy)]
pub struct Message {
    pub packet: Packet,
    pub node: NodeId,
    pub port: PortId,
    pub target_referred: bool,
}

impl Message {
    /// Construct a source-referred message (destination resolved later by the queue consumer).
    pub fn from_source(node: NodeId, port: PortId, packet: Packet) -> Self {
        Self { packet, node, port, target_referred: false }
    }

    /// Construct a target-referred message (destination already known).
    pub fn to_target(node: NodeId, port: PortId, packet: Packet) -> Self {
        Self { packet, node, port, target_referred: true }
    }
}
