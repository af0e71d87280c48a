use crate::{ComponentId, NetworkState, NodeId, Packet, PortId};

/// Verbosity threshold for [`NetworkNotificationHandler::emit_debug`].
///
/// Ordered so a handler can cheaply filter with `level <= self.threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Info,
    Detailed,
    VeryDetailed,
}

/// Classifies a debug/error notification emitted by the network.
///
/// Distinct from Rust's `Result`/`Error` machinery on purpose: these are
/// observability events raised *during* otherwise-successful scheduler
/// ticks (a dangling connection, an unsupported command, a full queue),
/// not failures that unwind a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugId {
    Validation,
    Protocol,
    Unsupported,
    QueueOverflow,
}

/// Sink for everything observable a [`crate::Network`] does.
///
/// All methods have no-op default bodies; implement only the ones you care
/// about. `nanoflo-proto`'s `WireNotifier` implements this to serialize
/// events back to the host; the `nanoflo` daemon binary layers a `log`-backed
/// handler over the top for local diagnostics.
#[allow(unused_variables)]
pub trait NetworkNotificationHandler {
    /// A node was added to the network.
    fn node_added(&mut self, node: NodeId, component_id: ComponentId, parent: NodeId) {}

    /// A node was removed from the network.
    fn node_removed(&mut self, node: NodeId) {}

    /// Two ports were connected.
    fn nodes_connected(&mut self, src: NodeId, src_port: PortId, dst: NodeId, dst_port: PortId) {}

    /// A connection was removed.
    fn nodes_disconnected(&mut self, src: NodeId, src_port: PortId, dst: NodeId, dst_port: PortId) {}

    /// The network transitioned to a new lifecycle state.
    fn network_state_changed(&mut self, state: NetworkState) {}

    /// A packet was delivered from `(src, src_port)` to `(dst, dst_port)`.
    fn packet_sent(&mut self, src: NodeId, src_port: PortId, dst: NodeId, dst_port: PortId, packet: Packet) {}

    /// An output port's `PacketSent` mirroring was toggled.
    fn port_subscription_changed(&mut self, node: NodeId, port: PortId, enabled: bool) {}

    /// A subgraph's external port was wired to a child node's port.
    #[cfg(feature = "subgraph")]
    fn subgraph_connected(
        &mut self,
        is_output: bool,
        subgraph_node: NodeId,
        subgraph_port: PortId,
        child_node: NodeId,
        child_port: PortId,
    ) {
    }

    /// A message had to be dropped because the message queue was full.
    ///
    /// Not part of the original notification set; added so a handler can
    /// observe overflow without polling `MessageQueue::overflow_count`.
    fn queue_overflow(&mut self, node: NodeId, port: PortId) {}

    /// A component's `process` called [`crate::ProcessContext::send`] with a
    /// `port >= nPorts`. The send is refused rather than enqueued.
    fn component_send_invalid_port(&mut self, node: NodeId, port: PortId) {}

    /// A free-form debug/error event.
    fn emit_debug(&mut self, id: DebugId, level: DebugLevel, message: &str) {}
}

/// A [`NetworkNotificationHandler`] that discards everything. Useful as a
/// default and in tests that don't care about notifications.
#[derive(Debug, Default)]
pub struct NullNotificationHandler;

impl NetworkNotificationHandler for NullNotificationHandler {}
