use std::cell::RefCell;
use std::rc::Rc;

use nanoflo_core::{
    ComponentId, DebugId, DebugLevel as CoreDebugLevel, NetworkNotificationHandler, NetworkState,
    NodeId, Packet, PortId,
};

use crate::cmd::GraphCmd;
use crate::event::OutboundQueue;
use crate::frame::build;

/// Installed as a `Network`'s [`NetworkNotificationHandler`]; turns every
/// callback into an encoded [`crate::frame::Command`] and pushes it onto a
/// queue shared with the [`crate::HostCommunication`] that owns the actual
/// transport.
///
/// Kept as a separate type from `HostCommunication` rather than merging the
/// two: `Network` needs to own its notification sink for the lifetime of
/// every `process` call, while `HostCommunication::poll` needs a live `&mut
/// Network` to dispatch inbound commands against. A single type can't be
/// both "owned by Network" and "borrowing Network" at once, so the shared
/// [`OutboundQueue`] carries events between the two without either side
/// needing a reference to the other.
pub struct WireNotifier {
    outbound: Rc<RefCell<OutboundQueue>>,
    debug_level: Rc<RefCell<CoreDebugLevel>>,
}

impl WireNotifier {
    pub(crate) fn new(
        outbound: Rc<RefCell<OutboundQueue>>,
        debug_level: Rc<RefCell<CoreDebugLevel>>,
    ) -> Self {
        Self { outbound, debug_level }
    }

    fn push(&self, cmd: [u8; crate::frame::CMD_SIZE]) {
        self.outbound.borrow_mut().push(cmd);
    }
}

impl NetworkNotificationHandler for WireNotifier {
    fn node_added(&mut self, node: NodeId, component_id: ComponentId, parent: NodeId) {
        self.push(build(
            GraphCmd::NodeAdded as u8,
            &[component_id.0, node as u8, parent as u8],
        ));
    }

    fn node_removed(&mut self, node: NodeId) {
        self.push(build(GraphCmd::NodeRemoved as u8, &[node as u8]));
    }

    fn nodes_connected(&mut self, src: NodeId, src_port: PortId, dst: NodeId, dst_port: PortId) {
        self.push(build(
            GraphCmd::NodesConnected as u8,
            &[src as u8, src_port as u8, dst as u8, dst_port as u8],
        ));
    }

    fn nodes_disconnected(&mut self, src: NodeId, src_port: PortId, dst: NodeId, dst_port: PortId) {
        self.push(build(
            GraphCmd::NodesDisconnected as u8,
            &[src as u8, src_port as u8, dst as u8, dst_port as u8],
        ));
    }

    fn network_state_changed(&mut self, state: NetworkState) {
        let code = match state {
            NetworkState::Running => GraphCmd::NetworkStarted,
            NetworkState::Stopped => GraphCmd::NetworkStopped,
            NetworkState::Reset => GraphCmd::NetworkReset,
        };
        self.push(build(code as u8, &[]));
    }

    fn packet_sent(&mut self, src: NodeId, src_port: PortId, dst: NodeId, dst_port: PortId, packet: Packet) {
        let mut operands = [
            src as u8,
            src_port as u8,
            dst as u8,
            dst_port as u8,
            packet.kind() as u8,
            0,
            0,
        ];
        if packet.is_data() {
            if packet.is_bool() {
                operands[5] = packet.as_bool() as u8;
            } else if packet.is_number() {
                let i = packet.as_integer();
                operands[5] = (i & 0xff) as u8;
                operands[6] = ((i >> 8) & 0xff) as u8;
            }
        }
        self.push(build(GraphCmd::PacketSent as u8, &operands));
    }

    fn port_subscription_changed(&mut self, node: NodeId, port: PortId, enabled: bool) {
        self.push(build(
            GraphCmd::PortSubscriptionChanged as u8,
            &[node as u8, port as u8, enabled as u8],
        ));
    }

    #[cfg(feature = "subgraph")]
    fn subgraph_connected(
        &mut self,
        is_output: bool,
        subgraph_node: NodeId,
        subgraph_port: PortId,
        child_node: NodeId,
        child_port: PortId,
    ) {
        self.push(build(
            GraphCmd::SubgraphPortConnected as u8,
            &[
                is_output as u8,
                subgraph_node as u8,
                subgraph_port as u8,
                child_node as u8,
                child_port as u8,
            ],
        ));
    }

    fn emit_debug(&mut self, id: DebugId, level: CoreDebugLevel, _message: &str) {
        if level > *self.debug_level.borrow() {
            return;
        }
        let id_code = match id {
            DebugId::Validation => 0u8,
            DebugId::Protocol => 1,
            DebugId::Unsupported => 2,
            DebugId::QueueOverflow => 3,
        };
        let level_code = level as u8;
        self.push(build(GraphCmd::DebugMessage as u8, &[level_code, id_code]));
    }
}
