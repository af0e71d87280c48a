use crate::{
    Component, ComponentHeader, ComponentId, Connection, InterruptSafeSender, Message,
    MessageQueue, NodeId, NetworkNotificationHandler, NullNotificationHandler, Packet, PortId,
    BROADCAST_PORT, FIRST_NODE_ID, MAX_NODES, NO_PARENT,
};

#[cfg(feature = "subgraph")]
use crate::SubgraphTables;

/// Lifecycle state of a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    /// No `Setup` broadcast has run yet (or the network was just [`Network::reset`]).
    Reset,
    /// `Setup` has run; [`Network::run_tick`] may be called.
    Running,
    /// Held by the host; ticks are accepted but components should not act on them.
    Stopped,
}

/// Failure modes raised by the network's graph-editing operations.
///
/// Distinct from [`crate::NotificationHandler`][crate::NetworkNotificationHandler]
/// events: these are returned to the caller (typically `nanoflo-proto`
/// dispatching a host command), which decides whether/how to report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    NodeTableFull,
    NoSuchNode,
    NoSuchPort,
    NotASubgraph,
    InvalidParent,
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::NodeTableFull => write!(f, "node table is full"),
            NetworkError::NoSuchNode => write!(f, "no such node"),
            NetworkError::NoSuchPort => write!(f, "no such port"),
            NetworkError::NotASubgraph => write!(f, "node is not a subgraph"),
            NetworkError::InvalidParent => write!(f, "parent node does not exist"),
        }
    }
}

impl std::error::Error for NetworkError {}

struct NodeEntry {
    component_id: ComponentId,
    header: ComponentHeader,
    #[cfg(feature = "subgraph")]
    subgraph: Option<SubgraphTables>,
    instance: Box<dyn Component>,
}

/// Owns the live node table, the pending message queue, and drives both
/// against a scheduler-provided `Setup`/`Tick` cadence.
///
/// Nodes are addressed by [`NodeId`], an index into a fixed-capacity table
/// rather than a pointer — this sidesteps the aliasing a `Component` graph
/// with back-edges would otherwise need `Rc`/`RefCell` or unsafe code to
/// express, and keeps the node table's memory footprint fixed up front.
pub struct Network {
    nodes: Vec<Option<NodeEntry>>,
    last_added_node_index: usize,
    state: NetworkState,
    queue: MessageQueue,
    notify: Box<dyn NetworkNotificationHandler>,
    interrupt_sender: InterruptSafeSender,
}

impl Network {
    pub fn new() -> Self {
        Self::with_notification_handler(Box::new(NullNotificationHandler))
    }

    pub fn with_notification_handler(notify: Box<dyn NetworkNotificationHandler>) -> Self {
        let mut nodes = Vec::with_capacity(MAX_NODES);
        nodes.resize_with(MAX_NODES, || None);
        Self {
            nodes,
            last_added_node_index: 0,
            state: NetworkState::Reset,
            queue: MessageQueue::new(),
            notify,
            interrupt_sender: InterruptSafeSender::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// A cloneable, push-only handle for feeding packets in from outside the
    /// scheduler loop. See [`InterruptSafeSender`].
    pub fn interrupt_sender(&self) -> InterruptSafeSender {
        self.interrupt_sender.clone()
    }

    #[inline]
    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    fn entry(&self, node: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(node as usize).and_then(|e| e.as_ref())
    }

    fn entry_mut(&mut self, node: NodeId) -> Option<&mut NodeEntry> {
        self.nodes.get_mut(node as usize).and_then(|e| e.as_mut())
    }

    /// Add a node carrying `instance`, returning its freshly allocated id.
    ///
    /// Node ids are handed out by a bump allocator: once allocated, an index
    /// is never reused, even after [`Network::remove_node`], until the whole
    /// network is [`Network::reset`]. This matches the host protocol's
    /// expectation that a node id stays meaningful (if dead) for the
    /// lifetime of a graph.
    pub fn add_node(
        &mut self,
        component_id: ComponentId,
        instance: Box<dyn Component>,
    ) -> Result<NodeId, NetworkError> {
        self.add_node_with_parent(component_id, instance, NO_PARENT)
    }

    /// Like [`Network::add_node`], but records `parent` as the owning
    /// subgraph node (used when a host unpacks a subgraph's children).
    pub fn add_node_with_parent(
        &mut self,
        component_id: ComponentId,
        instance: Box<dyn Component>,
        parent: NodeId,
    ) -> Result<NodeId, NetworkError> {
        if parent != NO_PARENT && self.entry(parent).is_none() {
            self.notify.emit_debug(
                crate::DebugId::Validation,
                crate::DebugLevel::Error,
                "add_node: parent does not exist",
            );
            return Err(NetworkError::InvalidParent);
        }

        let next = if self.last_added_node_index == 0 {
            FIRST_NODE_ID as usize
        } else {
            self.last_added_node_index + 1
        };
        if next >= MAX_NODES {
            return Err(NetworkError::NodeTableFull);
        }

        let n_ports = instance.n_ports();
        let is_subgraph = instance.is_subgraph();
        let entry = NodeEntry {
            component_id,
            header: ComponentHeader::new(n_ports, parent),
            #[cfg(feature = "subgraph")]
            subgraph: is_subgraph.then(SubgraphTables::new),
            instance,
        };
        #[cfg(not(feature = "subgraph"))]
        let _ = is_subgraph;

        self.nodes[next] = Some(entry);
        self.last_added_node_index = next;

        let id = next as NodeId;
        self.notify.node_added(id, component_id, parent);
        Ok(id)
    }

    /// Remove a node. Its id is not reused; see [`Network::add_node`].
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), NetworkError> {
        let slot = self
            .nodes
            .get_mut(node as usize)
            .ok_or(NetworkError::NoSuchNode)?;
        if slot.take().is_none() {
            return Err(NetworkError::NoSuchNode);
        }
        self.notify.node_removed(node);
        Ok(())
    }

    /// Wipe every node, clear the queue, and return to [`NetworkState::Reset`].
    pub fn reset(&mut self) {
        for slot in self.nodes.iter_mut() {
            *slot = None;
        }
        self.last_added_node_index = 0;
        self.queue.clear();
        self.state = NetworkState::Reset;
        self.notify.network_state_changed(NetworkState::Reset);
    }

    pub fn component_id(&self, node: NodeId) -> Option<ComponentId> {
        self.entry(node).map(|e| e.component_id)
    }

    /// Wire `from`'s `from_port` to `to`'s `to_port`.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_port: PortId,
        to: NodeId,
        to_port: PortId,
    ) -> Result<(), NetworkError> {
        if !self.nodes.get(to as usize).map_or(false, |e| e.is_some()) {
            return Err(NetworkError::NoSuchNode);
        }
        let conn = self
            .entry_mut(from)
            .ok_or(NetworkError::NoSuchNode)?
            .header
            .connection_mut(from_port)
            .ok_or(NetworkError::NoSuchPort)?;
        *conn = Connection { target: Some(to), target_port: to_port, subscribed: conn.subscribed };
        self.notify.nodes_connected(from, from_port, to, to_port);
        Ok(())
    }

    /// Remove the wire leaving `from`'s `from_port`, if any.
    pub fn disconnect(&mut self, from: NodeId, from_port: PortId) -> Result<(), NetworkError> {
        let entry = self.entry_mut(from).ok_or(NetworkError::NoSuchNode)?;
        let conn = entry
            .header
            .connection_mut(from_port)
            .ok_or(NetworkError::NoSuchPort)?;
        let (to, to_port) = (conn.target, conn.target_port);
        *conn = Connection::empty();
        if let Some(to) = to {
            self.notify.nodes_disconnected(from, from_port, to, to_port);
        }
        Ok(())
    }

    /// Mirror every packet delivered to `node`'s `port` out as a `PacketSent`
    /// notification (used by the host protocol's `IPSubscribe` command).
    pub fn subscribe_to_port(&mut self, node: NodeId, port: PortId) -> Result<(), NetworkError> {
        let conn = self
            .entry_mut(node)
            .ok_or(NetworkError::NoSuchNode)?
            .header
            .connection_mut(port)
            .ok_or(NetworkError::NoSuchPort)?;
        conn.subscribed = true;
        self.notify.port_subscription_changed(node, port, true);
        Ok(())
    }

    /// Stop mirroring packets delivered to `node`'s `port`.
    pub fn unsubscribe_from_port(&mut self, node: NodeId, port: PortId) -> Result<(), NetworkError> {
        let conn = self
            .entry_mut(node)
            .ok_or(NetworkError::NoSuchNode)?
            .header
            .connection_mut(port)
            .ok_or(NetworkError::NoSuchPort)?;
        conn.subscribed = false;
        self.notify.port_subscription_changed(node, port, false);
        Ok(())
    }

    /// Wire `subgraph_node`'s `subgraph_port` (an externally visible input)
    /// through to `child`'s `child_port`.
    ///
    /// Only meaningful when `subgraph_node`'s component reports
    /// `is_subgraph() == true`; see [`SubgraphTables`] for why the matching
    /// child-to-parent direction needs no separate call.
    #[cfg(feature = "subgraph")]
    pub fn connect_subgraph(
        &mut self,
        subgraph_node: NodeId,
        subgraph_port: PortId,
        child: NodeId,
        child_port: PortId,
    ) -> Result<(), NetworkError> {
        if !self.nodes.get(child as usize).map_or(false, |e| e.is_some()) {
            return Err(NetworkError::NoSuchNode);
        }
        let entry = self.entry_mut(subgraph_node).ok_or(NetworkError::NoSuchNode)?;
        if !entry.instance.is_subgraph() {
            return Err(NetworkError::NotASubgraph);
        }
        let sg = entry.subgraph.get_or_insert_with(SubgraphTables::new);
        let conn = sg
            .input_connection_mut(subgraph_port)
            .ok_or(NetworkError::NoSuchPort)?;
        *conn = Connection { target: Some(child), target_port: child_port, subscribed: false };
        self.notify
            .subgraph_connected(false, subgraph_node, subgraph_port, child, child_port);
        Ok(())
    }

    /// Inject `packet` as if `node`'s `port` had just emitted it.
    ///
    /// Safe to call from interrupt context: it only ever performs the single
    /// bounded-queue push a [`crate::ProcessContext::send`] would, never a
    /// node table lookup or component call.
    pub fn send_message_from(&mut self, node: NodeId, port: PortId, packet: Packet) -> bool {
        let before = self.queue.overflow_count();
        let ok = self.queue.push(Message::from_source(node, port, packet));
        if self.queue.overflow_count() != before {
            self.notify.queue_overflow(node, port);
        }
        ok
    }

    /// Inject `packet` addressed directly to `node`'s `port`, bypassing
    /// connection resolution (used by the host protocol's `SendData`
    /// command).
    pub fn send_message_to(&mut self, node: NodeId, port: PortId, packet: Packet) -> bool {
        let before = self.queue.overflow_count();
        let ok = self.queue.push(Message::to_target(node, port, packet));
        if self.queue.overflow_count() != before {
            self.notify.queue_overflow(node, port);
        }
        ok
    }

    /// Mark the network [`NetworkState::Running`] and broadcast `Setup` to
    /// every live node. Equivalent to [`Network::start`]; kept as a separate
    /// name for callers that want to describe intent as "first run" rather
    /// than "(re)start".
    pub fn run_setup(&mut self) {
        self.start();
    }

    /// Roll the queue into a new tick, deliver whatever the previous tick's
    /// processing produced, then broadcast `Tick` — whatever components emit
    /// in response is left queued for the next call, not drained within this
    /// one.
    ///
    /// A no-op outside [`NetworkState::Running`], matching the host's ability
    /// to pause a running graph without tearing it down.
    pub fn run_tick(&mut self) {
        if self.state != NetworkState::Running {
            return;
        }
        for message in self.interrupt_sender.take_staged() {
            self.queue.push(message);
        }
        self.queue.new_tick();
        self.drain_queue();
        self.broadcast(Packet::tick());
    }

    pub fn stop(&mut self) {
        self.state = NetworkState::Stopped;
        self.notify.network_state_changed(NetworkState::Stopped);
    }

    /// Transition to [`NetworkState::Running`] and broadcast `Setup`, the
    /// only point in a network's lifecycle `Setup` is ever sent — matching
    /// the host protocol's `StartNetwork` command as well as a fresh
    /// network's first run.
    pub fn start(&mut self) {
        self.state = NetworkState::Running;
        self.notify.network_state_changed(NetworkState::Running);
        self.broadcast(Packet::setup());
    }

    fn broadcast(&mut self, packet: Packet) {
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|_| i as NodeId))
            .collect();
        for node in ids {
            self.deliver(node, BROADCAST_PORT, packet);
        }
    }

    /// Pop every message queued for the current delivery window and route it.
    ///
    /// Resolution happens in two steps before anything is notified or
    /// delivered: the direct outbound connection first, then (only if that
    /// resolved) subgraph redirection — `packetSent` reports the final,
    /// post-subgraph destination, matching the original's single
    /// `resolveMessageTarget` call doing both steps internally before its
    /// caller ever notifies. The notification still fires regardless of
    /// whether a connection was found, as long as the sending port is
    /// subscribed — a port with no wire can still be observed by the host
    /// (for testing, or bridging to something like MQTT) — it just reports
    /// the sender's own node/port as both source and destination in that
    /// case, since there is nothing to redirect.
    fn drain_queue(&mut self) {
        while let Some(mut message) = self.queue.pop() {
            let sender = if message.target_referred { None } else { Some(message.node) };
            let sender_port = message.port;
            let mut subscribed = false;

            if let Some(sender_node) = sender {
                subscribed = self
                    .entry(sender_node)
                    .and_then(|e| e.header.connection(sender_port))
                    .map_or(false, |c| c.subscribed);

                match self.resolve_outbound(sender_node, sender_port) {
                    Some((node, port)) => {
                        message.node = node;
                        message.port = port;
                        message.target_referred = true;
                    }
                    None => {
                        if subscribed {
                            self.notify.packet_sent(
                                sender_node,
                                sender_port,
                                sender_node,
                                sender_port,
                                message.packet,
                            );
                        }
                        continue;
                    }
                }
            }

            let (node, port) = self.resolve_through_subgraph(sender, message.node, message.port);
            message.node = node;
            message.port = port;

            if let Some(sender_node) = sender {
                if subscribed {
                    self.notify
                        .packet_sent(sender_node, sender_port, message.node, message.port, message.packet);
                }
            }

            self.deliver(message.node, message.port, message.packet);
        }
    }

    fn resolve_outbound(&self, node: NodeId, port: PortId) -> Option<(NodeId, PortId)> {
        let conn = self.entry(node)?.header.connection(port)?;
        let target = conn.target?;
        Some((target, conn.target_port))
    }

    /// After a message's direct connection is resolved, redirect it once more
    /// across a subgraph boundary in either direction:
    ///
    /// - a child emitting to what is, as far as its own wiring is concerned,
    ///   its parent subgraph node is redirected out through the parent's own
    ///   outbound connection for that port (the subgraph's exposed output);
    /// - a message landing on a subgraph node's own input port is redirected
    ///   in to whichever child that port was mapped to.
    ///
    /// Only one hop is resolved; a subgraph nested inside another subgraph
    /// is not followed recursively.
    #[cfg(feature = "subgraph")]
    fn resolve_through_subgraph(&self, sender: Option<NodeId>, node: NodeId, port: PortId) -> (NodeId, PortId) {
        if let Some(sender) = sender {
            if let Some(parent) = self.entry(sender).map(|e| e.header.parent()) {
                if parent != NO_PARENT && parent == node {
                    if let Some(conn) = self.entry(parent).and_then(|e| e.header.connection(port)) {
                        if let Some(target) = conn.target {
                            return (target, conn.target_port);
                        }
                    }
                }
            }
        }

        if let Some(entry) = self.entry(node) {
            if entry.instance.is_subgraph() {
                if let Some(sg) = &entry.subgraph {
                    if let Some(conn) = sg.input_connection(port) {
                        if let Some(target) = conn.target {
                            return (target, conn.target_port);
                        }
                    }
                }
            }
        }
        (node, port)
    }

    #[cfg(not(feature = "subgraph"))]
    fn resolve_through_subgraph(&self, _sender: Option<NodeId>, node: NodeId, port: PortId) -> (NodeId, PortId) {
        (node, port)
    }

    /// Take `node`'s component instance out of the table, run `process`
    /// against it, then put it back.
    ///
    /// The take/put-back round trip exists because `process` needs `&mut`
    /// access to the rest of the network (the queue, to emit outbound
    /// packets, and the notification sink) at the same time the network
    /// needs `&mut` access to the node to call `process` on it in the first
    /// place — two overlapping mutable borrows a single `&mut self` method
    /// can't express directly.
    fn deliver(&mut self, node: NodeId, port: PortId, packet: Packet) {
        let Some(mut entry) = self.nodes.get_mut(node as usize).and_then(|e| e.take()) else {
            return;
        };

        if entry.instance.is_subgraph() {
            self.nodes[node as usize] = Some(entry);
            return;
        }

        let n_ports = entry.header.n_ports();
        let mut ctx = crate::ProcessContext::new(node, n_ports, &mut self.queue, self.notify.as_mut());
        entry.instance.process(&mut ctx, packet, port);

        self.nodes[node as usize] = Some(entry);
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Echo;

    impl Component for Echo {
        fn n_ports(&self) -> usize {
            1
        }

        fn component_id(&self) -> ComponentId {
            ComponentId(1)
        }

        fn process(&mut self, ctx: &mut crate::ProcessContext, packet: Packet, port: PortId) {
            if port != BROADCAST_PORT {
                ctx.send(0, packet);
            }
        }
    }

    #[derive(Debug)]
    struct Sink {
        last: std::rc::Rc<std::cell::Cell<Option<i32>>>,
    }

    impl Component for Sink {
        fn n_ports(&self) -> usize {
            1
        }

        fn component_id(&self) -> ComponentId {
            ComponentId(2)
        }

        fn process(&mut self, _ctx: &mut crate::ProcessContext, packet: Packet, port: PortId) {
            if port != BROADCAST_PORT {
                self.last.set(Some(packet.as_integer()));
            }
        }
    }

    #[test]
    fn connects_and_delivers_across_a_tick() {
        let mut net = Network::new();
        let echo = net.add_node(ComponentId(1), Box::new(Echo)).unwrap();
        let last = std::rc::Rc::new(std::cell::Cell::new(None));
        let sink = net
            .add_node(ComponentId(2), Box::new(Sink { last: last.clone() }))
            .unwrap();
        net.connect(echo, 0, sink, 0).unwrap();

        net.run_setup();
        net.send_message_to(echo, 0, Packet::integer(7));
        // First tick delivers the packet to `echo`, which re-emits it on its
        // own output port; that re-emission is only picked up on the next
        // tick's drain, same as any other cross-node hop.
        net.run_tick();
        net.run_tick();

        assert_eq!(last.get(), Some(7));
    }

    #[test]
    fn remove_node_does_not_recycle_its_id() {
        let mut net = Network::new();
        let a = net.add_node(ComponentId(1), Box::new(Echo)).unwrap();
        net.remove_node(a).unwrap();
        let b = net.add_node(ComponentId(1), Box::new(Echo)).unwrap();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn node_table_full_is_reported() {
        let mut net = Network::new();
        let mut last = Ok(0);
        loop {
            match net.add_node(ComponentId(1), Box::new(Echo)) {
                Ok(id) => last = Ok(id),
                Err(e) => {
                    assert_eq!(e, NetworkError::NodeTableFull);
                    break;
                }
            }
        }
        let _ = last;
    }
}
