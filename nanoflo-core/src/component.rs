use crate::{Message, NodeId, Packet, PortId, MessageQueue, NetworkNotificationHandler};

/// Identifies a component *type* registered in a `ComponentLibrary` (see `nanoflo-components`).
///
/// Kept here, rather than in the library crate, because components report
/// their own id from [`Component::component_id`] and the network stores it
/// alongside each node for introspection and `PacketSent` notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub u8);

/// One outbound wire from a port: which node/port receives it, and whether
/// delivery should also be mirrored out as a `PacketSent` notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Connection {
    pub target: Option<NodeId>,
    pub target_port: PortId,
    pub subscribed: bool,
}

impl Connection {
    pub const fn empty() -> Self {
        Self { target: None, target_port: 0, subscribed: false }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }
}

/// Per-node bookkeeping the [`crate::Network`] maintains on behalf of a
/// [`Component`] instance: its outbound wiring and its parent subgraph, if
/// any.
///
/// Split out from the `Component` trait object itself so the network can
/// read/mutate routing state without a mutable borrow of the component's
/// `process` implementation (see `Network::process_messages`).
#[derive(Debug, Clone)]
pub struct ComponentHeader {
    n_ports: usize,
    connections: Vec<Connection>,
    parent: NodeId,
}

impl ComponentHeader {
    pub fn new(n_ports: usize, parent: NodeId) -> Self {
        Self { n_ports, connections: vec![Connection::empty(); n_ports], parent }
    }

    #[inline]
    pub fn n_ports(&self) -> usize {
        self.n_ports
    }

    #[inline]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    #[inline]
    pub fn set_parent(&mut self, parent: NodeId) {
        self.parent = parent;
    }

    pub fn connection(&self, port: PortId) -> Option<&Connection> {
        self.port_index(port).map(|i| &self.connections[i])
    }

    pub fn connection_mut(&mut self, port: PortId) -> Option<&mut Connection> {
        self.port_index(port).map(move |i| &mut self.connections[i])
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    fn port_index(&self, port: PortId) -> Option<usize> {
        if port < 0 || port as usize >= self.n_ports {
            None
        } else {
            Some(port as usize)
        }
    }
}

/// The handle a component's [`Component::process`] uses to emit outbound
/// packets and reach the network's notification sink.
///
/// Bundles what would otherwise be three separate `&mut` borrows into one,
/// so `Network::process_messages` can hand it to a taken-out component
/// instance while the rest of the network stays reachable through it.
pub struct ProcessContext<'a> {
    node: NodeId,
    n_ports: usize,
    queue: &'a mut MessageQueue,
    notify: &'a mut dyn NetworkNotificationHandler,
}

impl<'a> ProcessContext<'a> {
    pub fn new(
        node: NodeId,
        n_ports: usize,
        queue: &'a mut MessageQueue,
        notify: &'a mut dyn NetworkNotificationHandler,
    ) -> Self {
        Self { node, n_ports, queue, notify }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Queue `packet` for delivery out of `port`, to be resolved against this
    /// node's outbound connections on the next queue drain.
    ///
    /// Fails (and notifies `ComponentSendInvalidPort` instead of enqueuing)
    /// when `port >= nPorts`. Otherwise the message is always enqueued (the
    /// original queue never refuses a write); if doing so collided with an
    /// unread slot, `QueueOverflow` is notified so the collision is at least
    /// observable.
    pub fn send(&mut self, port: PortId, packet: Packet) -> bool {
        if port < 0 || port as usize >= self.n_ports {
            self.notify.component_send_invalid_port(self.node, port);
            return false;
        }

        let message = Message::from_source(self.node, port, packet);
        let before = self.queue.overflow_count();
        let ok = self.queue.push(message);
        if self.queue.overflow_count() != before {
            self.notify.queue_overflow(self.node, port);
        }
        ok
    }

    pub fn notify(&mut self) -> &mut dyn NetworkNotificationHandler {
        self.notify
    }
}

/// A node in the flow graph: receives packets on input ports, does
/// something with them, and (optionally) emits packets on output ports via
/// the [`ProcessContext`] it's handed.
///
/// Implementors are expected to be cheap, non-blocking, and non-panicking —
/// a `process` call happens inline in the scheduler tick.
pub trait Component: std::fmt::Debug {
    /// Number of addressable ports (shared between inputs and outputs, as
    /// in the original design: a port index means whatever the component
    /// documents it to mean).
    fn n_ports(&self) -> usize;

    /// Identifies the component type, for `PacketSent`/introspection.
    fn component_id(&self) -> ComponentId;

    /// Handle one incoming packet on `port`.
    ///
    /// `port == `[`BROADCAST_PORT`]` delivers the `Setup`/`Tick` broadcasts;
    /// components that don't care about lifecycle events can ignore it.
    fn process(&mut self, ctx: &mut ProcessContext, packet: Packet, port: PortId);

    /// Whether this node redirects messages to/from a child graph rather
    /// than handling them itself. See `crate::subgraph`.
    fn is_subgraph(&self) -> bool {
        false
    }
}
