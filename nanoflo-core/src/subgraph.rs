use crate::{Connection, SUBGRAPH_MAXPORTS};

/// Per-node redirection tables for a component whose `is_subgraph()` returns
/// `true`.
///
/// A subgraph node has no packet logic of its own: it exists to relabel
/// ports between the parent graph it sits in and the child graph nested
/// inside it. Two distinct redirections are needed, and they are
/// deliberately asymmetric:
///
/// - *external → child* ("in port N of the subgraph node maps to port M of
///   child node X"): kept here, in [`SubgraphTables::input_connections`].
/// - *child → parent* ("a child node's output, once marked exported, should
///   appear on port N of the subgraph node as seen by the parent graph"):
///   **not** a separate table. It reuses the subgraph node's own outbound
///   [`crate::ComponentHeader::connections`] — exactly the wiring an
///   ordinary component would use to reach *its* downstream neighbors. A
///   child node that wants to export a port connects, from its point of
///   view, directly to the subgraph node's port, and the network's normal
///   connection-resolution machinery carries the packet the rest of the
///   way out to the parent graph.
///
/// Only one level of redirection is applied on either side: a subgraph
/// nested inside another subgraph does not recurse. See `SPEC_FULL.md`.
#[derive(Debug, Clone)]
pub struct SubgraphTables {
    input_connections: Vec<Connection>,
}

impl SubgraphTables {
    pub fn new() -> Self {
        Self { input_connections: vec![Connection::empty(); SUBGRAPH_MAXPORTS] }
    }

    pub fn input_connection(&self, port: crate::PortId) -> Option<&Connection> {
        self.port_index(port).map(|i| &self.input_connections[i])
    }

    pub fn input_connection_mut(&mut self, port: crate::PortId) -> Option<&mut Connection> {
        self.port_index(port).map(move |i| &mut self.input_connections[i])
    }

    fn port_index(&self, port: crate::PortId) -> Option<usize> {
        if port < 0 || port as usize >= SUBGRAPH_MAXPORTS {
            None
        } else {
            Some(port as usize)
        }
    }
}

impl Default for SubgraphTables {
    fn default() -> Self {
        Self::new()
    }
}
