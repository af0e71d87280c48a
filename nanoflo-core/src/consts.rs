/// Maximum number of live nodes a [`crate::Network`] can hold at once.
///
/// Chosen to comfortably fit a small-MCU graph while keeping the node table
/// (and thus the baseline RAM footprint) fixed and predictable.
pub const MAX_NODES: usize = 64;

/// Capacity of the bounded message queue.
pub const MAX_MESSAGES: usize = 32;

/// Capacity of a subgraph's input/output redirection tables.
pub const SUBGRAPH_MAXPORTS: usize = 8;

/// The first node id handed out by [`crate::Network::add_node`].
///
/// Index `0` is reserved as the "no parent" sentinel.
pub const FIRST_NODE_ID: crate::NodeId = 1;

/// Sentinel parent id meaning "no parent".
pub const NO_PARENT: crate::NodeId = 0;
