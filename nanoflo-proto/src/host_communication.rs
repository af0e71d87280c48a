use std::cell::RefCell;
use std::rc::Rc;

use nanoflo_core::{ComponentId, ComponentLibrary, DebugLevel, Network, NodeId, Packet, PortId};

use crate::cmd::GraphCmd;
use crate::event::OutboundQueue;
use crate::frame::{build, Command, CMD_SIZE, MAGIC};
use crate::notify::WireNotifier;
use crate::transport::HostTransport;

/// Byte-stream parser state, driving `HostCommunication::poll` one received
/// byte at a time.
///
/// `LookForHeader` scans for the first magic byte; once seen, the remaining
/// seven are collected in `ParseHeader`. From then on the parser stays in
/// `ParseCmd`, reading one command at a time — unless the bytes it reads
/// happen to spell out the magic again, in which case that is treated as a
/// fresh handshake rather than a command (the host reconnecting without the
/// device noticing is indistinguishable from noise otherwise). `Invalid` is
/// a one-tick sink that always recovers back to `LookForHeader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    LookForHeader,
    ParseHeader,
    ParseCmd,
    Invalid,
}

/// Parses a host's byte stream into commands, dispatches each against a
/// [`Network`] and [`ComponentLibrary`], and ships replies plus whatever the
/// network's own [`WireNotifier`] queued back out over a [`HostTransport`].
///
/// Construction pairs a `HostCommunication` with the `WireNotifier` that
/// should be installed as the `Network`'s notification sink — see
/// [`HostCommunication::new`].
pub struct HostCommunication<T: HostTransport> {
    transport: T,
    outbound: Rc<RefCell<OutboundQueue>>,
    debug_level: Rc<RefCell<DebugLevel>>,
    state: ParserState,
    buffer: Command,
    current_byte: usize,
}

impl<T: HostTransport> HostCommunication<T> {
    /// Build a `HostCommunication` over `transport`, plus the
    /// [`WireNotifier`] it should be paired with — install the latter via
    /// `Network::with_notification_handler` before calling
    /// [`HostCommunication::poll`] against that network.
    pub fn new(transport: T) -> (Self, WireNotifier) {
        let outbound = Rc::new(RefCell::new(OutboundQueue::new()));
        let debug_level = Rc::new(RefCell::new(DebugLevel::Error));
        let notifier = WireNotifier::new(outbound.clone(), debug_level.clone());
        let hc = Self {
            transport,
            outbound,
            debug_level,
            state: ParserState::LookForHeader,
            buffer: [0u8; CMD_SIZE],
            current_byte: 0,
        };
        (hc, notifier)
    }

    /// Drain every byte currently available from the transport, dispatching
    /// whatever commands it completes, then flush replies and notifications
    /// queued in the process back out to the transport.
    pub fn poll(&mut self, network: &mut Network, library: &ComponentLibrary) {
        while let Some(byte) = self.transport.poll_byte() {
            self.parse_byte(byte, network, library);
        }
        while let Some(cmd) = self.outbound.borrow_mut().pop() {
            self.transport.send_command(&cmd);
        }
    }

    fn push(&mut self, cmd: Command) {
        self.outbound.borrow_mut().push(cmd);
    }

    fn parse_byte(&mut self, b: u8, network: &mut Network, library: &ComponentLibrary) {
        self.buffer[self.current_byte] = b;
        self.current_byte += 1;

        match self.state {
            ParserState::LookForHeader => {
                if b == MAGIC[0] {
                    self.buffer[0] = b;
                    self.current_byte = 1;
                    self.state = ParserState::ParseHeader;
                } else {
                    self.current_byte = 0;
                }
            }
            ParserState::ParseHeader => {
                if self.current_byte == CMD_SIZE {
                    if self.buffer == MAGIC {
                        self.push(build(GraphCmd::CommunicationOpen as u8, &[]));
                        self.state = ParserState::ParseCmd;
                    } else {
                        self.state = ParserState::Invalid;
                    }
                    self.current_byte = 0;
                }
            }
            ParserState::ParseCmd => {
                if self.current_byte == CMD_SIZE {
                    if self.buffer == MAGIC {
                        // A host reopening the connection mid-stream looks
                        // exactly like this; resync rather than dispatch it
                        // as a garbage command.
                        self.push(build(GraphCmd::CommunicationOpen as u8, &[]));
                    } else {
                        self.dispatch(network, library);
                    }
                    self.current_byte = 0;
                }
            }
            ParserState::Invalid => {
                self.current_byte = 0;
                self.state = ParserState::LookForHeader;
            }
        }
    }

    fn dispatch(&mut self, network: &mut Network, library: &ComponentLibrary) {
        let buf = self.buffer;
        match GraphCmd::from_byte(buf[0]) {
            GraphCmd::End => {
                self.push(build(GraphCmd::TransmissionEnded as u8, &[]));
                self.state = ParserState::LookForHeader;
            }
            GraphCmd::Reset => network.reset(),
            GraphCmd::StopNetwork => network.stop(),
            GraphCmd::StartNetwork => network.start(),
            GraphCmd::CreateComponent => {
                let component_id = ComponentId(buf[1]);
                let parent = buf[2] as NodeId;
                match library.create(component_id) {
                    Some(instance) => {
                        if let Err(e) = network.add_node_with_parent(component_id, instance, parent) {
                            log::warn!("CreateComponent({}) failed: {}", buf[1], e);
                        }
                    }
                    None => log::warn!("CreateComponent: unknown component id {}", buf[1]),
                }
            }
            GraphCmd::RemoveNode => {
                if let Err(e) = network.remove_node(buf[1] as NodeId) {
                    log::warn!("RemoveNode({}) failed: {}", buf[1], e);
                }
            }
            GraphCmd::ConnectNodes => {
                // Operand order on the wire is (srcNode, dstNode, srcPort, dstPort).
                let (src, dst, src_port, dst_port) =
                    (buf[1] as NodeId, buf[2] as NodeId, buf[3] as PortId, buf[4] as PortId);
                if let Err(e) = network.connect(src, src_port, dst, dst_port) {
                    log::warn!("ConnectNodes failed: {}", e);
                }
            }
            GraphCmd::DisconnectNodes => {
                let (src, src_port) = (buf[1] as NodeId, buf[3] as PortId);
                if let Err(e) = network.disconnect(src, src_port) {
                    log::warn!("DisconnectNodes failed: {}", e);
                }
            }
            GraphCmd::SendPacket => {
                let (node, port) = (buf[1] as NodeId, buf[2] as PortId);
                match decode_packet(&buf) {
                    Some(packet) => {
                        network.send_message_to(node, port, packet);
                        self.push(build(GraphCmd::SendPacketDone as u8, &[buf[1], buf[2], buf[3]]));
                    }
                    None => log::warn!("SendPacket: unrecognized message type {}", buf[3]),
                }
            }
            GraphCmd::ConfigureDebug => {
                let level = match buf[1] {
                    0 => DebugLevel::Error,
                    1 => DebugLevel::Info,
                    2 => DebugLevel::Detailed,
                    _ => DebugLevel::VeryDetailed,
                };
                *self.debug_level.borrow_mut() = level;
                self.push(build(GraphCmd::DebugChanged as u8, &[buf[1]]));
            }
            GraphCmd::SubscribeToPort => {
                let (node, port, enable) = (buf[1] as NodeId, buf[2] as PortId, buf[3] != 0);
                let result = if enable {
                    network.subscribe_to_port(node, port)
                } else {
                    network.unsubscribe_from_port(node, port)
                };
                if let Err(e) = result {
                    log::warn!("SubscribeToPort failed: {}", e);
                }
            }
            #[cfg(feature = "subgraph")]
            GraphCmd::ConnectSubgraphPort => {
                // Only the external->child direction needs a call here: the
                // matching child->parent direction is wired through the
                // child's own ordinary ConnectNodes command, reusing its
                // outbound connection table (see `SubgraphTables`).
                let is_output = buf[1] != 0;
                if !is_output {
                    let (subgraph_node, subgraph_port, child, child_port) = (
                        buf[2] as NodeId,
                        buf[3] as PortId,
                        buf[4] as NodeId,
                        buf[5] as PortId,
                    );
                    if let Err(e) =
                        network.connect_subgraph(subgraph_node, subgraph_port, child, child_port)
                    {
                        log::warn!("ConnectSubgraphPort failed: {}", e);
                    }
                }
            }
            #[cfg(not(feature = "subgraph"))]
            GraphCmd::ConnectSubgraphPort => {
                log::warn!("ConnectSubgraphPort: subgraph support not compiled in");
            }
            GraphCmd::Ping => {
                let mut operands = [0u8; CMD_SIZE - 1];
                operands.copy_from_slice(&buf[1..CMD_SIZE]);
                self.push(build(GraphCmd::Pong as u8, &operands));
            }
            GraphCmd::SetIoValue => {
                log::debug!("SetIoValue is platform-specific; ignored on this build");
            }
            other => log::warn!("unrecognized or unexpected command code {:?}", other),
        }
    }
}

/// Decode `SendPacket`'s payload (operand layout: `[node, port, _, msgType, data...]`)
/// into a [`Packet`], or `None` if `msgType` doesn't carry a value a host may send.
fn decode_packet(buf: &Command) -> Option<Packet> {
    use nanoflo_core::Msg;

    match Msg::from_byte(buf[3]) {
        Msg::Void => Some(Packet::void()),
        Msg::BracketStart => Some(Packet::bracket_start()),
        Msg::BracketEnd => Some(Packet::bracket_end()),
        Msg::Bool => Some(Packet::bool(buf[4] != 0)),
        Msg::Byte => Some(Packet::byte(buf[4])),
        Msg::Integer => {
            let v = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
            Some(Packet::integer(v))
        }
        Msg::Float => {
            let v = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
            Some(Packet::float(v))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LoopbackTransport;

    fn open_frame() -> Vec<u8> {
        MAGIC.to_vec()
    }

    #[test]
    fn handshake_replies_with_communication_open() {
        let (mut hc, notifier) = HostCommunication::new(LoopbackTransport::new());
        let mut network = Network::with_notification_handler(Box::new(notifier));
        let library = ComponentLibrary::new();

        hc.transport.inject(&open_frame());
        hc.poll(&mut network, &library);

        assert_eq!(hc.transport.sent.len(), 1);
        assert_eq!(hc.transport.sent[0][0], GraphCmd::CommunicationOpen as u8);
    }

    #[test]
    fn ping_is_answered_with_pong_echoing_operands() {
        let (mut hc, notifier) = HostCommunication::new(LoopbackTransport::new());
        let mut network = Network::with_notification_handler(Box::new(notifier));
        let library = ComponentLibrary::new();

        hc.transport.inject(&open_frame());
        hc.poll(&mut network, &library);
        hc.transport.sent.clear();

        let ping = build(GraphCmd::Ping as u8, &[9, 8, 7]);
        hc.transport.inject(&ping);
        hc.poll(&mut network, &library);

        assert_eq!(hc.transport.sent.len(), 1);
        let pong = hc.transport.sent[0];
        assert_eq!(pong[0], GraphCmd::Pong as u8);
        assert_eq!(&pong[1..], &ping[1..]);
    }

    #[test]
    fn noise_before_handshake_is_ignored_until_next_magic() {
        let (mut hc, notifier) = HostCommunication::new(LoopbackTransport::new());
        let mut network = Network::with_notification_handler(Box::new(notifier));
        let library = ComponentLibrary::new();

        hc.transport.inject(&[0xffu8; 8]);
        hc.transport.inject(&open_frame());
        hc.poll(&mut network, &library);

        assert!(hc
            .transport
            .sent
            .iter()
            .any(|c| c[0] == GraphCmd::CommunicationOpen as u8));
    }
}
