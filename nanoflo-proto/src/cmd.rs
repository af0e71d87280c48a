/// Wire command code, carried in byte 0 of every [`crate::frame::Command`].
///
/// Inbound variants are what a host sends to mutate the graph; outbound
/// variants are what the device reports back. They share one numbering
/// space, as in the wire format itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GraphCmd {
    CommunicationOpen = 0,
    End = 1,
    TransmissionEnded = 2,
    Reset = 3,
    StopNetwork = 4,
    StartNetwork = 5,
    CreateComponent = 6,
    RemoveNode = 7,
    ConnectNodes = 8,
    DisconnectNodes = 9,
    SendPacket = 10,
    SendPacketDone = 11,
    ConfigureDebug = 12,
    SubscribeToPort = 13,
    ConnectSubgraphPort = 14,
    Ping = 15,
    Pong = 16,
    SetIoValue = 17,
    NodeAdded = 18,
    NodeRemoved = 19,
    NodesConnected = 20,
    NodesDisconnected = 21,
    NetworkStarted = 22,
    NetworkStopped = 23,
    NetworkReset = 24,
    PacketSent = 25,
    DebugMessage = 26,
    DebugChanged = 27,
    PortSubscriptionChanged = 28,
    SubgraphPortConnected = 29,
    /// Sentinel: any code at or past this is unrecognized (sent magic bytes
    /// aside, which `ParseCmd` special-cases before dispatch ever sees them).
    Invalid = 30,
}

impl GraphCmd {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => Self::CommunicationOpen,
            1 => Self::End,
            2 => Self::TransmissionEnded,
            3 => Self::Reset,
            4 => Self::StopNetwork,
            5 => Self::StartNetwork,
            6 => Self::CreateComponent,
            7 => Self::RemoveNode,
            8 => Self::ConnectNodes,
            9 => Self::DisconnectNodes,
            10 => Self::SendPacket,
            11 => Self::SendPacketDone,
            12 => Self::ConfigureDebug,
            13 => Self::SubscribeToPort,
            14 => Self::ConnectSubgraphPort,
            15 => Self::Ping,
            16 => Self::Pong,
            17 => Self::SetIoValue,
            18 => Self::NodeAdded,
            19 => Self::NodeRemoved,
            20 => Self::NodesConnected,
            21 => Self::NodesDisconnected,
            22 => Self::NetworkStarted,
            23 => Self::NetworkStopped,
            24 => Self::NetworkReset,
            25 => Self::PacketSent,
            26 => Self::DebugMessage,
            27 => Self::DebugChanged,
            28 => Self::PortSubscriptionChanged,
            29 => Self::SubgraphPortConnected,
            _ => Self::Invalid,
        }
    }
}
