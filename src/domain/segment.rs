//! Structured view of a captured TCP/IPv4 frame.

use std::net::Ipv4Addr;

use super::ConnectionSignature;

/// A parsed Ethernet/IPv4/TCP frame.
///
/// Keeps the original bytes alongside the decoded header fields so the
/// reset crafter can copy the frame and patch fields in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSegment {
    pub(crate) frame: Vec<u8>,
    /// Offset of the IPv4 header within `frame`
    pub(crate) ip_offset: usize,
    /// Offset of the TCP header within `frame`
    pub(crate) tcp_offset: usize,
    /// End of the IPv4 datagram; anything after is link-layer padding
    pub(crate) ip_end: usize,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub source_port: u16,
    pub destination_port: u16,
    pub flags: u8,
    pub identification: u16,
    pub sequence: u32,
    pub acknowledgement: u32,
}

impl TcpSegment {
    /// The flow direction and flags this segment carries.
    pub fn signature(&self) -> ConnectionSignature {
        ConnectionSignature::new(
            self.source,
            self.source_port,
            self.destination,
            self.destination_port,
            self.flags,
        )
    }

    /// The full link-layer frame this segment was parsed from.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }
}
