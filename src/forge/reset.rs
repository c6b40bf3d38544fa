//! Forged RST construction.

use pnet::packet::ipv4::{self, Ipv4Packet, MutableIpv4Packet};
use pnet::packet::tcp::{self, MutableTcpPacket, TcpPacket};

use crate::domain::{tcp_flags, ConnectionSignature, TcpSegment};
use crate::error::CraftError;
use crate::parser::FrameParser;

/// A copy of an observed frame rewritten into a bare RST.
///
/// Both checksums are left cleared. The frame only becomes sendable
/// through [`ForgedResetFrame::finalize`], which recomputes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgedResetFrame {
    bytes: Vec<u8>,
    ip_offset: usize,
    tcp_offset: usize,
    ip_end: usize,
    signature: ConnectionSignature,
}

impl ForgedResetFrame {
    /// Forge a reset from an observed segment.
    ///
    /// The segment is copied, never modified. Relative to the copy the
    /// forged frame has both checksums cleared, the acknowledgment number
    /// zeroed, the IP identification bumped by one and flags set to RST
    /// alone (which also drops ACK). Addresses, ports, sequence number,
    /// window, options and payload are kept as observed.
    pub fn craft(original: &TcpSegment) -> Result<Self, CraftError> {
        let mut bytes = original.frame.clone();

        {
            let mut ip = MutableIpv4Packet::new(&mut bytes[original.ip_offset..original.ip_end])
                .ok_or(CraftError::Truncated("IPv4"))?;
            ip.set_checksum(0);
            ip.set_identification(original.identification.wrapping_add(1));
        }
        {
            let mut tcp = MutableTcpPacket::new(&mut bytes[original.tcp_offset..original.ip_end])
                .ok_or(CraftError::Truncated("TCP"))?;
            tcp.set_checksum(0);
            tcp.set_acknowledgement(0);
            tcp.set_flags(tcp_flags::RST.into());
        }

        Ok(Self {
            bytes,
            ip_offset: original.ip_offset,
            tcp_offset: original.tcp_offset,
            ip_end: original.ip_end,
            signature: original.signature().with_flags(tcp_flags::RST),
        })
    }

    /// Signature of the frame as it will appear on the wire.
    pub fn signature(&self) -> ConnectionSignature {
        self.signature
    }

    /// The reply that confirms the kill: a reset travelling back from the
    /// peer to the endpoint we impersonated.
    pub fn expected_reply(&self) -> ConnectionSignature {
        self.signature.reversed()
    }

    /// Crafted bytes with checksums still cleared.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True while both checksum fields are still cleared.
    pub fn checksums_pending(&self) -> bool {
        let ip = Ipv4Packet::new(&self.bytes[self.ip_offset..self.ip_end]);
        let tcp = TcpPacket::new(&self.bytes[self.tcp_offset..self.ip_end]);
        match (ip, tcp) {
            (Some(ip), Some(tcp)) => ip.get_checksum() == 0 && tcp.get_checksum() == 0,
            _ => false,
        }
    }

    /// Produce wire bytes with both checksums recomputed.
    pub fn finalize(&self) -> Result<Vec<u8>, CraftError> {
        let mut wire = self.bytes.clone();

        let (source, destination) = {
            let mut ip = MutableIpv4Packet::new(&mut wire[self.ip_offset..self.ip_end])
                .ok_or(CraftError::Truncated("IPv4"))?;
            let checksum = ipv4::checksum(&ip.to_immutable());
            ip.set_checksum(checksum);
            (ip.get_source(), ip.get_destination())
        };

        let mut tcp = MutableTcpPacket::new(&mut wire[self.tcp_offset..self.ip_end])
            .ok_or(CraftError::Truncated("TCP"))?;
        let checksum = tcp::ipv4_checksum(&tcp.to_immutable(), &source, &destination);
        tcp.set_checksum(checksum);

        Ok(wire)
    }
}

/// Check that a frame's IPv4 and TCP checksums match its contents.
///
/// Used as the last gate before transmission; a frame that fails here is
/// malformed and must not be sent.
pub fn verify_checksums(frame: &[u8]) -> Result<(), CraftError> {
    let segment = FrameParser::new().parse(frame)?;

    let ip = Ipv4Packet::new(&frame[segment.ip_offset..segment.ip_end])
        .ok_or(CraftError::Truncated("IPv4"))?;
    let expected = ipv4::checksum(&ip);
    if ip.get_checksum() != expected {
        return Err(CraftError::ChecksumMismatch {
            layer: "IPv4",
            expected,
            actual: ip.get_checksum(),
        });
    }

    let tcp = TcpPacket::new(&frame[segment.tcp_offset..segment.ip_end])
        .ok_or(CraftError::Truncated("TCP"))?;
    let expected = tcp::ipv4_checksum(&tcp, &segment.source, &segment.destination);
    if tcp.get_checksum() != expected {
        return Err(CraftError::ChecksumMismatch {
            layer: "TCP",
            expected,
            actual: tcp.get_checksum(),
        });
    }

    Ok(())
}
