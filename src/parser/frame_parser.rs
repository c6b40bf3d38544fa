//! Ethernet/IPv4/TCP frame parser built on pnet's packet views.

use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::Packet;

use crate::domain::TcpSegment;
use crate::error::ParseError;

/// Ethernet II header length (no VLAN tag)
pub(crate) const ETHERNET_HEADER_LEN: usize = 14;
/// Minimum IPv4 header length
const MIN_IPV4_HEADER_LEN: usize = 20;
/// Minimum TCP header length
const MIN_TCP_HEADER_LEN: usize = 20;

/// Parser for captured TCP frames.
pub struct FrameParser;

impl FrameParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an Ethernet frame carrying IPv4 and TCP.
    pub fn parse(&self, data: &[u8]) -> Result<TcpSegment, ParseError> {
        let ethernet = EthernetPacket::new(data).ok_or(ParseError::FrameTooShort {
            expected: ETHERNET_HEADER_LEN,
            actual: data.len(),
        })?;

        let ethertype = ethernet.get_ethertype();
        if ethertype != EtherTypes::Ipv4 {
            return Err(ParseError::NotIpv4(ethertype.0));
        }

        let ipv4 = Ipv4Packet::new(ethernet.payload()).ok_or(ParseError::FrameTooShort {
            expected: ETHERNET_HEADER_LEN + MIN_IPV4_HEADER_LEN,
            actual: data.len(),
        })?;

        let ip_header_len = ipv4.get_header_length() as usize * 4;
        if ip_header_len < MIN_IPV4_HEADER_LEN {
            return Err(ParseError::InvalidIpHeader(ip_header_len));
        }

        let protocol = ipv4.get_next_level_protocol();
        if protocol != IpNextHeaderProtocols::Tcp {
            return Err(ParseError::NotTcp(protocol.0));
        }

        // Bound the datagram by its total length so Ethernet padding on
        // short frames is not mistaken for TCP payload.
        let total_len = ipv4.get_total_length() as usize;
        if total_len < ip_header_len + MIN_TCP_HEADER_LEN {
            return Err(ParseError::InvalidIpHeader(ip_header_len));
        }
        let ip_offset = ETHERNET_HEADER_LEN;
        let tcp_offset = ip_offset + ip_header_len;
        let ip_end = ip_offset + total_len;
        if ip_end > data.len() {
            return Err(ParseError::FrameTooShort {
                expected: ip_end,
                actual: data.len(),
            });
        }

        let tcp = TcpPacket::new(&data[tcp_offset..ip_end]).ok_or(ParseError::FrameTooShort {
            expected: tcp_offset + MIN_TCP_HEADER_LEN,
            actual: data.len(),
        })?;

        let tcp_header_len = tcp.get_data_offset() as usize * 4;
        if tcp_header_len < MIN_TCP_HEADER_LEN || tcp_offset + tcp_header_len > ip_end {
            return Err(ParseError::InvalidTcpHeader(tcp_header_len));
        }

        Ok(TcpSegment {
            frame: data.to_vec(),
            ip_offset,
            tcp_offset,
            ip_end,
            source: ipv4.get_source(),
            destination: ipv4.get_destination(),
            source_port: tcp.get_source(),
            destination_port: tcp.get_destination(),
            flags: tcp.get_flags() as u8,
            identification: ipv4.get_identification(),
            sequence: tcp.get_sequence(),
            acknowledgement: tcp.get_acknowledgement(),
        })
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}
