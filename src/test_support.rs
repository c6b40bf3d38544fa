//! Synthetic frame builders shared by unit tests.

use std::net::Ipv4Addr;

use pnet::packet::ethernet::{EtherTypes, MutableEthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::{self, MutableIpv4Packet};
use pnet::packet::tcp::{self, MutableTcpPacket};
use pnet::util::MacAddr;

const ETH_LEN: usize = 14;
const IP_LEN: usize = 20;
const TCP_LEN: usize = 20;

/// Field values for a synthetic Ethernet/IPv4/TCP frame.
#[derive(Debug, Clone)]
pub struct FrameSpec {
    pub source: Ipv4Addr,
    pub source_port: u16,
    pub destination: Ipv4Addr,
    pub destination_port: u16,
    pub flags: u8,
    pub identification: u16,
    pub sequence: u32,
    pub acknowledgement: u32,
    pub window: u16,
    pub payload: Vec<u8>,
}

impl FrameSpec {
    pub fn new(
        source: Ipv4Addr,
        source_port: u16,
        destination: Ipv4Addr,
        destination_port: u16,
        flags: u8,
    ) -> Self {
        Self {
            source,
            source_port,
            destination,
            destination_port,
            flags,
            identification: 0x0100,
            sequence: 0x0a0b_0c0d,
            acknowledgement: 0x0102_0304,
            window: 64240,
            payload: Vec::new(),
        }
    }

    /// Build the frame with valid IPv4 and TCP checksums.
    pub fn build(&self) -> Vec<u8> {
        let total = ETH_LEN + IP_LEN + TCP_LEN + self.payload.len();
        let mut buf = vec![0u8; total];

        {
            let mut eth = MutableEthernetPacket::new(&mut buf[..ETH_LEN]).unwrap();
            eth.set_destination(MacAddr::new(0x02, 0, 0, 0, 0, 0x09));
            eth.set_source(MacAddr::new(0x02, 0, 0, 0, 0, 0x05));
            eth.set_ethertype(EtherTypes::Ipv4);
        }
        {
            let mut tcp = MutableTcpPacket::new(&mut buf[ETH_LEN + IP_LEN..]).unwrap();
            tcp.set_source(self.source_port);
            tcp.set_destination(self.destination_port);
            tcp.set_sequence(self.sequence);
            tcp.set_acknowledgement(self.acknowledgement);
            tcp.set_data_offset(5);
            tcp.set_flags(self.flags.into());
            tcp.set_window(self.window);
            tcp.set_payload(&self.payload);
            let checksum = tcp::ipv4_checksum(&tcp.to_immutable(), &self.source, &self.destination);
            tcp.set_checksum(checksum);
        }
        {
            let mut ip = MutableIpv4Packet::new(&mut buf[ETH_LEN..]).unwrap();
            ip.set_version(4);
            ip.set_header_length(5);
            ip.set_total_length((IP_LEN + TCP_LEN + self.payload.len()) as u16);
            ip.set_identification(self.identification);
            ip.set_ttl(64);
            ip.set_next_level_protocol(IpNextHeaderProtocols::Tcp);
            ip.set_source(self.source);
            ip.set_destination(self.destination);
            let checksum = ipv4::checksum(&ip.to_immutable());
            ip.set_checksum(checksum);
        }

        buf
    }
}

/// Build a frame with default sequence state and no payload.
pub fn build_frame(
    source: Ipv4Addr,
    source_port: u16,
    destination: Ipv4Addr,
    destination_port: u16,
    flags: u8,
) -> Vec<u8> {
    FrameSpec::new(source, source_port, destination, destination_port, flags).build()
}
