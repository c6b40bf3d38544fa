//! Directional flow identity used for matching.

use std::fmt;
use std::net::Ipv4Addr;

use super::tcp_flags;

/// One direction of a TCP flow plus the flags a packet carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionSignature {
    pub source: Ipv4Addr,
    pub source_port: u16,
    pub destination: Ipv4Addr,
    pub destination_port: u16,
    pub flags: u8,
}

impl ConnectionSignature {
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
        }
    }

    /// The same flow seen from the other endpoint, flags unchanged.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.destination,
            source_port: self.destination_port,
            destination: self.source,
            destination_port: self.source_port,
            flags: self.flags,
        }
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }
}

impl fmt::Display for ConnectionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ---> {}:{} [{}]",
            self.source,
            self.source_port,
            self.destination,
            self.destination_port,
            tcp_flags::describe(self.flags)
        )
    }
}
