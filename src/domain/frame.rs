//! Transport container for captured frames.

use std::time::SystemTime;

use crate::error::ParseError;
use crate::parser::FrameParser;

use super::TcpSegment;

/// A link-layer frame as it was seen on the wire.
///
/// Holds only the bytes and the capture time, never a handle into the
/// capture session, so it can be queued and handed to another thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    data: Vec<u8>,
    timestamp: SystemTime,
}

impl CapturedFrame {
    /// Wrap already-owned frame bytes.
    pub fn new(data: Vec<u8>, timestamp: SystemTime) -> Self {
        Self { data, timestamp }
    }

    /// Snapshot a frame borrowed from the capture buffer, stamped now.
    pub fn from_wire(data: &[u8]) -> Self {
        Self::new(data.to_vec(), SystemTime::now())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Rebuild the structured Ethernet/IPv4/TCP view of this frame.
    ///
    /// Pure and repeatable. Frames that passed the capture filter always
    /// parse; anything else reports why it is not a TCP segment.
    pub fn segment(&self) -> Result<TcpSegment, ParseError> {
        FrameParser::new().parse(&self.data)
    }
}
