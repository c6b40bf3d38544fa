//! pnet-based packet capture implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};
use tracing::debug;

use super::{CaptureFilter, PacketCapture};
use crate::domain::CapturedFrame;
use crate::error::CaptureError;
use crate::inject::PnetInjector;
use crate::parser::FrameParser;

/// Receive timeout so the running flag is checked regularly.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Packet capture using the pnet library.
pub struct PnetCapture {
    interface: String,
    rx: Box<dyn DataLinkReceiver>,
    filter: CaptureFilter,
    running: Arc<AtomicBool>,
}

impl PnetCapture {
    /// Open a datalink channel on `interface`.
    ///
    /// The receiving half becomes the capture; the sending half becomes the
    /// injector used for forged resets on the same interface.
    pub fn open(
        interface: &NetworkInterface,
        filter: CaptureFilter,
    ) -> Result<(Self, PnetInjector), CaptureError> {
        let config = Config {
            read_timeout: Some(READ_TIMEOUT),
            ..Config::default()
        };

        let (tx, rx) = match datalink::channel(interface, config) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => {
                return Err(CaptureError::ChannelCreation(
                    "unsupported channel type".to_string(),
                ))
            }
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("permission") || msg.contains("Operation not permitted") {
                    return Err(CaptureError::InsufficientPermissions);
                }
                return Err(CaptureError::ChannelCreation(msg));
            }
        };

        let capture = Self {
            interface: interface.name.clone(),
            rx,
            filter,
            running: Arc::new(AtomicBool::new(true)),
        };
        let injector = PnetInjector::new(interface.name.clone(), tx);

        Ok((capture, injector))
    }
}

impl PacketCapture for PnetCapture {
    fn frames(&mut self) -> Box<dyn Iterator<Item = CapturedFrame> + '_> {
        Box::new(FilteredFrames {
            rx: &mut self.rx,
            filter: self.filter,
            running: self.running.clone(),
        })
    }

    fn interface_name(&self) -> &str {
        &self.interface
    }

    fn set_running(&mut self, running: Arc<AtomicBool>) {
        self.running = running;
    }
}

/// Iterator that yields frames admitted by the capture filter.
struct FilteredFrames<'a> {
    rx: &'a mut Box<dyn DataLinkReceiver>,
    filter: CaptureFilter,
    running: Arc<AtomicBool>,
}

impl Iterator for FilteredFrames<'_> {
    type Item = CapturedFrame;

    fn next(&mut self) -> Option<Self::Item> {
        while self.running.load(Ordering::SeqCst) {
            match self.rx.next() {
                Ok(data) => {
                    if let Some(frame) = admit_frame(data, &self.filter) {
                        return Some(frame);
                    }
                    // Outside the filter, keep listening
                }
                Err(e) => {
                    // Timeout is expected, it lets us re-check the running flag
                    if e.kind() != std::io::ErrorKind::TimedOut {
                        debug!("Capture error: {}", e);
                    }
                }
            }
        }
        None
    }
}

/// Snapshot `data` if it is an IPv4 TCP frame inside `filter`.
pub fn admit_frame(data: &[u8], filter: &CaptureFilter) -> Option<CapturedFrame> {
    let segment = FrameParser::new().parse(data).ok()?;
    if !filter.admits(&segment) {
        return None;
    }

    debug!(
        "Packet received: {} ----> {}",
        segment.source, segment.destination
    );
    Some(CapturedFrame::from_wire(data))
}
