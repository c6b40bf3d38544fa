//! pnet datalink sender.

use pnet::datalink::DataLinkSender;
use tracing::debug;

use super::FrameInjector;
use crate::error::InjectError;
use crate::forge::{verify_checksums, ForgedResetFrame};

/// Injects frames through the sending half of a pnet datalink channel.
///
/// pnet writes frames verbatim, so checksum recomputation happens here
/// through [`ForgedResetFrame::finalize`] before every send.
pub struct PnetInjector {
    interface: String,
    tx: Box<dyn DataLinkSender>,
}

impl PnetInjector {
    pub fn new(interface: String, tx: Box<dyn DataLinkSender>) -> Self {
        Self { interface, tx }
    }
}

impl FrameInjector for PnetInjector {
    fn transmit(&mut self, frame: &ForgedResetFrame) -> Result<(), InjectError> {
        let wire = frame.finalize()?;
        verify_checksums(&wire)?;

        match self.tx.send_to(&wire, None) {
            Some(Ok(())) => {
                debug!("Sent {} byte reset on {}", wire.len(), self.interface);
                Ok(())
            }
            Some(Err(source)) => Err(InjectError::Transmit {
                interface: self.interface.clone(),
                source,
            }),
            None => Err(InjectError::BufferExhausted(self.interface.clone())),
        }
    }

    fn interface_name(&self) -> &str {
        &self.interface
    }
}
