//! Packet capture abstraction.
//!
//! This module defines the `PacketCapture` trait and a pnet-based
//! implementation, plus the producer thread that feeds the mailbox.

mod filter;
mod interfaces;
mod pnet_capture;

pub use filter::CaptureFilter;
pub use interfaces::{prompt_selection, resolve_interface};
pub use pnet_capture::{admit_frame, PnetCapture};

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::domain::CapturedFrame;
use crate::mailbox::Mailbox;

/// A live source of captured frames.
///
/// Implementations yield only frames already admitted by their filter,
/// so everything reaching the mailbox is an IPv4 TCP segment of interest.
pub trait PacketCapture: Send {
    /// Iterate over matching frames until the running flag is cleared.
    fn frames(&mut self) -> Box<dyn Iterator<Item = CapturedFrame> + '_>;

    /// Get the name of the interface being captured.
    fn interface_name(&self) -> &str;

    /// Set the running flag for graceful shutdown.
    fn set_running(&mut self, running: Arc<AtomicBool>);
}

/// Run `capture` on its own thread, pushing every frame into `mailbox`.
pub fn spawn_producer<C>(mut capture: C, mailbox: Arc<Mailbox>) -> io::Result<JoinHandle<()>>
where
    C: PacketCapture + 'static,
{
    thread::Builder::new()
        .name("capture".to_string())
        .spawn(move || {
            debug!("Capture started on {}", capture.interface_name());
            for frame in capture.frames() {
                mailbox.push(frame);
            }
            debug!("Capture stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    /// Replays a fixed list of frames.
    struct ReplayCapture {
        frames: Vec<CapturedFrame>,
        running: Arc<AtomicBool>,
    }

    impl PacketCapture for ReplayCapture {
        fn frames(&mut self) -> Box<dyn Iterator<Item = CapturedFrame> + '_> {
            let running = self.running.clone();
            Box::new(
                self.frames
                    .drain(..)
                    .take_while(move |_| running.load(Ordering::SeqCst)),
            )
        }

        fn interface_name(&self) -> &str {
            "replay0"
        }

        fn set_running(&mut self, running: Arc<AtomicBool>) {
            self.running = running;
        }
    }

    #[test]
    fn test_producer_fills_mailbox_in_order() {
        let frames: Vec<_> = (1..=3u8).map(|t| CapturedFrame::from_wire(&[t; 2])).collect();
        let capture = ReplayCapture {
            frames,
            running: Arc::new(AtomicBool::new(true)),
        };
        let mailbox = Arc::new(Mailbox::new());

        spawn_producer(capture, mailbox.clone())
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(mailbox.len(), 3);
        let (latest, discarded) = mailbox.gate().take_latest().unwrap();
        assert_eq!(latest.data(), &[3u8; 2]);
        assert_eq!(discarded, 2);
    }

    #[test]
    fn test_producer_honours_running_flag() {
        let mut capture = ReplayCapture {
            frames: vec![CapturedFrame::from_wire(&[1; 2])],
            running: Arc::new(AtomicBool::new(true)),
        };
        capture.set_running(Arc::new(AtomicBool::new(false)));
        let mailbox = Arc::new(Mailbox::new());

        spawn_producer(capture, mailbox.clone())
            .unwrap()
            .join()
            .unwrap();

        assert!(mailbox.is_empty());
    }
}
