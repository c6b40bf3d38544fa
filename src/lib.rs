//! Thor - TCP connection killer.
//!
//! Watches traffic matching a host/port filter and tears down the TCP
//! connections it sees by injecting forged resets, then confirms each kill
//! by waiting for the peer's own reset.

pub mod capture;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod forge;
pub mod inject;
pub mod mailbox;
pub mod parser;
pub mod reporter;

#[cfg(test)]
pub(crate) mod test_support;

pub use capture::{CaptureFilter, PacketCapture, PnetCapture};
pub use config::{Config, EngineSettings};
pub use domain::{CapturedFrame, ConnectionSignature, TcpSegment};
pub use engine::{Decision, EngineExit, TerminationEngine};
pub use forge::ForgedResetFrame;
pub use inject::{FrameInjector, PnetInjector};
pub use mailbox::Mailbox;
