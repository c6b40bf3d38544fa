//! Domain models for connection termination.
//!
//! These types carry no capture-session or socket state, so they can move
//! freely between the capture thread and the engine.

mod frame;
mod segment;
mod signature;
pub mod tcp_flags;

pub use frame::CapturedFrame;
pub use segment::TcpSegment;
pub use signature::ConnectionSignature;
