//! Reporting module for termination events.
//!
//! This module defines the `KillReporter` trait and a console
//! implementation for the operator's terminal.

mod console_reporter;

pub use console_reporter::ConsoleReporter;

use crate::capture::CaptureFilter;
use crate::domain::ConnectionSignature;

/// Receives operator-facing engine events.
pub trait KillReporter: Send {
    /// Called once before capture begins.
    fn on_start(&self, interface: &str, filter: &CaptureFilter, persist: bool);

    /// A connection was selected and a reset is about to be sent.
    fn on_kill(&self, target: &ConnectionSignature);

    /// The awaited reset came back from the peer.
    fn on_confirmed(&self, reply: &ConnectionSignature);

    /// Called when the engine stops without a terminal kill.
    fn on_stop(&self);
}
