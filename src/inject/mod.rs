//! Frame injection.
//!
//! The `FrameInjector` trait is the seam between the engine and the wire,
//! so the engine can be driven in tests without raw socket access.

mod pnet_injector;

pub use pnet_injector::PnetInjector;

use crate::error::InjectError;
use crate::forge::ForgedResetFrame;

/// Transmits forged frames on an interface.
pub trait FrameInjector: Send {
    /// Send `frame` once.
    ///
    /// Implementations must recompute the checksums the forged frame left
    /// cleared, and must refuse to send a frame whose checksums still do
    /// not verify. Link-layer delivery is not confirmed.
    fn transmit(&mut self, frame: &ForgedResetFrame) -> Result<(), InjectError>;

    /// Name of the interface frames go out on.
    fn interface_name(&self) -> &str;
}
