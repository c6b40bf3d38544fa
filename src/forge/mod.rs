//! Reset forging module.
//!
//! Builds the RST frame that is injected to tear a connection down, and
//! owns the checksum finalization that must happen before it hits the wire.

mod reset;

pub use reset::{verify_checksums, ForgedResetFrame};
