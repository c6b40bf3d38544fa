//! Error types for each stage of the pipeline.

use thiserror::Error;

use crate::domain::ConnectionSignature;

/// Errors raised while building the runtime configuration.
///
/// All of these are fatal before the engine is constructed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Need IP or Port to proceed")]
    NoTarget,

    #[error("Invalid interface: {0}")]
    InterfaceNotFound(String),

    #[error("No network interfaces available and none was named")]
    NoInterfaces,

    #[error("Invalid interface selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors opening a capture/injection channel.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to create datalink channel: {0}")]
    ChannelCreation(String),

    #[error("Insufficient permissions for raw packet access (try running as root)")]
    InsufficientPermissions,
}

/// Errors turning raw frame bytes into a TCP segment view.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort { expected: usize, actual: usize },

    #[error("Not an IPv4 frame (ethertype {0:#06x})")]
    NotIpv4(u16),

    #[error("Not a TCP packet (protocol {0})")]
    NotTcp(u8),

    #[error("Invalid IPv4 header length: {0} bytes")]
    InvalidIpHeader(usize),

    #[error("Invalid TCP header length: {0} bytes")]
    InvalidTcpHeader(usize),
}

/// Errors producing a forged reset frame.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CraftError {
    #[error("Forged frame does not parse: {0}")]
    Unparseable(#[from] ParseError),

    #[error("Frame truncated at the {0} header")]
    Truncated(&'static str),

    #[error("{layer} checksum does not verify ({actual:#06x}, expected {expected:#06x})")]
    ChecksumMismatch {
        layer: &'static str,
        expected: u16,
        actual: u16,
    },
}

/// Errors transmitting a frame.
#[derive(Error, Debug)]
pub enum InjectError {
    #[error("Failed to transmit on {interface}: {source}")]
    Transmit {
        interface: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Transmit buffer on {0} has no room for the frame")]
    BufferExhausted(String),

    #[error("Refusing to send malformed frame: {0}")]
    Malformed(#[from] CraftError),
}

/// Errors that stop the termination engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Captured frame could not be parsed: {0}")]
    Parse(#[from] ParseError),

    #[error("Could not craft reset for {target}: {source}")]
    Craft {
        target: ConnectionSignature,
        #[source]
        source: CraftError,
    },

    #[error("Could not kill {target}: {source}")]
    Inject {
        target: ConnectionSignature,
        #[source]
        source: InjectError,
    },
}

