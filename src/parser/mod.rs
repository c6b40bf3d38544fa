//! Frame parsing module.
//!
//! Turns raw link-layer bytes into `TcpSegment` views.

mod frame_parser;

pub use frame_parser::FrameParser;
