//! Target filter applied to captured traffic.

use std::fmt;
use std::net::Ipv4Addr;

use crate::domain::TcpSegment;
use crate::error::ConfigError;

/// Selects the TCP traffic to kill: by host, by port, or both.
///
/// Evaluated in user space on every captured segment; `Display` renders
/// the equivalent packet-filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFilter {
    host: Option<Ipv4Addr>,
    port: Option<u16>,
}

impl CaptureFilter {
    /// Build a filter; at least one criterion is required.
    pub fn new(host: Option<Ipv4Addr>, port: Option<u16>) -> Result<Self, ConfigError> {
        if host.is_none() && port.is_none() {
            return Err(ConfigError::NoTarget);
        }
        Ok(Self { host, port })
    }

    /// Whether a segment falls inside the filter.
    ///
    /// The host matches either address and the port matches either port.
    pub fn admits(&self, segment: &TcpSegment) -> bool {
        let host_ok = self
            .host
            .map(|host| segment.source == host || segment.destination == host)
            .unwrap_or(true);
        let port_ok = self
            .port
            .map(|port| segment.source_port == port || segment.destination_port == port)
            .unwrap_or(true);
        host_ok && port_ok
    }
}

impl fmt::Display for CaptureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.host, self.port) {
            (Some(host), Some(port)) => write!(f, "ip host {} and tcp port {}", host, port),
            (Some(host), None) => write!(f, "ip host {}", host),
            (None, Some(port)) => write!(f, "tcp port {}", port),
            (None, None) => write!(f, "tcp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tcp_flags;
    use crate::parser::FrameParser;
    use crate::test_support::build_frame;

    fn segment(src: [u8; 4], sport: u16, dst: [u8; 4], dport: u16) -> TcpSegment {
        let data = build_frame(src.into(), sport, dst.into(), dport, tcp_flags::ACK);
        FrameParser::new().parse(&data).unwrap()
    }

    #[test]
    fn test_requires_a_criterion() {
        assert!(matches!(
            CaptureFilter::new(None, None),
            Err(ConfigError::NoTarget)
        ));
    }

    #[test]
    fn test_display_matches_filter_syntax() {
        let host = Ipv4Addr::new(10, 0, 0, 5);

        assert_eq!(
            CaptureFilter::new(Some(host), Some(22)).unwrap().to_string(),
            "ip host 10.0.0.5 and tcp port 22"
        );
        assert_eq!(
            CaptureFilter::new(Some(host), None).unwrap().to_string(),
            "ip host 10.0.0.5"
        );
        assert_eq!(
            CaptureFilter::new(None, Some(22)).unwrap().to_string(),
            "tcp port 22"
        );
    }

    #[test]
    fn test_host_and_port() {
        let filter = CaptureFilter::new(Some(Ipv4Addr::new(10, 0, 0, 5)), Some(22)).unwrap();

        assert!(filter.admits(&segment([10, 0, 0, 5], 22, [10, 0, 0, 9], 51000)));
        assert!(filter.admits(&segment([10, 0, 0, 9], 51000, [10, 0, 0, 5], 22)));
        assert!(!filter.admits(&segment([10, 0, 0, 5], 80, [10, 0, 0, 9], 51000)));
        assert!(!filter.admits(&segment([10, 0, 0, 7], 22, [10, 0, 0, 9], 51000)));
    }

    #[test]
    fn test_host_only() {
        let filter = CaptureFilter::new(Some(Ipv4Addr::new(10, 0, 0, 5)), None).unwrap();

        assert!(filter.admits(&segment([10, 0, 0, 5], 443, [10, 0, 0, 9], 51000)));
        assert!(!filter.admits(&segment([10, 0, 0, 8], 443, [10, 0, 0, 9], 51000)));
    }

    #[test]
    fn test_port_only() {
        let filter = CaptureFilter::new(None, Some(22)).unwrap();

        assert!(filter.admits(&segment([192, 168, 1, 1], 22, [192, 168, 1, 2], 40000)));
        assert!(!filter.admits(&segment([192, 168, 1, 1], 23, [192, 168, 1, 2], 40000)));
    }
}
