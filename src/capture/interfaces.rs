//! Network interface lookup and interactive selection.

use std::io::{self, BufRead, Write};

use pnet::datalink::{self, NetworkInterface};
use tracing::{info, warn};

use crate::error::ConfigError;

/// One-line summary of an interface for the selection menu.
fn describe(iface: &NetworkInterface) -> String {
    let status = if iface.is_up() { "UP" } else { "DOWN" };
    let ips: Vec<_> = iface.ips.iter().map(|ip| ip.to_string()).collect();
    format!(
        "{}: {} [{}]",
        iface.name,
        status,
        if ips.is_empty() {
            "no IP".to_string()
        } else {
            ips.join(", ")
        }
    )
}

/// Find the interface to capture on.
///
/// A named interface must exist when the platform can enumerate
/// interfaces. When it cannot, the name is used unchecked. Without a name
/// the operator picks one from a numbered list on stdin.
pub fn resolve_interface(requested: Option<&str>) -> Result<NetworkInterface, ConfigError> {
    let available = datalink::interfaces();

    match requested {
        Some(name) if available.is_empty() => {
            warn!("Can't prove interface {} is good, trying anyway", name);
            unverified_interface(name)
        }
        Some(name) => available
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| ConfigError::InterfaceNotFound(name.to_string())),
        None => {
            if available.is_empty() {
                return Err(ConfigError::NoInterfaces);
            }
            let labels: Vec<String> = available.iter().map(describe).collect();
            let stdin = io::stdin();
            let stdout = io::stdout();
            let choice = prompt_selection(&labels, stdin.lock(), stdout.lock())?;
            let iface = available
                .into_iter()
                .nth(choice)
                .ok_or_else(|| ConfigError::InvalidSelection(choice.to_string()))?;
            info!("Interface set: {}", iface.name);
            Ok(iface)
        }
    }
}

/// Print `labels` as a numbered menu and read the operator's choice.
pub fn prompt_selection<R, W>(labels: &[String], mut input: R, mut output: W) -> Result<usize, ConfigError>
where
    R: BufRead,
    W: Write,
{
    for (num, label) in labels.iter().enumerate() {
        writeln!(output, "[{}] {}", num, label)?;
    }
    write!(output, "Please select an interface: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    match answer.parse::<usize>() {
        Ok(num) if num < labels.len() => Ok(num),
        _ => Err(ConfigError::InvalidSelection(answer.to_string())),
    }
}

/// Interface record for a name the platform could not enumerate.
///
/// pnet binds and sends by interface index, so the name still has to map
/// to a kernel index or the channel would not be tied to that interface.
fn unverified_interface(name: &str) -> Result<NetworkInterface, ConfigError> {
    let index =
        interface_index(name).ok_or_else(|| ConfigError::InterfaceNotFound(name.to_string()))?;

    Ok(NetworkInterface {
        name: name.to_string(),
        description: String::new(),
        index,
        mac: None,
        ips: Vec::new(),
        flags: 0,
    })
}

#[cfg(target_os = "linux")]
fn interface_index(name: &str) -> Option<u32> {
    let c_name = std::ffi::CString::new(name).ok()?;
    // SAFETY: c_name is a valid NUL-terminated string for the whole call
    let index = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    (index != 0).then_some(index)
}

#[cfg(not(target_os = "linux"))]
fn interface_index(_name: &str) -> Option<u32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn labels() -> Vec<String> {
        vec!["lo: UP [127.0.0.1/8]".to_string(), "eth0: UP [10.0.0.2/24]".to_string()]
    }

    #[test]
    fn test_prompt_lists_and_selects() {
        let mut output = Vec::new();

        let choice = prompt_selection(&labels(), Cursor::new("1\n"), &mut output).unwrap();

        assert_eq!(choice, 1);
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("[0] lo: UP"));
        assert!(shown.contains("[1] eth0: UP"));
        assert!(shown.ends_with("Please select an interface: "));
    }

    #[test]
    fn test_prompt_rejects_out_of_range() {
        let err = prompt_selection(&labels(), Cursor::new("2\n"), Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelection(s) if s == "2"));
    }

    #[test]
    fn test_prompt_rejects_garbage() {
        let err = prompt_selection(&labels(), Cursor::new("eth0\n"), Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelection(_)));
    }

    #[test]
    fn test_unverified_unknown_name_rejected() {
        let err = unverified_interface("nosuchif0").unwrap_err();
        assert!(matches!(err, ConfigError::InterfaceNotFound(name) if name == "nosuchif0"));
    }

    #[test]
    fn test_unverified_name_with_nul_rejected() {
        assert!(unverified_interface("lo\0").is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unverified_interface_uses_kernel_index() {
        let real = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == "lo")
            .expect("loopback interface");

        let iface = unverified_interface("lo").unwrap();

        assert_eq!(iface.name, "lo");
        assert_eq!(iface.index, real.index);
        assert_ne!(iface.index, 0);
    }
}
