//! Active adapter classification
//!
//! Enumerates OS network interfaces and classifies the active one as wired,
//! wireless, or unknown. The name pattern sets are locale-aware so localized
//! Windows adapter names ("以太网", "无线") match alongside the generic
//! Linux/Windows conventions. Wired takes priority over wireless when both
//! are up, and only adapters that already hold an IPv4 address qualify.

use crate::types::{ActiveLink, LinkKind};
use network_interface::{NetworkInterface, NetworkInterfaceConfig};
use std::net::IpAddr;
use tracing::{debug, warn};

/// Wired adapter name fragments, localized and generic
const WIRED_PATTERNS: &[&str] = &["以太网", "Ethernet", "eth", "enp", "eno"];

/// Wireless adapter name fragments, localized and generic
const WIRELESS_PATTERNS: &[&str] = &["Wi-Fi", "WLAN", "wlan", "wlp", "无线"];

/// Link classification seam consumed by the orchestrator
pub trait LinkInspector {
    /// Classify the active adapter from live OS interface state
    ///
    /// Never cached: remediation can change which adapter is active.
    fn classify_active_link(&self) -> ActiveLink;
}

/// Snapshot of one OS interface, reduced to what classification needs
#[derive(Debug, Clone)]
pub struct InterfaceRecord {
    pub name: String,
    pub is_up: bool,
    pub has_ipv4: bool,
}

/// Classify a snapshot of interface records
///
/// Order matters: the wired pattern set is scanned first across all records,
/// then the wireless set, so a live wired adapter wins over a live wireless
/// one regardless of enumeration order.
pub fn classify_records(records: &[InterfaceRecord]) -> ActiveLink {
    for (patterns, kind) in [
        (WIRED_PATTERNS, LinkKind::Wired),
        (WIRELESS_PATTERNS, LinkKind::Wireless),
    ] {
        for record in records {
            if !record.is_up || !record.has_ipv4 {
                continue;
            }
            if patterns.iter().any(|p| record.name.contains(p)) {
                return ActiveLink {
                    kind,
                    name: record.name.clone(),
                };
            }
        }
    }
    ActiveLink::unknown()
}

/// Inspects live OS interface state
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceInspector;

impl InterfaceInspector {
    pub fn new() -> Self {
        Self
    }

    fn snapshot() -> Vec<InterfaceRecord> {
        let interfaces = match NetworkInterface::show() {
            Ok(interfaces) => interfaces,
            Err(e) => {
                warn!(error = %e, "Failed to enumerate network interfaces");
                return Vec::new();
            }
        };

        interfaces
            .into_iter()
            .map(|iface| {
                let has_ipv4 = iface
                    .addr
                    .iter()
                    .any(|addr| matches!(addr.ip(), IpAddr::V4(_)));
                InterfaceRecord {
                    is_up: is_admin_up(&iface.name),
                    name: iface.name,
                    has_ipv4,
                }
            })
            .collect()
    }
}

impl LinkInspector for InterfaceInspector {
    fn classify_active_link(&self) -> ActiveLink {
        let records = Self::snapshot();
        let link = classify_records(&records);
        debug!(kind = %link.kind, adapter = %link.name, "Classified active link");
        link
    }
}

/// Whether the interface is administratively up
///
/// On Linux this reads the sysfs operstate; "unknown" counts as up because
/// several drivers report it for perfectly functional interfaces. On other
/// platforms enumeration itself is the best signal available.
#[cfg(target_os = "linux")]
fn is_admin_up(name: &str) -> bool {
    match std::fs::read_to_string(format!("/sys/class/net/{}/operstate", name)) {
        Ok(state) => matches!(state.trim(), "up" | "unknown"),
        Err(_) => false,
    }
}

#[cfg(not(target_os = "linux"))]
fn is_admin_up(_name: &str) -> bool {
    true
}
