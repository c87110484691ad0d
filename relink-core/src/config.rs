//! Runtime settings for probes, link establishment and portal login
//!
//! relink deliberately carries no config file and persists nothing; these
//! structs are built in memory from CLI arguments plus the defaults below,
//! which mirror the managed campus deployment the tool was written for.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default SSID of the open campus network
pub const DEFAULT_SSID: &str = "Shu(ForAll)";

/// Placeholder credential value shipped in the defaults; a real account must
/// be supplied on the command line
pub const PLACEHOLDER_CREDENTIAL: &str = "xxx";

/// Fixed addresses of the two reachability targets
const INTERNET_PROBE_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53);
const PORTAL_GATEWAY_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 10, 9, 9)), 80);

/// Reachability probe targets and timeouts
#[derive(Debug, Clone)]
pub struct ProbeTargets {
    /// Public internet target; a TCP connect here proves internet-layer reachability
    pub internet_addr: SocketAddr,
    pub internet_timeout: Duration,
    /// Portal gateway HTTP port; connect success alone is sufficient
    pub portal_addr: SocketAddr,
    pub portal_timeout: Duration,
}

impl Default for ProbeTargets {
    fn default() -> Self {
        Self {
            internet_addr: INTERNET_PROBE_ADDR,
            internet_timeout: Duration::from_secs(3),
            portal_addr: PORTAL_GATEWAY_ADDR,
            portal_timeout: Duration::from_secs(2),
        }
    }
}

/// Captive portal page layout and wait discipline
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Root page of the portal's web login flow
    pub url: String,

    /// CSS selector of the element carrying the logged-in session identity
    pub identity_selector: String,

    /// DOM ids of the login form fields (values are set directly via script,
    /// bypassing simulated typing)
    pub username_field_id: String,
    pub password_field_id: String,

    /// CSS selector of the login control
    pub login_selector: String,

    /// Settle delay after loading the page, for portal scripting to initialize
    pub page_settle: Duration,

    /// Settle delay after submitting the form
    pub submit_settle: Duration,

    /// Bounded wait for the session identity element to appear post-submit
    pub session_wait: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: "http://10.10.9.9".to_string(),
            identity_selector: "#userId".to_string(),
            username_field_id: "username".to_string(),
            password_field_id: "pwd".to_string(),
            login_selector: "#loginLink".to_string(),
            page_settle: Duration::from_secs(2),
            submit_settle: Duration::from_secs(3),
            session_wait: Duration::from_secs(10),
        }
    }
}

/// Wait and retry discipline for link establishment
#[derive(Debug, Clone)]
pub struct LinkTiming {
    /// Settle delay after disconnecting an existing association
    pub disconnect_settle: Duration,

    /// Interval between association status polls
    pub poll_interval: Duration,

    /// Number of association status polls before giving up
    pub poll_attempts: u32,

    /// Fixed settle delay for wired links (OS DHCP auto-configures; no polling)
    pub wired_settle: Duration,

    /// Fixed delay after a successful join, for address acquisition
    pub address_settle: Duration,
}

impl Default for LinkTiming {
    fn default() -> Self {
        Self {
            disconnect_settle: Duration::from_secs(1),
            poll_interval: Duration::from_secs(1),
            poll_attempts: 10,
            wired_settle: Duration::from_secs(5),
            address_settle: Duration::from_secs(5),
        }
    }
}
