//! TCP-level reachability probing
//!
//! Short-lived connect attempts against two fixed targets: a public internet
//! resolver and the campus portal gateway. The probe layer deliberately
//! exposes a bool-only contract: timeouts, DNS failures and refusals are all
//! expected classification inputs, not errors, and retry policy belongs to
//! the orchestrator.

use crate::config::ProbeTargets;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Reachability seam consumed by the orchestrator
#[async_trait]
pub trait Reachability {
    /// Whether the public internet target accepts a TCP connection
    async fn is_internet_reachable(&self) -> bool;

    /// Whether the portal gateway accepts a TCP connection on its HTTP port
    ///
    /// Connection success alone is sufficient; no HTTP exchange happens.
    async fn is_portal_gateway_reachable(&self) -> bool;
}

/// Probes the two fixed targets with short connect timeouts
#[derive(Debug, Clone, Default)]
pub struct ReachabilityProbe {
    targets: ProbeTargets,
}

impl ReachabilityProbe {
    pub fn new(targets: ProbeTargets) -> Self {
        Self { targets }
    }

    /// Single connect attempt; any failure maps to `false`
    async fn connect_within(addr: SocketAddr, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                debug!(target = %addr, error = %e, "Probe connect failed");
                false
            }
            Err(_) => {
                debug!(target = %addr, timeout_ms = timeout.as_millis(), "Probe timed out");
                false
            }
        }
    }
}

#[async_trait]
impl Reachability for ReachabilityProbe {
    async fn is_internet_reachable(&self) -> bool {
        Self::connect_within(self.targets.internet_addr, self.targets.internet_timeout).await
    }

    async fn is_portal_gateway_reachable(&self) -> bool {
        Self::connect_within(self.targets.portal_addr, self.targets.portal_timeout).await
    }
}
