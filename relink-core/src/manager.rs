//! Connectivity state machine and remediation orchestrator
//!
//! Classifies the overall network state from the two reachability probes,
//! picks the remediation branch, and sequences link establishment,
//! settle-waits and portal authentication. One pass per invocation: the
//! machine never loops back after a terminal failure; rerunning the process
//! is the retry boundary, which bounds worst-case run time and keeps
//! persistent misconfiguration visible instead of masked by endless retries.

use crate::config::LinkTiming;
use crate::net::{LinkControl, LinkInspector, Reachability};
use crate::portal::Authenticator;
use crate::types::{ConnectivityState, Credentials, LinkKind};
use std::time::Duration;
use tracing::{error, info, warn};

/// Settle delay between a verified login and the confirming internet probe
const POST_AUTH_SETTLE: Duration = Duration::from_secs(2);

/// Orchestrates one check-and-remediate pass
pub struct ConnectivityManager {
    probe: Box<dyn Reachability + Send + Sync>,
    inspector: Box<dyn LinkInspector + Send + Sync>,
    link: Box<dyn LinkControl + Send + Sync>,
    authenticator: Box<dyn Authenticator + Send>,
    credentials: Credentials,
    ssid: String,
    timing: LinkTiming,
}

impl ConnectivityManager {
    pub fn new(
        probe: Box<dyn Reachability + Send + Sync>,
        inspector: Box<dyn LinkInspector + Send + Sync>,
        link: Box<dyn LinkControl + Send + Sync>,
        authenticator: Box<dyn Authenticator + Send>,
        credentials: Credentials,
        ssid: String,
    ) -> Self {
        Self {
            probe,
            inspector,
            link,
            authenticator,
            credentials,
            ssid,
            timing: LinkTiming::default(),
        }
    }

    /// Derive the connectivity state from fresh probes
    ///
    /// Recomputed at the start of a run and again after each remediation
    /// step; never cached.
    async fn classify(&self) -> ConnectivityState {
        let internet = self.probe.is_internet_reachable().await;
        let portal = self.probe.is_portal_gateway_reachable().await;
        ConnectivityState::from_probes(internet, portal)
    }

    /// Run one check-and-remediate pass
    ///
    /// The boolean outcome is the sole externally observable result; the
    /// caller maps it to a process exit code.
    pub async fn run(&mut self) -> bool {
        info!("Campus network connectivity pass started");

        let state = self.classify().await;
        info!(state = %state, "Connectivity state classified");

        let link = self.inspector.classify_active_link();
        info!(kind = %link.kind, adapter = %link.name, "Active link");

        match state {
            ConnectivityState::Connected => {
                info!("Internet already reachable, nothing to do");
                true
            }
            ConnectivityState::CampusOnly => {
                info!("Campus network detected, attempting portal authentication");
                self.try_authentication().await
            }
            ConnectivityState::NoNetwork => {
                info!("No network detected, attempting to establish a link");
                self.establish_link().await
            }
        }
    }

    /// TRY_AUTH: one bounded portal login attempt, then a confirming probe
    ///
    /// Shared by both remediation branches; login is idempotent against
    /// portals that silently keep a prior session alive, so invoking it from
    /// either branch is safe.
    async fn try_authentication(&mut self) -> bool {
        if let Err(e) = self.authenticator.prepare().await {
            error!(error = %e, "Browser initialization failed");
            return false;
        }

        let result = self.authenticator.login(&self.credentials).await;
        if !result.is_success() {
            error!(message = result.message(), "Portal authentication failed");
            return false;
        }
        info!(message = result.message(), "Portal authentication succeeded");

        tokio::time::sleep(POST_AUTH_SETTLE).await;
        if self.probe.is_internet_reachable().await {
            info!("Internet connectivity restored");
            true
        } else {
            warn!("Authenticated but internet is still unreachable");
            false
        }
    }

    /// ESTABLISH_LINK: bring up a usable link, then hand over to TRY_AUTH
    ///
    /// The wired path is tried first when a wired adapter is active; if it
    /// does not yield gateway reachability the wireless join runs as the
    /// fallthrough. At most one join attempt per pass.
    async fn establish_link(&mut self) -> bool {
        // Re-classified here rather than reused from run(): the earlier
        // snapshot may already be stale.
        let link = self.inspector.classify_active_link();

        if link.kind == LinkKind::Wired {
            self.link.wait_for_wired_settle().await;
            if self.probe.is_portal_gateway_reachable().await {
                info!(adapter = %link.name, "Wired link ready, attempting portal authentication");
                return self.try_authentication().await;
            }
            warn!(adapter = %link.name, "Wired link did not yield gateway reachability");
        }

        info!(ssid = %self.ssid, "Attempting Wi-Fi join");
        if self.link.ensure_wireless_joined(&self.ssid).await {
            info!(
                settle_secs = self.timing.address_settle.as_secs(),
                "Wi-Fi joined, waiting for address acquisition"
            );
            tokio::time::sleep(self.timing.address_settle).await;
            if self.probe.is_portal_gateway_reachable().await {
                info!("Wireless link ready, attempting portal authentication");
                return self.try_authentication().await;
            }
        }

        error!("Cannot establish a network connection");
        false
    }

    /// Release held resources; must run on every exit path
    pub async fn shutdown(&mut self) {
        self.authenticator.close().await;
    }
}
