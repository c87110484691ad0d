//! The connect pass: build the orchestrator, run it once, map the outcome
//!
//! Exit codes: 0 when connectivity is restored (or was never lost), 1 when
//! remediation failed, 130 on user interruption. Browser teardown runs
//! unconditionally on all three paths.

use colored::Colorize;
use relink_core::config::{LinkTiming, PortalConfig, ProbeTargets, PLACEHOLDER_CREDENTIAL};
use relink_core::manager::ConnectivityManager;
use relink_core::net::{InterfaceInspector, LinkConnector, NmcliStation, ReachabilityProbe};
use relink_core::portal::{ChromeLauncher, PortalAuthenticator};
use relink_core::types::Credentials;
use tracing::{error, info, warn};

/// Run one check-and-remediate pass and return the process exit code
pub async fn run_connect(username: String, password: String, ssid: String, headless: bool) -> i32 {
    if username == PLACEHOLDER_CREDENTIAL || password == PLACEHOLDER_CREDENTIAL {
        warn!("Credentials left at placeholder values; pass -u/-p for real use");
    }

    let credentials = Credentials::new(username, password);

    let mut manager = ConnectivityManager::new(
        Box::new(ReachabilityProbe::new(ProbeTargets::default())),
        Box::new(InterfaceInspector::new()),
        Box::new(LinkConnector::new(
            Box::new(NmcliStation::new()),
            LinkTiming::default(),
        )),
        Box::new(PortalAuthenticator::new(
            Box::new(ChromeLauncher::new(headless)),
            PortalConfig::default(),
        )),
        credentials,
        ssid,
    );

    // Cancellation leaves the pass wherever it was; teardown below still
    // runs before the process exits.
    let outcome = tokio::select! {
        restored = manager.run() => Some(restored),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted by user");
            None
        }
    };

    manager.shutdown().await;

    match outcome {
        Some(true) => {
            info!("Connectivity pass finished successfully");
            println!("{}", "✓ Internet connectivity restored".green());
            0
        }
        Some(false) => {
            error!("Connectivity pass failed");
            println!("{}", "✗ Could not restore connectivity".red());
            1
        }
        None => {
            println!("{}", "Interrupted".yellow());
            130
        }
    }
}
