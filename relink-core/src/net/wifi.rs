//! Link establishment: Wi-Fi join sequencing and wired settle
//!
//! `LinkConnector` owns the join discipline: disconnect, settle, replace
//! stored profiles with a single open profile, request connect, then poll
//! association once per second for a bounded window. The radio itself is
//! driven through the `WirelessStation` seam, backed by nmcli on Linux.

use crate::config::LinkTiming;
use crate::error::LinkError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Device-level wireless radio control
///
/// Thin I/O seam; all sequencing and retry discipline lives in
/// `LinkConnector`.
#[async_trait]
pub trait WirelessStation {
    /// Name of the wireless device, or `None` when no radio is present
    async fn device(&self) -> Result<Option<String>, LinkError>;

    /// Drop any existing association
    async fn disconnect(&self, device: &str) -> Result<(), LinkError>;

    /// Destructively replace all stored wireless profiles with a single open
    /// (unencrypted) profile for `ssid`
    async fn replace_profiles(&self, device: &str, ssid: &str) -> Result<(), LinkError>;

    /// Issue a connect request for the stored `ssid` profile without waiting
    /// for the association to complete
    async fn request_connect(&self, ssid: &str) -> Result<(), LinkError>;

    /// Whether the device currently reports a completed association
    async fn is_associated(&self, device: &str) -> Result<bool, LinkError>;
}

/// Link establishment seam consumed by the orchestrator
#[async_trait]
pub trait LinkControl {
    /// Join the named open network; true on first observed association
    async fn ensure_wireless_joined(&self, ssid: &str) -> bool;

    /// Fixed settle delay for wired links; the caller re-probes afterward
    async fn wait_for_wired_settle(&self);
}

/// Sequences link establishment over a wireless radio
pub struct LinkConnector {
    station: Box<dyn WirelessStation + Send + Sync>,
    timing: LinkTiming,
}

impl LinkConnector {
    pub fn new(station: Box<dyn WirelessStation + Send + Sync>, timing: LinkTiming) -> Self {
        Self { station, timing }
    }
}

#[async_trait]
impl LinkControl for LinkConnector {
    async fn ensure_wireless_joined(&self, ssid: &str) -> bool {
        let device = match self.station.device().await {
            Ok(Some(device)) => device,
            Ok(None) => {
                error!("No wireless interface found");
                return false;
            }
            Err(e) => {
                error!(error = %e, "Wireless device lookup failed");
                return false;
            }
        };

        // The device may not be associated at all; a failed disconnect is
        // not a reason to abort the join.
        if let Err(e) = self.station.disconnect(&device).await {
            debug!(device = %device, error = %e, "Disconnect before join failed");
        }
        tokio::time::sleep(self.timing.disconnect_settle).await;

        if let Err(e) = self.station.replace_profiles(&device, ssid).await {
            error!(ssid = %ssid, error = %e, "Failed to install network profile");
            return false;
        }

        if let Err(e) = self.station.request_connect(ssid).await {
            error!(ssid = %ssid, error = %e, "Connect request failed");
            return false;
        }

        for attempt in 1..=self.timing.poll_attempts {
            tokio::time::sleep(self.timing.poll_interval).await;
            match self.station.is_associated(&device).await {
                Ok(true) => {
                    info!(ssid = %ssid, device = %device, "Joined Wi-Fi network");
                    return true;
                }
                Ok(false) => {}
                Err(e) => {
                    debug!(attempt, error = %e, "Association status check failed");
                }
            }
        }

        error!(ssid = %ssid, "Wi-Fi association timed out");
        false
    }

    async fn wait_for_wired_settle(&self) {
        info!(
            settle_secs = self.timing.wired_settle.as_secs(),
            "Wired link detected, waiting for OS auto-configuration"
        );
        tokio::time::sleep(self.timing.wired_settle).await;
    }
}

/// nmcli-backed wireless radio control
pub struct NmcliStation {
    nmcli: Option<PathBuf>,
}

impl NmcliStation {
    /// Look up the nmcli binary on PATH
    ///
    /// A missing binary is not fatal here: every radio operation then fails
    /// with `ToolNotFound`, which the connector reports as the no-radio path.
    pub fn new() -> Self {
        let nmcli = which::which("nmcli").ok();
        if nmcli.is_none() {
            warn!("nmcli not found on PATH; Wi-Fi join will be unavailable");
        }
        Self { nmcli }
    }

    async fn run(&self, args: &[&str]) -> Result<String, LinkError> {
        let nmcli = self.nmcli.as_ref().ok_or_else(|| LinkError::ToolNotFound {
            tool: "nmcli".to_string(),
        })?;
        let output = Command::new(nmcli)
            .args(args)
            .output()
            .await
            .map_err(|e| LinkError::CommandFailed {
                command: format!("nmcli {}", args.join(" ")),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(LinkError::CommandFailed {
                command: format!("nmcli {}", args.join(" ")),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for NmcliStation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WirelessStation for NmcliStation {
    async fn device(&self) -> Result<Option<String>, LinkError> {
        let listing = self.run(&["-t", "-f", "DEVICE,TYPE", "device"]).await?;
        Ok(listing.lines().find_map(|line| {
            let (device, kind) = line.split_once(':')?;
            (kind == "wifi").then(|| device.to_string())
        }))
    }

    async fn disconnect(&self, device: &str) -> Result<(), LinkError> {
        self.run(&["device", "disconnect", device]).await?;
        Ok(())
    }

    async fn replace_profiles(&self, device: &str, ssid: &str) -> Result<(), LinkError> {
        // Remove every stored wireless profile, then add one open profile.
        let listing = self.run(&["-t", "-f", "NAME,TYPE", "connection", "show"]).await?;
        for line in listing.lines() {
            if let Some((name, kind)) = line.split_once(':') {
                if kind == "802-11-wireless" {
                    debug!(profile = %name, "Removing stored wireless profile");
                    self.run(&["connection", "delete", "id", name]).await?;
                }
            }
        }

        self.run(&[
            "connection", "add", "type", "wifi", "ifname", device, "con-name", ssid, "ssid",
            ssid,
        ])
        .await?;
        Ok(())
    }

    async fn request_connect(&self, ssid: &str) -> Result<(), LinkError> {
        // -w 1 returns almost immediately; activation continues in the
        // background and the caller polls association status.
        if let Err(e) = self.run(&["-w", "1", "connection", "up", "id", ssid]).await {
            debug!(ssid = %ssid, error = %e, "Connect request still pending");
        }
        Ok(())
    }

    async fn is_associated(&self, device: &str) -> Result<bool, LinkError> {
        let listing = self.run(&["-t", "-f", "DEVICE,STATE", "device"]).await?;
        Ok(listing.lines().any(|line| {
            line.split_once(':')
                .is_some_and(|(dev, state)| dev == device && state == "connected")
        }))
    }
}
