//! Error types for the relink CLI tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.
//!
//! Transient connectivity failures (probe timeouts, DNS failures) never
//! surface here at all: the probe layer maps them to `false`. Structured
//! errors are reserved for the link and browser layers, and all of them are
//! converted to return values before reaching the orchestrator.

use thiserror::Error;

/// Link establishment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("No wireless interface found")]
    NoWirelessInterface,

    #[error("Wi-Fi association timed out for SSID: {ssid}")]
    JoinTimeout { ssid: String },

    #[error("Network tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("Network command failed: {command}: {detail}")]
    CommandFailed { command: String, detail: String },
}

/// Browser automation errors
///
/// These are caught at the authenticator boundary and converted into
/// `AuthResult` failures; only `LaunchFailed` is observed directly by the
/// orchestrator, as a distinct "browser init failed" terminal path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("Failed to launch browser: {reason}")]
    LaunchFailed { reason: String },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Timed out waiting for element: {selector}")]
    ElementTimeout { selector: String },

    #[error("Browser automation failed: {reason}")]
    Automation { reason: String },

    #[error("Browser session already closed")]
    SessionClosed,
}
