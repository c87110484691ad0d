//! Type definitions and wrappers for connectivity classification
//!
//! This module provides the closed classification types driving the state
//! machine, plus a secrecy-backed wrapper for portal credentials so the
//! password is never accidentally logged or exposed in debug output.

use secrecy::{ExposeSecret, Secret};

/// Overall connectivity state, derived fresh from the two reachability probes
///
/// Never persisted; the orchestrator recomputes it at the start of a run and
/// again after each remediation step to confirm the step had effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    /// Internet is reachable; nothing to do
    Connected,

    /// Portal gateway is reachable but the internet is not (unauthenticated)
    CampusOnly,

    /// Neither target is reachable
    NoNetwork,
}

impl ConnectivityState {
    /// Derive the state from the two probe outcomes
    ///
    /// Internet reachability wins regardless of the gateway probe: a live
    /// internet path means the session is already authenticated.
    pub fn from_probes(internet_reachable: bool, portal_reachable: bool) -> Self {
        if internet_reachable {
            ConnectivityState::Connected
        } else if portal_reachable {
            ConnectivityState::CampusOnly
        } else {
            ConnectivityState::NoNetwork
        }
    }
}

impl std::fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectivityState::Connected => write!(f, "connected"),
            ConnectivityState::CampusOnly => write!(f, "campus network only (unauthenticated)"),
            ConnectivityState::NoNetwork => write!(f, "no network"),
        }
    }
}

/// Kind of the active link-layer adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Wired,
    Wireless,
    Unknown,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Wired => write!(f, "wired"),
            LinkKind::Wireless => write!(f, "wireless"),
            LinkKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// The classified active adapter
///
/// Recomputed by inspecting live OS interface state, never cached across
/// remediation steps since a join attempt can change which adapter is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLink {
    pub kind: LinkKind,
    /// Adapter name, empty for `LinkKind::Unknown`
    pub name: String,
}

impl ActiveLink {
    pub fn unknown() -> Self {
        Self {
            kind: LinkKind::Unknown,
            name: String::new(),
        }
    }
}

/// Portal account credentials, immutable for the process lifetime
///
/// The password is wrapped with the secrecy crate so it never appears in
/// `Debug` output or log lines; it is exposed only at the moment the portal
/// form is filled.
#[derive(Clone, Debug)]
pub struct Credentials {
    username: String,
    password: Secret<String>,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password: Secret::new(password),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Expose the password value (use with caution!)
    ///
    /// This should only be called when filling the portal login form.
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Outcome of one portal login attempt
///
/// Produced once per attempt and consumed immediately by the orchestrator to
/// pick the next branch; the message feeds the final log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    success: bool,
    message: String,
}

impl AuthResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
