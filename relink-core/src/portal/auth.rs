//! Captive portal login protocol
//!
//! Drives the portal's web login flow over a `BrowserSession`: detect an
//! already-authenticated session, or fill and submit the login form and
//! verify the resulting session identity. Every automation failure is
//! converted to an `AuthResult` here; nothing at this boundary propagates
//! errors to the orchestrator except browser launch itself, which the
//! orchestrator treats as a distinct terminal path.

use crate::config::PortalConfig;
use crate::error::BrowserError;
use crate::types::{AuthResult, Credentials};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::browser::BrowserSession;

/// Creates browser sessions on demand, so launch stays lazy: no browser
/// process is started on runs that never reach authentication
#[async_trait]
pub trait SessionLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession + Send + Sync>, BrowserError>;
}

/// Authentication seam consumed by the orchestrator
#[async_trait]
pub trait Authenticator {
    /// Launch the browser session if not already running
    async fn prepare(&mut self) -> Result<(), BrowserError>;

    /// Run one login attempt; never errors
    async fn login(&mut self, credentials: &Credentials) -> AuthResult;

    /// Release the browser session
    ///
    /// Safe to call when `prepare` never ran or already failed, and safe to
    /// call repeatedly; teardown errors are logged, not raised.
    async fn close(&mut self);
}

/// Logs in against the campus captive portal
pub struct PortalAuthenticator {
    launcher: Box<dyn SessionLauncher + Send + Sync>,
    config: PortalConfig,
    session: Option<Box<dyn BrowserSession + Send + Sync>>,
}

impl PortalAuthenticator {
    pub fn new(launcher: Box<dyn SessionLauncher + Send + Sync>, config: PortalConfig) -> Self {
        Self {
            launcher,
            config,
            session: None,
        }
    }

    /// One full pass of the login protocol against a live session
    async fn attempt(
        session: &(dyn BrowserSession + Send + Sync),
        config: &PortalConfig,
        credentials: &Credentials,
    ) -> AuthResult {
        let username = credentials.username();

        if let Err(e) = session.navigate(&config.url).await {
            return AuthResult::failure(format!("failed to load portal page: {}", e));
        }
        tokio::time::sleep(config.page_settle).await;

        // A prior session may still be alive; submitting again would be
        // redundant at best.
        match session.element_text(&config.identity_selector).await {
            Ok(Some(identity)) if identity == username => {
                return AuthResult::success(format!("user {} already logged in", username));
            }
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "Session identity probe failed, proceeding to login");
            }
        }

        if let Err(e) = session
            .set_field_value(&config.username_field_id, username)
            .await
        {
            return AuthResult::failure(format!("failed to fill username field: {}", e));
        }
        if let Err(e) = session
            .set_field_value(&config.password_field_id, credentials.expose_password())
            .await
        {
            return AuthResult::failure(format!("failed to fill password field: {}", e));
        }
        if let Err(e) = session.click(&config.login_selector).await {
            return AuthResult::failure(format!("failed to trigger login control: {}", e));
        }

        info!("Submitted portal login form");
        tokio::time::sleep(config.submit_settle).await;

        match session
            .wait_for_element_text(&config.identity_selector, config.session_wait)
            .await
        {
            Ok(identity) if identity == username => AuthResult::success("login verified"),
            Ok(_) => AuthResult::failure("portal session belongs to a different identity"),
            Err(e) => AuthResult::failure(format!("session identity not confirmed: {}", e)),
        }
    }
}

#[async_trait]
impl Authenticator for PortalAuthenticator {
    async fn prepare(&mut self) -> Result<(), BrowserError> {
        if self.session.is_none() {
            self.session = Some(self.launcher.launch().await?);
        }
        Ok(())
    }

    async fn login(&mut self, credentials: &Credentials) -> AuthResult {
        let Some(session) = self.session.as_deref() else {
            return AuthResult::failure("browser session not prepared");
        };
        Self::attempt(session, &self.config, credentials).await
    }

    async fn close(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        match session.close().await {
            Ok(()) => info!("Browser closed"),
            Err(e) => warn!(error = %e, "Browser teardown failed"),
        }
    }
}
