//! Captive portal authentication: browser automation seam and the
//! login protocol driven over it

pub mod auth;
pub mod browser;

pub use auth::{Authenticator, PortalAuthenticator, SessionLauncher};
pub use browser::{BrowserSession, ChromeLauncher, ChromeSession};
