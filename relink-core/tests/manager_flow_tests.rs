//! State machine flow tests for ConnectivityManager
//!
//! Each test wires the orchestrator with scripted collaborators and checks
//! which remediation branch runs, how often each collaborator is invoked,
//! and the final pass outcome.

use async_trait::async_trait;
use relink_core::error::BrowserError;
use relink_core::manager::ConnectivityManager;
use relink_core::net::{LinkControl, LinkInspector, Reachability};
use relink_core::portal::Authenticator;
use relink_core::types::{ActiveLink, AuthResult, Credentials, LinkKind};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Probe returning scripted answers; the last value repeats once the script
/// is exhausted
struct ScriptedProbe {
    internet: Mutex<VecDeque<bool>>,
    portal: Mutex<VecDeque<bool>>,
}

impl ScriptedProbe {
    fn new(internet: &[bool], portal: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            internet: Mutex::new(internet.to_vec().into()),
            portal: Mutex::new(portal.to_vec().into()),
        })
    }

    fn next(queue: &Mutex<VecDeque<bool>>) -> bool {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            *queue.front().expect("probe script must not be empty")
        }
    }
}

struct SharedProbe(Arc<ScriptedProbe>);

#[async_trait]
impl Reachability for SharedProbe {
    async fn is_internet_reachable(&self) -> bool {
        ScriptedProbe::next(&self.0.internet)
    }

    async fn is_portal_gateway_reachable(&self) -> bool {
        ScriptedProbe::next(&self.0.portal)
    }
}

struct FixedInspector(ActiveLink);

impl LinkInspector for FixedInspector {
    fn classify_active_link(&self) -> ActiveLink {
        self.0.clone()
    }
}

#[derive(Default)]
struct CountingLink {
    join_succeeds: bool,
    join_calls: AtomicU32,
    wired_settles: AtomicU32,
}

struct SharedLink(Arc<CountingLink>);

#[async_trait]
impl LinkControl for SharedLink {
    async fn ensure_wireless_joined(&self, _ssid: &str) -> bool {
        self.0.join_calls.fetch_add(1, Ordering::SeqCst);
        self.0.join_succeeds
    }

    async fn wait_for_wired_settle(&self) {
        self.0.wired_settles.fetch_add(1, Ordering::SeqCst);
    }
}

struct CountingAuth {
    prepare_fails: bool,
    login_result: AuthResult,
    prepare_calls: AtomicU32,
    login_calls: AtomicU32,
    close_calls: AtomicU32,
}

impl CountingAuth {
    fn succeeding() -> Arc<Self> {
        Self::with_result(AuthResult::success("login verified"))
    }

    fn failing() -> Arc<Self> {
        Self::with_result(AuthResult::failure("session identity not confirmed"))
    }

    fn with_result(login_result: AuthResult) -> Arc<Self> {
        Arc::new(Self {
            prepare_fails: false,
            login_result,
            prepare_calls: AtomicU32::new(0),
            login_calls: AtomicU32::new(0),
            close_calls: AtomicU32::new(0),
        })
    }

    fn broken_browser() -> Arc<Self> {
        Arc::new(Self {
            prepare_fails: true,
            login_result: AuthResult::failure("unreachable"),
            prepare_calls: AtomicU32::new(0),
            login_calls: AtomicU32::new(0),
            close_calls: AtomicU32::new(0),
        })
    }
}

struct SharedAuth(Arc<CountingAuth>);

#[async_trait]
impl Authenticator for SharedAuth {
    async fn prepare(&mut self) -> Result<(), BrowserError> {
        self.0.prepare_calls.fetch_add(1, Ordering::SeqCst);
        if self.0.prepare_fails {
            Err(BrowserError::LaunchFailed {
                reason: "no chrome binary".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn login(&mut self, _credentials: &Credentials) -> AuthResult {
        self.0.login_calls.fetch_add(1, Ordering::SeqCst);
        self.0.login_result.clone()
    }

    async fn close(&mut self) {
        self.0.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn credentials() -> Credentials {
    Credentials::new("student42".to_string(), "secret".to_string())
}

fn manager(
    probe: Arc<ScriptedProbe>,
    link_kind: ActiveLink,
    link: Arc<CountingLink>,
    auth: Arc<CountingAuth>,
) -> ConnectivityManager {
    ConnectivityManager::new(
        Box::new(SharedProbe(probe)),
        Box::new(FixedInspector(link_kind)),
        Box::new(SharedLink(link)),
        Box::new(SharedAuth(auth)),
        credentials(),
        "Shu(ForAll)".to_string(),
    )
}

fn wired() -> ActiveLink {
    ActiveLink {
        kind: LinkKind::Wired,
        name: "enp3s0".to_string(),
    }
}

fn wireless() -> ActiveLink {
    ActiveLink {
        kind: LinkKind::Wireless,
        name: "wlan0".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn connected_on_entry_returns_true_without_remediation() {
    let probe = ScriptedProbe::new(&[true], &[true]);
    let link = Arc::new(CountingLink::default());
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, wireless(), link.clone(), auth.clone());
    assert!(manager.run().await);

    assert_eq!(link.join_calls.load(Ordering::SeqCst), 0);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn campus_only_login_success_and_internet_back_returns_true() {
    // Initial classify: no internet, portal reachable; post-auth: internet up
    let probe = ScriptedProbe::new(&[false, true], &[true]);
    let link = Arc::new(CountingLink::default());
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, wired(), link.clone(), auth.clone());
    assert!(manager.run().await);

    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 1);
    assert_eq!(link.join_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn campus_only_login_success_but_no_internet_is_a_failure() {
    // Login verifies, yet the confirming probe still reports unreachable
    let probe = ScriptedProbe::new(&[false, false], &[true]);
    let link = Arc::new(CountingLink::default());
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, wired(), link, auth.clone());
    assert!(!manager.run().await);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn campus_only_login_failure_is_terminal() {
    let probe = ScriptedProbe::new(&[false], &[true]);
    let link = Arc::new(CountingLink::default());
    let auth = CountingAuth::failing();

    let mut manager = manager(probe, wired(), link.clone(), auth.clone());
    assert!(!manager.run().await);

    // Exactly one login attempt, no link remediation
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 1);
    assert_eq!(link.join_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn browser_init_failure_fails_before_any_login() {
    let probe = ScriptedProbe::new(&[false], &[true]);
    let link = Arc::new(CountingLink::default());
    let auth = CountingAuth::broken_browser();

    let mut manager = manager(probe, wired(), link, auth.clone());
    assert!(!manager.run().await);

    assert_eq!(auth.prepare_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn no_network_wired_path_skips_wireless_join() {
    // Classify: nothing reachable; after the wired settle the gateway
    // answers, and the post-auth probe confirms internet.
    let probe = ScriptedProbe::new(&[false, true], &[false, true]);
    let link = Arc::new(CountingLink::default());
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, wired(), link.clone(), auth.clone());
    assert!(manager.run().await);

    assert_eq!(link.wired_settles.load(Ordering::SeqCst), 1);
    assert_eq!(link.join_calls.load(Ordering::SeqCst), 0);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn no_network_wired_fallthrough_tries_wireless() {
    // Gateway never becomes reachable on the wired path; the join runs and
    // afterwards the gateway answers.
    let probe = ScriptedProbe::new(&[false, true], &[false, false, true]);
    let link = Arc::new(CountingLink {
        join_succeeds: true,
        ..CountingLink::default()
    });
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, wired(), link.clone(), auth.clone());
    assert!(manager.run().await);

    assert_eq!(link.wired_settles.load(Ordering::SeqCst), 1);
    assert_eq!(link.join_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn no_usable_link_fails_without_authentication() {
    let probe = ScriptedProbe::new(&[false], &[false]);
    let link = Arc::new(CountingLink::default()); // join fails
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, ActiveLink::unknown(), link.clone(), auth.clone());
    assert!(!manager.run().await);

    assert_eq!(link.join_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn join_succeeds_but_gateway_stays_unreachable_fails() {
    let probe = ScriptedProbe::new(&[false], &[false]);
    let link = Arc::new(CountingLink {
        join_succeeds: true,
        ..CountingLink::default()
    });
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, wireless(), link.clone(), auth.clone());
    assert!(!manager.run().await);

    assert_eq!(link.join_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_closes_the_authenticator() {
    let probe = ScriptedProbe::new(&[true], &[true]);
    let link = Arc::new(CountingLink::default());
    let auth = CountingAuth::succeeding();

    let mut manager = manager(probe, wireless(), link, auth.clone());
    assert!(manager.run().await);
    manager.shutdown().await;

    assert_eq!(auth.close_calls.load(Ordering::SeqCst), 1);
}
