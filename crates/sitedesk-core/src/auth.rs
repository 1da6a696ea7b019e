// ── Auth state ──
//
// Tracks the signed-in user as a small state machine. `init` asks the
// gateway for the current session once, then a background listener
// follows the gateway's session-change channel until shutdown.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use sitedesk_api::{Gateway, Session, User};
use tokio::sync::{Mutex, OnceCell, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Upper bound on waiting for the listener to observe a fresh sign-in.
const SESSION_SETTLE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Uninitialized,
    Loading,
    Authenticated(User),
    Unauthenticated,
}

impl AuthPhase {
    fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self::Authenticated(session.user.clone()),
            None => Self::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Still waiting on the first session lookup.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Uninitialized | Self::Loading)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

pub struct AuthStore {
    gateway: Arc<dyn Gateway>,
    phase: Arc<watch::Sender<AuthPhase>>,
    init: OnceCell<()>,
    cancel: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (phase, _) = watch::channel(AuthPhase::Uninitialized);
        Self {
            gateway,
            phase: Arc::new(phase),
            init: OnceCell::new(),
            cancel: CancellationToken::new(),
            listener: Mutex::new(None),
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthPhase> {
        self.phase.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase.borrow().is_authenticated()
    }

    pub fn user_email(&self) -> Option<String> {
        self.phase.borrow().user().and_then(|u| u.email.clone())
    }

    /// Look up the current session and start following session changes.
    ///
    /// Runs once; concurrent and later callers wait for that run.
    pub async fn init(&self) {
        self.init.get_or_init(|| self.initialize()).await;
    }

    async fn initialize(&self) {
        self.phase.send_replace(AuthPhase::Loading);

        // Subscribe first so a change racing the lookup is still seen.
        let updates = self.gateway.subscribe_auth();
        let phase = match self.gateway.get_session().await {
            Ok(session) => AuthPhase::from_session(session.as_ref()),
            Err(e) => {
                warn!(error = %e, "session lookup failed, treating as signed out");
                AuthPhase::Unauthenticated
            }
        };
        info!(authenticated = phase.is_authenticated(), "auth initialized");
        self.phase.send_replace(phase);

        let handle = tokio::spawn(session_listener(
            updates,
            Arc::clone(&self.phase),
            self.cancel.child_token(),
        ));
        *self.listener.lock().await = Some(handle);
    }

    /// Sign in. The resulting state change arrives through the session
    /// listener; this waits briefly for it before returning.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        self.init().await;
        let mut phase = self.phase.subscribe();

        let session = self.gateway.sign_in_with_password(email, password).await?;

        let observed = tokio::time::timeout(SESSION_SETTLE, async {
            phase.wait_for(AuthPhase::is_authenticated).await.is_ok()
        })
        .await
        .unwrap_or(false);
        if !observed {
            warn!("sign-in succeeded but no session change was observed");
        }
        Ok(session.user)
    }

    /// Sign out. Local state is cleared whatever the gateway answers.
    pub async fn logout(&self) {
        if let Err(e) = self.gateway.sign_out().await {
            warn!(error = %e, "sign-out request failed");
        }
        self.phase.send_replace(AuthPhase::Unauthenticated);
    }

    /// Stop the session listener and wait for it to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.listener.lock().await.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AuthStore {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn session_listener(
    mut updates: watch::Receiver<Option<Session>>,
    phase: Arc<watch::Sender<AuthPhase>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    debug!("session channel closed");
                    break;
                }
                let next = AuthPhase::from_session(updates.borrow_and_update().as_ref());
                debug!(authenticated = next.is_authenticated(), "session changed");
                phase.send_replace(next);
            }
        }
    }
}
