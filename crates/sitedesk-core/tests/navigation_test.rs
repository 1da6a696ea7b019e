// Route guard decisions and auth initialization.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use sitedesk_api::memory::Operation;
use sitedesk_api::{MemoryGateway, Session, User};
use sitedesk_core::{AuthPhase, AuthStore, Navigation, RouteGuard};

fn signed_in_gateway() -> Arc<MemoryGateway> {
    let gw = Arc::new(MemoryGateway::new().with_user("admin@example.com", "pw"));
    gw.set_session(Some(Session::new(
        "token",
        User {
            id: "u1".into(),
            email: Some("admin@example.com".into()),
        },
    )));
    gw
}

fn guard(gw: &Arc<MemoryGateway>) -> (Arc<AuthStore>, RouteGuard) {
    let auth = Arc::new(AuthStore::new(gw.clone()));
    let guard = RouteGuard::new(Arc::clone(&auth));
    (auth, guard)
}

#[tokio::test]
async fn test_signed_out_navigation_redirects_to_login() {
    let gw = Arc::new(MemoryGateway::new());
    let (_auth, guard) = guard(&gw);

    assert_eq!(guard.before_each("/projects").await, Navigation::Redirect("/login"));
    assert_eq!(guard.before_each("/nowhere").await, Navigation::Redirect("/login"));
    assert_eq!(guard.before_each("/login").await, Navigation::Proceed);
}

#[tokio::test]
async fn test_signed_in_login_page_redirects_home() {
    let gw = signed_in_gateway();
    let (_auth, guard) = guard(&gw);

    assert_eq!(guard.before_each("/login").await, Navigation::Redirect("/"));
    assert_eq!(guard.before_each("/timeline").await, Navigation::Proceed);
}

#[tokio::test]
async fn test_concurrent_guards_share_one_session_lookup() {
    let gw = signed_in_gateway();
    let (auth, guard) = guard(&gw);

    let (a, b, c) = tokio::join!(
        guard.before_each("/"),
        guard.before_each("/about"),
        guard.before_each("/projects"),
    );

    assert_eq!((a, b, c), (Navigation::Proceed, Navigation::Proceed, Navigation::Proceed));
    assert_eq!(gw.call_count(Operation::GetSession, "auth"), 1);

    auth.init().await;
    assert_eq!(gw.call_count(Operation::GetSession, "auth"), 1);
}

#[tokio::test]
async fn test_login_after_redirect_unlocks_navigation() {
    let gw = Arc::new(MemoryGateway::new().with_user("admin@example.com", "pw"));
    let (auth, guard) = guard(&gw);
    assert_eq!(guard.before_each("/projects").await, Navigation::Redirect("/login"));

    auth.login("admin@example.com", &SecretString::from("pw"))
        .await
        .unwrap();

    assert_eq!(guard.before_each("/projects").await, Navigation::Proceed);
    assert_eq!(auth.user_email().as_deref(), Some("admin@example.com"));
    auth.shutdown().await;
}

#[tokio::test]
async fn test_session_expiry_is_followed() {
    let gw = signed_in_gateway();
    let (auth, _guard) = guard(&gw);
    auth.init().await;
    let mut phases = auth.subscribe();

    gw.set_session(None);
    phases
        .wait_for(|p| *p == AuthPhase::Unauthenticated)
        .await
        .unwrap();

    assert!(!auth.is_authenticated());
    auth.shutdown().await;
}
