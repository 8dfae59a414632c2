use super::*;

use std::time::Duration;

use serde_json::json;
use shared::domain::Session;

use crate::{
    navigation::Navigation,
    test_support::{harness, harness_for, unreachable_base_url, MockPortal, Reply},
};

fn redirect_to_login() -> Option<Navigation> {
    Some(Navigation {
        route: Route::Login,
        mode: NavigationMode::Replace,
    })
}

async fn sign_in(store: &dyn SessionStore, token: &str) {
    store
        .save_session(&Session {
            token: token.to_string(),
            name: "Alice".to_string(),
        })
        .await
        .expect("seed session");
}

#[tokio::test]
async fn missing_token_redirects_without_profile_request() {
    let h = harness().await;
    let mut controller = h.portal.dashboard();

    let state = controller.mount().await.clone();

    assert_eq!(state, DashboardState::Unauthorized);
    assert!(h.mock.me_authorizations().await.is_empty());
    assert_eq!(h.history.last_navigation(), redirect_to_login());
    assert_eq!(controller.view(), None);
}

#[tokio::test]
async fn empty_token_counts_as_missing() {
    let h = harness().await;
    h.store.set("token", "").await.expect("seed");
    let mut controller = h.portal.dashboard();

    controller.mount().await;

    assert_eq!(controller.state(), &DashboardState::Unauthorized);
    assert!(h.mock.me_authorizations().await.is_empty());
}

#[tokio::test]
async fn verified_profile_renders() {
    let h = harness().await;
    sign_in(h.store.as_ref(), "t1").await;
    h.mock
        .reply_me(Reply::json(200, json!({"name": "Alice", "email": "a@x.com"})))
        .await;
    let mut controller = h.portal.dashboard();

    let state = controller.mount().await.clone();

    assert_eq!(
        state,
        DashboardState::Authorized(Profile {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
        })
    );
    assert_eq!(
        h.mock.me_authorizations().await,
        vec![Some("Bearer t1".to_string())]
    );
    let view = controller.view().expect("authorized view");
    assert_eq!(view.greeting, "Welcome back, Alice");
    assert_eq!(view.email, "a@x.com");
    assert_eq!(view.account_name, "Alice");
    assert!(view.to_string().contains("Signed in"));
    assert_eq!(h.history.last_navigation(), None);
}

#[tokio::test]
async fn unnamed_profile_shows_placeholder_account_name() {
    let h = harness().await;
    sign_in(h.store.as_ref(), "t1").await;
    h.mock
        .reply_me(Reply::json(200, json!({"name": "", "email": "a@x.com"})))
        .await;
    let mut controller = h.portal.dashboard();

    controller.mount().await;

    assert_eq!(controller.view().expect("view").account_name, "User");
}

#[tokio::test]
async fn unauthorized_profile_redirects_and_keeps_store() {
    let h = harness().await;
    sign_in(h.store.as_ref(), "stale").await;
    h.mock.reply_me(Reply::raw(401, "unauthorized")).await;
    let mut controller = h.portal.dashboard();

    let state = controller.mount().await.clone();

    assert_eq!(state, DashboardState::Unauthorized);
    assert_eq!(controller.view(), None);
    assert_eq!(h.history.last_navigation(), redirect_to_login());
    assert_eq!(
        h.store.token().await.expect("token").as_deref(),
        Some("stale")
    );
}

#[tokio::test]
async fn malformed_profile_fails_closed() {
    let h = harness().await;
    sign_in(h.store.as_ref(), "t1").await;
    h.mock.reply_me(Reply::raw(200, "<html>oops</html>")).await;
    let mut controller = h.portal.dashboard();

    controller.mount().await;

    assert_eq!(controller.state(), &DashboardState::Unauthorized);
    assert_eq!(controller.view(), None);
    assert_eq!(h.history.last_navigation(), redirect_to_login());
}

#[tokio::test]
async fn unreachable_service_fails_closed() {
    let h = harness_for(MockPortal::new(), &unreachable_base_url().await);
    sign_in(h.store.as_ref(), "t1").await;
    let mut controller = h.portal.dashboard();

    controller.mount().await;

    assert_eq!(controller.state(), &DashboardState::Unauthorized);
    assert_eq!(h.history.last_navigation(), redirect_to_login());
}

#[tokio::test]
async fn cancelled_check_stays_checking_without_redirect() {
    let h = harness().await;
    sign_in(h.store.as_ref(), "t1").await;
    h.mock
        .reply_me(
            Reply::json(200, json!({"name": "Alice", "email": "a@x.com"}))
                .delayed(Duration::from_secs(5)),
        )
        .await;
    let mut controller = h.portal.dashboard();
    let handle = controller.lifetime();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    controller.mount().await;

    assert_eq!(controller.state(), &DashboardState::Checking);
    assert_eq!(controller.view(), None);
    assert_eq!(h.history.last_navigation(), None);
}

#[tokio::test]
async fn logout_clears_everything_and_is_idempotent() {
    let h = harness().await;
    sign_in(h.store.as_ref(), "t1").await;
    h.store.set("draft", "keep?").await.expect("seed");
    h.mock
        .reply_me(Reply::json(200, json!({"name": "Alice", "email": "a@x.com"})))
        .await;
    let mut controller = h.portal.dashboard();
    controller.mount().await;

    controller.logout().await.expect("logout");
    let after_first = h.store.entries().await.expect("entries");
    controller.logout().await.expect("second logout");

    assert!(after_first.is_empty());
    assert!(h.store.entries().await.expect("entries").is_empty());
    assert_eq!(controller.view(), None);
    assert_eq!(h.history.current(), Route::Landing);
    assert_eq!(
        h.history.last_navigation(),
        Some(Navigation {
            route: Route::Landing,
            mode: NavigationMode::Push,
        })
    );
}

#[tokio::test]
async fn back_to_home_keeps_session() {
    let h = harness().await;
    sign_in(h.store.as_ref(), "t1").await;
    let controller = h.portal.dashboard();

    controller.back_to_home();

    assert_eq!(h.history.current(), Route::Landing);
    assert!(h.store.token().await.expect("token").is_some());
}
