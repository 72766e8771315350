//! Token refresh worker against a fake management API

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::{FakeApi, REFRESHED_TOKEN};
use harbor_console::authn::session::{MemoryTokenStorage, SessionStore, TokenStorage};
use harbor_console::http::api::ManagementApi;
use harbor_console::workers::token_refresh::{self, CheckOutcome, Options};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

fn jwt(expires_in_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = json!({
        "user_id": "operator-1",
        "exp": now + expires_in_secs,
        "iat": now,
        "iss": "harbor",
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
}

async fn session_with(api: Arc<FakeApi>, token: &str) -> (Arc<SessionStore>, Arc<MemoryTokenStorage>) {
    let storage = Arc::new(MemoryTokenStorage::with_token(token));
    let api: Arc<dyn ManagementApi> = api;
    let session = SessionStore::load(api, storage.clone() as Arc<dyn TokenStorage>).await;
    (Arc::new(session), storage)
}

#[tokio::test]
async fn test_check_once_refreshes_expiring_token() {
    let api = FakeApi::new();
    let (session, storage) = session_with(api.clone(), &jwt(600)).await;

    let outcome = token_refresh::check_once(&Options::default(), &session).await;
    assert_eq!(outcome, CheckOutcome::Refreshed);
    assert_eq!(session.token().as_deref(), Some(REFRESHED_TOKEN));
    assert_eq!(storage.load().await.unwrap().as_deref(), Some(REFRESHED_TOKEN));
    assert_eq!(api.calls(), vec!["refresh_token"]);
}

#[tokio::test]
async fn test_check_once_leaves_fresh_and_opaque_tokens() {
    let api = FakeApi::new();

    let (session, _) = session_with(api.clone(), &jwt(4 * 3600)).await;
    let outcome = token_refresh::check_once(&Options::default(), &session).await;
    assert_eq!(outcome, CheckOutcome::StillValid);

    let (session, _) = session_with(api.clone(), "opaque-token").await;
    let outcome = token_refresh::check_once(&Options::default(), &session).await;
    assert_eq!(outcome, CheckOutcome::NotJwt);

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_refresh_signs_out() {
    let api = FakeApi::new();
    api.reject_tokens();
    let (session, storage) = session_with(api.clone(), &jwt(60)).await;

    let outcome = token_refresh::check_once(&Options::default(), &session).await;
    assert_eq!(outcome, CheckOutcome::Failed);
    assert!(!session.is_authenticated());
    assert_eq!(storage.load().await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_worker_checks_on_interval_until_shutdown() {
    let api = FakeApi::new();
    let (session, _) = session_with(api.clone(), &jwt(600)).await;
    let options = Options {
        check_interval: Duration::from_secs(300),
        refresh_threshold: Duration::from_secs(3600),
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let worker_session = session.clone();
    let handle = tokio::spawn(async move {
        token_refresh::run(
            &options,
            &worker_session,
            |wait| tokio::time::sleep(wait),
            Box::pin(async move {
                let _ = shutdown_rx.await;
            }),
        )
        .await;
    });

    // Nothing happens before the first interval elapses
    tokio::time::sleep(Duration::from_secs(299)).await;
    assert!(api.calls().is_empty());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(api.calls(), vec!["refresh_token"]);
    assert_eq!(session.token().as_deref(), Some(REFRESHED_TOKEN));

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();
}
