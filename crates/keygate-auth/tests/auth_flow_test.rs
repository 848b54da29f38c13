//! End-to-end flows over the in-memory repository and cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use keygate_auth::session::{LoginRequest, RefreshRequest, SignUpRequest, TokenResponse};
use keygate_auth::{AuthManager, ChannelPublisher, MemoryUserRepository, MfaService};
use keygate_cache::keys;
use keygate_cache::memory::MemoryCacheProvider;
use keygate_core::config::AppConfig;
use keygate_core::config::cache::MemoryCacheConfig;
use keygate_core::error::{AppError, ErrorKind};
use keygate_core::events::{DomainEvent, EventPayload, UserEvent};
use keygate_core::models::User;
use keygate_core::result::AppResult;
use keygate_core::traits::{CacheProvider, EventPublisher, UserRepository};

struct Harness {
    manager: AuthManager,
    users: Arc<MemoryUserRepository>,
    cache: Arc<MemoryCacheProvider>,
    config: AppConfig,
}

fn test_config(mfa_enabled: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.access_secret = "integration-access-secret".to_string();
    config.auth.refresh_secret = "integration-refresh-secret".to_string();
    config.auth.password_memory_kib = 1024;
    config.auth.password_iterations = 1;
    config.mfa.enabled = mfa_enabled;
    config
}

fn harness_with(config: AppConfig, publisher: Option<Arc<dyn EventPublisher>>) -> Harness {
    let users = Arc::new(MemoryUserRepository::new());
    let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default()));
    let manager = AuthManager::new(&config, users.clone(), cache.clone(), publisher).unwrap();
    Harness {
        manager,
        users,
        cache,
        config,
    }
}

fn harness(mfa_enabled: bool) -> Harness {
    harness_with(test_config(mfa_enabled), None)
}

fn alice() -> SignUpRequest {
    SignUpRequest {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "wonderland".to_string(),
    }
}

fn login_request(code: Option<String>) -> LoginRequest {
    LoginRequest {
        email: "alice@example.com".to_string(),
        password: "wonderland".to_string(),
        mfa_code: code,
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[tokio::test]
async fn test_alice_signup_login_logout_twice() {
    let h = harness(false);

    let outcome = h.manager.sign_up(&alice()).await.unwrap();
    assert_eq!(outcome.user.email, "alice@example.com");
    assert!(outcome.qr_image.is_none());
    assert!(!outcome.notification_published);

    let pair = h.manager.login(&login_request(None)).await.unwrap();
    let wire = serde_json::to_value(TokenResponse::from(&pair)).unwrap();
    assert_eq!(wire["access_token"], pair.access_token.as_str());
    assert_eq!(wire["refresh_token"], pair.refresh_token.as_str());

    let stored = h
        .cache
        .get(&keys::access_session(pair.access_uuid))
        .await
        .unwrap();
    assert_eq!(stored, Some(outcome.user.id.to_string()));

    let header = bearer(&pair.access_token);
    h.manager.logout(Some(&header)).await.unwrap();

    let err = h.manager.logout(Some(&header)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyReported);
    assert_eq!(err.status_code().as_u16(), 208);
}

#[tokio::test]
async fn test_revoked_session_fails_authorization() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();
    let pair = h.manager.login(&login_request(None)).await.unwrap();
    let header = bearer(&pair.access_token);

    let principal = h.manager.authorize(Some(&header)).await.unwrap();
    assert_eq!(principal.email, "alice@example.com");
    assert_eq!(principal.access_uuid, pair.access_uuid);

    h.manager.logout(Some(&header)).await.unwrap();

    // the JWT itself is still valid; only the session is gone
    assert!(h.manager.tokens().validate_access_token(&pair.access_token).is_ok());
    let err = h.manager.authorize(Some(&header)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(err.message, "authorization token expired");
}

#[tokio::test]
async fn test_logout_header_errors() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();
    let pair = h.manager.login(&login_request(None)).await.unwrap();

    let err = h.manager.logout(None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let err = h.manager.logout(Some(&pair.access_token)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    // a refresh token is signed with the other secret
    let err = h
        .manager
        .logout(Some(&bearer(&pair.refresh_token)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_sign_up_rejections() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();

    let err = h.manager.sign_up(&alice()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
    assert_eq!(err.field.as_deref(), Some("email"));

    let mut short = alice();
    short.email = "bob@example.com".to_string();
    short.password = "short".to_string();
    let err = h.manager.sign_up(&short).await.unwrap_err();
    assert_eq!(err.field.as_deref(), Some("password"));

    let mut nameless = alice();
    nameless.email = "carol@example.com".to_string();
    nameless.name = "  ".to_string();
    let err = h.manager.sign_up(&nameless).await.unwrap_err();
    assert_eq!(err.field.as_deref(), Some("name"));

    let mut bad_email = alice();
    bad_email.email = "carol.example.com".to_string();
    let err = h.manager.sign_up(&bad_email).await.unwrap_err();
    assert_eq!(err.field.as_deref(), Some("email"));

    assert_eq!(h.users.len().await, 1);
}

#[tokio::test]
async fn test_login_rejections() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();

    let mut wrong = login_request(None);
    wrong.password = "looking-glass".to_string();
    let err = h.manager.login(&wrong).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let mut unknown = login_request(None);
    unknown.email = "Alice@example.com".to_string();
    let err = h.manager.login(&unknown).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_devices_hold_independent_sessions() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();

    let laptop = h.manager.login(&login_request(None)).await.unwrap();
    let phone = h.manager.login(&login_request(None)).await.unwrap();
    assert_ne!(laptop.access_uuid, phone.access_uuid);

    h.manager
        .logout(Some(&bearer(&laptop.access_token)))
        .await
        .unwrap();
    assert!(h
        .manager
        .authorize(Some(&bearer(&phone.access_token)))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_refresh_rotation_is_single_use() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();
    let original = h.manager.login(&login_request(None)).await.unwrap();

    let request = RefreshRequest::from_json(&format!(
        r#"{{"refresh_token":"{}"}}"#,
        original.refresh_token
    ))
    .unwrap();

    let rotated = h.manager.refresh(&request).await.unwrap();
    assert_ne!(rotated.refresh_uuid, original.refresh_uuid);
    assert!(h
        .manager
        .authorize(Some(&bearer(&rotated.access_token)))
        .await
        .is_ok());

    let err = h.manager.refresh(&request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let next = RefreshRequest {
        refresh_token: rotated.refresh_token.clone(),
    };
    assert!(h.manager.refresh(&next).await.is_ok());
}

#[tokio::test]
async fn test_concurrent_refresh_issues_one_pair() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();
    let original = h.manager.login(&login_request(None)).await.unwrap();
    let request = RefreshRequest {
        refresh_token: original.refresh_token.clone(),
    };

    let (a, b) = tokio::join!(h.manager.refresh(&request), h.manager.refresh(&request));

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = a.err().or(b.err()).unwrap();
    assert_eq!(loser.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_refresh_rejects_access_token_and_garbage() {
    let h = harness(false);
    h.manager.sign_up(&alice()).await.unwrap();
    let pair = h.manager.login(&login_request(None)).await.unwrap();

    let err = h
        .manager
        .refresh(&RefreshRequest {
            refresh_token: pair.access_token.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let err = RefreshRequest::from_json("{not json").unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_mfa_enabled_without_secret_is_unprocessable() {
    let h = harness(true);
    let hash = keygate_auth::PasswordHasher::from_config(&h.config.auth)
        .unwrap()
        .hash_password("wonderland")
        .unwrap();
    h.users
        .insert_user(&User::new("Alice", "alice@example.com", hash))
        .await
        .unwrap();

    let err = h
        .manager
        .login(&login_request(Some("123456".to_string())))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnprocessableEntity);
    assert_eq!(err.status_code().as_u16(), 422);

    let qr_image = h
        .manager
        .enroll_mfa("alice@example.com", "wonderland")
        .await
        .unwrap();
    assert!(!qr_image.is_empty());

    let err = h
        .manager
        .enroll_mfa("alice@example.com", "wonderland")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    let secret = h
        .users
        .get_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap()
        .mfa_secret
        .unwrap();
    let code = MfaService::new(&h.config.mfa).current_code(&secret).unwrap();
    assert!(h.manager.login(&login_request(Some(code))).await.is_ok());
}

#[tokio::test]
async fn test_mfa_sign_up_and_login() {
    let h = harness(true);
    let outcome = h.manager.sign_up(&alice()).await.unwrap();
    assert!(outcome.qr_image.is_some());
    assert!(outcome.user.has_mfa());

    let err = h.manager.login(&login_request(None)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
    assert_eq!(err.field.as_deref(), Some("mfa_code"));

    let err = h
        .manager
        .login(&login_request(Some("12ab56".to_string())))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    let mfa = MfaService::new(&h.config.mfa);
    let secret = outcome.user.mfa_secret.clone().unwrap();
    let code = mfa.current_code(&secret).unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let err = h
        .manager
        .login(&login_request(Some(wrong.to_string())))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    assert!(h.manager.login(&login_request(Some(code))).await.is_ok());
}

#[tokio::test]
async fn test_sign_up_event_reaches_subscriber() {
    let publisher = Arc::new(ChannelPublisher::new(8));
    let mut rx = publisher.subscribe("user.events").await;
    let h = harness_with(test_config(true), Some(publisher.clone()));

    let outcome = h.manager.sign_up(&alice()).await.unwrap();
    assert!(outcome.notification_published);

    let message = rx.recv().await.unwrap();
    match message.event.payload {
        EventPayload::User(UserEvent::SignedUp {
            user_id, qr_image, ..
        }) => {
            assert_eq!(user_id, outcome.user.id);
            assert_eq!(qr_image, outcome.qr_image);
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[derive(Debug)]
struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _topic: &str, _event: &DomainEvent) -> AppResult<()> {
        Err(AppError::internal("broker unavailable"))
    }
}

#[tokio::test]
async fn test_publish_failure_keeps_user() {
    let h = harness_with(test_config(false), Some(Arc::new(FailingPublisher)));

    let outcome = h.manager.sign_up(&alice()).await.unwrap();
    assert!(!outcome.notification_published);
    assert!(h
        .users
        .get_user_by_email("alice@example.com")
        .await
        .unwrap()
        .is_some());
}

struct SlowRepository;

#[async_trait]
impl UserRepository for SlowRepository {
    async fn get_user_by_email(&self, _email: &str) -> AppResult<Option<User>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn insert_user(&self, _user: &User) -> AppResult<()> {
        Ok(())
    }

    async fn update_mfa_secret(&self, _email: &str, _secret: &str) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_repository_times_out() {
    let config = test_config(false);
    let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default()));
    let manager = AuthManager::new(&config, Arc::new(SlowRepository), cache, None).unwrap();

    let err = manager.login(&login_request(None)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert!(err.message.contains("timed out"));
}

#[test]
fn test_manager_rejects_unbounded_ttl_config() {
    let mut config = test_config(false);
    config.auth.refresh_ttl_minutes = u64::MAX;
    config.auth.access_ttl_minutes = u64::MAX;

    let users = Arc::new(MemoryUserRepository::new());
    let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default()));
    let err = AuthManager::new(&config, users, cache, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[tokio::test]
async fn test_colon_in_email_is_a_field_error_with_mfa() {
    let h = harness(true);

    let mut colon = alice();
    colon.email = "alice:ops@example.com".to_string();
    let err = h.manager.sign_up(&colon).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
    assert_eq!(err.field.as_deref(), Some("email"));
    assert_eq!(h.users.len().await, 0);

    let outcome = h.manager.sign_up(&alice()).await.unwrap();
    assert!(outcome.qr_image.is_some());
}
