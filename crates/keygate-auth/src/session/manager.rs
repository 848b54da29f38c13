//! Sign-up, login, logout, and refresh flows.
//!
//! Each flow is a short pipeline that stops at the first failed check.
//! Repository and cache calls are each bounded by the configured deadline;
//! nothing is retried here.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use keygate_core::config::{AppConfig, AuthConfig};
use keygate_core::error::AppError;
use keygate_core::events::{DomainEvent, UserEvent};
use keygate_core::models::User;
use keygate_core::result::AppResult;
use keygate_core::traits::{CacheProvider, EventPublisher, UserRepository};

use super::bearer::extract_bearer_token;
use super::store::SessionStore;
use super::types::{LoginRequest, Principal, RefreshRequest, SignUpOutcome, SignUpRequest};
use crate::deadline::with_deadline;
use crate::jwt::{TokenPair, TokenService};
use crate::mfa::MfaService;
use crate::password::PasswordHasher;

/// Composes token, MFA, session, and user services into the auth use cases.
#[derive(Clone)]
pub struct AuthManager {
    tokens: TokenService,
    mfa: MfaService,
    sessions: SessionStore,
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    /// Optional; sign-up works without it.
    publisher: Option<Arc<dyn EventPublisher>>,
    auth_config: AuthConfig,
    mfa_enabled: bool,
    timeout: Duration,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("auth_config", &self.auth_config)
            .field("mfa_enabled", &self.mfa_enabled)
            .field("publisher", &self.publisher.is_some())
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Creates a manager from validated configuration and its collaborators.
    pub fn new(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheProvider>,
        publisher: Option<Arc<dyn EventPublisher>>,
    ) -> AppResult<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.auth.call_timeout_ms);
        Ok(Self {
            tokens: TokenService::new(&config.auth),
            mfa: MfaService::new(&config.mfa),
            sessions: SessionStore::new(cache, timeout),
            users,
            hasher: PasswordHasher::from_config(&config.auth)?,
            publisher,
            auth_config: config.auth.clone(),
            mfa_enabled: config.mfa.enabled,
            timeout,
        })
    }

    /// The token service used by this manager.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// The session store used by this manager.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Registers a new user.
    ///
    /// When MFA is globally enabled the user is enrolled on the spot and the
    /// provisioning image is returned once. A failed event publish is
    /// reported in the outcome and never undoes the stored user.
    pub async fn sign_up(&self, request: &SignUpRequest) -> AppResult<SignUpOutcome> {
        self.validate_sign_up(request)?;

        if self.find_user(&request.email).await?.is_some() {
            warn!(email = %request.email, "Sign-up for registered email rejected");
            return Err(AppError::bad_request("email already registered").with_field("email"));
        }

        let password_hash = self.hasher.hash_password(&request.password)?;
        let mut user = User::new(request.name.trim(), request.email.as_str(), password_hash);

        let qr_image = if self.mfa_enabled {
            let enrollment = self.mfa.generate_secret(&user.email)?;
            user.mfa_secret = Some(enrollment.secret.clone());
            Some(enrollment.qr_base64())
        } else {
            None
        };

        with_deadline(self.timeout, "user insert", self.users.insert_user(&user)).await?;

        let notification_published = self
            .publish(UserEvent::SignedUp {
                user_id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                qr_image: qr_image.clone(),
            })
            .await;

        info!(
            user_id = %user.id,
            email = %user.email,
            mfa = user.has_mfa(),
            "User signed up"
        );

        Ok(SignUpOutcome {
            user,
            qr_image,
            notification_published,
        })
    }

    /// Authenticates a user and issues a fresh token pair.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<TokenPair> {
        let user = self.find_user(&request.email).await?.ok_or_else(|| {
            AppError::not_found(format!("user with email {} not found", request.email))
                .with_field("email")
        })?;

        if self.mfa_enabled {
            self.verify_mfa(&user, request.mfa_code.as_deref())?;
        }

        if !self
            .hasher
            .verify_password(&request.password, &user.password_hash)?
        {
            warn!(email = %user.email, "Login rejected: wrong password");
            return Err(AppError::unauthorized("invalid credentials").with_field("password"));
        }

        let pair = self.issue_for(&user).await?;
        info!(user_id = %user.id, access_uuid = %pair.access_uuid, "Login successful");
        Ok(pair)
    }

    /// Revokes the session of the presented access token.
    ///
    /// A token whose session is already gone yields `AlreadyReported`.
    pub async fn logout(&self, authorization: Option<&str>) -> AppResult<()> {
        let token = extract_bearer_token(authorization)?;
        let claims = self.tokens.validate_access_token(token)?;

        let revoked = self.sessions.access_owner(claims.access_uuid).await?.is_some()
            && self.sessions.revoke_access(claims.access_uuid).await?;

        if !revoked {
            info!(email = %claims.email, access_uuid = %claims.access_uuid, "Already logged out");
            return Err(AppError::already_reported("already logged out"));
        }

        info!(email = %claims.email, access_uuid = %claims.access_uuid, "Logout completed");
        Ok(())
    }

    /// Exchanges a refresh token for a new pair. Each refresh token works once.
    ///
    /// The old refresh session is consumed before anything else; if a later
    /// step fails the old token stays unusable.
    pub async fn refresh(&self, request: &RefreshRequest) -> AppResult<TokenPair> {
        let claims = self
            .tokens
            .validate_refresh_token(&request.refresh_token)
            .map_err(|e| AppError::from(e).with_field("refresh_token"))?;

        if !self.sessions.consume_refresh(claims.refresh_uuid).await? {
            warn!(
                email = %claims.email,
                refresh_uuid = %claims.refresh_uuid,
                "Refresh token replayed or revoked"
            );
            return Err(AppError::unauthorized("refresh token already used or revoked")
                .with_field("refresh_token"));
        }

        let user = self.find_user(&claims.email).await?.ok_or_else(|| {
            AppError::not_found(format!("user with email {} not found", claims.email))
        })?;

        let pair = self.issue_for(&user).await?;
        info!(
            user_id = %user.id,
            old_refresh_uuid = %claims.refresh_uuid,
            access_uuid = %pair.access_uuid,
            "Token pair rotated"
        );
        Ok(pair)
    }

    /// Checks that a request carries a valid access token with a live session.
    pub async fn authorize(&self, authorization: Option<&str>) -> AppResult<Principal> {
        let token = extract_bearer_token(authorization)?;
        let claims = self.tokens.validate_access_token(token)?;

        let user_id = self
            .sessions
            .access_owner(claims.access_uuid)
            .await?
            .ok_or_else(|| AppError::unauthorized("authorization token expired"))?;

        Ok(Principal {
            user_id,
            email: claims.email,
            access_uuid: claims.access_uuid,
        })
    }

    /// Enrolls MFA for a user that has no secret yet.
    ///
    /// Returns the base64 PNG provisioning image; it is never shown again.
    pub async fn enroll_mfa(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self.find_user(email).await?.ok_or_else(|| {
            AppError::not_found(format!("user with email {email} not found")).with_field("email")
        })?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(email, "MFA enrollment rejected: wrong password");
            return Err(AppError::unauthorized("invalid credentials").with_field("password"));
        }
        if user.has_mfa() {
            return Err(AppError::bad_request("MFA already enrolled").with_field("mfa_code"));
        }

        let enrollment = self.mfa.generate_secret(&user.email)?;
        with_deadline(
            self.timeout,
            "user mfa update",
            self.users.update_mfa_secret(&user.email, &enrollment.secret),
        )
        .await?;

        let qr_image = enrollment.qr_base64();
        self.publish(UserEvent::MfaEnrolled {
            user_id: user.id,
            email: user.email.clone(),
            qr_image: qr_image.clone(),
        })
        .await;

        info!(user_id = %user.id, email = %user.email, "MFA enrolled");
        Ok(qr_image)
    }

    async fn find_user(&self, email: &str) -> AppResult<Option<User>> {
        with_deadline(self.timeout, "user lookup", self.users.get_user_by_email(email)).await
    }

    fn verify_mfa(&self, user: &User, code: Option<&str>) -> AppResult<()> {
        let secret = user.mfa_secret.as_deref().ok_or_else(|| {
            warn!(email = %user.email, "Login rejected: MFA required but not enrolled");
            AppError::unprocessable("MFA is required but not set up for this user")
        })?;

        let code = code.map(str::trim).filter(|c| !c.is_empty()).ok_or_else(|| {
            AppError::bad_request("MFA code is required").with_field("mfa_code")
        })?;

        if !self.mfa.validate_code(code, secret)? {
            warn!(email = %user.email, "Login rejected: wrong MFA code");
            return Err(AppError::unauthorized("invalid MFA code").with_field("mfa_code"));
        }
        Ok(())
    }

    async fn issue_for(&self, user: &User) -> AppResult<TokenPair> {
        let now = Utc::now();
        let pair = self.tokens.issue_at(&user.email, now)?;
        self.sessions.register(&pair, user.id, now).await?;
        Ok(pair)
    }

    /// Returns whether the event reached the publisher.
    async fn publish(&self, event: UserEvent) -> bool {
        let Some(publisher) = &self.publisher else {
            return false;
        };

        let event = DomainEvent::user(event);
        let topic = self.auth_config.user_events_topic.as_str();
        match with_deadline(self.timeout, "event publish", publisher.publish(topic, &event)).await
        {
            Ok(()) => true,
            Err(e) => {
                error!(topic, event_id = %event.id, error = %e, "Failed to publish user event");
                false
            }
        }
    }

    fn validate_sign_up(&self, request: &SignUpRequest) -> AppResult<()> {
        if request.name.trim().is_empty() {
            return Err(AppError::bad_request("name is required").with_field("name"));
        }
        if !is_plausible_email(&request.email) {
            return Err(AppError::bad_request("invalid email address").with_field("email"));
        }
        if request.password.chars().count() < self.auth_config.password_min_length {
            return Err(AppError::bad_request(format!(
                "password must be at least {} characters",
                self.auth_config.password_min_length
            ))
            .with_field("password"));
        }
        Ok(())
    }
}

/// The address doubles as the TOTP account name, which may not contain `:`.
fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && !email.chars().any(|c| c.is_whitespace() || c == ':')
        }
        _ => false,
    }
}
