use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::auth::gate::{AdminPrincipal, SessionStatus};
use crate::application::auth::rate_limit::LoginRateLimiter;
use crate::application::repos::{
    AdminUsersRepo, CreateAdminParams, CreateSessionParams, RepoError, SessionsRepo,
};
use crate::domain::entities::AdminUserRecord;
use crate::domain::types::AdminRole;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AdminAuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("too many login attempts; retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("an admin with this email already exists")]
    DuplicateEmail,
    #[error("only a super admin may manage sub-admins")]
    Forbidden,
    #[error("admin not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateAdminCommand {
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub password: String,
}

/// Console form for a new sub-admin; the role is fixed.
#[derive(Debug, Clone, Default)]
pub struct NewSubAdmin {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub principal: AdminPrincipal,
    pub expires_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct AdminAuthService {
    admins: Arc<dyn AdminUsersRepo>,
    sessions: Arc<dyn SessionsRepo>,
    limiter: LoginRateLimiter,
    session_ttl: Duration,
}

impl AdminAuthService {
    pub fn new(
        admins: Arc<dyn AdminUsersRepo>,
        sessions: Arc<dyn SessionsRepo>,
        limiter: LoginRateLimiter,
        session_ttl: std::time::Duration,
    ) -> Self {
        let seconds = i64::try_from(session_ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            admins,
            sessions,
            limiter,
            session_ttl: Duration::seconds(seconds),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AdminAuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(self.reject(&email));
        }

        if !self.limiter.allow(&email) {
            metrics::counter!("pressroom_admin_login_failed_total").increment(1);
            warn!(
                target = "pressroom::application::auth",
                email = %email,
                "login rate limited"
            );
            return Err(AdminAuthError::RateLimited {
                retry_after_secs: self.limiter.retry_after_secs(),
            });
        }

        let Some(admin) = self.admins.find_by_email(&email).await? else {
            return Err(self.reject(&email));
        };

        if !verify_password(&admin.password_salt, password, &admin.password_hash) {
            return Err(self.reject(&email));
        }

        self.sessions.delete_sessions_for(admin.id).await?;

        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + self.session_ttl;
        self.sessions
            .create_session(CreateSessionParams {
                admin_id: admin.id,
                token_hash: hash_token(&token),
                expires_at,
            })
            .await?;

        self.limiter.reset(&email);
        info!(
            target = "pressroom::application::auth",
            admin_id = %admin.id,
            "admin signed in"
        );

        Ok(IssuedSession {
            token,
            principal: AdminPrincipal::from(admin),
            expires_at,
        })
    }

    pub async fn logout(&self, token: &str) -> Result<(), AdminAuthError> {
        if token.is_empty() {
            return Ok(());
        }
        self.sessions.delete_session(&hash_token(token)).await?;
        Ok(())
    }

    /// Resolve a session cookie into the three-state gate status.
    pub async fn resolve(&self, token: Option<&str>) -> SessionStatus {
        let Some(token) = token.map(str::trim).filter(|value| !value.is_empty()) else {
            return SessionStatus::Unauthenticated;
        };

        let token_hash = hash_token(token);
        let session = match self.sessions.find_session(&token_hash).await {
            Ok(Some(session)) => session,
            Ok(None) => return SessionStatus::Unauthenticated,
            Err(err) => {
                warn!(
                    target = "pressroom::application::auth",
                    error = %err,
                    "session lookup failed"
                );
                return SessionStatus::Pending;
            }
        };

        let now = OffsetDateTime::now_utc();
        if session.expires_at <= now {
            self.purge_expired(now);
            return SessionStatus::Unauthenticated;
        }

        match self.admins.find_admin(session.admin_id).await {
            Ok(Some(admin)) => SessionStatus::Authenticated(AdminPrincipal::from(admin)),
            Ok(None) => SessionStatus::Unauthenticated,
            Err(err) => {
                warn!(
                    target = "pressroom::application::auth",
                    error = %err,
                    "admin lookup failed while resolving session"
                );
                SessionStatus::Pending
            }
        }
    }

    pub async fn create_admin(
        &self,
        command: CreateAdminCommand,
    ) -> Result<AdminUserRecord, AdminAuthError> {
        let email = normalize_email(&command.email);
        if !email.contains('@') {
            return Err(AdminAuthError::InvalidInput("email must be a valid address"));
        }
        let name = command.name.trim();
        if name.is_empty() {
            return Err(AdminAuthError::InvalidInput("name must not be empty"));
        }
        if command.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AdminAuthError::InvalidInput(
                "password must be at least 8 characters",
            ));
        }

        let password_salt = Uuid::new_v4().simple().to_string();
        let password_hash = hash_password(&password_salt, &command.password);

        self.admins
            .create_admin(CreateAdminParams {
                email,
                name: name.to_string(),
                role: command.role,
                password_salt,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => AdminAuthError::DuplicateEmail,
                other => AdminAuthError::Repo(other),
            })
    }

    /// Sub-admin accounts, newest first. Super admins only.
    pub async fn list_sub_admins(
        &self,
        actor: &AdminPrincipal,
    ) -> Result<Vec<AdminUserRecord>, AdminAuthError> {
        ensure_super_admin(actor)?;
        Ok(self.admins.list_admins(AdminRole::SubAdmin).await?)
    }

    pub async fn create_sub_admin(
        &self,
        actor: &AdminPrincipal,
        input: NewSubAdmin,
    ) -> Result<AdminUserRecord, AdminAuthError> {
        ensure_super_admin(actor)?;
        let admin = self
            .create_admin(CreateAdminCommand {
                email: input.email,
                name: input.name,
                role: AdminRole::SubAdmin,
                password: input.password,
            })
            .await?;
        info!(
            target = "pressroom::application::auth",
            action = "sub_admin.create",
            actor = %actor.email,
            admin_id = %admin.id,
            "sub-admin created"
        );
        Ok(admin)
    }

    /// Removes a sub-admin and, with it, every session it holds.
    pub async fn delete_sub_admin(
        &self,
        actor: &AdminPrincipal,
        id: Uuid,
    ) -> Result<(), AdminAuthError> {
        ensure_super_admin(actor)?;
        match self.admins.find_admin(id).await? {
            Some(target) if target.role == AdminRole::SubAdmin => {}
            _ => return Err(AdminAuthError::NotFound),
        }

        self.sessions.delete_sessions_for(id).await?;
        self.admins.delete_admin(id).await.map_err(|err| match err {
            RepoError::NotFound => AdminAuthError::NotFound,
            other => AdminAuthError::Repo(other),
        })?;
        info!(
            target = "pressroom::application::auth",
            action = "sub_admin.delete",
            actor = %actor.email,
            admin_id = %id,
            "sub-admin deleted"
        );
        Ok(())
    }

    fn reject(&self, email: &str) -> AdminAuthError {
        metrics::counter!("pressroom_admin_login_failed_total").increment(1);
        warn!(
            target = "pressroom::application::auth",
            email = %email,
            "login rejected"
        );
        AdminAuthError::InvalidCredentials
    }

    fn purge_expired(&self, now: OffsetDateTime) {
        // best-effort cleanup; never blocks the request
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            if let Err(err) = sessions.purge_expired(now).await {
                warn!(
                    target = "pressroom::application::auth",
                    error = %err,
                    "failed to purge expired sessions"
                );
            }
        });
    }
}

fn ensure_super_admin(actor: &AdminPrincipal) -> Result<(), AdminAuthError> {
    if actor.is_super_admin() {
        Ok(())
    } else {
        warn!(
            target = "pressroom::application::auth",
            actor = %actor.email,
            "sub-admin management refused"
        );
        Err(AdminAuthError::Forbidden)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hex SHA-256 of `salt || password`.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(salt: &str, password: &str, expected_hash: &str) -> bool {
    let computed = hash_password(salt, password);
    computed.as_bytes().ct_eq(expected_hash.as_bytes()).unwrap_u8() == 1
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
