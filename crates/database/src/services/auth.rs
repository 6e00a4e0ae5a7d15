//! Accounts, email confirmation and server-side sessions.

use crate::{
    entities::{email_confirmations, profiles, sessions, users},
    error::ServiceError,
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{
        SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use chrono::{Duration, NaiveDateTime, Utc};
use log::{debug, info};
use models::{
    role::Role,
    validation::{normalize_email, require, validate_password},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, ModelTrait, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Who is behind a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// How long sessions live and how often their expiry is pushed forward
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    pub ttl: Duration,
    pub refresh_after: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(168),
            refresh_after: Duration::minutes(60),
        }
    }
}

/// A live session and the identity it belongs to
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session: sessions::Model,
    pub identity: Identity,
    /// `true` when this lookup extended the session
    pub refreshed: bool,
}

#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// A freshly registered account and the raw confirmation token to mail out
#[derive(Debug, Clone)]
pub struct PendingConfirmation {
    pub user: users::Model,
    pub token: String,
}

pub struct AuthService;

impl AuthService {
    pub async fn sign_up(
        db: &DatabaseConnection,
        input: SignUpInput,
        otp_ttl: Duration,
    ) -> Result<PendingConfirmation, ServiceError> {
        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;
        let display_name = require("display_name", &input.display_name)?;
        let password_hash = hash_password(&input.password)?;

        let txn = db.begin().await?;
        if find_user_by_email(&txn, &email).await?.is_some() {
            return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now().naive_utc();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(Some(password_hash)),
            email_confirmed_at: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, EMAIL_TAKEN))?;

        insert_profile(&txn, user.id, display_name, now).await?;

        let token = generate_token();
        email_confirmations::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            token_hash: Set(hash_token(&token)),
            expires_at: Set(now + otp_ttl),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!("Registered user {}", user.id);

        Ok(PendingConfirmation { user, token })
    }

    /// Consumes a confirmation token and marks the email as confirmed
    pub async fn confirm_email(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<users::Model, ServiceError> {
        let invalid = || ServiceError::Unauthorized("Invalid or expired confirmation link".into());
        let now = Utc::now().naive_utc();

        let txn = db.begin().await?;
        let confirmation = email_confirmations::Entity::find()
            .filter(email_confirmations::Column::TokenHash.eq(hash_token(token)))
            .one(&txn)
            .await?
            .ok_or_else(invalid)?;

        // Tokens are single use, expired or not
        let expired = confirmation.expires_at <= now;
        let user_id = confirmation.user_id;
        confirmation.delete(&txn).await?;
        if expired {
            txn.commit().await?;
            return Err(invalid());
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        let user = if user.is_confirmed() {
            user
        } else {
            let mut active: users::ActiveModel = user.into();
            active.email_confirmed_at = Set(Some(now));
            active.update(&txn).await?
        };

        txn.commit().await?;
        info!("Confirmed email of user {}", user.id);
        Ok(user)
    }

    /// Password sign-in; unconfirmed accounts are refused
    pub async fn sign_in(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<users::Model, ServiceError> {
        let bad_credentials = || ServiceError::Unauthorized("Invalid email or password".into());

        let email = normalize_email(email).map_err(|_| bad_credentials())?;
        let user = find_user_by_email(db, &email)
            .await?
            .ok_or_else(bad_credentials)?;

        let stored = user.password_hash.as_deref().ok_or_else(bad_credentials)?;
        if !verify_password(password, stored)? {
            return Err(bad_credentials());
        }

        if !user.is_confirmed() {
            return Err(ServiceError::Forbidden(
                "Confirm your email before signing in".into(),
            ));
        }

        Ok(user)
    }

    /// Finds or creates the account of a user coming back from the OAuth
    /// provider. The provider vouches for the email, so it counts as confirmed.
    pub async fn oauth_sign_in(
        db: &DatabaseConnection,
        email: &str,
        name: Option<&str>,
    ) -> Result<users::Model, ServiceError> {
        let email = normalize_email(email)?;
        let now = Utc::now().naive_utc();

        let txn = db.begin().await?;
        let user = match find_user_by_email(&txn, &email).await? {
            Some(user) if user.is_confirmed() => user,
            Some(user) => {
                let mut active: users::ActiveModel = user.into();
                active.email_confirmed_at = Set(Some(now));
                active.update(&txn).await?
            }
            None => {
                let display_name = name
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_owned)
                    .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_owned());

                let user = users::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    email: Set(email.clone()),
                    password_hash: Set(None),
                    email_confirmed_at: Set(Some(now)),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(|e| ServiceError::from_write(e, EMAIL_TAKEN))?;

                insert_profile(&txn, user.id, display_name, now).await?;
                info!("Registered user {} through OAuth", user.id);
                user
            }
        };

        txn.commit().await?;
        Ok(user)
    }

    pub async fn start_session(
        db: &DatabaseConnection,
        user_id: Uuid,
        policy: &SessionPolicy,
    ) -> Result<sessions::Model, ServiceError> {
        let now = Utc::now().naive_utc();
        let session = sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            expires_at: Set(now + policy.ttl),
            refreshed_at: Set(now),
            created_at: Set(now),
        }
        .insert(db)
        .await?;

        info!("Started session for user {user_id}");
        Ok(session)
    }

    /// Looks a session up, dropping it when expired and extending it when
    /// it has not been refreshed for `policy.refresh_after`
    pub async fn resolve_session(
        db: &DatabaseConnection,
        session_id: Uuid,
        policy: &SessionPolicy,
    ) -> Result<Option<ResolvedSession>, ServiceError> {
        let Some(session) = sessions::Entity::find_by_id(session_id).one(db).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();
        if session.expires_at <= now {
            debug!("Session {session_id} expired");
            session.delete(db).await?;
            return Ok(None);
        }

        let identity = match Self::identity(db, session.user_id).await {
            Ok(identity) => identity,
            Err(ServiceError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let (session, refreshed) = if needs_refresh(&session, policy, now) {
            let mut active: sessions::ActiveModel = session.into();
            active.expires_at = Set(now + policy.ttl);
            active.refreshed_at = Set(now);
            debug!("Refreshed session {session_id}");
            (active.update(db).await?, true)
        } else {
            (session, false)
        };

        Ok(Some(ResolvedSession {
            session,
            identity,
            refreshed,
        }))
    }

    pub async fn end_session(db: &DatabaseConnection, session_id: Uuid) -> Result<(), ServiceError> {
        sessions::Entity::delete_by_id(session_id).exec(db).await?;
        Ok(())
    }

    pub async fn identity(db: &DatabaseConnection, user_id: Uuid) -> Result<Identity, ServiceError> {
        let (user, profile) = users::Entity::find_by_id(user_id)
            .find_also_related(profiles::Entity)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;
        let profile = profile.ok_or(ServiceError::NotFound("profile"))?;

        Ok(Identity {
            user_id: user.id,
            email: user.email,
            display_name: profile.display_name,
            role: profile.role,
        })
    }
}

const EMAIL_TAKEN: &str = "An account with this email already exists";

async fn find_user_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, ServiceError> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?)
}

async fn insert_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    display_name: String,
    now: NaiveDateTime,
) -> Result<profiles::Model, ServiceError> {
    Ok(profiles::ActiveModel {
        id: Set(user_id),
        display_name: Set(display_name),
        role: Set(Role::User),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?)
}

fn needs_refresh(session: &sessions::Model, policy: &SessionPolicy, now: NaiveDateTime) -> bool {
    now - session.refreshed_at >= policy.refresh_after
}

/// 32 random bytes, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 of a one-time token; only this form is stored
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| ServiceError::Internal(format!("stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
