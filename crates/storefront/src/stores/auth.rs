//! Mock phone login.
//!
//! Sign-in is a two-step flow: request a one-time code for a mobile number,
//! then verify it. No SMS is sent; the configured demo code is the only code
//! that verifies.

use std::sync::Arc;

use bouquet_core::{PhoneError, PhoneNumber};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::Result;
use crate::events::{EventBus, StoreEvent};
use crate::storage::{KeyValueStorage, StorageExt, keys};

/// Longest display name accepted.
const MAX_NAME_LENGTH: usize = 60;

/// Errors that can occur during sign-in or profile updates.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid phone number.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// The verification code did not match.
    #[error("incorrect verification code")]
    InvalidCode,

    /// The verification code is no longer valid.
    #[error("verification code has expired, request a new one")]
    CodeExpired,

    /// The operation needs a signed-in user.
    #[error("you are not signed in")]
    NotLoggedIn,

    /// The display name is empty or too long.
    #[error("name must be between 1 and 60 characters")]
    InvalidName,
}

/// A verification code that has been issued but not yet used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    pub phone: PhoneNumber,
    pub expires_at: DateTime<Utc>,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub phone: PhoneNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub token: Uuid,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Name to greet the user with, falling back to the masked number.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.phone.masked())
    }
}

/// Persisted sign-in state.
#[derive(Clone)]
pub struct AuthStore {
    storage: Arc<dyn KeyValueStorage>,
    events: EventBus,
    config: AuthConfig,
}

impl AuthStore {
    /// Create an auth store over `storage`, publishing to `events`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, events: EventBus, config: AuthConfig) -> Self {
        Self {
            storage,
            events,
            config,
        }
    }

    /// Issue a verification code for `phone`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhone` if the number is not a valid mobile number.
    #[instrument(skip(self, phone))]
    pub fn request_code(&self, phone: &str) -> Result<PendingLogin> {
        let phone = PhoneNumber::parse(phone).map_err(AuthError::from)?;
        let ttl = chrono::Duration::from_std(self.config.code_ttl)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));

        info!(phone = %phone.masked(), "Issued verification code");
        Ok(PendingLogin {
            phone,
            expires_at: Utc::now() + ttl,
        })
    }

    /// Check `code` against `pending` and sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CodeExpired` or `AuthError::InvalidCode` on a bad
    /// code, or a storage error if the session cannot be saved.
    #[instrument(skip_all, fields(phone = %pending.phone.masked()))]
    pub fn verify(&self, pending: &PendingLogin, code: &str) -> Result<Session> {
        self.verify_at(pending, code, Utc::now())
    }

    fn verify_at(&self, pending: &PendingLogin, code: &str, now: DateTime<Utc>) -> Result<Session> {
        if now > pending.expires_at {
            return Err(AuthError::CodeExpired.into());
        }
        if code.trim() != self.config.demo_code.expose_secret() {
            warn!("Verification code rejected");
            return Err(AuthError::InvalidCode.into());
        }

        // Signing in again with the same number keeps the saved name
        let name = self
            .current()
            .filter(|session| session.phone == pending.phone)
            .and_then(|session| session.name);

        let session = Session {
            phone: pending.phone.clone(),
            name,
            token: Uuid::new_v4(),
            logged_in_at: now,
        };
        self.commit(&session)?;

        info!("Signed in");
        Ok(session)
    }

    /// The signed-in session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.storage.get_or(keys::AUTH_SESSION, None)
    }

    /// Set the signed-in user's display name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session, `AuthError::InvalidName`
    /// for an empty or overlong name, or a storage error if the write fails.
    #[instrument(skip(self, name))]
    pub fn update_name(&self, name: &str) -> Result<Session> {
        let mut session = self.current().ok_or(AuthError::NotLoggedIn)?;

        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(AuthError::InvalidName.into());
        }
        session.name = Some(name.to_string());
        self.commit(&session)?;

        info!("Updated display name");
        Ok(session)
    }

    /// Sign out. Signing out without a session is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(keys::AUTH_SESSION)?;
        self.events.publish(StoreEvent::SessionChanged { signed_in: false });
        info!("Signed out");
        Ok(())
    }

    fn commit(&self, session: &Session) -> Result<()> {
        self.storage.set(keys::AUTH_SESSION, session)?;
        self.events.publish(StoreEvent::SessionChanged { signed_in: true });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::error::AppError;
    use crate::storage::MemoryStorage;

    fn store() -> (AuthStore, EventBus) {
        let events = EventBus::new();
        let config = AuthConfig {
            demo_code: SecretString::from("4321"),
            code_ttl: Duration::from_secs(120),
        };
        let store = AuthStore::new(Arc::new(MemoryStorage::new()), events.clone(), config);
        (store, events)
    }

    #[test]
    fn test_request_code_validates_phone() {
        let (store, _) = store();
        let pending = store.request_code("050 123 4567").unwrap();
        assert_eq!(pending.phone.as_str(), "+966501234567");
        assert!(pending.expires_at > Utc::now());

        let err = store.request_code("12345").unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidPhone(_))));
    }

    #[test]
    fn test_verify_signs_in() {
        let (store, events) = store();
        let mut rx = events.subscribe();
        let pending = store.request_code("0501234567").unwrap();

        let session = store.verify(&pending, " 4321 ").unwrap();
        assert_eq!(store.current(), Some(session.clone()));
        assert_eq!(session.display_name(), pending.phone.masked());
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::SessionChanged { signed_in: true }
        );
    }

    #[test]
    fn test_wrong_or_expired_code_is_rejected() {
        let (store, _) = store();
        let pending = store.request_code("0501234567").unwrap();

        let err = store.verify(&pending, "0000").unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidCode)));

        let later = pending.expires_at + chrono::Duration::seconds(1);
        let err = store.verify_at(&pending, "4321", later).unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::CodeExpired)));

        assert!(store.current().is_none());
    }

    #[test]
    fn test_update_name_requires_session() {
        let (store, _) = store();
        let err = store.update_name("سارة").unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::NotLoggedIn)));

        let pending = store.request_code("0501234567").unwrap();
        store.verify(&pending, "4321").unwrap();

        let err = store.update_name("   ").unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidName)));

        let session = store.update_name(" سارة ").unwrap();
        assert_eq!(session.display_name(), "سارة");
    }

    #[test]
    fn test_relogin_keeps_name_for_same_phone() {
        let (store, _) = store();
        let pending = store.request_code("0501234567").unwrap();
        let first = store.verify(&pending, "4321").unwrap();
        store.update_name("سارة").unwrap();

        let second = store.verify(&pending, "4321").unwrap();
        assert_ne!(first.token, second.token);
        assert_eq!(second.name.as_deref(), Some("سارة"));

        let other = store.request_code("0559876543").unwrap();
        let third = store.verify(&other, "4321").unwrap();
        assert!(third.name.is_none());
    }

    #[test]
    fn test_logout_clears_session() {
        let (store, events) = store();
        let pending = store.request_code("0501234567").unwrap();
        store.verify(&pending, "4321").unwrap();
        let mut rx = events.subscribe();

        store.logout().unwrap();
        assert!(store.current().is_none());
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::SessionChanged { signed_in: false }
        );

        store.logout().unwrap();
    }
}
