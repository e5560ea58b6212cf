//! Mocked authentication.
//!
//! There is no real authentication backend; [`MockAuthService`] fabricates
//! tokens for any well-formed credential pair. The store still runs the full
//! session lifecycle (login, restore, logout) and persists tokens and the
//! user record through the key-value collaborator, so swapping in a real
//! service later only touches the [`AuthService`] seam.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kv::KeyValueStore;

const ACCESS_TOKEN_KEY: &str = "auth.access_token";
const REFRESH_TOKEN_KEY: &str = "auth.refresh_token";
const USER_DATA_KEY: &str = "auth.user";

const LOGIN_ERROR_MESSAGE: &str =
    "Falha ao realizar login. Verifique suas credenciais e tente novamente.";

/// Authenticated user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Session status of the authentication store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Idle,
    Loading,
    Authenticated,
    Unauthenticated,
    Error,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Boundary to the authentication backend.
pub trait AuthService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the credentials are
    /// rejected.
    fn login(&self, credentials: &Credentials) -> Result<(AuthTokens, User), AuthError>;

    fn logout(&self);
}

/// Backend stand-in: accepts any email containing `@` with a password of at
/// least six characters and fabricates a deterministic session for it.
#[derive(Default)]
pub struct MockAuthService;

impl AuthService for MockAuthService {
    fn login(&self, credentials: &Credentials) -> Result<(AuthTokens, User), AuthError> {
        if !credentials.email.contains('@') {
            return Err(AuthError::InvalidCredentials("malformed email".to_owned()));
        }
        if credentials.password.len() < 6 {
            return Err(AuthError::InvalidCredentials("password too short".to_owned()));
        }

        let tokens = AuthTokens {
            access_token: format!("mock-access-{}", credentials.email),
            refresh_token: format!("mock-refresh-{}", credentials.email),
        };
        let name = credentials
            .email
            .split('@')
            .next()
            .unwrap_or("usuario")
            .to_owned();
        let user = User {
            id: format!("user-{name}"),
            name,
            email: credentials.email.clone(),
            created_at: Utc::now(),
        };
        Ok((tokens, user))
    }

    fn logout(&self) {}
}

/// Store for the authentication session.
pub struct AuthStore {
    storage: Arc<dyn KeyValueStore>,
    service: Arc<dyn AuthService>,
    user: Option<User>,
    status: AuthStatus,
    error: Option<String>,
}

impl AuthStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, service: Arc<dyn AuthService>) -> Self {
        Self {
            storage,
            service,
            user: None,
            status: AuthStatus::Idle,
            error: None,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Authenticates against the service and persists the session.
    ///
    /// On any failure (service rejection or storage write) the status moves
    /// to [`AuthStatus::Error`] with a user-facing message; detail goes to
    /// the log.
    pub fn login(&mut self, credentials: &Credentials) {
        self.status = AuthStatus::Loading;
        self.error = None;

        let (tokens, user) = match self.service.login(credentials) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "login rejected");
                self.status = AuthStatus::Error;
                self.error = Some(LOGIN_ERROR_MESSAGE.to_owned());
                return;
            }
        };

        let stored = self
            .storage
            .set(ACCESS_TOKEN_KEY, &tokens.access_token)
            .and_then(|()| self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token))
            .and_then(|()| {
                let raw = serde_json::to_string(&user)?;
                self.storage.set(USER_DATA_KEY, &raw)
            });

        if let Err(err) = stored {
            tracing::warn!(error = %err, "failed to persist auth session");
            self.status = AuthStatus::Error;
            self.error = Some("Falha ao armazenar dados de autenticação".to_owned());
            return;
        }

        self.user = Some(user);
        self.status = AuthStatus::Authenticated;
    }

    /// Ends the session.
    ///
    /// Local data is cleared even if the backing storage fails, so the user
    /// is never stuck logged in.
    pub fn logout(&mut self) {
        self.service.logout();

        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_DATA_KEY] {
            if let Err(err) = self.storage.remove(key) {
                tracing::warn!(error = %err, key, "failed to clear auth data");
            }
        }

        self.user = None;
        self.status = AuthStatus::Unauthenticated;
        self.error = None;
    }

    /// Restores the session from storage, if one was persisted.
    ///
    /// Any missing piece (tokens, user record) or storage failure resolves
    /// to [`AuthStatus::Unauthenticated`]; restore never surfaces an error.
    pub fn check_auth(&mut self) {
        self.status = AuthStatus::Loading;
        self.error = None;

        let restored = self.restore_session();
        match restored {
            Some(user) => {
                self.user = Some(user);
                self.status = AuthStatus::Authenticated;
            }
            None => {
                self.user = None;
                self.status = AuthStatus::Unauthenticated;
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn restore_session(&self) -> Option<User> {
        let access = self.storage.get(ACCESS_TOKEN_KEY).ok()??;
        let refresh = self.storage.get(REFRESH_TOKEN_KEY).ok()??;
        if access.is_empty() || refresh.is_empty() {
            return None;
        }

        let raw_user = self.storage.get(USER_DATA_KEY).ok()??;
        match serde_json::from_str(&raw_user) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(error = %err, "stored user record is unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::kv::MemoryKv;

    use super::*;

    fn store_with_memory() -> (AuthStore, Arc<MemoryKv>) {
        let storage = Arc::new(MemoryKv::new());
        let store = AuthStore::new(
            Arc::clone(&storage) as Arc<dyn KeyValueStore>,
            Arc::new(MockAuthService),
        );
        (store, storage)
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn starts_idle_with_no_user() {
        let (store, _) = store_with_memory();
        assert_eq!(store.status(), AuthStatus::Idle);
        assert!(store.user().is_none());
        assert!(store.error().is_none());
    }

    #[test]
    fn login_with_valid_credentials_authenticates_and_persists() {
        let (mut store, storage) = store_with_memory();
        store.login(&credentials("ana@example.com", "segredo"));

        assert_eq!(store.status(), AuthStatus::Authenticated);
        let user = store.user().expect("user should be set");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.name, "ana");
        assert!(storage.get(ACCESS_TOKEN_KEY).unwrap().is_some());
        assert!(storage.get(USER_DATA_KEY).unwrap().is_some());
    }

    #[test]
    fn login_with_a_short_password_errors_with_the_fixed_message() {
        let (mut store, storage) = store_with_memory();
        store.login(&credentials("ana@example.com", "123"));

        assert_eq!(store.status(), AuthStatus::Error);
        assert_eq!(store.error(), Some(LOGIN_ERROR_MESSAGE));
        assert!(store.user().is_none());
        assert!(storage.get(ACCESS_TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn login_rejects_a_malformed_email() {
        let (mut store, _) = store_with_memory();
        store.login(&credentials("not-an-email", "segredo"));
        assert_eq!(store.status(), AuthStatus::Error);
    }

    #[test]
    fn check_auth_restores_a_persisted_session() {
        let storage = Arc::new(MemoryKv::new());

        let mut first = AuthStore::new(
            Arc::clone(&storage) as Arc<dyn KeyValueStore>,
            Arc::new(MockAuthService),
        );
        first.login(&credentials("ana@example.com", "segredo"));

        let mut second = AuthStore::new(storage, Arc::new(MockAuthService));
        second.check_auth();
        assert_eq!(second.status(), AuthStatus::Authenticated);
        assert_eq!(second.user().unwrap().email, "ana@example.com");
    }

    #[test]
    fn check_auth_without_a_session_is_unauthenticated() {
        let (mut store, _) = store_with_memory();
        store.check_auth();
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn logout_clears_the_session_and_storage() {
        let (mut store, storage) = store_with_memory();
        store.login(&credentials("ana@example.com", "segredo"));
        store.logout();

        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert!(store.user().is_none());
        assert!(storage.get(ACCESS_TOKEN_KEY).unwrap().is_none());
        assert!(storage.get(REFRESH_TOKEN_KEY).unwrap().is_none());
        assert!(storage.get(USER_DATA_KEY).unwrap().is_none());
    }

    #[test]
    fn clear_error_resets_only_the_error() {
        let (mut store, _) = store_with_memory();
        store.login(&credentials("ana@example.com", "123"));
        store.clear_error();
        assert!(store.error().is_none());
        assert_eq!(store.status(), AuthStatus::Error);
    }
}
