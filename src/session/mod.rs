//! Authentication session over the storefront API.
//!
//! The session owns the in-memory `user`/`role` pair and the persisted
//! identifiers, and drives the four account operations plus the one-time
//! restore check. Mutating operations take `&mut self`: one session value,
//! one writer.
//!
//! Flow Overview: signup and login persist `userId`/`role` and populate the
//! in-memory user on success. Restore rehydrates from the persisted id and
//! invalidates the session on any lookup failure. Logout clears local state
//! whether or not the server acknowledged the request.

pub mod notify;
pub mod store;

use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::api::{ApiClient, ApiError};
use self::notify::{Notifier, StderrNotifier};
use self::store::{SessionStore, KEY_ROLE, KEY_USER_ID};

/// Role assigned until the backend says otherwise.
pub const DEFAULT_ROLE: &str = "user";

const LOGIN_OK: &str = "Login successful";
const SUSPENDED_ERROR: &str = "Account is suspended";
const BLOCKED_ERROR: &str = "Account is blocked";
const SUSPENDED_ALERT: &str =
    "Your account is suspended from further notice due to unusual activity";
const BLOCKED_ALERT: &str = "Your account has been terminated";

/// The authenticated user as the session knows it. Which fields are filled
/// depends on how the session was established: signup knows name and email,
/// login knows the email, restore knows the name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_id: String,
}

pub struct AuthSession {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    user: Option<User>,
    role: String,
}

impl AuthSession {
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self::with_notifier(api, store, Arc::new(StderrNotifier))
    }

    #[must_use]
    pub fn with_notifier(
        api: ApiClient,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
            user: None,
            role: DEFAULT_ROLE.to_string(),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Rehydrate the session from the persisted identifiers.
    ///
    /// Runs once right after construction. Without a persisted id this is a
    /// no-op; with one, any lookup failure invalidates the session.
    pub async fn restore(&mut self) {
        let Some(user_id) = self.store.get(KEY_USER_ID) else {
            return;
        };
        let stored_role = self.store.get(KEY_ROLE);

        match self.api.fetch_user(&user_id).await {
            Ok(record) => {
                self.user = Some(User {
                    name: Some(record.name),
                    email: None,
                    user_id,
                });
                self.role = stored_role.unwrap_or_else(|| DEFAULT_ROLE.to_string());
            }
            Err(err) => {
                warn!("session verification failed: {err}");
                self.logout().await;
            }
        }
    }

    /// Register a new account and start a session for it.
    ///
    /// # Errors
    /// Propagates the underlying API error; no state is mutated on failure.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<String, ApiError> {
        let response = match self.api.signup(name, email, password).await {
            Ok(response) => response,
            Err(err) => {
                error!("signup error: {err}");
                return Err(err);
            }
        };

        self.store.set(KEY_USER_ID, &response.user_id);
        self.store.set(KEY_ROLE, DEFAULT_ROLE);

        self.user = Some(User {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            user_id: response.user_id.clone(),
        });
        self.role = DEFAULT_ROLE.to_string();

        Ok(response.user_id)
    }

    /// Authenticate and start a session.
    ///
    /// The backend must answer with `message == "Login successful"`; any
    /// other message is a rejection and leaves state untouched.
    ///
    /// # Errors
    /// Returns the underlying API error, or the rejection when the login
    /// message is wrong. A suspended or blocked account additionally raises
    /// one blocking alert before the error is returned.
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<String, ApiError> {
        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(err) => {
                if let ApiError::Http { message, .. } = &err {
                    if message == SUSPENDED_ERROR {
                        self.notifier.alert(SUSPENDED_ALERT);
                    } else if message == BLOCKED_ERROR {
                        self.notifier.alert(BLOCKED_ALERT);
                    }
                }
                error!("login error: {err}");
                return Err(err);
            }
        };

        if response.message != LOGIN_OK {
            let err = ApiError::Login(response.message);
            error!("login error: {err}");
            return Err(err);
        }

        let Some(user_id) = response.user_id else {
            let err = ApiError::Parse("no userId in login response".to_string());
            error!("login error: {err}");
            return Err(err);
        };
        let role = response
            .user_role
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        self.store.set(KEY_USER_ID, &user_id);
        self.store.set(KEY_ROLE, &role);

        self.user = Some(User {
            name: None,
            email: Some(email.to_string()),
            user_id,
        });
        self.role = role;

        Ok(response.message)
    }

    /// Invalidate the server session and clear local state.
    ///
    /// The request outcome is not consulted; local state and the persisted
    /// identifiers are cleared either way, so this never fails the caller.
    pub async fn logout(&mut self) {
        if let Err(err) = self.api.logout().await {
            debug!("logout request failed: {err}");
        }

        self.user = None;
        self.role = DEFAULT_ROLE.to_string();
        self.store.remove(KEY_USER_ID);
        self.store.remove(KEY_ROLE);
    }

    /// Fetch a user's display name.
    ///
    /// # Errors
    /// Propagates any API failure untouched.
    pub async fn fetch_user_name(&self, user_id: &str) -> Result<String, ApiError> {
        let record = self.api.fetch_user(user_id).await?;
        Ok(record.name)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("user", &self.user)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
