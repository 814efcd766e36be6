use std::sync::Arc;

use seija_shared::{
    wire::{LoginRequest, RegisterRequest},
    Envelope, ProfilePatch, Session,
};

use crate::{
    api::{envelope_message, ApiClient, ApiError},
    storage::{self, PersistedSession},
};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated(Session),
}

/// Holds the current identity and keeps the persisted session pair in sync
/// with it.
///
/// A restored session is trusted as-is until some later request fails; the
/// store does not revalidate it and has no central 401 handling.
pub struct AuthStore {
    client: Arc<ApiClient>,
    state: AuthState,
    last_error: Option<String>,
}

impl AuthStore {
    /// Store starting from whatever the durable storage holds.
    pub fn restore(client: Arc<ApiClient>) -> Self {
        let mut store = Self {
            client,
            state: AuthState::Anonymous,
            last_error: None,
        };
        store.restore_session();
        store
    }

    pub fn restore_session(&mut self) {
        let storage = self.client.storage().as_ref();
        match storage::load_session(storage) {
            PersistedSession::Present {
                session, ..
            } => {
                tracing::info!("user session restored: {}", session.username);
                self.state = AuthState::Authenticated(session);
            },
            PersistedSession::Malformed(reason) => {
                tracing::warn!("discarding malformed persisted session: {reason}");
                if let Err(err) = storage::clear_session(storage) {
                    tracing::error!("failed to clear persisted session: {err}");
                }
                self.state = AuthState::Anonymous;
            },
            PersistedSession::Absent => {
                // 只剩半个会话（例如孤立的 token）时一并清掉
                if let Err(err) = storage::clear_session(storage) {
                    tracing::error!("failed to clear persisted session: {err}");
                }
                self.state = AuthState::Anonymous;
            },
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session().map(Session::is_admin).unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.state == AuthState::Authenticating
    }

    /// Message of the last failed login/register/profile call.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let previous = std::mem::replace(&mut self.state, AuthState::Authenticating);
        self.last_error = None;
        tracing::info!("login attempt for {email}");

        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let failure = match self.client.login(&credentials).await {
            Ok(Envelope {
                success: true,
                data: Some(payload),
                ..
            }) => match storage::persist_session(
                self.client.storage().as_ref(),
                &payload.token,
                &payload.user,
            ) {
                Ok(()) => {
                    tracing::info!("login successful: {}", payload.user.username);
                    self.state = AuthState::Authenticated(payload.user);
                    return true;
                },
                Err(err) => err.to_string(),
            },
            Ok(envelope) => envelope
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "Login failed".to_string()),
            Err(err) => failure_message(err),
        };

        tracing::error!("login failed: {failure}");
        self.last_error = Some(failure);
        self.state = previous;
        false
    }

    /// Create an account. The new user still has to log in afterwards.
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> bool {
        let previous = std::mem::replace(&mut self.state, AuthState::Authenticating);
        self.last_error = None;
        tracing::info!("register attempt for {email}");

        let user = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = match self.client.register(&user).await {
            Ok(envelope) if envelope.success => Ok(()),
            Ok(envelope) => Err(envelope
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "Registration failed".to_string())),
            Err(err) => Err(failure_message(err)),
        };
        self.state = previous;

        match result {
            Ok(()) => {
                tracing::info!("registration successful");
                true
            },
            Err(failure) => {
                tracing::error!("registration failed: {failure}");
                self.last_error = Some(failure);
                false
            },
        }
    }

    /// Forget the session locally. No request is sent.
    pub fn logout(&mut self) {
        if let Err(err) = storage::clear_session(self.client.storage().as_ref()) {
            tracing::error!("failed to clear persisted session: {err}");
        }
        self.state = AuthState::Anonymous;
        self.last_error = None;
        tracing::info!("user logged out");
    }

    /// Merge `patch` into the in-memory and persisted session without calling
    /// the backend. Does nothing while anonymous.
    pub fn update_local_profile(&mut self, patch: &ProfilePatch) {
        let AuthState::Authenticated(session) = &mut self.state else {
            return;
        };
        session.apply(patch);
        if let Err(err) = storage::persist_user(self.client.storage().as_ref(), session) {
            tracing::error!("failed to persist profile update: {err}");
        }
    }

    /// `PUT /users/profile`, then persist what the backend returned.
    pub async fn update_profile(&mut self, patch: &ProfilePatch) -> bool {
        if !self.is_authenticated() {
            tracing::warn!("profile update requires a logged-in user");
            return false;
        }
        match self.client.update_profile(patch).await {
            Ok(envelope) if envelope.success => {
                match envelope.data {
                    Some(user) => self.replace_session(user),
                    None => self.update_local_profile(patch),
                }
                true
            },
            Ok(envelope) => {
                self.record_failure(envelope_message(&envelope));
                false
            },
            Err(err) => {
                self.record_failure(failure_message(err));
                false
            },
        }
    }

    /// Reload the profile from `GET /users/profile`.
    pub async fn refresh_profile(&mut self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        match self.client.get_profile().await {
            Ok(envelope) => match envelope.into_data() {
                Some(user) => {
                    self.replace_session(user);
                    true
                },
                None => false,
            },
            Err(err) => {
                self.record_failure(failure_message(err));
                false
            },
        }
    }

    fn replace_session(&mut self, user: Session) {
        if let Err(err) = storage::persist_user(self.client.storage().as_ref(), &user) {
            tracing::error!("failed to persist profile: {err}");
        }
        self.state = AuthState::Authenticated(user);
    }

    fn record_failure(&mut self, failure: String) {
        tracing::error!("profile request failed: {failure}");
        self.last_error = Some(failure);
    }
}

fn failure_message(err: ApiError) -> String {
    match err {
        ApiError::Backend {
            message, ..
        } => message,
        _ => NETWORK_ERROR_MESSAGE.to_string(),
    }
}
