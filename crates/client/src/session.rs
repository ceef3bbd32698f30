use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parlor_api::{ApiError, AuthToken, ChatBackend, LoginRequest, UserId};
use snafu::{ResultExt, Snafu};

use crate::store::SessionStore;
use crate::validation::{LoginInput, ValidationErrors};

/// An authenticated identity. Token and user id only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: AuthToken,
    pub user_id: UserId,
}

impl Credentials {
    pub fn new(token: AuthToken, user_id: UserId) -> Self {
        Self { token, user_id }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoginError {
    #[snafu(display("login form is invalid: {source}"))]
    InvalidInput {
        stage: &'static str,
        source: ValidationErrors,
    },
    #[snafu(display("login was rejected on `{stage}`: {source}"))]
    Rejected {
        stage: &'static str,
        source: ApiError,
    },
}

impl LoginError {
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { source, .. } => source.to_string(),
            Self::Rejected { source, .. } => source.user_message(),
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::InvalidInput { source, .. } => Some(source),
            Self::Rejected { .. } => None,
        }
    }
}

/// Holder of the current session.
///
/// Created once at startup and shared by `Arc`; only [`SessionManager::login`]
/// and [`SessionManager::logout`] change it.
pub struct SessionManager {
    backend: Arc<dyn ChatBackend>,
    store: Arc<dyn SessionStore>,
    current: ArcSwapOption<Credentials>,
}

impl SessionManager {
    /// Restores a stored session if both entries are present. The token is not
    /// checked against the server; a stale token fails on first use.
    pub fn restore(backend: Arc<dyn ChatBackend>, store: Arc<dyn SessionStore>) -> Self {
        let restored = store.load();
        match &restored {
            Some(credentials) => {
                tracing::info!(user_id = %credentials.user_id, "restored stored session");
            }
            None => tracing::info!("no stored session, starting signed out"),
        }

        Self {
            backend,
            store,
            current: ArcSwapOption::from(restored.map(Arc::new)),
        }
    }

    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    pub fn current(&self) -> Option<Arc<Credentials>> {
        self.current.load_full()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.current
            .load_full()
            .map(|credentials| credentials.user_id)
    }

    /// Validates the form, then signs in. Nothing is retried.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Arc<Credentials>, LoginError> {
        let input = LoginInput::parse(username, password).context(InvalidInputSnafu {
            stage: "validate-login-form",
        })?;
        self.login_with(input).await
    }

    pub async fn login_with(&self, input: LoginInput) -> Result<Arc<Credentials>, LoginError> {
        let (username, password) = input.into_parts();
        let response = self
            .backend
            .login(LoginRequest { username, password })
            .await
            .context(RejectedSnafu { stage: "login" })?;

        let credentials = Arc::new(Credentials::new(response.token, response.user_id));
        if let Err(error) = self.store.save(&credentials) {
            // The in-memory session is still usable for this run.
            tracing::warn!("failed to persist session: {error}");
        }
        self.current.store(Some(credentials.clone()));

        tracing::info!(user_id = %credentials.user_id, "signed in");
        Ok(credentials)
    }

    /// Signs out locally, then tells the server on a best-effort basis.
    ///
    /// Never fails: the local session is gone even if the network call hangs
    /// or errors.
    pub async fn logout(&self) {
        let previous = self.current.swap(None);
        if let Err(error) = self.store.clear() {
            tracing::warn!("failed to clear stored session: {error}");
        }

        let Some(previous) = previous else {
            return;
        };

        tracing::info!(user_id = %previous.user_id, "signed out");
        if let Err(error) = self.backend.logout(&previous.token).await {
            tracing::warn!("remote logout failed: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;
    use crate::testing::FakeBackend;

    fn manager(backend: Arc<FakeBackend>, store: Arc<MemorySessionStore>) -> SessionManager {
        SessionManager::restore(backend, store)
    }

    #[tokio::test]
    async fn login_sets_and_persists_both_entries() {
        let backend = Arc::new(FakeBackend::new());
        let store = Arc::new(MemorySessionStore::new());
        let session = manager(backend.clone(), store.clone());
        assert!(!session.is_authenticated());

        let credentials = session.login("alice", "secret").await.unwrap();

        assert_eq!(credentials.token, AuthToken::new(FakeBackend::TOKEN));
        assert_eq!(credentials.user_id, FakeBackend::USER_ID);
        assert!(session.is_authenticated());
        assert_eq!(session.user_id(), Some(FakeBackend::USER_ID));
        assert_eq!(store.load().as_ref(), Some(credentials.as_ref()));
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_unset() {
        let backend = Arc::new(FakeBackend::new());
        let store = Arc::new(MemorySessionStore::new());
        let session = manager(backend, store.clone());

        let error = session.login("alice", "wrong").await.unwrap_err();

        assert_eq!(
            error.user_message(),
            "Unable to log in with provided credentials."
        );
        assert!(matches!(&error, LoginError::Rejected { source, .. } if source.is_auth_failure()));
        assert!(!session.is_authenticated());
        assert_eq!(session.current(), None);
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_backend() {
        let backend = Arc::new(FakeBackend::new());
        let session = manager(backend.clone(), Arc::new(MemorySessionStore::new()));

        let error = session.login("bad user!", "").await.unwrap_err();

        let fields = error.validation_errors().unwrap();
        assert!(fields.first(crate::validation::Field::Username).is_some());
        assert!(fields.first(crate::validation::Field::Password).is_some());
        assert_eq!(backend.calls("login"), 0);
    }

    #[tokio::test]
    async fn logout_clears_local_state_even_when_remote_fails() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("logout");
        let store = Arc::new(MemorySessionStore::new());
        let session = manager(backend.clone(), store.clone());
        session.login("alice", "secret").await.unwrap();

        session.logout().await;

        assert!(!session.is_authenticated());
        assert_eq!(session.user_id(), None);
        assert_eq!(store.load(), None);
        assert_eq!(backend.calls("logout"), 1);
    }

    #[tokio::test]
    async fn logout_without_session_skips_remote_call() {
        let backend = Arc::new(FakeBackend::new());
        let session = manager(backend.clone(), Arc::new(MemorySessionStore::new()));

        session.logout().await;

        assert_eq!(backend.calls("logout"), 0);
    }

    #[test]
    fn stored_session_is_restored_at_startup() {
        let stored = Credentials::new(AuthToken::new("persisted"), UserId::new(9));
        let store = Arc::new(MemorySessionStore::with_credentials(stored.clone()));

        let session = manager(Arc::new(FakeBackend::new()), store);

        assert!(session.is_authenticated());
        assert_eq!(session.current().as_deref(), Some(&stored));
    }
}
