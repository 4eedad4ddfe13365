//! Test doubles shared by the unit tests of this crate

use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

use crate::backend::{AuthApi, BackendClient, ClientFactory};
use crate::errors::{AuthError, ClientError};
use crate::gotrue::{OAuthResponse, SignInWithOAuthCredentials, User, UserResponse};
use crate::options::ClientOptions;

#[derive(Debug, Clone, Default)]
pub(crate) enum MockBehavior {
    #[default]
    Succeed,
    /// First construction fails, later ones succeed
    FailOnce(ClientError),
    /// Construction succeeds, every auth call fails
    AuthFails(AuthError),
}

#[derive(Default)]
struct MockState {
    attempts: AtomicUsize,
    constructed: AtomicUsize,
    closed: Arc<AtomicUsize>,
    behavior: Mutex<MockBehavior>,
}

/// Factory that records how often it was asked to build a client
#[derive(Clone, Default)]
pub(crate) struct MockFactory {
    state: Arc<MockState>,
}

impl MockFactory {
    pub(crate) fn with_behavior(behavior: MockBehavior) -> Self {
        let factory = Self::default();
        *factory.state.behavior.lock().unwrap() = behavior;
        factory
    }

    pub(crate) fn attempts(&self) -> usize {
        self.state.attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn constructed(&self) -> usize {
        self.state.constructed.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }
}

impl ClientFactory for MockFactory {
    type Client = MockClient;

    fn create_client(
        &self,
        url: &str,
        key: &str,
        options: Option<ClientOptions>,
    ) -> Result<MockClient, ClientError> {
        self.state.attempts.fetch_add(1, Ordering::SeqCst);

        let mut behavior = self.state.behavior.lock().unwrap();
        let auth_error = match behavior.clone() {
            MockBehavior::Succeed => None,
            MockBehavior::FailOnce(err) => {
                *behavior = MockBehavior::Succeed;
                return Err(err);
            }
            MockBehavior::AuthFails(err) => Some(err),
        };

        let serial = self.state.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(MockClient {
            serial,
            url: url.to_string(),
            key: key.to_string(),
            options,
            auth: MockAuth {
                url: url.to_string(),
                error: auth_error,
            },
            closed: Arc::clone(&self.state.closed),
        })
    }
}

#[derive(Debug)]
pub(crate) struct MockClient {
    pub(crate) serial: usize,
    pub(crate) url: String,
    pub(crate) key: String,
    pub(crate) options: Option<ClientOptions>,
    auth: MockAuth,
    closed: Arc<AtomicUsize>,
}

impl BackendClient for MockClient {
    fn auth(&self) -> &dyn AuthApi {
        &self.auth
    }

    fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
struct MockAuth {
    url: String,
    error: Option<AuthError>,
}

#[async_trait]
impl AuthApi for MockAuth {
    async fn get_user(&self, jwt: Option<&str>) -> Result<Option<UserResponse>, AuthError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(jwt.map(|token| UserResponse {
            user: User {
                id: Uuid::new_v4(),
                email: Some(format!("{token}@example.com")),
                ..Default::default()
            },
        }))
    }

    async fn sign_in_with_oauth(
        &self,
        credentials: SignInWithOAuthCredentials,
    ) -> Result<OAuthResponse, AuthError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(OAuthResponse {
            url: format!("{}/authorize?provider={}", self.url, credentials.provider),
            provider: credentials.provider,
        })
    }
}
