//! Test utilities shared by the handler and middleware tests
//!
//! Provides a client factory whose auth behavior is keyed on the bearer token,
//! so routes can be exercised without a Supabase project.

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use supabase_scope::{
    AuthApi, AuthError, BackendClient, ClientError, ClientFactory, ClientOptions, OAuthResponse,
    SignInWithOAuthCredentials, Supabase, SupabaseConfig, User, UserResponse,
};

use crate::with_supabase;

pub(crate) const GOOD_TOKEN: &str = "good-token";
pub(crate) const REJECTED_TOKEN: &str = "rejected-token";
pub(crate) const UNREACHABLE_TOKEN: &str = "unreachable-token";
pub(crate) const TEST_VERIFIER: &str = "test-verifier";

#[derive(Default)]
pub(crate) struct Counters {
    pub(crate) constructed: AtomicUsize,
    pub(crate) closed: AtomicUsize,
}

#[derive(Clone, Default)]
pub(crate) struct TestFactory {
    pub(crate) counters: Arc<Counters>,
}

impl TestFactory {
    pub(crate) fn constructed(&self) -> usize {
        self.counters.constructed.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }
}

impl ClientFactory for TestFactory {
    type Client = TestClient;

    fn create_client(
        &self,
        url: &str,
        _key: &str,
        _options: Option<ClientOptions>,
    ) -> Result<TestClient, ClientError> {
        if url == "https://broken.test" {
            return Err(ClientError::Http("connection refused".to_string()));
        }
        self.counters.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(TestClient {
            counters: Arc::clone(&self.counters),
            auth: TestAuth,
        })
    }
}

pub(crate) struct TestClient {
    counters: Arc<Counters>,
    auth: TestAuth,
}

impl BackendClient for TestClient {
    fn auth(&self) -> &dyn AuthApi {
        &self.auth
    }

    fn close(&self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

struct TestAuth;

#[async_trait]
impl AuthApi for TestAuth {
    async fn get_user(&self, jwt: Option<&str>) -> Result<Option<UserResponse>, AuthError> {
        match jwt {
            Some(GOOD_TOKEN) => Ok(Some(UserResponse {
                user: User {
                    email: Some("user@example.com".to_string()),
                    aud: "authenticated".to_string(),
                    ..Default::default()
                },
            })),
            Some(REJECTED_TOKEN) => Err(AuthError::Api {
                status: 403,
                code: Some("bad_jwt".to_string()),
                message: "invalid JWT".to_string(),
            }),
            Some(UNREACHABLE_TOKEN) => Err(AuthError::Http("connection reset".to_string())),
            Some(_) | None => Ok(None),
        }
    }

    async fn sign_in_with_oauth(
        &self,
        credentials: SignInWithOAuthCredentials,
    ) -> Result<OAuthResponse, AuthError> {
        let mut url = format!(
            "https://auth.test/authorize?provider={}",
            credentials.provider
        );
        if let Some(redirect_to) = &credentials.options.redirect_to {
            url.push_str(&format!("&redirect_to={redirect_to}"));
        }
        Ok(OAuthResponse {
            provider: credentials.provider,
            url,
        })
    }

    async fn code_verifier(&self) -> Option<String> {
        Some(TEST_VERIFIER.to_string())
    }
}

pub(crate) fn test_supabase(url: &str) -> (Supabase<TestFactory>, TestFactory) {
    let factory = TestFactory::default();
    let supabase = Supabase::with_factory(SupabaseConfig::new(url, "test-key"), factory.clone());
    (supabase, factory)
}

/// `router` wrapped in the scope middleware for a working test project
pub(crate) fn test_app(router: Router) -> (Router, TestFactory) {
    let (supabase, factory) = test_supabase("https://project.test");
    (with_supabase(router, supabase), factory)
}

pub(crate) fn request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub(crate) fn request_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("valid request")
}
