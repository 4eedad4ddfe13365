//! Seams between the request scope and the backend client library

use async_trait::async_trait;

use crate::errors::{AuthError, ClientError};
use crate::gotrue::{OAuthResponse, SignInWithOAuthCredentials, UserResponse};
use crate::options::ClientOptions;

/// Builds backend clients from connection settings
pub trait ClientFactory: Send + Sync + 'static {
    type Client: BackendClient;

    fn create_client(
        &self,
        url: &str,
        key: &str,
        options: Option<ClientOptions>,
    ) -> Result<Self::Client, ClientError>;
}

/// A constructed backend client, owned by exactly one request scope
pub trait BackendClient: Send + Sync + 'static {
    /// Authentication capability of the client
    fn auth(&self) -> &dyn AuthApi;

    /// Called when the owning request scope is torn down.
    ///
    /// The HTTP-based client holds no connection of its own, so the
    /// default does nothing.
    fn close(&self) {}
}

/// Authentication operations the request scope delegates to
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Look up the user behind `jwt`, or behind the client's own session
    /// when `jwt` is `None`. Returns `Ok(None)` when there is no session.
    async fn get_user(&self, jwt: Option<&str>) -> Result<Option<UserResponse>, AuthError>;

    /// Begin an OAuth sign-in flow
    async fn sign_in_with_oauth(
        &self,
        credentials: SignInWithOAuthCredentials,
    ) -> Result<OAuthResponse, AuthError>;

    /// PKCE verifier kept from the last OAuth sign-in, for flows that use one
    async fn code_verifier(&self) -> Option<String> {
        None
    }
}
