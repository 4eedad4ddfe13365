use std::sync::Arc;

use crate::backend::{BackendClient, ClientFactory};
use crate::config::SupabaseConfig;
use crate::errors::SupabaseError;
use crate::gotrue::{OAuthResponse, SignInWithOAuthCredentials, SupabaseFactory, UserResponse};
use crate::options::ClientOptions;

/// Application-wide Supabase integration
///
/// Holds the immutable configuration and the client factory. Cheap to clone;
/// every request gets its own [`RequestScope`] from [`Supabase::begin_request`].
///
/// # Example
///
/// ```no_run
/// use supabase_scope::{Supabase, SupabaseConfig};
///
/// # async fn handler() -> Result<(), supabase_scope::SupabaseError> {
/// let supabase = Supabase::new(SupabaseConfig::from_env());
///
/// let mut scope = supabase.begin_request();
/// let user = scope.get_user(Some("user-access-token")).await?;
/// scope.teardown();
/// # Ok(())
/// # }
/// ```
pub struct Supabase<F: ClientFactory = SupabaseFactory> {
    config: Arc<SupabaseConfig>,
    factory: Arc<F>,
}

impl<F: ClientFactory> Clone for Supabase<F> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl Supabase<SupabaseFactory> {
    /// Integration backed by the default HTTP client
    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_factory(config, SupabaseFactory)
    }
}

impl<F: ClientFactory> Supabase<F> {
    pub fn with_factory(config: SupabaseConfig, factory: F) -> Self {
        Self {
            config: Arc::new(config),
            factory: Arc::new(factory),
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Open an empty client slot for one unit of work
    pub fn begin_request(&self) -> RequestScope<F> {
        RequestScope {
            supabase: self.clone(),
            client: None,
        }
    }

    fn create_client(&self) -> Result<F::Client, SupabaseError> {
        let Some((url, key)) = self.config.credentials() else {
            return Err(SupabaseError::missing_credentials());
        };

        ClientOptions::normalize(self.config.client_options())
            .and_then(|options| self.factory.create_client(url, key, options))
            .map_err(|e| {
                tracing::error!("Failed to create Supabase client: {}", e);
                SupabaseError::Construction(e)
            })
    }
}

/// Per-request client slot
///
/// The client is built on first use and reused for the rest of the request.
/// It is discarded by [`RequestScope::teardown`] or when the scope is dropped.
pub struct RequestScope<F: ClientFactory = SupabaseFactory> {
    supabase: Supabase<F>,
    client: Option<F::Client>,
}

impl<F: ClientFactory> RequestScope<F> {
    /// The client for this request, constructing it on first access.
    ///
    /// A failed construction leaves the slot empty, so the next call tries again.
    pub fn client(&mut self) -> Result<&F::Client, SupabaseError> {
        let client = match self.client.take() {
            Some(client) => client,
            None => {
                let client = self.supabase.create_client()?;
                tracing::debug!("Supabase client created for request scope");
                client
            }
        };
        Ok(self.client.insert(client))
    }

    pub fn is_populated(&self) -> bool {
        self.client.is_some()
    }

    /// Discard the cached client. Returns whether there was one.
    pub fn teardown(&mut self) -> bool {
        match self.client.take() {
            Some(client) => {
                client.close();
                tracing::debug!("Supabase client released at request teardown");
                true
            }
            None => false,
        }
    }

    /// Authenticated user for `jwt`, or for the client's own session when `None`
    pub async fn get_user(
        &mut self,
        jwt: Option<&str>,
    ) -> Result<Option<UserResponse>, SupabaseError> {
        let client = self.client()?;
        Ok(client.auth().get_user(jwt).await?)
    }

    /// Begin an OAuth sign-in with the named provider
    pub async fn sign_in_with_oauth(
        &mut self,
        provider: &str,
    ) -> Result<OAuthResponse, SupabaseError> {
        self.sign_in_with_oauth_credentials(SignInWithOAuthCredentials::new(provider))
            .await
    }

    pub async fn sign_in_with_oauth_credentials(
        &mut self,
        credentials: SignInWithOAuthCredentials,
    ) -> Result<OAuthResponse, SupabaseError> {
        let client = self.client()?;
        Ok(client.auth().sign_in_with_oauth(credentials).await?)
    }
}

impl<F: ClientFactory> Drop for RequestScope<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}
