use axum::{
    RequestPartsExt,
    extract::{FromRequestParts, OptionalFromRequestParts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use http::{StatusCode, request::Parts};
use std::marker::PhantomData;
use tokio::sync::MutexGuard;

use supabase_scope::{
    AuthError, ClientFactory, OAuthResponse, RequestScope, SignInWithOAuthCredentials,
    SupabaseError, SupabaseFactory, User, UserResponse,
};

use super::error::status_for;
use super::middleware::ScopeHandle;

/// The current request's Supabase scope, available as an Axum extractor
///
/// Requires [`supabase_scope_middleware`](crate::supabase_scope_middleware);
/// without it extraction fails with `500 Internal Server Error`.
///
/// # Example
///
/// ```no_run
/// use axum::{Json, http::StatusCode};
/// use supabase_scope::OAuthResponse;
/// use supabase_scope_axum::{IntoResponseError, SupabaseRequest};
///
/// async fn start_github(
///     supabase: SupabaseRequest,
/// ) -> Result<Json<OAuthResponse>, (StatusCode, String)> {
///     let response = supabase
///         .sign_in_with_oauth("github")
///         .await
///         .into_response_error()?;
///     Ok(Json(response))
/// }
/// ```
pub struct SupabaseRequest<F: ClientFactory = SupabaseFactory>(ScopeHandle<F>);

impl<F: ClientFactory> SupabaseRequest<F> {
    /// Exclusive access to the scope, e.g. to reach the client directly
    ///
    /// # Deadlock
    ///
    /// The lock is not reentrant. While the guard is alive, do not call
    /// [`get_user`](Self::get_user) or
    /// [`sign_in_with_oauth`](Self::sign_in_with_oauth) on the same
    /// `SupabaseRequest`; call them on the guard instead.
    pub async fn lock(&self) -> MutexGuard<'_, RequestScope<F>> {
        self.0.lock().await
    }

    pub async fn get_user(&self, jwt: Option<&str>) -> Result<Option<UserResponse>, SupabaseError> {
        self.lock().await.get_user(jwt).await
    }

    pub async fn sign_in_with_oauth(&self, provider: &str) -> Result<OAuthResponse, SupabaseError> {
        self.lock().await.sign_in_with_oauth(provider).await
    }

    pub async fn sign_in_with_oauth_credentials(
        &self,
        credentials: SignInWithOAuthCredentials,
    ) -> Result<OAuthResponse, SupabaseError> {
        self.lock()
            .await
            .sign_in_with_oauth_credentials(credentials)
            .await
    }
}

fn scope_handle<F: ClientFactory>(parts: &Parts) -> Result<ScopeHandle<F>, (StatusCode, String)> {
    parts
        .extensions
        .get::<ScopeHandle<F>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("Supabase scope middleware is not installed on this route");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Supabase scope is not available".to_string(),
            )
        })
}

impl<S, F> FromRequestParts<S> for SupabaseRequest<F>
where
    S: Send + Sync,
    F: ClientFactory,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        scope_handle(parts).map(Self)
    }
}

/// User authenticated by the request's bearer token
///
/// Extraction reads `Authorization: Bearer <token>` and asks the auth server
/// for the user behind it. A missing header, an unknown user and a token the
/// auth server rejects all yield `401 Unauthorized`. Use
/// `Option<SupabaseUser>` for routes that also serve anonymous requests.
///
/// # Example
///
/// ```no_run
/// use supabase_scope_axum::SupabaseUser;
///
/// async fn protected(user: SupabaseUser) -> String {
///     format!("Hello, {}!", user.user.email.as_deref().unwrap_or("anonymous"))
/// }
/// ```
pub struct SupabaseUser<F: ClientFactory = SupabaseFactory> {
    pub user: User,
    /// The bearer token the user was resolved from
    pub access_token: String,
    _factory: PhantomData<fn() -> F>,
}

impl<F: ClientFactory> Clone for SupabaseUser<F> {
    fn clone(&self) -> Self {
        Self {
            user: self.user.clone(),
            access_token: self.access_token.clone(),
            _factory: PhantomData,
        }
    }
}

impl<F: ClientFactory> std::fmt::Debug for SupabaseUser<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseUser")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

fn unauthorized() -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
}

/// Resolve the bearer token to a user; `None` when the request is anonymous
/// or the auth server does not accept the token.
async fn resolve_user<F: ClientFactory>(
    parts: &mut Parts,
) -> Result<Option<SupabaseUser<F>>, (StatusCode, String)> {
    let handle = scope_handle::<F>(parts)?;

    let Ok(TypedHeader(Authorization(bearer))) =
        parts.extract::<TypedHeader<Authorization<Bearer>>>().await
    else {
        tracing::debug!("No bearer token in request");
        return Ok(None);
    };
    let access_token = bearer.token().to_string();

    let result = handle.lock().await.get_user(Some(&access_token)).await;
    match result {
        Ok(Some(response)) => {
            tracing::debug!("Authenticated user: {}", response.user.id);
            Ok(Some(SupabaseUser {
                user: response.user,
                access_token,
                _factory: PhantomData,
            }))
        }
        Ok(None) => Ok(None),
        Err(SupabaseError::Auth(AuthError::Api { status, message, .. }))
            if status == 401 || status == 403 =>
        {
            tracing::debug!("Bearer token rejected by auth server: {}", message);
            Ok(None)
        }
        Err(e) => {
            tracing::error!("Failed to resolve user: {}", e);
            Err((status_for(&e), e.to_string()))
        }
    }
}

impl<S, F> FromRequestParts<S> for SupabaseUser<F>
where
    S: Send + Sync,
    F: ClientFactory,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        resolve_user::<F>(parts).await?.ok_or_else(unauthorized)
    }
}

impl<S, F> OptionalFromRequestParts<S> for SupabaseUser<F>
where
    S: Send + Sync,
    F: ClientFactory,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        resolve_user::<F>(parts).await
    }
}
