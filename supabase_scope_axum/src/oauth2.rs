use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::Redirect,
    routing::get,
};
use serde::Deserialize;

use supabase_scope::{BackendClient, ClientFactory, SignInWithOAuthCredentials, User};

use super::config::{
    SUPABASE_CODE_VERIFIER_COOKIE_MAX_AGE, SUPABASE_CODE_VERIFIER_COOKIE_NAME,
    SUPABASE_OAUTH_REDIRECT_TO,
};
use super::error::IntoResponseError;
use super::extractor::{SupabaseRequest, SupabaseUser};

pub(super) fn router<F: ClientFactory>() -> Router {
    Router::new()
        .route("/oauth2/{provider}", get(oauth2_sign_in::<F>))
        .route("/user", get(current_user::<F>))
}

#[derive(Debug, Default, Deserialize)]
struct SignInParams {
    redirect_to: Option<String>,
    scopes: Option<String>,
}

async fn oauth2_sign_in<F: ClientFactory>(
    supabase: SupabaseRequest<F>,
    Path(provider): Path<String>,
    Query(params): Query<SignInParams>,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let mut credentials = SignInWithOAuthCredentials::new(provider);
    if let Some(redirect_to) = params
        .redirect_to
        .or_else(|| SUPABASE_OAUTH_REDIRECT_TO.clone())
    {
        credentials = credentials.with_redirect_to(redirect_to);
    }
    if let Some(scopes) = params.scopes {
        credentials = credentials.with_scopes(scopes);
    }

    let mut scope = supabase.lock().await;
    let response = scope
        .sign_in_with_oauth_credentials(credentials)
        .await
        .into_response_error()?;
    let verifier = scope
        .client()
        .into_response_error()?
        .auth()
        .code_verifier()
        .await;

    let mut headers = HeaderMap::new();
    if let Some(verifier) = verifier {
        headers.append(SET_COOKIE, code_verifier_cookie(&verifier)?);
    }

    tracing::debug!("Redirecting to {} sign-in", response.provider);
    Ok((headers, Redirect::to(&response.url)))
}

fn code_verifier_cookie(verifier: &str) -> Result<HeaderValue, (StatusCode, String)> {
    let cookie = format!(
        "{}={}; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age={}",
        *SUPABASE_CODE_VERIFIER_COOKIE_NAME, verifier, *SUPABASE_CODE_VERIFIER_COOKIE_MAX_AGE
    );
    cookie.parse().map_err(|_| {
        tracing::error!("Failed to build code verifier cookie");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to parse cookie".to_string(),
        )
    })
}

async fn current_user<F: ClientFactory>(user: SupabaseUser<F>) -> Json<User> {
    Json(user.user)
}
