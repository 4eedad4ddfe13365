use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use url::Url;

use crate::backend::AuthApi;
use crate::errors::AuthError;
use crate::options::FlowType;

use super::pkce::{code_challenge, generate_code_verifier};
use super::types::{
    GoTrueErrorBody, OAuthResponse, Session, SignInWithOAuthCredentials, User, UserResponse,
};

#[derive(Debug, Default)]
struct AuthState {
    session: Option<Session>,
    code_verifier: Option<String>,
}

/// Client for the GoTrue auth API served at `{project_url}/auth/v1`
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    flow_type: FlowType,
    state: RwLock<AuthState>,
}

impl AuthClient {
    pub(crate) fn new(http: reqwest::Client, project_url: &Url, flow_type: FlowType) -> Self {
        Self {
            http,
            base_url: format!("{}/auth/v1", project_url.as_str().trim_end_matches('/')),
            flow_type,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow_type
    }

    /// Install the session used when `get_user` is called without a token
    pub async fn set_session(&self, session: Session) {
        self.state.write().await.session = Some(session);
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize_url(
        &self,
        credentials: &SignInWithOAuthCredentials,
        code_challenge: Option<&str>,
    ) -> Result<Url, AuthError> {
        let mut url = Url::parse(&self.endpoint("authorize"))
            .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", &credentials.provider);
            if let Some(redirect_to) = &credentials.options.redirect_to {
                query.append_pair("redirect_to", redirect_to);
            }
            if let Some(scopes) = &credentials.options.scopes {
                query.append_pair("scopes", scopes);
            }
            for (key, value) in &credentials.options.query_params {
                query.append_pair(key, value);
            }
            if let Some(challenge) = code_challenge {
                query.append_pair("code_challenge", challenge);
                query.append_pair("code_challenge_method", "s256");
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn get_user(&self, jwt: Option<&str>) -> Result<Option<UserResponse>, AuthError> {
        let token = match jwt {
            Some(token) => token.to_string(),
            None => match self.state.read().await.session.as_ref() {
                Some(session) => session.access_token.clone(),
                None => {
                    tracing::debug!("No token given and no session present");
                    return Ok(None);
                }
            },
        };

        let response = self
            .http
            .get(self.endpoint("user"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let user: User = parse_response(response).await?;
        tracing::debug!("Fetched user: {}", user.id);
        Ok(Some(UserResponse { user }))
    }

    async fn sign_in_with_oauth(
        &self,
        credentials: SignInWithOAuthCredentials,
    ) -> Result<OAuthResponse, AuthError> {
        let mut state = self.state.write().await;
        state.session = None;

        let challenge = match self.flow_type {
            FlowType::Pkce => {
                let verifier = generate_code_verifier()?;
                let challenge = code_challenge(&verifier);
                state.code_verifier = Some(verifier);
                Some(challenge)
            }
            FlowType::Implicit => {
                state.code_verifier = None;
                None
            }
        };

        let url = self.authorize_url(&credentials, challenge.as_deref())?;
        tracing::debug!("OAuth authorize URL: {}", url);

        Ok(OAuthResponse {
            provider: credentials.provider,
            url: url.into(),
        })
    }

    async fn code_verifier(&self) -> Option<String> {
        self.state.read().await.code_verifier.clone()
    }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AuthError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| AuthError::Serde(format!("Failed to deserialize response body: {e}")))
}

fn api_error(status: u16, body: &str) -> AuthError {
    let parsed: GoTrueErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or_else(|| parsed.error.clone())
        .unwrap_or_else(|| body.to_string());
    AuthError::Api {
        status,
        code: parsed.error_code.or(parsed.error),
        message,
    }
}
