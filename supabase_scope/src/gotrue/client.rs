use http::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

use crate::backend::{AuthApi, BackendClient, ClientFactory};
use crate::errors::ClientError;
use crate::options::ClientOptions;

use super::auth::AuthClient;

/// Factory for the default HTTP-backed [`SupabaseClient`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SupabaseFactory;

impl ClientFactory for SupabaseFactory {
    type Client = SupabaseClient;

    fn create_client(
        &self,
        url: &str,
        key: &str,
        options: Option<ClientOptions>,
    ) -> Result<SupabaseClient, ClientError> {
        SupabaseClient::new(url, key, options)
    }
}

/// Handle to a Supabase project
pub struct SupabaseClient {
    url: Url,
    key: String,
    options: ClientOptions,
    http: reqwest::Client,
    auth: AuthClient,
}

impl SupabaseClient {
    /// Validate the connection settings and build the HTTP client.
    ///
    /// No request is sent here.
    pub fn new(url: &str, key: &str, options: Option<ClientOptions>) -> Result<Self, ClientError> {
        let parsed = Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{url}: scheme must be http or https"
            )));
        }

        let options = options.unwrap_or_default();
        let headers = default_headers(key, &options)?;

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .pool_idle_timeout(Duration::from_secs(90));
        if options.postgrest_client_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(options.postgrest_client_timeout));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let auth = AuthClient::new(http.clone(), &parsed, options.flow_type);

        Ok(Self {
            url: parsed,
            key: key.to_string(),
            options,
            http,
            auth,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Concrete auth client, including session and PKCE verifier accessors
    pub fn auth_client(&self) -> &AuthClient {
        &self.auth
    }

    /// Underlying HTTP client, preconfigured with the project headers
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl BackendClient for SupabaseClient {
    fn auth(&self) -> &dyn AuthApi {
        &self.auth
    }
}

fn default_headers(key: &str, options: &ClientOptions) -> Result<HeaderMap, ClientError> {
    if key.trim().is_empty() {
        return Err(ClientError::InvalidKey);
    }
    let api_key = HeaderValue::from_str(key).map_err(|_| ClientError::InvalidKey)?;
    let bearer =
        HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| ClientError::InvalidKey)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-client-info"),
        HeaderValue::from_static(concat!("supabase-scope/", env!("CARGO_PKG_VERSION"))),
    );
    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidOptions(format!("header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidOptions(format!("header value for {name}: {e}")))?;
        headers.insert(name, value);
    }
    headers.insert(HeaderName::from_static("apikey"), api_key);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}
