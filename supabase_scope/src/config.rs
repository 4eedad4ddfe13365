//! Connection settings for the Supabase backend

use std::sync::LazyLock;

use crate::options::ClientOptionsInput;

/// Project URL used when none is configured explicitly
/// Default: ""
pub static SUPABASE_URL: LazyLock<String> = LazyLock::new(|| env_or_empty("SUPABASE_URL"));

/// API key used when none is configured explicitly
/// Default: ""
pub static SUPABASE_KEY: LazyLock<String> = LazyLock::new(|| env_or_empty("SUPABASE_KEY"));

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// Application-level Supabase configuration
///
/// Built once at startup and shared read-only afterwards. Values set through
/// the `with_*` methods take precedence over the environment defaults.
///
/// # Example
///
/// ```no_run
/// use supabase_scope::SupabaseConfig;
///
/// let config = SupabaseConfig::from_env().with_url("https://project.supabase.co");
/// ```
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    url: String,
    key: String,
    client_options: Option<ClientOptionsInput>,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            client_options: None,
        }
    }

    /// Configuration seeded from `SUPABASE_URL` and `SUPABASE_KEY`
    pub fn from_env() -> Self {
        Self::new(SUPABASE_URL.as_str(), SUPABASE_KEY.as_str())
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_client_options(mut self, options: impl Into<ClientOptionsInput>) -> Self {
        self.client_options = Some(options.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn client_options(&self) -> Option<&ClientOptionsInput> {
        self.client_options.as_ref()
    }

    /// URL and key, or `None` when either one is empty
    pub(crate) fn credentials(&self) -> Option<(&str, &str)> {
        if self.url.is_empty() || self.key.is_empty() {
            None
        } else {
            Some((&self.url, &self.key))
        }
    }
}
