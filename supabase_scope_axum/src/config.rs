//! Central configuration for the supabase_scope_axum crate

use std::sync::LazyLock;

/// Route prefix for the integration endpoints
/// Default: "/supabase"
pub static SUPABASE_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SUPABASE_ROUTE_PREFIX").unwrap_or_else(|_| "/supabase".to_string())
});

/// Redirect target passed to the auth server when the request names none
pub static SUPABASE_OAUTH_REDIRECT_TO: LazyLock<Option<String>> = LazyLock::new(|| {
    std::env::var("SUPABASE_OAUTH_REDIRECT_TO")
        .ok()
        .filter(|s| !s.is_empty())
});

// "__Host-" prefix makes the cookie host-only.
pub(crate) static SUPABASE_CODE_VERIFIER_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SUPABASE_CODE_VERIFIER_COOKIE_NAME")
        .unwrap_or_else(|_| "__Host-SbCodeVerifier".to_string())
});

pub(crate) static SUPABASE_CODE_VERIFIER_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("SUPABASE_CODE_VERIFIER_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(600)
});
