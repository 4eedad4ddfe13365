//! supabase_scope - Request-scoped Supabase client for web applications
//!
//! The crate keeps one Supabase client per unit of work (usually an HTTP
//! request). The client is built lazily on first use from an explicit
//! [`SupabaseConfig`], reused for the rest of the request and released at
//! teardown. Framework integrations (see `supabase_scope_axum`) create a
//! [`RequestScope`] per request and tear it down when the request ends.

mod backend;
mod config;
mod errors;
mod gotrue;
mod options;
mod scope;

#[cfg(test)]
mod test_utils;

pub use backend::{AuthApi, BackendClient, ClientFactory};
pub use config::{SUPABASE_KEY, SUPABASE_URL, SupabaseConfig};
pub use errors::{AuthError, ClientError, SupabaseError};
pub use gotrue::{
    AuthClient, OAuthOptions, OAuthResponse, Session, SignInWithOAuthCredentials, SupabaseClient,
    SupabaseFactory, User, UserResponse,
};
pub use options::{ClientOptions, ClientOptionsInput, FlowType};
pub use scope::{RequestScope, Supabase};
