//! Axum integration for supabase_scope
//!
//! ```no_run
//! use axum::{Router, routing::get};
//! use supabase_scope_axum::{
//!     SUPABASE_ROUTE_PREFIX, Supabase, SupabaseConfig, SupabaseFactory, SupabaseUser,
//!     supabase_router, with_supabase,
//! };
//!
//! async fn protected(user: SupabaseUser) -> String {
//!     format!("Hello, {}!", user.user.id)
//! }
//!
//! let supabase = Supabase::new(SupabaseConfig::from_env());
//! let app = Router::new()
//!     .route("/protected", get(protected))
//!     .nest(SUPABASE_ROUTE_PREFIX.as_str(), supabase_router::<SupabaseFactory>());
//! let app = with_supabase(app, supabase);
//! ```

mod config;
mod error;
mod extractor;
mod middleware;
mod oauth2;
mod router;

#[cfg(test)]
mod test_utils;

pub use config::{SUPABASE_OAUTH_REDIRECT_TO, SUPABASE_ROUTE_PREFIX};
pub use error::IntoResponseError;
pub use extractor::{SupabaseRequest, SupabaseUser};
pub use middleware::{ScopeHandle, supabase_scope_middleware, with_supabase};
pub use router::{supabase_router, supabase_router_no_trace};

// Re-export the core types so applications need a single dependency
pub use supabase_scope::{
    ClientOptions, ClientOptionsInput, FlowType, Supabase, SupabaseConfig, SupabaseError,
    SupabaseFactory,
};
