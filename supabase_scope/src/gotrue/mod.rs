//! Default backend: a thin HTTP client for a Supabase project and its
//! GoTrue auth API

mod auth;
mod client;
mod pkce;
mod types;

pub use auth::AuthClient;
pub use client::{SupabaseClient, SupabaseFactory};
pub use types::{
    OAuthOptions, OAuthResponse, Session, SignInWithOAuthCredentials, User, UserResponse,
};
