use axum::{Router, routing::get};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supabase_scope_axum::{
    SUPABASE_ROUTE_PREFIX, Supabase, SupabaseConfig, SupabaseFactory, supabase_router,
    with_supabase,
};

mod handlers;
mod server;

use crate::{
    handlers::{index, protected},
    server::spawn_http_server,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials are reported when a request first needs the client
    let config = SupabaseConfig::from_env();
    if config.url().is_empty() || config.key().is_empty() {
        tracing::warn!("SUPABASE_URL or SUPABASE_KEY is not set");
    }
    let supabase = Supabase::new(config);

    let app = Router::new()
        .route("/", get(index))
        .route("/protected", get(protected))
        .nest(
            SUPABASE_ROUTE_PREFIX.as_str(),
            supabase_router::<SupabaseFactory>(),
        );
    let app = with_supabase(app, supabase);

    spawn_http_server(3001, app).await?;
    Ok(())
}
