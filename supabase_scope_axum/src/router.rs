//! Combined router for the integration endpoints

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use supabase_scope::ClientFactory;

/// Create a router for the integration endpoints
///
/// Mount it under [`SUPABASE_ROUTE_PREFIX`](crate::SUPABASE_ROUTE_PREFIX). The
/// endpoints will be available at:
/// - {SUPABASE_ROUTE_PREFIX}/oauth2/{provider}
/// - {SUPABASE_ROUTE_PREFIX}/user
///
/// The handlers need the request scope, so install
/// [`with_supabase`](crate::with_supabase) on the outer router after nesting.
pub fn supabase_router<F: ClientFactory>() -> Router {
    supabase_router_no_trace::<F>().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`supabase_router`] but without the HTTP tracing middleware
pub fn supabase_router_no_trace<F: ClientFactory>() -> Router {
    super::oauth2::router::<F>()
}
