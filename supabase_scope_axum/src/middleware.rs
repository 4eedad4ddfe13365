use axum::{
    Router,
    extract::{Request, State},
    middleware::{Next, from_fn_with_state},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use supabase_scope::{ClientFactory, RequestScope, Supabase, SupabaseFactory};

/// Shared handle to the current request's [`RequestScope`]
///
/// Stored in the request extensions by [`supabase_scope_middleware`]. The
/// handler and the middleware both hold one. Each request has its own lock.
pub struct ScopeHandle<F: ClientFactory = SupabaseFactory>(Arc<Mutex<RequestScope<F>>>);

impl<F: ClientFactory> Clone for ScopeHandle<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<F: ClientFactory> ScopeHandle<F> {
    pub(crate) fn new(scope: RequestScope<F>) -> Self {
        Self(Arc::new(Mutex::new(scope)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, RequestScope<F>> {
        self.0.lock().await
    }
}

/// Middleware that opens a client scope for each request and tears it
/// down once the response is ready, whatever the handler returned.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use supabase_scope::{Supabase, SupabaseConfig, SupabaseFactory};
/// use supabase_scope_axum::supabase_scope_middleware;
///
/// let supabase = Supabase::new(SupabaseConfig::from_env());
/// let app: Router = Router::new()
///     .route("/", get(|| async { "Hello" }))
///     .layer(from_fn_with_state(
///         supabase,
///         supabase_scope_middleware::<SupabaseFactory>,
///     ));
/// ```
pub async fn supabase_scope_middleware<F: ClientFactory>(
    State(supabase): State<Supabase<F>>,
    mut req: Request,
    next: Next,
) -> Response {
    let handle = ScopeHandle::new(supabase.begin_request());
    req.extensions_mut().insert(handle.clone());

    let response = next.run(req).await;

    let released = handle.lock().await.teardown();
    tracing::debug!(
        "Supabase request scope torn down (client released: {})",
        released
    );
    response
}

/// Install [`supabase_scope_middleware`] on every route of `router`
pub fn with_supabase<F: ClientFactory>(router: Router, supabase: Supabase<F>) -> Router {
    router.layer(from_fn_with_state(supabase, supabase_scope_middleware::<F>))
}
