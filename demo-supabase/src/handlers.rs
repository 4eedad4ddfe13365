use axum::response::Html;
use supabase_scope_axum::{SUPABASE_ROUTE_PREFIX, SupabaseUser};

pub(crate) async fn index(user: Option<SupabaseUser>) -> Html<String> {
    let prefix = SUPABASE_ROUTE_PREFIX.as_str();
    match user {
        Some(u) => Html(format!(
            "<p>Hey {}!</p><p><a href=\"/protected\">Protected page</a></p>",
            display_name(&u)
        )),
        // The links start the OAuth flow; exchanging the returned code is up to the app
        None => Html(format!(
            "<p>Sign in with <a href=\"{prefix}/oauth2/github\">GitHub</a> or \
             <a href=\"{prefix}/oauth2/google\">Google</a>.</p>"
        )),
    }
}

pub(crate) async fn protected(user: SupabaseUser) -> Html<String> {
    tracing::trace!("Protected page for user {}", user.user.id);
    Html(format!(
        "<p>Welcome to the protected page, {}.</p><p>User id: {}</p>",
        display_name(&user),
        user.user.id
    ))
}

fn display_name(user: &SupabaseUser) -> &str {
    user.user
        .email
        .as_deref()
        .or(user.user.phone.as_deref())
        .unwrap_or("anonymous")
}
