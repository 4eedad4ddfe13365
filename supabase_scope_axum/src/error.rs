use http::StatusCode;
use supabase_scope::{AuthError, SupabaseError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Status code for a scope error.
///
/// Auth API errors keep the status the auth server answered with.
pub(crate) fn status_for(err: &SupabaseError) -> StatusCode {
    match err {
        SupabaseError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SupabaseError::Construction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SupabaseError::Auth(AuthError::Api { status, .. }) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        SupabaseError::Auth(AuthError::Http(_)) => StatusCode::BAD_GATEWAY,
        SupabaseError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T> IntoResponseError<T> for Result<T, SupabaseError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (status_for(&e), e.to_string()))
    }
}
