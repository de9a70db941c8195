use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Redirects to the link's target with `302 Found`, counting the click.
///
/// The response must not be cached, otherwise repeat visits would skip the
/// counter.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let target_url = state.shortener().resolve_and_count(&code).await?;
    let location = HeaderValue::try_from(target_url)
        .map_err(|e| AppError::Redirect(format!("{code}: {e}")))?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, location),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ),
        ],
    )
        .into_response())
}
