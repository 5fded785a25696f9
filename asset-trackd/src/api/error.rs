use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use super::pages;

/// Handler failure. Store and task failures are not retried; they end the
/// request with the generic error page.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(reason) => {
                tracing::warn!("Rejected request: {}", reason);
                (StatusCode::BAD_REQUEST, Html(pages::error("The request could not be read.")))
                    .into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(pages::error("Something went wrong. Please try again.")),
                )
                    .into_response()
            }
        }
    }
}
