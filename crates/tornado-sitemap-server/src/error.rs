use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tornado_sitemap::SitemapError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Sitemap rendering failed: {0}")]
    Render(#[from] SitemapError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Render { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
