use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Bar sequences the indicator engine refuses to analyze.
///
/// Every other data-quality problem (short history, a forecast that will not
/// fit) degrades to a neutral reading instead of surfacing here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No bars to analyze")]
    EmptySeries,

    #[error("Bar times must be strictly increasing (bar {index} at {time} follows {previous})")]
    NonMonotonic { index: usize, time: i64, previous: i64 },

    #[error("Bar {index} has an out-of-range timestamp {time}")]
    InvalidTimestamp { index: usize, time: i64 },

    #[error("Bar {index} has a non-finite price or volume")]
    NonFinitePrice { index: usize },
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Analysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Reqwest(_) => StatusCode::BAD_GATEWAY,
            AppError::SerdeJson(_) => StatusCode::BAD_GATEWAY,
            AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg)
            | AppError::ExternalApi(msg) => msg.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{}", message);
        }

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ExternalApi("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::from(AnalysisError::EmptySeries).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_analysis_error_messages() {
        let err = AnalysisError::NonMonotonic {
            index: 3,
            time: 100,
            previous: 200,
        };
        assert_eq!(
            err.to_string(),
            "Bar times must be strictly increasing (bar 3 at 100 follows 200)"
        );
        assert_eq!(
            AnalysisError::NonFinitePrice { index: 7 }.to_string(),
            "Bar 7 has a non-finite price or volume"
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::BadRequest("Invalid period".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
