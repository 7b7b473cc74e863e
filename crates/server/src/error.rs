//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_loader::QueryError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error returned by route handlers.
///
/// Query errors map to client errors; everything else is a 500 whose details
/// only go to the log.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<QueryError>() {
            Ok(query_error) => ApiError::Query(query_error),
            Err(err) => ApiError::Internal(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(QueryError::ItemNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Query(QueryError::InvalidPeriod(_)) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Query(err) => err.to_string(),
            ApiError::Internal(err) => {
                error!("Request failed: {:#}", err);
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_query_errors_survive_anyhow() {
        let err: anyhow::Error = QueryError::ItemNotFound(7).into();
        assert_eq!(ApiError::from(err).status(), StatusCode::NOT_FOUND);

        let err = Err::<(), _>(QueryError::InvalidPeriod("week".to_string()))
            .context("ratings over time")
            .unwrap_err();
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(ApiError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
