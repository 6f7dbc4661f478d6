use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use tandem_types::api::{ErrorBody, ErrorDetail, ErrorKind};

pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure the API surfaces, with a stable machine-readable kind.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required table does not exist. The client's recovery path is a
    /// full-screen setup state, so this must stay distinguishable.
    #[error("required tables are missing; run the setup migration")]
    SchemaMissing,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    /// Wrong PIN on login. A gate, not an auth system, so the message
    /// stays in the house voice.
    #[error("Werey is this ur profile ?")]
    WrongPin,

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::SchemaMissing => ErrorKind::SchemaMissing,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Invalid(_) | ApiError::WrongPin => ErrorKind::Invalid,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::SchemaMissing => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::WrongPin => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Classify storage-layer failures so `?` in handlers does the right
/// thing: missing tables and uniqueness conflicts keep their kinds,
/// everything else is logged and withheld.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if tandem_db::is_missing_table(&err) {
            return ApiError::SchemaMissing;
        }
        if tandem_db::is_unique_violation(&err) {
            return ApiError::Conflict("that value is already taken".into());
        }
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!("internal error: {:#}", e);
        }

        let message = match &self {
            // Internal detail is logged, not shipped to the client.
            ApiError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind(),
                message,
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
