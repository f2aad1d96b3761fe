use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Unavailable(#[from] DbErr),

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Unavailable(_) => "unavailable",
            AppError::Export(_) => "internal",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

/// Admin-facing: the full message is returned.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Unavailable(e) => tracing::error!("Store failure: {}", e),
            AppError::Export(e) => tracing::error!("CSV export failure: {}", e),
            _ => {}
        }
        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Public-facing wrapper: hides store details and unknown-id specifics.
#[derive(Debug)]
pub struct PublicError(pub AppError);

impl From<AppError> for PublicError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for PublicError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Unavailable(err))
    }
}

impl IntoResponse for PublicError {
    fn into_response(self) -> Response {
        let message = match &self.0 {
            AppError::Validation(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound(_) => "We couldn't find what you were looking for.".to_string(),
            AppError::Unavailable(e) => {
                tracing::error!("Store failure on public route: {}", e);
                "Something went wrong, please try again shortly.".to_string()
            }
            AppError::Export(e) => {
                tracing::error!("Unexpected export on public route: {}", e);
                "Something went wrong, please try again shortly.".to_string()
            }
        };
        let body = ErrorResponse {
            error: self.0.kind(),
            message,
        };
        (self.0.status_code(), Json(body)).into_response()
    }
}

/// One failed entry of a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchError {
    pub item: String,
    pub reason: String,
}

impl BatchError {
    pub fn new(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item, self.reason)
    }
}

/// Partial-success envelope for imports.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub ok_count: usize,
    pub errors: Vec<BatchError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("bad").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::not_found("guest").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("taken").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(DbErr::Custom("down".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(AppError::not_found("invite").to_string(), "invite not found");
    }

    #[test]
    fn test_batch_error_display() {
        let err = BatchError::new("ABCD1234", "no valid email");
        assert_eq!(err.to_string(), "ABCD1234: no valid email");
    }
}
