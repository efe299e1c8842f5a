use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Failure taxonomy shared by every store-facing operation.
///
/// Each variant is contained to the single requested operation; none of them
/// is fatal to the process.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected at the boundary, never sent to the store
    #[error("{0}")]
    Validation(String),

    /// Unique key collision, missing foreign key target or schema check
    #[error("{0}")]
    ConstraintViolation(String),

    /// A loosely typed field could not be parsed as the expected type
    #[error("{0}")]
    Coercion(String),

    #[error("{0}")]
    NotFound(String),

    /// Store unreachable or malformed command
    #[error("database error: {0}")]
    Engine(sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let message = db_err.message();
            let translated = match db_err.kind() {
                ErrorKind::UniqueViolation => Some(format!("Duplicate value: {message}")),
                ErrorKind::ForeignKeyViolation => {
                    Some(format!("Referenced record does not exist: {message}"))
                }
                ErrorKind::NotNullViolation => Some(format!("Missing value: {message}")),
                ErrorKind::CheckViolation => Some(format!("Value not allowed: {message}")),
                _ => None,
            };
            if let Some(message) = translated {
                return AppError::ConstraintViolation(message);
            }
        }
        AppError::Engine(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect::<Vec<_>>();
        fields.sort();
        AppError::Validation(format!("Invalid value for: {}", fields.join(", ")))
    }
}

impl AppError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, AppError::ConstraintViolation(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::Coercion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Engine(e) => {
                tracing::error!(error = %e, "Database engine error");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
