use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Application error taxonomy.
///
/// Absence of data is not an error: lookups return `Option` and only real
/// failures end up here.
#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    /// The statistics backend could not be reached; nothing was applied.
    Unavailable { message: String, details: Value },
    /// The connection failed after a write was sent. The write may or may
    /// not have been applied, so it must not be repeated.
    Interrupted { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn interrupted(message: impl Into<String>, details: Value) -> Self {
        Self::Interrupted {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Whether retrying the same operation may succeed without applying it twice.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Unavailable { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Unavailable { message, .. }
            | AppError::Interrupted { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    fn into_parts(self) -> (StatusCode, ErrorInfo) {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Unavailable { message, details }
            | AppError::Interrupted { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "stats_unavailable",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        (
            status,
            ErrorInfo {
                code,
                message,
                details,
            },
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.into_parts();
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() || e.is_connection_refusal()
        {
            tracing::warn!("Redis unavailable: {}", e);
            return AppError::unavailable("Statistics backend unavailable", json!({}));
        }

        tracing::error!("Redis error: {}", e);
        AppError::internal("Redis error", json!({}))
    }
}

/// Maps an error returned by a Redis command that writes.
///
/// Only a refused connection proves the command never reached the server.
/// Any other connection failure may have happened after `EXEC` ran.
pub fn map_redis_write_error(e: redis::RedisError) -> AppError {
    if e.is_connection_refusal() {
        tracing::warn!("Redis unavailable: {}", e);
        return AppError::unavailable("Statistics backend unavailable", json!({}));
    }

    if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() {
        tracing::error!("Redis connection lost during write: {}", e);
        return AppError::interrupted("Statistics write outcome unknown", json!({}));
    }

    tracing::error!("Redis error: {}", e);
    AppError::internal("Redis error", json!({}))
}

/// Maps an error returned by `COMMIT`.
///
/// A connection failure here may arrive after the server committed, so it is
/// reported as [`AppError::Interrupted`]. Failures before `COMMIT` are safe to
/// retry because the server rolls back a transaction whose connection drops.
pub fn map_sqlx_commit_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) => {
            tracing::error!("Connection lost during commit: {}", e);
            AppError::interrupted("Statistics write outcome unknown", json!({}))
        }
        other => map_sqlx_error(other),
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::bad_request(e.body_text(), json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        AppError::bad_request("Invalid request body", json!({ "fields": fields }))
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!("Database unavailable: {}", e);
            AppError::unavailable("Statistics backend unavailable", json!({}))
        }
        other => {
            if let Some(db) = other.as_database_error() {
                tracing::error!("Database error: {}", db);
                return AppError::internal(
                    "Database error",
                    json!({ "constraint": db.constraint() }),
                );
            }

            tracing::error!("Database error: {}", other);
            AppError::internal("Database error", json!({}))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::bad_request("bad", json!({})), StatusCode::BAD_REQUEST),
            (AppError::not_found("missing", json!({})), StatusCode::NOT_FOUND),
            (
                AppError::unavailable("down", json!({})),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::internal("boom", json!({})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unavailable_error_code() {
        let (_, info) = AppError::unavailable("down", json!({})).into_parts();
        assert_eq!(info.code, "stats_unavailable");
        assert_eq!(info.message, "down");
    }

    #[test]
    fn test_only_unavailable_is_transient() {
        assert!(AppError::unavailable("down", json!({})).is_transient());
        assert!(!AppError::interrupted("lost", json!({})).is_transient());
        assert!(!AppError::internal("boom", json!({})).is_transient());
        assert!(!AppError::bad_request("bad", json!({})).is_transient());
    }

    #[test]
    fn test_interrupted_renders_as_unavailable() {
        let (status, info) = AppError::interrupted("lost", json!({})).into_parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(info.code, "stats_unavailable");
    }

    #[test]
    fn test_redis_write_refusal_is_retryable() {
        let refused = redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(map_redis_write_error(refused).is_transient());
    }

    #[test]
    fn test_redis_write_dropped_connection_is_not_retryable() {
        let dropped = redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "broken pipe",
        ));
        let error = map_redis_write_error(dropped);
        assert!(matches!(error, AppError::Interrupted { .. }));
        assert!(!error.is_transient());
    }

    #[test]
    fn test_sqlx_commit_io_error_is_not_retryable() {
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ));
        let error = map_sqlx_commit_error(io);
        assert!(matches!(error, AppError::Interrupted { .. }));
        assert!(!error.is_transient());

        assert!(map_sqlx_commit_error(sqlx::Error::PoolTimedOut).is_transient());
    }

    #[test]
    fn test_sqlx_pool_timeout_is_unavailable() {
        let error: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, AppError::Unavailable { .. }));
    }

    #[test]
    fn test_sqlx_row_not_found_is_internal() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::Internal { .. }));
    }
}
