//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving clients a
//! single envelope shape on every failure:
//! `{"success": false, "error": {"code", "message", "errorId", "details"}}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::{TraceId, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Error envelope schema exposed in the OpenAPI document.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false` on error responses.
    pub success: bool,
    pub error: Error,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation | ErrorCode::InvalidToken => StatusCode::BAD_REQUEST,
        ErrorCode::Authentication => StatusCode::UNAUTHORIZED,
        ErrorCode::UserNotFound | ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::UserAlreadyExists | ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::Persistence | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Store failures keep their code but never leak internal messages.
fn redact_if_internal(error: &Error) -> Error {
    if error.code().is_server_failure() {
        error!(code = ?error.code(), message = %error.message(), "internal failure returned to client");
        let mut redacted = Error::new(error.code(), "internal server error");
        if let Some(id) = error.error_id() {
            redacted = redacted.with_error_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

/// Attach the ambient request trace id, or mint one, as the `errorId`.
fn with_correlation(error: &Error) -> Error {
    if error.error_id().is_some() {
        return error.clone();
    }
    let id = TraceId::current()
        .map(|trace| trace.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    error.clone().with_error_id(id)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let correlated = with_correlation(self);
        let payload = redact_if_internal(&correlated);

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = payload.error_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope {
            success: false,
            error: payload,
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("internal server error")
    }
}
