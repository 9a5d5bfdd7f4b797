use super::ApiResponse;
use crate::dtos::PatchError;
use crate::store::StoreError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{http::StatusCode, response::IntoResponse};
use tracing::{debug, error};

/// Errore di un handler, reso al client come envelope con `isExitoso = false`
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Messaggi per `errorMessages`: il messaggio e, se presenti, i dettagli
    pub fn messages(&self) -> Vec<String> {
        let mut messages = vec![self.message.to_string()];
        if let Some(details) = &self.details {
            messages.push(details.clone());
        }
        messages
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_constraint_violation() {
            return Self::bad_request("Constraint violation").with_details(err.to_string());
        }

        match err {
            StoreError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) => {
                Self::service_unavailable("Database unavailable")
            }
            other => {
                error!("Store failure: {}", other);
                Self::internal_server_error("Internal server error").with_details(other.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal_server_error("Internal server error").with_details(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Validation error").with_details(err.to_string())
    }
}

impl From<PatchError> for AppError {
    fn from(err: PatchError) -> Self {
        Self::bad_request("Invalid patch document").with_details(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_details(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("Invalid path parameter").with_details(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        debug!("Request failed with {}: {}", status, self.message);
        ApiResponse::failure(status, self.messages()).into_response()
    }
}
