//! ApiResponse - Envelope uniforme restituito da ogni endpoint
//!
//! `statusCode` viene serializzato come intero. La coerenza tra codice e
//! `isExitoso` è garantita dai costruttori, non dal tipo.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    pub is_exitoso: bool,
    pub error_messages: Vec<String>,
    pub resultado: Option<Value>,
    /// header Location per le risposte Created
    #[serde(skip)]
    location: Option<String>,
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self {
            status_code: StatusCode::OK,
            is_exitoso: true,
            error_messages: Vec::new(),
            resultado: None,
            location: None,
        }
    }
}

impl ApiResponse {
    pub fn ok(resultado: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            resultado: Some(serde_json::to_value(resultado)?),
            ..Self::default()
        })
    }

    pub fn created(
        resultado: impl Serialize,
        location: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: StatusCode::CREATED,
            resultado: Some(serde_json::to_value(resultado)?),
            location: Some(location.into()),
            ..Self::default()
        })
    }

    pub fn no_content() -> Self {
        Self {
            status_code: StatusCode::NO_CONTENT,
            ..Self::default()
        }
    }

    pub fn failure(status_code: StatusCode, error_messages: Vec<String>) -> Self {
        Self {
            status_code,
            is_exitoso: false,
            error_messages,
            ..Self::default()
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// true se il flag di successo è allineato al codice e solo uno tra
    /// risultato ed errori è valorizzato
    pub fn is_consistent(&self) -> bool {
        let success = self.status_code.is_success();
        if self.is_exitoso != success {
            return false;
        }
        if success {
            self.error_messages.is_empty()
        } else {
            self.resultado.is_none()
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        debug_assert!(self.is_consistent(), "inconsistent envelope: {:?}", self);
        // 204 non può avere body: si risponde 200 e il 204 resta nell'envelope
        let transport_status = if self.status_code == StatusCode::NO_CONTENT {
            StatusCode::OK
        } else {
            self.status_code
        };

        let location = self.location.clone();
        let mut response = (transport_status, Json(self)).into_response();

        if let Some(location) = location {
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    response.headers_mut().insert(header::LOCATION, value);
                }
                Err(_) => warn!("Invalid Location header value: {}", location),
            }
        }

        response
    }
}
