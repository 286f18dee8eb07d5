//! Conversions from external infrastructure errors into domain errors.

use caresync_domain::CareSyncError;
use reqwest::Error as HttpError;
use tokio_tungstenite::tungstenite::Error as WsError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CareSyncError);

impl From<InfraError> for CareSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CareSyncError> for InfraError {
    fn from(value: CareSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCareSyncError {
    fn into_caresync(self) -> CareSyncError;
}

/// Map an HTTP status code onto the domain error taxonomy.
///
/// Shared by the reqwest and websocket conversions, and by the API client
/// once it has read an error response body.
pub(crate) fn status_code_error(code: u16, message: String) -> CareSyncError {
    match code {
        401 | 403 => CareSyncError::Auth(message),
        404 => CareSyncError::NotFound(message),
        429 => CareSyncError::RateLimit(message),
        400..=499 => CareSyncError::InvalidInput(message),
        500..=599 => CareSyncError::Server(message),
        _ => CareSyncError::Network(message),
    }
}

fn status_message(code: u16, canonical_reason: Option<&str>) -> String {
    format!("HTTP {} {}", code, canonical_reason.unwrap_or("unknown status"))
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CareSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCareSyncError for HttpError {
    fn into_caresync(self) -> CareSyncError {
        if self.is_timeout() {
            return CareSyncError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return CareSyncError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            return status_code_error(code, status_message(code, status.canonical_reason()));
        }

        CareSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_caresync())
    }
}

/* -------------------------------------------------------------------------- */
/* tungstenite::Error → CareSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCareSyncError for WsError {
    fn into_caresync(self) -> CareSyncError {
        match self {
            WsError::ConnectionClosed | WsError::AlreadyClosed => {
                CareSyncError::Push("websocket connection already closed".into())
            }
            WsError::Io(err) => CareSyncError::Network(format!("websocket I/O failure: {err}")),
            WsError::Url(err) => CareSyncError::Config(format!("invalid websocket URL: {err}")),
            WsError::Http(response) => {
                let status = response.status();
                let code = status.as_u16();
                status_code_error(code, status_message(code, status.canonical_reason()))
            }
            other => CareSyncError::Push(other.to_string()),
        }
    }
}

impl From<WsError> for InfraError {
    fn from(value: WsError) -> Self {
        InfraError(value.into_caresync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
