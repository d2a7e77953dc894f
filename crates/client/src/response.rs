//! # Response Handling
//!
//! Turns HTTP responses from the booking backend into domain values or
//! [`BookingError`]s. Status codes map onto error variants as follows:
//!
//! | Status     | Error                              |
//! |------------|------------------------------------|
//! | 400, 422   | [`BookingError::Validation`]       |
//! | 401        | [`BookingError::Authentication`]   |
//! | 403        | [`BookingError::Authorization`]    |
//! | 404        | [`BookingError::NotFound`]         |
//! | 409        | [`BookingError::Conflict`]         |
//! | other      | [`BookingError::Backend`]          |
//!
//! The backend reports failures as `{"detail": ...}` where `detail` is either
//! a string or a list of field errors carrying a `msg`.

use eyre::eyre;
use medibook_core::errors::{BookingError, BookingResult};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maps a non-success status and its body onto a [`BookingError`].
pub fn error_from_status(status: StatusCode, body: &str) -> BookingError {
    let detail = extract_detail(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    });

    match status.as_u16() {
        400 | 422 => BookingError::Validation(detail),
        401 => BookingError::Authentication(detail),
        403 => BookingError::Authorization(detail),
        404 => BookingError::NotFound(detail),
        409 => BookingError::Conflict(detail),
        _ => BookingError::Backend(eyre!("{} {}", status.as_u16(), detail)),
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Wraps a transport-level failure (connect, timeout, decode).
pub fn transport_error(err: reqwest::Error) -> BookingError {
    BookingError::Backend(eyre::Report::new(err).wrap_err("Request to booking backend failed"))
}

/// Fails with the mapped error unless the response is a success.
pub async fn expect_success(response: Response) -> BookingResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Backend returned {}: {}", status, body);
    Err(error_from_status(status, &body))
}

/// Decodes a successful JSON body.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> BookingResult<T> {
    expect_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(transport_error)
}
