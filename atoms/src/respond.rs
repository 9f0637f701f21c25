use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

use crate::TodoError;

/// JSON response with the given status.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

pub fn ok<T: Serialize>(value: &T) -> Result<Response<Body>, Error> {
    json(StatusCode::OK, value)
}

pub fn created<T: Serialize>(value: &T) -> Result<Response<Body>, Error> {
    json(StatusCode::CREATED, value)
}

pub fn no_content() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Body::Empty)
        .map_err(Box::new)?)
}

pub fn not_found() -> Result<Response<Body>, Error> {
    message(StatusCode::NOT_FOUND, "Not found")
}

pub fn bad_request(msg: &str) -> Result<Response<Body>, Error> {
    message(StatusCode::BAD_REQUEST, msg)
}

pub fn message(status: StatusCode, msg: &str) -> Result<Response<Body>, Error> {
    json(status, &serde_json::json!({ "error": msg }))
}

pub fn status_for(err: &TodoError) -> StatusCode {
    match err {
        TodoError::Validation(_) => StatusCode::BAD_REQUEST,
        TodoError::NotFound(_) => StatusCode::NOT_FOUND,
        TodoError::Conflict(_) => StatusCode::CONFLICT,
        TodoError::Storage { .. } | TodoError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Render a service error. Storage failures are logged here so callers
/// only have to decide which status they get.
pub fn error(err: &TodoError) -> Result<Response<Body>, Error> {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!("{}", err);
    }
    message(status, &err.to_string())
}

/// Decode a JSON request body; malformed input is a 400, never a 500.
pub fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, TodoError> {
    serde_json::from_slice(body)
        .map_err(|e| TodoError::validation(format!("Invalid request body: {}", e)))
}

/// Collapse a service result into a response, mapping errors through [`error`].
pub fn respond<T, F>(result: Result<T, TodoError>, on_ok: F) -> Result<Response<Body>, Error>
where
    F: FnOnce(T) -> Result<Response<Body>, Error>,
{
    match result {
        Ok(value) => on_ok(value),
        Err(e) => error(&e),
    }
}
