/// Centralized helpers for WebSocket and HTTP error responses.
///
/// Every error carries a stable code and a human-readable message, so clients
/// can branch on the code and show the message.
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

use crate::server::relay::messages::ServerWsMessage;

/// Formats a WebSocket `Error` frame as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_MESSAGE").
/// - `message`: Human-readable error message (in English).
pub fn ws_error_message(code: &str, message: &str) -> String {
    serde_json::to_string(&ServerWsMessage::error(code, message)).unwrap_or_else(|_| {
        json!({ "action": "Error", "data": { "code": code, "message": message } }).to_string()
    })
}

/// Returns an HTTP error response with a JSON body.
///
/// # Arguments
/// - `code`: Unique error code.
/// - `message`: Human-readable error message.
/// - `context`: Optional context string (e.g. the session id).
/// - `status`: HTTP status code.
pub fn http_error_response(
    code: &str,
    message: &str,
    context: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": {
            "code": code,
            "message": message,
            "context": context.unwrap_or(""),
        }
    }))
}
