//! HTTP endpoints for session creation and lookup.
//!
//! These sit outside the real-time path: a player creates a session, shares
//! the returned link, and both players then join over the WebSocket.

use actix_web::{error, http::StatusCode, web, Error, HttpResponse};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::server::registry::SessionId;
use crate::server::relay::messages::{CreateSession, GetSession};
use crate::server::state::AppState;
use crate::server::ws_error::http_error_response;

/// Body returned by `GET /create-session`.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedSession {
    pub session_id: SessionId,
    /// Invite link to share with the second player.
    pub url: String,
}

pub async fn create_session(data: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let session_id = data
        .relay_addr
        .send(CreateSession)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let url = format!("/join/{}", session_id);
    Ok(HttpResponse::Ok().json(CreatedSession { session_id, url }))
}

pub async fn join_session(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session_id = SessionId::new(path.into_inner());
    let lookup = data
        .relay_addr
        .send(GetSession { session_id: session_id.clone() })
        .await
        .map_err(error::ErrorInternalServerError)?;

    match lookup {
        Ok(info) => Ok(HttpResponse::Ok().json(info)),
        Err(err) => {
            debug!("[Http] Lookup of unknown session {}", session_id);
            Ok(http_error_response(
                err.code(),
                "Session not found",
                Some(session_id.as_str()),
                StatusCode::NOT_FOUND,
            ))
        }
    }
}
