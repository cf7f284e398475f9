//! HTTP and WebSocket routing configuration.
//!
//! Session creation and lookup are plain HTTP; gameplay traffic goes through
//! the relay WebSocket, handled by one actor per connection.

use actix_web::web;
use crate::server::http::{create_session, join_session};
use crate::server::relay::session::ws_relay;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/create-session")
            .route(web::get().to(create_session))
    )
    .service(
        web::resource("/join/{session_id}")
            .route(web::get().to(join_session))
    )
    .service(
        web::resource("/ws")
            .to(ws_relay)
    );
}
