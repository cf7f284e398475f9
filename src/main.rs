//! Main entry point for the relay server.
//!
//! Starts the relay actor, configures application state, and launches the HTTP
//! server with the session endpoints and the relay WebSocket.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;
use server::relay::RelayServer;

pub mod config;
mod server;


#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Log level comes from RUST_LOG, info by default.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The relay actor owns the session registry for the lifetime of the process.
    let relay_addr = RelayServer::new().start();

    let state = web::Data::new(server::state::AppState::new(relay_addr));

    let port = config::server::listen_port();
    info!("[Main] Relay server listening on {}:{}", config::server::HOST, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((config::server::HOST, port))?
    .run()
    .await
}
