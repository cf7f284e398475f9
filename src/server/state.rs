// src/server/state.rs

//! Application state for the HTTP server.
//!
//! Holds the address of the relay server actor, shared between the HTTP and
//! WebSocket handlers.

use actix::Addr;
use crate::server::relay::server::RelayServer;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the relay server actor (session registry and fan-out).
    pub relay_addr: Addr<RelayServer>,
}

impl AppState {
    pub fn new(relay_addr: Addr<RelayServer>) -> Self {
        AppState { relay_addr }
    }
}
