// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the relay server components:
//! - Session registry (sessions, participants, sides, lifecycle)
//! - Relay dispatch (join, state updates, disconnects) and WebSocket sessions
//! - HTTP endpoints and routing
//! - Application state shared by the handlers

pub mod state;
pub mod router;
pub mod http;
pub mod registry;
pub mod relay;
pub mod ws_error;
