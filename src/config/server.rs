/// Server configuration.
///
/// Listening address, heartbeat timings, and the `PORT` environment override.
use std::time::Duration;

use log::warn;

/// Host the HTTP server binds to.
pub const HOST: &str = "0.0.0.0";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5000;

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Interval between heartbeat pings sent to each WebSocket client.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// A client that has not answered for this long is disconnected.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolve the listen port from `PORT`, falling back to [`DEFAULT_PORT`].
pub fn listen_port() -> u16 {
    parse_port(std::env::var(PORT_ENV).ok().as_deref())
}

fn parse_port(raw: Option<&str>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("[Config] Invalid {}={:?}, using {}", PORT_ENV, value, DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}
