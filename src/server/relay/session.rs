/// WebSocket session handler for the relay.
///
/// One actor per connected client. It assigns the connection identity,
/// decodes client frames into relay events, and writes relay notifications
/// back to the socket. Stopping the actor (client close, protocol error or
/// heartbeat timeout) reports a single `Disconnect` to the relay server.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, error, info};
use std::time::Instant;

use super::messages::{ClientWsMessage, Connect, Disconnect, Join, ServerWsMessage, StateUpdate};
use super::server::RelayServer;
use crate::config::server::{CLIENT_TIMEOUT, HEARTBEAT_INTERVAL};
use crate::server::registry::ConnectionId;
use crate::server::ws_error::ws_error_message;

/// A client's WebSocket connection to the relay.
pub struct RelaySession {
    pub conn: ConnectionId,
    pub relay_addr: Addr<RelayServer>,
    /// Last time the client showed signs of life.
    last_seen: Instant,
}

impl RelaySession {
    pub fn new(relay_addr: Addr<RelayServer>) -> Self {
        Self {
            conn: ConnectionId::new(),
            relay_addr,
            last_seen: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_seen) > CLIENT_TIMEOUT {
                info!("[RelaySession] Heartbeat timeout for {}", act.conn);
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn handle_client_message(&mut self, msg: ClientWsMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg {
            ClientWsMessage::Join { session_id } => {
                self.relay_addr.do_send(Join {
                    session_id,
                    conn: self.conn,
                });
            }
            ClientWsMessage::StateUpdate { session_id, payload } => {
                self.relay_addr.do_send(StateUpdate {
                    session_id,
                    conn: self.conn,
                    payload,
                });
            }
            ClientWsMessage::Ping => {
                Handler::<ServerWsMessage>::handle(self, ServerWsMessage::Pong, ctx);
            }
        }
    }
}

impl Actor for RelaySession {
    type Context = ws::WebsocketContext<Self>;

    /// Registers this connection's address with the relay server.
    fn started(&mut self, ctx: &mut Self::Context) {
        debug!("[RelaySession] Connection {} started", self.conn);
        self.relay_addr.do_send(Connect {
            conn: self.conn,
            addr: ctx.address().recipient(),
        });
        self.start_heartbeat(ctx);
    }

    /// Removes the connection from its session, if any.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        debug!("[RelaySession] Connection {} stopped", self.conn);
        self.relay_addr.do_send(Disconnect { conn: self.conn });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RelaySession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                debug!("[RelaySession] Protocol error on {}: {}", self.conn, e);
                ctx.stop();
                return;
            }
        };
        self.last_seen = Instant::now();

        match msg {
            ws::Message::Text(text) => match serde_json::from_str::<ClientWsMessage>(&text) {
                Ok(client_msg) => self.handle_client_message(client_msg, ctx),
                Err(e) => {
                    debug!("[RelaySession] Invalid frame from {}: {}", self.conn, e);
                    ctx.text(ws_error_message("INVALID_MESSAGE", "Invalid client message"));
                }
            },
            ws::Message::Ping(bytes) => ctx.pong(&bytes),
            ws::Message::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<ServerWsMessage> for RelaySession {
    type Result = ();

    /// Writes a relay notification to the socket.
    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                error!("[RelaySession] Failed to serialize message for {}: {}", self.conn, e);
                ctx.text(ws_error_message("INTERNAL_ERROR", "Internal server error"));
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint for the relay.
///
/// Every upgrade gets a fresh connection identity; the client then joins a
/// session with a `Join` frame.
pub async fn ws_relay(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(RelaySession::new(data.relay_addr.clone()), &req, stream)
}
