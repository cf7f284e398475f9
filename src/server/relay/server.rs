/// Relay server actor.
///
/// Owns the session registry and the outbound address of every live
/// connection. Join, state-update and disconnect events from the WebSocket
/// sessions are handled here one at a time, so membership changes and room
/// broadcasts never interleave.

use actix::prelude::*;
use std::collections::HashMap;
use log::{debug, info, warn};

use super::messages::{
    Connect, CreateSession, Disconnect, GetSession, Join, ServerWsMessage, SessionInfo,
    StateUpdate,
};
use crate::config::session::MAX_PARTICIPANTS;
use crate::server::registry::{
    ConnectionId, RegistryError, RemovalOutcome, SessionId, SessionRegistry, Side,
};

/// Main relay server actor.
pub struct RelayServer {
    registry: SessionRegistry,
    /// Outbound address of each live connection.
    connections: HashMap<ConnectionId, Recipient<ServerWsMessage>>,
}

impl RelayServer {
    pub fn new() -> Self {
        Self {
            registry: SessionRegistry::new(),
            connections: HashMap::new(),
        }
    }

    /// Deliver a message to a single connection.
    fn send_to(&self, conn: ConnectionId, msg: ServerWsMessage) {
        match self.connections.get(&conn) {
            Some(addr) => addr.do_send(msg),
            None => debug!("[Relay] Dropping message for unknown connection {}", conn),
        }
    }

    /// Deliver a message to every participant of a session, except `exclude`.
    fn broadcast_to_room(
        &self,
        session_id: &SessionId,
        msg: ServerWsMessage,
        exclude: Option<ConnectionId>,
    ) {
        let Ok(session) = self.registry.get_session(session_id) else {
            return;
        };
        for conn in session.participant_ids().filter(|c| Some(*c) != exclude) {
            self.send_to(conn, msg.clone());
        }
    }

    /// Announce the match once both sides are present.
    fn start_game(&self, session_id: &SessionId) {
        let Ok(session) = self.registry.get_session(session_id) else {
            return;
        };
        let (Some(left), Some(right)) = (
            session.participant(Side::Left),
            session.participant(Side::Right),
        ) else {
            warn!("[Relay] Session {} is full but a side is empty", session_id);
            return;
        };
        let msg = ServerWsMessage::GameStart {
            left_participant: left.id,
            right_participant: right.id,
        };
        info!("[Relay] Game start in session {}: {} vs {}", session_id, left.id, right.id);
        self.broadcast_to_room(session_id, msg, None);
    }
}

impl Default for RelayServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for RelayServer {
    type Context = Context<Self>;
}

impl Handler<Connect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) -> Self::Result {
        debug!("[Relay] Connection opened: {}", msg.conn);
        self.connections.insert(msg.conn, msg.addr);
    }
}

impl Handler<Join> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Join, _: &mut Context<Self>) -> Self::Result {
        let Join { session_id, conn } = msg;

        let (side, total) = match self.registry.add_participant(&session_id, conn) {
            Ok(joined) => joined,
            Err(err) => {
                info!("[Relay] Join rejected for {}: {}", conn, err);
                self.send_to(conn, ServerWsMessage::from(&err));
                return;
            }
        };

        self.broadcast_to_room(
            &session_id,
            ServerWsMessage::ParticipantJoined {
                participant_id: conn,
                side,
                total_participants: total,
            },
            None,
        );

        if total == MAX_PARTICIPANTS {
            self.start_game(&session_id);
        }
    }
}

impl Handler<StateUpdate> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: StateUpdate, _: &mut Context<Self>) -> Self::Result {
        if self.registry.get_session(&msg.session_id).is_err() {
            // The peer may already have closed the session.
            debug!("[Relay] Update for unknown session {} dropped", msg.session_id);
            return;
        }
        let update = ServerWsMessage::StateUpdate {
            session_id: msg.session_id.clone(),
            payload: msg.payload,
        };
        self.broadcast_to_room(&msg.session_id, update, Some(msg.conn));
    }
}

impl Handler<Disconnect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) -> Self::Result {
        self.connections.remove(&msg.conn);

        match self.registry.remove_participant(msg.conn) {
            RemovalOutcome::ParticipantLeft { session_id, remaining } => {
                debug!("[Relay] {} left session {}", msg.conn, session_id);
                let left = ServerWsMessage::ParticipantLeft {
                    participant_id: msg.conn,
                };
                for conn in remaining {
                    self.send_to(conn, left.clone());
                }
            }
            RemovalOutcome::SessionClosed { session_id } => {
                debug!("[Relay] Last participant {} left, session {} closed", msg.conn, session_id);
            }
            RemovalOutcome::NotFound => {
                debug!("[Relay] Connection {} closed without joining", msg.conn);
            }
        }
    }
}

impl Handler<CreateSession> for RelayServer {
    type Result = MessageResult<CreateSession>;

    fn handle(&mut self, _: CreateSession, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.registry.create_session())
    }
}

impl Handler<GetSession> for RelayServer {
    type Result = Result<SessionInfo, RegistryError>;

    fn handle(&mut self, msg: GetSession, _: &mut Context<Self>) -> Self::Result {
        self.registry
            .get_session(&msg.session_id)
            .map(SessionInfo::from)
    }
}
