use actix::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::registry::{ConnectionId, RegistryError, Session, SessionId, SessionState, Side};

// Client -> server
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data")]
pub enum ClientWsMessage {
    Join {
        session_id: SessionId,
    },
    StateUpdate {
        session_id: SessionId,
        payload: Value,
    },
    Ping,
}

// Server -> client
#[derive(Message, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerWsMessage {
    ParticipantJoined {
        participant_id: ConnectionId,
        side: Side,
        total_participants: usize,
    },
    GameStart {
        left_participant: ConnectionId,
        right_participant: ConnectionId,
    },
    /// Opaque game state from the peer, forwarded untouched.
    StateUpdate {
        session_id: SessionId,
        payload: Value,
    },
    ParticipantLeft {
        participant_id: ConnectionId,
    },
    Error {
        code: String,
        message: String,
    },
    Pong,
}

impl ServerWsMessage {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<&RegistryError> for ServerWsMessage {
    fn from(err: &RegistryError) -> Self {
        Self::error(err.code(), err.to_string())
    }
}

/// Read-only view of a session, returned to HTTP callers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub state: SessionState,
    pub participants: Vec<ParticipantInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParticipantInfo {
    pub participant_id: ConnectionId,
    pub side: Side,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            state: session.state,
            participants: session
                .participants
                .iter()
                .map(|p| ParticipantInfo {
                    participant_id: p.id,
                    side: p.side,
                })
                .collect(),
        }
    }
}

/// A connection opened; `addr` receives everything addressed to it.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub conn: ConnectionId,
    pub addr: Recipient<ServerWsMessage>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub session_id: SessionId,
    pub conn: ConnectionId,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct StateUpdate {
    pub session_id: SessionId,
    pub conn: ConnectionId,
    pub payload: Value,
}

/// The connection is gone. Safe to send more than once.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub conn: ConnectionId,
}

#[derive(Message)]
#[rtype(result = "SessionId")]
pub struct CreateSession;

#[derive(Message)]
#[rtype(result = "Result<SessionInfo, RegistryError>")]
pub struct GetSession {
    pub session_id: SessionId,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_client_join_parsing() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"action":"Join","data":{"session_id":"ab12cd34"}}"#).unwrap();
        match msg {
            ClientWsMessage::Join { session_id } => assert_eq!(session_id.as_str(), "ab12cd34"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_client_state_update_keeps_payload() {
        let text = r#"{"action":"StateUpdate","data":{"session_id":"ab12cd34","payload":{"ball":{"x":1.5,"y":2},"scores":[3,4]}}}"#;
        let msg: ClientWsMessage = serde_json::from_str(text).unwrap();
        match msg {
            ClientWsMessage::StateUpdate { payload, .. } => {
                assert_eq!(payload, json!({"ball": {"x": 1.5, "y": 2}, "scores": [3, 4]}));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_client_ping_parsing() {
        let msg: ClientWsMessage = serde_json::from_str(r#"{"action":"Ping"}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::Ping));
    }

    #[test]
    fn test_client_message_missing_fields_rejected() {
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"action":"Join","data":{}}"#).is_err());
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"action":"StateUpdate","data":{"payload":1}}"#).is_err());
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"action":"Launch"}"#).is_err());
    }

    #[test]
    fn test_server_message_envelope() {
        let value = serde_json::to_value(ServerWsMessage::ParticipantLeft {
            participant_id: ConnectionId::new(),
        })
        .unwrap();
        assert_eq!(value["action"], "ParticipantLeft");
        assert!(value["data"]["participant_id"].is_string());

        let value = serde_json::to_value(ServerWsMessage::from(&RegistryError::SessionFull(
            SessionId::new("ab12cd34"),
        )))
        .unwrap();
        assert_eq!(value["action"], "Error");
        assert_eq!(value["data"]["code"], "SESSION_FULL");
    }

    #[test]
    fn test_side_serializes_lowercase() {
        let value = serde_json::to_value(ServerWsMessage::ParticipantJoined {
            participant_id: ConnectionId::new(),
            side: Side::Right,
            total_participants: 2,
        })
        .unwrap();
        assert_eq!(value["data"]["side"], "right");
        assert_eq!(value["data"]["total_participants"], 2);
    }
}
