//! Session registry implementation

use std::collections::HashMap;

use log::{debug, info};
use rand::Rng;

use super::error::RegistryError;
use super::types::{ConnectionId, Participant, Session, SessionId, SessionState, Side};
use crate::config::session::{MAX_PARTICIPANTS, SESSION_ID_ALPHABET, SESSION_ID_LEN};

/// Result of removing a connection from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The participant left; `remaining` are still in the session.
    ParticipantLeft {
        session_id: SessionId,
        remaining: Vec<ConnectionId>,
    },
    /// The participant was the last one; the session no longer exists.
    SessionClosed { session_id: SessionId },
    /// The connection was not a participant of any session.
    NotFound,
}

/// All live sessions, keyed by identifier.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    /// Reverse index, kept in step with every session's participant list.
    memberships: HashMap<ConnectionId, SessionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session in the `Waiting` state and return its identifier.
    pub fn create_session(&mut self) -> SessionId {
        let id = loop {
            let candidate = generate_session_id();
            if !self.sessions.contains_key(&candidate) {
                break candidate;
            }
            debug!("[Registry] Session id collision on {}, drawing again", candidate);
        };
        self.sessions.insert(id.clone(), Session::new(id.clone()));
        info!("[Registry] Session created: {} (active={})", id, self.sessions.len());
        id
    }

    pub fn get_session(&self, id: &SessionId) -> Result<&Session, RegistryError> {
        self.sessions
            .get(id)
            .ok_or_else(|| RegistryError::SessionNotFound(id.clone()))
    }

    /// Add `conn` to session `id`.
    ///
    /// Returns the assigned side and the new participant count. The second
    /// join moves the session to `Playing`.
    pub fn add_participant(
        &mut self,
        id: &SessionId,
        conn: ConnectionId,
    ) -> Result<(Side, usize), RegistryError> {
        if let Some(current) = self.memberships.get(&conn) {
            return Err(RegistryError::AlreadyJoined(current.clone()));
        }

        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| RegistryError::SessionNotFound(id.clone()))?;

        let side = match session.free_side() {
            Some(side) if session.len() < MAX_PARTICIPANTS => side,
            _ => return Err(RegistryError::SessionFull(id.clone())),
        };
        session.participants.push(Participant { id: conn, side });
        let total = session.len();
        if total == MAX_PARTICIPANTS {
            session.state = SessionState::Playing;
        }
        self.memberships.insert(conn, id.clone());

        info!(
            "[Registry] Participant {} joined session {} as {:?} ({}/{})",
            conn, id, side, total, MAX_PARTICIPANTS
        );
        Ok((side, total))
    }

    /// Remove `conn` from whichever session it belongs to.
    ///
    /// An emptied session is dropped from the registry.
    pub fn remove_participant(&mut self, conn: ConnectionId) -> RemovalOutcome {
        let Some(session_id) = self.memberships.remove(&conn) else {
            return RemovalOutcome::NotFound;
        };
        let Some(session) = self.sessions.get_mut(&session_id) else {
            return RemovalOutcome::NotFound;
        };

        session.participants.retain(|p| p.id != conn);
        if session.len() < MAX_PARTICIPANTS {
            session.state = SessionState::Waiting;
        }

        if session.is_empty() {
            self.sessions.remove(&session_id);
            info!(
                "[Registry] Session {} closed (active={})",
                session_id,
                self.sessions.len()
            );
            RemovalOutcome::SessionClosed { session_id }
        } else {
            let remaining = session.participant_ids().collect();
            info!("[Registry] Participant {} left session {}", conn, session_id);
            RemovalOutcome::ParticipantLeft {
                session_id,
                remaining,
            }
        }
    }

    /// Session `conn` currently participates in, if any.
    pub fn session_of(&self, conn: ConnectionId) -> Option<&SessionId> {
        self.memberships.get(&conn)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn generate_session_id() -> SessionId {
    let mut rng = rand::rng();
    let token: String = (0..SESSION_ID_LEN)
        .map(|_| SESSION_ID_ALPHABET[rng.random_range(0..SESSION_ID_ALPHABET.len())] as char)
        .collect();
    SessionId::new(token)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_create_session_is_waiting_and_empty() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session();

        let session = registry.get_session(&id).unwrap();
        assert_eq!(session.state, SessionState::Waiting);
        assert!(session.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_session_ids_are_short_tokens() {
        let mut registry = SessionRegistry::new();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let id = registry.create_session();
            assert_eq!(id.as_str().len(), SESSION_ID_LEN);
            assert!(id.as_str().bytes().all(|b| SESSION_ID_ALPHABET.contains(&b)));
            assert!(seen.insert(id));
        }
        assert_eq!(registry.len(), 1000);
    }

    #[test]
    fn test_get_unknown_session() {
        let registry = SessionRegistry::new();
        let id = SessionId::new("missing0");
        assert_eq!(
            registry.get_session(&id).unwrap_err(),
            RegistryError::SessionNotFound(id)
        );
    }

    #[test]
    fn test_sides_follow_join_order() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session();
        let (first, second, third) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

        assert_eq!(registry.add_participant(&id, first), Ok((Side::Left, 1)));
        assert_eq!(registry.get_session(&id).unwrap().state, SessionState::Waiting);

        assert_eq!(registry.add_participant(&id, second), Ok((Side::Right, 2)));
        assert_eq!(registry.get_session(&id).unwrap().state, SessionState::Playing);

        assert_eq!(
            registry.add_participant(&id, third),
            Err(RegistryError::SessionFull(id.clone()))
        );
        assert_eq!(registry.get_session(&id).unwrap().len(), 2);
        assert!(registry.session_of(third).is_none());
    }

    #[test]
    fn test_join_unknown_session() {
        let mut registry = SessionRegistry::new();
        let id = SessionId::new("nothere1");
        let conn = ConnectionId::new();

        assert_eq!(
            registry.add_participant(&id, conn),
            Err(RegistryError::SessionNotFound(id))
        );
        assert!(registry.session_of(conn).is_none());
    }

    #[test]
    fn test_connection_cannot_join_twice() {
        let mut registry = SessionRegistry::new();
        let a = registry.create_session();
        let b = registry.create_session();
        let conn = ConnectionId::new();

        registry.add_participant(&a, conn).unwrap();
        assert_eq!(
            registry.add_participant(&a, conn),
            Err(RegistryError::AlreadyJoined(a.clone()))
        );
        assert_eq!(
            registry.add_participant(&b, conn),
            Err(RegistryError::AlreadyJoined(a.clone()))
        );
        assert_eq!(registry.get_session(&a).unwrap().len(), 1);
        assert!(registry.get_session(&b).unwrap().is_empty());
    }

    #[test]
    fn test_remove_participant_leaves_peer() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session();
        let (left, right) = (ConnectionId::new(), ConnectionId::new());
        registry.add_participant(&id, left).unwrap();
        registry.add_participant(&id, right).unwrap();

        assert_eq!(
            registry.remove_participant(left),
            RemovalOutcome::ParticipantLeft {
                session_id: id.clone(),
                remaining: vec![right],
            }
        );

        let session = registry.get_session(&id).unwrap();
        assert_eq!(session.len(), 1);
        assert_eq!(session.state, SessionState::Waiting);
        assert_eq!(session.participant(Side::Right).map(|p| p.id), Some(right));
        assert!(registry.session_of(left).is_none());
    }

    #[test]
    fn test_last_participant_closes_session() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session();
        let conn = ConnectionId::new();
        registry.add_participant(&id, conn).unwrap();

        assert_eq!(
            registry.remove_participant(conn),
            RemovalOutcome::SessionClosed { session_id: id.clone() }
        );
        assert_eq!(
            registry.get_session(&id).unwrap_err(),
            RegistryError::SessionNotFound(id)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unknown_connection_is_noop() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session();
        let conn = ConnectionId::new();

        assert_eq!(registry.remove_participant(conn), RemovalOutcome::NotFound);
        assert_eq!(registry.remove_participant(conn), RemovalOutcome::NotFound);
        assert!(registry.get_session(&id).is_ok());
    }

    #[test]
    fn test_rejoin_takes_the_free_side() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session();
        let (left, right, newcomer) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        registry.add_participant(&id, left).unwrap();
        registry.add_participant(&id, right).unwrap();
        registry.remove_participant(left);

        assert_eq!(registry.add_participant(&id, newcomer), Ok((Side::Left, 2)));
        let session = registry.get_session(&id).unwrap();
        assert_eq!(session.state, SessionState::Playing);
        assert_eq!(session.participant(Side::Left).map(|p| p.id), Some(newcomer));
        assert_eq!(session.participant(Side::Right).map(|p| p.id), Some(right));
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session();
        let (left, right) = (ConnectionId::new(), ConnectionId::new());
        registry.add_participant(&id, left).unwrap();
        registry.add_participant(&id, right).unwrap();

        registry.remove_participant(left);
        assert_eq!(registry.remove_participant(left), RemovalOutcome::NotFound);
        assert_eq!(registry.get_session(&id).unwrap().len(), 1);
    }
}
