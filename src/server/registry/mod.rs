//! Session registry.
//!
//! Owns every live session, its participants (in join order) and a reverse
//! index from connection to session. The registry is a plain structure with no
//! internal locking: its owner (the relay server actor) serializes access, so
//! each operation below is atomic with respect to the others.

pub mod error;
pub mod store;
pub mod types;

pub use error::RegistryError;
pub use store::{RemovalOutcome, SessionRegistry};
pub use types::{ConnectionId, Session, SessionId, SessionState, Side};
