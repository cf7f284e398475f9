/// Session configuration constants.
/// 
/// This module defines the parameters of a relay session: how many players
/// it holds and what its shareable identifier looks like.
pub const MAX_PARTICIPANTS: usize = 2;

/// Number of characters in a session identifier (short enough to share by hand).
pub const SESSION_ID_LEN: usize = 8;

/// Characters a session identifier is drawn from.
pub const SESSION_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
