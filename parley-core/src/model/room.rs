use crate::error::CoreError;
use crate::model::peer::PeerId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const ROOM_CODE_DIGITS: usize = 9;
const ROOM_CODE_MAX: u32 = 999_999_999;

/// Nine-digit, zero-padded room code. The host registers itself under it.
///
/// Codes are drawn at random with no check against rooms already in use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn generate() -> Self {
        let n = rand::thread_rng().gen_range(0..=ROOM_CODE_MAX);
        Self::from_number(n)
    }

    pub fn from_number(n: u32) -> Self {
        Self(format!("{:0width$}", n, width = ROOM_CODE_DIGITS))
    }

    /// Accepts exactly nine ASCII digits, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let code = input.trim();
        if code.len() != ROOM_CODE_DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidRoomCode(input.to_owned()));
        }
        Ok(Self(code.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identity of the host of this room.
    pub fn peer_id(&self) -> PeerId {
        PeerId::from(self.0.as_str())
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
