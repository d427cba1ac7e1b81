//! Clearance levels.

use serde::{Deserialize, Serialize};

/// Clearance level of an account or minimum clearance required by a document.
///
/// Wire format: `u8` (1 = Aprendiz, 2 = Companheiro, 3 = Mestre).
/// Levels are strictly ordered; a higher level sees everything a lower one does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    Aprendiz = 1,
    Companheiro = 2,
    Mestre = 3,
}

/// Returned when a wire value is outside `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid level {0}: must be 1 (aprendiz), 2 (companheiro) or 3 (mestre)")]
pub struct InvalidLevel(pub i64);

impl Level {
    pub const ALL: [Level; 3] = [Level::Aprendiz, Level::Companheiro, Level::Mestre];

    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Aprendiz),
            2 => Some(Self::Companheiro),
            3 => Some(Self::Mestre),
            _ => None,
        }
    }

    /// Convert from any integer, e.g. a path segment or a database column.
    pub fn from_i64(v: i64) -> Result<Self, InvalidLevel> {
        u8::try_from(v)
            .ok()
            .and_then(Self::from_u8)
            .ok_or(InvalidLevel(v))
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Display name used by clients.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aprendiz => "aprendiz",
            Self::Companheiro => "companheiro",
            Self::Mestre => "mestre",
        }
    }

    /// Every level visible from this one: `1..=self`.
    pub fn up_to(self) -> Vec<Level> {
        Self::ALL.into_iter().filter(|l| *l <= self).collect()
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::from_u8(v).ok_or(InvalidLevel(v as i64))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}
