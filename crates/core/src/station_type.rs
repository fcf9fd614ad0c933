//! Station hierarchy levels.
//!
//! The numeric code is what the station directory stores; the display name
//! is what the console shows. The level decides which form fields are
//! mandatory.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One tier of the delivery network, lowest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum StationType {
    #[default]
    Ward = 0,
    District = 1,
    City = 2,
}

impl StationType {
    /// All station types, lowest level first.
    pub const ALL: [StationType; 3] = [Self::Ward, Self::District, Self::City];

    /// Parse the numeric code stored by the station directory.
    pub fn from_code(code: u8) -> Result<Self, CoreError> {
        match code {
            0 => Ok(Self::Ward),
            1 => Ok(Self::District),
            2 => Ok(Self::City),
            other => Err(CoreError::UnknownStationType(other)),
        }
    }

    /// Numeric code sent back to the station directory.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ward => "Ward station",
            Self::District => "District station",
            Self::City => "City station",
        }
    }

    /// Whether this is the root of the hierarchy.
    pub fn is_topmost(self) -> bool {
        self == Self::City
    }

    /// Every station except the topmost one hangs under a parent.
    pub fn requires_parent(self) -> bool {
        !self.is_topmost()
    }

    /// Lowest-level stations are addressed down to ward and street.
    pub fn requires_point_address(self) -> bool {
        self == Self::Ward
    }

    /// Whether a station of type `self` may act as parent of `child`.
    pub fn can_parent(self, child: StationType) -> bool {
        self > child
    }
}

impl TryFrom<u8> for StationType {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<StationType> for u8 {
    fn from(value: StationType) -> Self {
        value.code()
    }
}

impl std::fmt::Display for StationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
