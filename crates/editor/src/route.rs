//! Route identifiers and hydration tickets.

use std::str::FromStr;

use stationdesk_core::error::CoreError;
use stationdesk_core::types::DbId;

/// Route segment that opens the creation flow.
pub const NEW_STATION_SEGMENT: &str = "add";

/// Which station the page is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Creating a new station.
    New,
    /// Editing the station with this id.
    Existing(DbId),
}

impl Route {
    pub fn station_id(self) -> Option<DbId> {
        match self {
            Self::New => None,
            Self::Existing(id) => Some(id),
        }
    }
}

impl FromStr for Route {
    type Err = CoreError;

    /// Parse the route parameter: `add` or a numeric station id.
    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let segment = segment.trim();
        if segment == NEW_STATION_SEGMENT {
            return Ok(Self::New);
        }
        segment
            .parse::<DbId>()
            .map(Self::Existing)
            .map_err(|_| CoreError::Validation(format!("Invalid station route '{segment}'")))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => f.write_str(NEW_STATION_SEGMENT),
            Self::Existing(id) => write!(f, "{id}"),
        }
    }
}

/// Stamp carried by every hydration request.
///
/// A result is only applied if its ticket's generation is still the
/// editor's current one; anything older is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationTicket {
    pub generation: u64,
    pub route: Route,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_add_and_numeric_ids() {
        assert_eq!("add".parse::<Route>().unwrap(), Route::New);
        assert_eq!(" 42 ".parse::<Route>().unwrap(), Route::Existing(42));
    }

    #[test]
    fn rejects_garbage() {
        assert_matches!("abc".parse::<Route>(), Err(CoreError::Validation(_)));
        assert_matches!("".parse::<Route>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn display_round_trips() {
        for route in [Route::New, Route::Existing(8)] {
            assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
        }
    }
}
