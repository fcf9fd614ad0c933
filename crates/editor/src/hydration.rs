//! Read path: fetching a station and its parent candidates.
//!
//! These functions do not touch the editor. They take a
//! [`HydrationTicket`] and hand it back with the result, so the editor can
//! drop anything that belongs to a route it has already left.

use stationdesk_core::error::ServiceError;
use stationdesk_core::images::PhotoRef;
use stationdesk_core::services::{PhotoService, StationDirectory};
use stationdesk_core::station::{StationFilter, StationRecord};

use crate::route::{HydrationTicket, Route};

/// Data needed before the form can be shown.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// `None` in the creation flow.
    pub record: Option<StationRecord>,
    pub candidates: Vec<StationRecord>,
}

/// A finished hydration request, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct Hydration {
    pub ticket: HydrationTicket,
    pub outcome: Result<Loaded, ServiceError>,
}

/// Fetch the candidate list and, when editing, the station record.
///
/// Both requests are in flight at the same time; the hydration completes
/// when both have answered, and fails if either fails.
pub async fn hydrate(
    stations: &dyn StationDirectory,
    ticket: HydrationTicket,
    filter: &StationFilter,
) -> Hydration {
    tracing::debug!(route = %ticket.route, generation = ticket.generation, "Hydrating station form");

    let outcome = match ticket.route {
        Route::New => stations.list(filter).await.map(|candidates| Loaded {
            record: None,
            candidates,
        }),
        Route::Existing(id) => futures::try_join!(stations.list(filter), stations.get(id)).map(
            |(candidates, record)| Loaded {
                record: Some(record),
                candidates,
            },
        ),
    };

    Hydration { ticket, outcome }
}

/// One existing photo to fetch after the record has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoRequest {
    pub ticket: HydrationTicket,
    /// Position of the photo in the record's photo list.
    pub rank: usize,
    pub photo: PhotoRef,
}

/// A finished photo fetch.
#[derive(Debug)]
pub struct PhotoArrival {
    pub request: PhotoRequest,
    pub result: Result<Vec<u8>, ServiceError>,
}

pub async fn fetch_photo(photos: &dyn PhotoService, request: PhotoRequest) -> PhotoArrival {
    let result = photos.get(request.photo.id).await;
    PhotoArrival { request, result }
}
