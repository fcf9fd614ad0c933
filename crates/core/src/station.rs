//! Station records, the editable form state, and conversion between them.
//!
//! [`StationRecord`] and [`ServerPayload`] are the wire shapes exchanged
//! with the station directory. [`FormState`] is what the editor mutates.

use serde::{Deserialize, Serialize};

use crate::address::{resolve_address_for_editing, Address, PersistedAddress};
use crate::error::CoreError;
use crate::images::{ImageSlot, PhotoRef};
use crate::station_type::StationType;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// A station as returned by the station directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    #[serde(default)]
    pub address: PersistedAddress,
    #[serde(default)]
    pub parent_station: Option<ParentStationRecord>,
    #[serde(default)]
    pub wards: Vec<WardRecord>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

/// The parent station as nested in a [`StationRecord`].
///
/// Fields the editor has no use for are kept in `extra` so the record still
/// parses when the directory embeds more of the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentStationRecord {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A subordinate ward as nested in a [`StationRecord`], often with its own
/// address and other sub-objects in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardRecord {
    pub id: DbId,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Create/update body sent to the station directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    pub name: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    pub address: PersistedAddress,
    pub parent_station_id: Option<DbId>,
    pub wards: Vec<WardRef>,
    pub photos: Vec<PhotoRef>,
}

/// Filter passed to [`StationDirectory::list`](crate::services::StationDirectory::list).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationFilter {
    pub query: String,
}

impl StationFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Editable shapes
// ---------------------------------------------------------------------------

/// Minimal reference to another station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRef {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub station_type: StationType,
}

/// Minimal reference to a subordinate ward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WardRef {
    pub id: DbId,
    pub name: String,
}

impl WardRef {
    pub fn new(id: DbId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Editable station form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// `None` while creating a new station.
    pub id: Option<DbId>,
    pub name: String,
    pub station_type: StationType,
    pub address: Address,
    pub parent_station: Option<StationRef>,
    pub wards: Vec<WardRef>,
    pub images: Vec<ImageSlot>,
}

impl FormState {
    /// Blank form for the creation flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Photo references for slots that are already persisted, in slot order.
    pub fn persisted_photos(&self) -> Vec<PhotoRef> {
        self.images
            .iter()
            .filter_map(ImageSlot::persisted_id)
            .map(|id| PhotoRef { id })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Convert a directory record into editable form state.
///
/// Nested references are cut down to `{id, name}`, the address is resolved
/// level by level, and the image list starts empty: existing photos are
/// loaded separately from `record.photos`.
pub fn to_editable_form(record: &StationRecord) -> Result<FormState, CoreError> {
    let station_type = StationType::from_code(record.type_code)?;

    let parent_station = record
        .parent_station
        .as_ref()
        .map(|parent| {
            Ok::<_, CoreError>(StationRef {
                id: parent.id,
                name: parent.name.clone(),
                station_type: StationType::from_code(parent.type_code)?,
            })
        })
        .transpose()?;

    let wards = record
        .wards
        .iter()
        .map(|ward| WardRef::new(ward.id, ward.name.clone()))
        .collect();

    Ok(FormState {
        id: Some(record.id),
        name: record.name.clone(),
        station_type,
        address: resolve_address_for_editing(&record.address),
        parent_station,
        wards,
        images: Vec::new(),
    })
}

/// Build the create/update body from form state and the finalized photo list.
///
/// Image slots and their preview handles are never part of the payload.
pub fn to_submission_payload(form: &FormState, photos: Vec<PhotoRef>) -> ServerPayload {
    ServerPayload {
        id: form.id,
        name: form.name.clone(),
        type_code: form.station_type.code(),
        address: form.address.to_persisted(),
        parent_station_id: form.parent_station.as_ref().map(|parent| parent.id),
        wards: form.wards.clone(),
        photos,
    }
}

/// Stations that may be chosen as parent for a station of `own_type`.
///
/// Drops the station being edited and anything not strictly above it in
/// the hierarchy. Unknown type codes are skipped.
pub fn eligible_parents(
    own_id: Option<DbId>,
    own_type: StationType,
    candidates: &[StationRecord],
) -> Vec<StationRef> {
    candidates
        .iter()
        .filter(|candidate| Some(candidate.id) != own_id)
        .filter_map(|candidate| {
            let station_type = StationType::from_code(candidate.type_code).ok()?;
            station_type.can_parent(own_type).then(|| StationRef {
                id: candidate.id,
                name: candidate.name.clone(),
                station_type,
            })
        })
        .collect()
}
