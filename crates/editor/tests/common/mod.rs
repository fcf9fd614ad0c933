//! In-memory station directory, photo service and address authority used by
//! the editor integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use stationdesk_core::address::{AddressComponent, AddressLevel};
use stationdesk_core::error::ServiceError;
use stationdesk_core::images::{LocalFile, PhotoRef};
use stationdesk_core::services::{AddressAuthority, PhotoService, StationDirectory};
use stationdesk_core::station::{ServerPayload, StationFilter, StationRecord};
use stationdesk_core::types::DbId;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

pub fn png(name: &str) -> LocalFile {
    LocalFile::new(name, PNG_BYTES.to_vec()).with_content_type("image/png")
}

/// A complete, valid ward-level record with the given photos.
pub fn ward_record(id: DbId, photos: &[DbId]) -> StationRecord {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Ward station {id}"),
        "type": 0,
        "address": {
            "building": "12A",
            "detail": "",
            "city": { "id": 1, "name": "Hanoi" },
            "district": { "id": 10, "name": "Ba Dinh", "parentId": 1, "parentName": "Hanoi" },
            "ward": { "id": 100, "name": "Kim Ma", "parentId": 10, "parentName": "Ba Dinh" },
            "street": { "id": 1000, "name": "Lieu Giai", "parentId": 100, "parentName": "Kim Ma" }
        },
        "parentStation": { "id": 3, "name": "Ba Dinh hub", "type": 1 },
        "wards": [{ "id": 100, "name": "Kim Ma", "address": { "detail": "x" } }],
        "photos": photos.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>()
    }))
    .expect("fixture record parses")
}

pub fn summary(id: DbId, name: &str, type_code: u8) -> StationRecord {
    serde_json::from_value(json!({ "id": id, "name": name, "type": type_code }))
        .expect("fixture summary parses")
}

// ---------------------------------------------------------------------------
// Station directory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeDirectory {
    pub records: Mutex<HashMap<DbId, StationRecord>>,
    pub candidates: Mutex<Vec<StationRecord>>,
    pub created: Mutex<Vec<ServerPayload>>,
    pub updated: Mutex<Vec<ServerPayload>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    next_id: AtomicI64,
}

impl FakeDirectory {
    pub fn with_records(records: Vec<StationRecord>) -> Self {
        let dir = Self {
            next_id: AtomicI64::new(500),
            ..Default::default()
        };
        {
            let mut map = dir.records.lock().unwrap();
            for record in records {
                map.insert(record.id, record);
            }
        }
        *dir.candidates.lock().unwrap() = vec![
            summary(1, "Hanoi city", 2),
            summary(3, "Ba Dinh hub", 1),
            summary(8, "Other ward", 0),
        ];
        dir
    }

    fn stored(payload: &ServerPayload, id: DbId) -> StationRecord {
        StationRecord {
            id,
            name: payload.name.clone(),
            type_code: payload.type_code,
            address: payload.address.clone(),
            parent_station: None,
            wards: Vec::new(),
            photos: payload.photos.clone(),
        }
    }
}

#[async_trait]
impl StationDirectory for FakeDirectory {
    async fn get(&self, id: DbId) -> Result<StationRecord, ServiceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection refused".into()));
        }
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ServiceError::NotFound {
                entity: "Station",
                id,
            })
    }

    async fn list(&self, _filter: &StationFilter) -> Result<Vec<StationRecord>, ServiceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection refused".into()));
        }
        Ok(self.candidates.lock().unwrap().clone())
    }

    async fn create(&self, payload: &ServerPayload) -> Result<StationRecord, ServiceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection reset".into()));
        }
        self.created.lock().unwrap().push(payload.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Self::stored(payload, id))
    }

    async fn update(&self, payload: &ServerPayload) -> Result<StationRecord, ServiceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection reset".into()));
        }
        self.updated.lock().unwrap().push(payload.clone());
        Ok(Self::stored(payload, payload.id.unwrap_or_default()))
    }
}

// ---------------------------------------------------------------------------
// Photo service
// ---------------------------------------------------------------------------

pub struct FakePhotos {
    /// Photo ids whose fetch fails.
    pub missing: Mutex<HashSet<DbId>>,
    /// File names whose upload fails.
    pub reject_uploads: Mutex<HashSet<String>>,
    /// File names in the order they were uploaded.
    pub upload_log: Mutex<Vec<String>>,
    next_id: AtomicI64,
}

impl Default for FakePhotos {
    fn default() -> Self {
        Self {
            missing: Mutex::default(),
            reject_uploads: Mutex::default(),
            upload_log: Mutex::default(),
            next_id: AtomicI64::new(900),
        }
    }
}

impl FakePhotos {
    pub fn missing(ids: &[DbId]) -> Self {
        let photos = Self::default();
        photos.missing.lock().unwrap().extend(ids.iter().copied());
        photos
    }

    pub fn rejecting(names: &[&str]) -> Self {
        let photos = Self::default();
        photos
            .reject_uploads
            .lock()
            .unwrap()
            .extend(names.iter().map(|n| n.to_string()));
        photos
    }
}

#[async_trait]
impl PhotoService for FakePhotos {
    async fn get(&self, id: DbId) -> Result<Vec<u8>, ServiceError> {
        if self.missing.lock().unwrap().contains(&id) {
            return Err(ServiceError::NotFound { entity: "Photo", id });
        }
        Ok(id.to_le_bytes().to_vec())
    }

    async fn upload(&self, file: &LocalFile) -> Result<PhotoRef, ServiceError> {
        self.upload_log.lock().unwrap().push(file.name.clone());
        if self.reject_uploads.lock().unwrap().contains(&file.name) {
            return Err(ServiceError::Rejected {
                status: 413,
                message: "payload too large".into(),
            });
        }
        Ok(PhotoRef {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
        })
    }
}

/// Photo service whose uploads wait until `release` is notified.
/// Fetches always succeed.
#[derive(Default)]
pub struct GatedPhotos {
    pub release: tokio::sync::Notify,
}

#[async_trait]
impl PhotoService for GatedPhotos {
    async fn get(&self, id: DbId) -> Result<Vec<u8>, ServiceError> {
        Ok(id.to_le_bytes().to_vec())
    }

    async fn upload(&self, _file: &LocalFile) -> Result<PhotoRef, ServiceError> {
        self.release.notified().await;
        Ok(PhotoRef { id: 77 })
    }
}

// ---------------------------------------------------------------------------
// Address authority
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeAuthority {
    pub calls: Mutex<Vec<(AddressLevel, Option<DbId>)>>,
}

#[async_trait]
impl AddressAuthority for FakeAuthority {
    async fn choices(
        &self,
        level: AddressLevel,
        parent_id: Option<DbId>,
    ) -> Result<Vec<AddressComponent>, ServiceError> {
        self.calls.lock().unwrap().push((level, parent_id));
        let base = parent_id.unwrap_or(0) * 10;
        Ok(vec![
            AddressComponent::new(base + 1, format!("{level} #1")),
            AddressComponent::new(base + 2, format!("{level} #2")),
        ])
    }
}
