//! Services the station editor consumes.
//!
//! The editor only sees these traits; the HTTP implementations live in
//! `stationdesk-client` and tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::address::{AddressComponent, AddressLevel};
use crate::error::ServiceError;
use crate::images::{LocalFile, PhotoRef};
use crate::station::{ServerPayload, StationFilter, StationRecord};
use crate::types::DbId;

/// Station directory: reads and writes station records.
#[async_trait]
pub trait StationDirectory: Send + Sync {
    async fn get(&self, id: DbId) -> Result<StationRecord, ServiceError>;

    async fn list(&self, filter: &StationFilter) -> Result<Vec<StationRecord>, ServiceError>;

    async fn create(&self, payload: &ServerPayload) -> Result<StationRecord, ServiceError>;

    async fn update(&self, payload: &ServerPayload) -> Result<StationRecord, ServiceError>;
}

/// Photo storage: binary fetch and upload.
#[async_trait]
pub trait PhotoService: Send + Sync {
    async fn get(&self, id: DbId) -> Result<Vec<u8>, ServiceError>;

    async fn upload(&self, file: &LocalFile) -> Result<PhotoRef, ServiceError>;
}

/// Source of the selectable components for each address level.
#[async_trait]
pub trait AddressAuthority: Send + Sync {
    /// Choices for `level`, scoped by the id selected one level above
    /// (`None` for the city level).
    async fn choices(
        &self,
        level: AddressLevel,
        parent_id: Option<DbId>,
    ) -> Result<Vec<AddressComponent>, ServiceError>;
}
