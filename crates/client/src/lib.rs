//! `stationdesk-client` -- HTTP implementations of the station editor's
//! consumed services.

pub mod api;
pub mod config;

pub use api::{ClientError, StationApi};
pub use config::ClientConfig;
