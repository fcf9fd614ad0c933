//! `stationdesk-core` -- station form model and pure editing logic.
//!
//! Holds the data model, the address resolver, the station record
//! normalizer, submit-time validation, and the traits for the services the
//! editor consumes. Nothing in this crate performs I/O.

pub mod address;
pub mod error;
pub mod form;
pub mod images;
pub mod services;
pub mod station;
pub mod station_type;
pub mod types;
pub mod validation;
