//! `stationdesk-editor` -- the station form-state engine.
//!
//! Drives one station form through hydration, editing, image handling and
//! submission against injected station and photo services.

pub mod choices;
pub mod config;
pub mod editor;
pub mod error;
pub mod hydration;
pub mod notify;
pub mod photos;
pub mod preview;
pub mod route;

pub use config::EditorConfig;
pub use editor::{CommitOutcome, Phase, PhotoCommit, StationEditor, SubmitOutcome};
pub use error::{EditorError, EditorResult};
pub use route::{HydrationTicket, Route};
