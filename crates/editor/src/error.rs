use stationdesk_core::error::{CoreError, ServiceError};
use stationdesk_core::images::ImageFileError;

/// Errors returned by [`StationEditor`](crate::editor::StationEditor).
///
/// Validation failures are not errors; they come back as
/// [`SubmitOutcome::Rejected`](crate::editor::SubmitOutcome::Rejected).
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A station directory call failed. The form is left as it was.
    #[error(transparent)]
    Transport(#[from] ServiceError),

    /// The fetched record could not be turned into form state.
    #[error(transparent)]
    Normalize(#[from] CoreError),

    /// A submission is already in flight.
    #[error("A submission is already in progress")]
    Busy,

    /// The form has not finished loading.
    #[error("The station form is not ready")]
    NotReady,

    #[error(transparent)]
    Image(#[from] ImageFileError),

    #[error("No image at position {0}")]
    SlotOutOfRange(usize),
}

pub type EditorResult<T> = Result<T, EditorError>;
