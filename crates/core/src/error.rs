use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown station type code {0}")]
    UnknownStationType(u8),
}

/// Failure reported by one of the consumed services.
///
/// Every operation on [`StationDirectory`](crate::services::StationDirectory),
/// [`PhotoService`](crate::services::PhotoService) and
/// [`AddressAuthority`](crate::services::AddressAuthority) returns this type,
/// whatever transport sits behind the trait.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered but refused the request.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}
