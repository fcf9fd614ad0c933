//! Choice lists for the cascading address selects.

use stationdesk_core::address::{Address, AddressComponent, AddressLevel};
use stationdesk_core::error::ServiceError;
use stationdesk_core::services::AddressAuthority;

/// Choices for `level` given the levels already chosen in `address`.
///
/// Returns an empty list without asking the authority when the level above
/// is still empty.
pub async fn choices_for(
    authority: &dyn AddressAuthority,
    level: AddressLevel,
    address: &Address,
) -> Result<Vec<AddressComponent>, ServiceError> {
    match address.scope_of(level) {
        None => authority.choices(level, None).await,
        Some(None) => Ok(Vec::new()),
        Some(Some(parent_id)) => authority.choices(level, Some(parent_id)).await,
    }
}
