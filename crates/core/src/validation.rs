//! Submit-time validation of the station form.
//!
//! Every check runs on every attempt so the operator sees the full error set
//! at once.

use serde::Serialize;

use crate::address::{validate_address, AddressLevel, FieldErrors};
use crate::station::FormState;

pub const MSG_NAME_REQUIRED: &str = "Please input name";
pub const MSG_PARENT_REQUIRED: &str = "Please input parent station";
pub const MSG_WARDS_REQUIRED: &str = "Please input wards under management";

/// Address part of [`FormErrors`]. Empty string means no error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressErrors {
    pub city: String,
    pub district: String,
    pub ward: String,
    pub street: String,
}

impl AddressErrors {
    fn from_field_errors(errors: &FieldErrors) -> Self {
        let message = |level: AddressLevel| errors.get(&level).cloned().unwrap_or_default();
        Self {
            city: message(AddressLevel::City),
            district: message(AddressLevel::District),
            ward: message(AddressLevel::Ward),
            street: message(AddressLevel::Street),
        }
    }

    pub fn get(&self, level: AddressLevel) -> &str {
        match level {
            AddressLevel::City => &self.city,
            AddressLevel::District => &self.district,
            AddressLevel::Ward => &self.ward,
            AddressLevel::Street => &self.street,
        }
    }

    pub fn is_empty(&self) -> bool {
        AddressLevel::ALL.iter().all(|level| self.get(*level).is_empty())
    }
}

/// Per-field errors mirroring the editable station shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    pub name: String,
    pub parent_station: String,
    pub wards: String,
    pub address: AddressErrors,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.parent_station.is_empty()
            && self.wards.is_empty()
            && self.address.is_empty()
    }
}

/// Result of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub errors: FormErrors,
}

fn check(ok: bool, message: &str) -> String {
    if ok {
        String::new()
    } else {
        message.to_string()
    }
}

/// Validate `form` without short-circuiting.
pub fn validate(form: &FormState) -> ValidationOutcome {
    let name_ok = !form.name.trim().is_empty();
    let parent_ok = !form.station_type.requires_parent() || form.parent_station.is_some();
    let wards_ok = !form.wards.is_empty();
    let address_errors = validate_address(&form.address, form.station_type);
    let address_ok = address_errors.is_empty();

    ValidationOutcome {
        passed: name_ok && parent_ok && wards_ok && address_ok,
        errors: FormErrors {
            name: check(name_ok, MSG_NAME_REQUIRED),
            parent_station: check(parent_ok, MSG_PARENT_REQUIRED),
            wards: check(wards_ok, MSG_WARDS_REQUIRED),
            address: AddressErrors::from_field_errors(&address_errors),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Address, AddressComponent};
    use crate::station::{StationRef, WardRef};
    use crate::station_type::StationType;

    fn complete_address() -> Address {
        Address {
            building: "1".to_string(),
            detail: String::new(),
            city: Some(AddressComponent::new(1, "Hanoi")),
            district: Some(AddressComponent::new(10, "Ba Dinh")),
            ward: Some(AddressComponent::new(100, "Kim Ma")),
            street: Some(AddressComponent::new(1000, "Lieu Giai")),
        }
    }

    fn valid_form() -> FormState {
        FormState {
            id: Some(7),
            name: "Kim Ma post".to_string(),
            station_type: StationType::Ward,
            address: complete_address(),
            parent_station: Some(StationRef {
                id: 3,
                name: "Ba Dinh hub".to_string(),
                station_type: StationType::District,
            }),
            wards: vec![WardRef::new(100, "Kim Ma")],
            images: Vec::new(),
        }
    }

    #[test]
    fn valid_form_passes_with_no_errors() {
        let outcome = validate(&valid_form());
        assert!(outcome.passed);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn all_failures_reported_at_once() {
        let form = FormState {
            name: String::new(),
            station_type: StationType::Ward,
            parent_station: None,
            wards: Vec::new(),
            ..valid_form()
        };

        let outcome = validate(&form);
        assert!(!outcome.passed);
        assert_eq!(outcome.errors.name, MSG_NAME_REQUIRED);
        assert_eq!(outcome.errors.parent_station, MSG_PARENT_REQUIRED);
        assert_eq!(outcome.errors.wards, MSG_WARDS_REQUIRED);
        assert!(outcome.errors.address.is_empty());
    }

    #[test]
    fn whitespace_name_counts_as_missing() {
        let form = FormState {
            name: "   ".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&form).errors.name, MSG_NAME_REQUIRED);
    }

    #[test]
    fn topmost_station_needs_no_parent() {
        let form = FormState {
            station_type: StationType::City,
            parent_station: None,
            ..valid_form()
        };
        let outcome = validate(&form);
        assert!(outcome.passed);
        assert!(outcome.errors.parent_station.is_empty());
    }

    #[test]
    fn address_errors_block_submission() {
        let mut form = valid_form();
        form.address.street = None;

        let outcome = validate(&form);
        assert!(!outcome.passed);
        assert!(!outcome.errors.address.street.is_empty());
        assert!(outcome.errors.address.city.is_empty());
        assert!(outcome.errors.name.is_empty());
    }

    #[test]
    fn district_station_skips_point_level_fields() {
        let mut form = valid_form();
        form.station_type = StationType::District;
        form.address.ward = None;
        form.address.street = None;

        assert!(validate(&form).passed);
    }

    #[test]
    fn errors_serialize_with_camel_case_keys() {
        let outcome = validate(&FormState::new());
        let value = serde_json::to_value(&outcome.errors).unwrap();
        assert_eq!(value["parentStation"], MSG_PARENT_REQUIRED);
        assert_eq!(value["address"]["city"], "Please select city");
    }
}
