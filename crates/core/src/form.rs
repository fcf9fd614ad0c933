//! Edit commands applied to [`FormState`] one at a time.

use crate::address::{on_level_changed, AddressComponent, AddressLevel};
use crate::station::{FormState, StationRef, WardRef};
use crate::station_type::StationType;
use crate::types::DbId;

/// A discrete operator edit on the station form.
///
/// Image additions and removals are handled by the editor, which owns the
/// preview handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    SetName(String),
    SetType(StationType),
    SetParentStation(Option<StationRef>),
    SetWards(Vec<WardRef>),
    AddWard(WardRef),
    RemoveWard(DbId),
    SetBuilding(String),
    SetDetail(String),
    ChangeLevel(AddressLevel, Option<AddressComponent>),
}

pub fn apply_command(form: &mut FormState, command: FormCommand) {
    match command {
        FormCommand::SetName(name) => form.name = name,
        FormCommand::SetType(station_type) => form.station_type = station_type,
        FormCommand::SetParentStation(parent) => form.parent_station = parent,
        FormCommand::SetWards(wards) => form.wards = wards,
        FormCommand::AddWard(ward) => {
            if !form.wards.iter().any(|existing| existing.id == ward.id) {
                form.wards.push(ward);
            }
        }
        FormCommand::RemoveWard(id) => form.wards.retain(|ward| ward.id != id),
        FormCommand::SetBuilding(building) => form.address.building = building,
        FormCommand::SetDetail(detail) => form.address.detail = detail,
        FormCommand::ChangeLevel(level, component) => {
            form.address = on_level_changed(level, component, &form.address);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_level_cascades_through_the_form() {
        let mut form = FormState::new();
        apply_command(
            &mut form,
            FormCommand::ChangeLevel(AddressLevel::City, Some(AddressComponent::new(1, "Hanoi"))),
        );
        apply_command(
            &mut form,
            FormCommand::ChangeLevel(
                AddressLevel::District,
                Some(AddressComponent::new(10, "Ba Dinh")),
            ),
        );
        assert!(form.address.district.is_some());

        apply_command(
            &mut form,
            FormCommand::ChangeLevel(AddressLevel::City, Some(AddressComponent::new(2, "Hue"))),
        );
        assert_eq!(form.address.city, Some(AddressComponent::new(2, "Hue")));
        assert!(form.address.district.is_none());
    }

    #[test]
    fn wards_are_deduplicated_by_id() {
        let mut form = FormState::new();
        apply_command(&mut form, FormCommand::AddWard(WardRef::new(1, "A")));
        apply_command(&mut form, FormCommand::AddWard(WardRef::new(1, "A again")));
        apply_command(&mut form, FormCommand::AddWard(WardRef::new(2, "B")));
        assert_eq!(form.wards.len(), 2);

        apply_command(&mut form, FormCommand::RemoveWard(1));
        assert_eq!(form.wards, vec![WardRef::new(2, "B")]);
    }

    #[test]
    fn switching_to_topmost_keeps_the_parent() {
        let parent = StationRef {
            id: 3,
            name: "Hub".to_string(),
            station_type: StationType::District,
        };
        let mut form = FormState::new();
        apply_command(&mut form, FormCommand::SetParentStation(Some(parent.clone())));
        apply_command(&mut form, FormCommand::SetType(StationType::City));
        assert_eq!(form.parent_station, Some(parent));
    }

    #[test]
    fn free_text_edits() {
        let mut form = FormState::new();
        apply_command(&mut form, FormCommand::SetName("Depot".to_string()));
        apply_command(&mut form, FormCommand::SetBuilding("B2".to_string()));
        apply_command(&mut form, FormCommand::SetDetail("rear door".to_string()));
        assert_eq!(form.name, "Depot");
        assert_eq!(form.address.building, "B2");
        assert_eq!(form.address.detail, "rear door");
    }
}
