//! Cascading four-level address (city → district → ward → street).
//!
//! The station directory persists each level flat, with a back-reference to
//! the level above. The editor works on [`Address`], where a level may only
//! be set when every level above it is set. All transitions return a new
//! value; nothing here mutates in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::station_type::StationType;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// One tier of the address hierarchy, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressLevel {
    City,
    District,
    Ward,
    Street,
}

impl AddressLevel {
    /// All levels, highest first.
    pub const ALL: [AddressLevel; 4] = [Self::City, Self::District, Self::Ward, Self::Street];

    /// The level whose selection scopes this one, if any.
    pub fn parent(self) -> Option<AddressLevel> {
        match self {
            Self::City => None,
            Self::District => Some(Self::City),
            Self::Ward => Some(Self::District),
            Self::Street => Some(Self::Ward),
        }
    }

    /// Every level strictly below this one, nearest first.
    pub fn below(self) -> &'static [AddressLevel] {
        match self {
            Self::City => &[Self::District, Self::Ward, Self::Street],
            Self::District => &[Self::Ward, Self::Street],
            Self::Ward => &[Self::Street],
            Self::Street => &[],
        }
    }

    /// Field name used in error maps and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::District => "district",
            Self::Ward => "ward",
            Self::Street => "street",
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            Self::City => "Please select city",
            Self::District => "Please select district",
            Self::Ward => "Please select ward",
            Self::Street => "Please select street",
        }
    }
}

impl std::fmt::Display for AddressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Editable address
// ---------------------------------------------------------------------------

/// A chosen value for one address level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub id: DbId,
    pub name: String,
}

impl AddressComponent {
    pub fn new(id: DbId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Editable address. `None` means the level is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub detail: String,
    pub street: Option<AddressComponent>,
    pub ward: Option<AddressComponent>,
    pub district: Option<AddressComponent>,
    pub city: Option<AddressComponent>,
}

impl Address {
    pub fn level(&self, level: AddressLevel) -> Option<&AddressComponent> {
        match level {
            AddressLevel::City => self.city.as_ref(),
            AddressLevel::District => self.district.as_ref(),
            AddressLevel::Ward => self.ward.as_ref(),
            AddressLevel::Street => self.street.as_ref(),
        }
    }

    fn slot_mut(&mut self, level: AddressLevel) -> &mut Option<AddressComponent> {
        match level {
            AddressLevel::City => &mut self.city,
            AddressLevel::District => &mut self.district,
            AddressLevel::Ward => &mut self.ward,
            AddressLevel::Street => &mut self.street,
        }
    }

    /// Whether every level above `level` is set.
    pub fn ancestors_set(&self, level: AddressLevel) -> bool {
        let mut cursor = level.parent();
        while let Some(parent) = cursor {
            if self.level(parent).is_none() {
                return false;
            }
            cursor = parent.parent();
        }
        true
    }

    /// The id that scopes the choice list for `level`.
    ///
    /// `None` for the city level; `Some(None)` when the parent level is unset.
    pub fn scope_of(&self, level: AddressLevel) -> Option<Option<DbId>> {
        level
            .parent()
            .map(|parent| self.level(parent).map(|component| component.id))
    }

    /// Flatten back into the persisted shape, deriving each level's parent
    /// reference from the level above.
    pub fn to_persisted(&self) -> PersistedAddress {
        let mut persisted = PersistedAddress {
            building: self.building.clone(),
            detail: self.detail.clone(),
            ..Default::default()
        };
        for level in AddressLevel::ALL {
            let Some(component) = self.level(level) else {
                continue;
            };
            let parent = level.parent().and_then(|p| self.level(p));
            *persisted.slot_mut(level) = Some(PersistedLevel {
                id: component.id,
                name: component.name.clone(),
                parent_id: parent.map(|p| p.id),
                parent_name: parent.map(|p| p.name.clone()),
            });
        }
        persisted
    }
}

// ---------------------------------------------------------------------------
// Persisted address
// ---------------------------------------------------------------------------

/// One level as the station directory stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLevel {
    pub id: DbId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

impl PersistedLevel {
    fn component(&self) -> AddressComponent {
        AddressComponent::new(self.id, self.name.clone())
    }
}

/// Flat address as returned by and sent to the station directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAddress {
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub street: Option<PersistedLevel>,
    #[serde(default)]
    pub ward: Option<PersistedLevel>,
    #[serde(default)]
    pub district: Option<PersistedLevel>,
    #[serde(default)]
    pub city: Option<PersistedLevel>,
}

impl PersistedAddress {
    pub fn level(&self, level: AddressLevel) -> Option<&PersistedLevel> {
        match level {
            AddressLevel::City => self.city.as_ref(),
            AddressLevel::District => self.district.as_ref(),
            AddressLevel::Ward => self.ward.as_ref(),
            AddressLevel::Street => self.street.as_ref(),
        }
    }

    fn slot_mut(&mut self, level: AddressLevel) -> &mut Option<PersistedLevel> {
        match level {
            AddressLevel::City => &mut self.city,
            AddressLevel::District => &mut self.district,
            AddressLevel::Ward => &mut self.ward,
            AddressLevel::Street => &mut self.street,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Build the cascading editable address from a persisted one.
///
/// Each level is taken from the persisted record only when the level above
/// resolved and, if the persisted level carries a parent reference, that
/// reference points at the resolved parent. The first level that fails this
/// check resolves empty and so does everything below it.
pub fn resolve_address_for_editing(persisted: &PersistedAddress) -> Address {
    let mut address = Address {
        building: persisted.building.clone(),
        detail: persisted.detail.clone(),
        ..Default::default()
    };

    let mut scope: Option<DbId> = None;
    for level in AddressLevel::ALL {
        let Some(entry) = persisted.level(level) else {
            break;
        };
        let in_scope = match (level.parent(), scope) {
            (None, _) => true,
            (Some(_), Some(parent_id)) => entry.parent_id.map_or(true, |id| id == parent_id),
            (Some(_), None) => false,
        };
        if !in_scope {
            break;
        }
        scope = Some(entry.id);
        *address.slot_mut(level) = Some(entry.component());
    }

    address
}

/// Set `level` to `component` and clear every level below it.
///
/// Setting a level whose ancestors are not all set leaves that level (and
/// everything below) empty, so the result always satisfies the cascade.
pub fn on_level_changed(
    level: AddressLevel,
    component: Option<AddressComponent>,
    address: &Address,
) -> Address {
    let mut next = address.clone();
    *next.slot_mut(level) = if next.ancestors_set(level) {
        component
    } else {
        None
    };
    for lower in level.below() {
        *next.slot_mut(*lower) = None;
    }
    next
}

/// Per-level error messages; satisfied levels are absent.
pub type FieldErrors = BTreeMap<AddressLevel, String>;

/// Check that the mandatory levels for `station_type` are filled in.
///
/// City and district are always required; ward and street only for
/// point-level stations. Each level is reported on its own, so a missing
/// city does not hide a missing district.
pub fn validate_address(address: &Address, station_type: StationType) -> FieldErrors {
    AddressLevel::ALL
        .into_iter()
        .filter(|level| match level {
            AddressLevel::City | AddressLevel::District => true,
            AddressLevel::Ward | AddressLevel::Street => station_type.requires_point_address(),
        })
        .filter(|level| address.level(*level).is_none())
        .map(|level| (level, level.missing_message().to_string()))
        .collect()
}
