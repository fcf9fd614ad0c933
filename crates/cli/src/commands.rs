//! Subcommand bodies. Each returns `Ok(false)` when the station was
//! rejected by validation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use stationdesk_client::{ClientConfig, StationApi};
use stationdesk_core::address::AddressLevel;
use stationdesk_core::form::FormCommand;
use stationdesk_core::images::LocalFile;
use stationdesk_core::station::{to_editable_form, to_submission_payload, FormState, StationRecord};
use stationdesk_core::types::DbId;
use stationdesk_core::validation::{validate, FormErrors};
use stationdesk_editor::{EditorConfig, Route, StationEditor, SubmitOutcome};

fn editor() -> anyhow::Result<StationEditor> {
    let api = Arc::new(StationApi::new(ClientConfig::from_env()).context("Failed to build API client")?);
    tracing::debug!(base_url = api.base_url(), "Using console API");
    Ok(StationEditor::new(EditorConfig::from_env(), api.clone(), api))
}

async fn read_record(path: &Path) -> anyhow::Result<StationRecord> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("{} is not a station record", path.display()))
}

fn print_errors(errors: &FormErrors) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(errors)?);
    Ok(())
}

/// Edits that reproduce `form`'s fields on another form, images excluded.
///
/// Address levels are replayed top-down so each level's ancestors are
/// already set when it is applied.
pub fn replay_commands(form: &FormState) -> Vec<FormCommand> {
    let mut commands = vec![
        FormCommand::SetName(form.name.clone()),
        FormCommand::SetType(form.station_type),
        FormCommand::SetParentStation(form.parent_station.clone()),
        FormCommand::SetWards(form.wards.clone()),
        FormCommand::SetBuilding(form.address.building.clone()),
        FormCommand::SetDetail(form.address.detail.clone()),
        FormCommand::ChangeLevel(AddressLevel::City, None),
    ];
    commands.extend(AddressLevel::ALL.iter().filter_map(|&level| {
        form.address
            .level(level)
            .map(|component| FormCommand::ChangeLevel(level, Some(component.clone())))
    }));
    commands
}

pub async fn show(id: DbId) -> anyhow::Result<bool> {
    let mut editor = editor()?;
    editor.open(Route::Existing(id)).await?;

    let form = editor.form();
    let payload = to_submission_payload(form, form.persisted_photos());
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(true)
}

pub async fn check(path: &Path) -> anyhow::Result<bool> {
    let record = read_record(path).await?;
    let form = to_editable_form(&record)?;
    let outcome = validate(&form);

    if outcome.passed {
        tracing::info!(station = %form.name, "Station record is valid");
    } else {
        print_errors(&outcome.errors)?;
    }
    Ok(outcome.passed)
}

pub async fn submit(path: &Path, id: Option<DbId>, images: &[PathBuf]) -> anyhow::Result<bool> {
    let record = read_record(path).await?;
    let source = to_editable_form(&record)?;

    let mut editor = editor()?;
    let mut notices = editor.subscribe();
    let route = id.map_or(Route::New, Route::Existing);
    editor.open(route).await?;

    for command in replay_commands(&source) {
        editor.apply(command)?;
    }
    for image in images {
        let bytes = tokio::fs::read(image)
            .await
            .with_context(|| format!("Failed to read {}", image.display()))?;
        let name = image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());
        editor.add_image(LocalFile::new(name, bytes))?;
    }

    let outcome = editor.submit().await;
    while let Ok(notice) = notices.try_recv() {
        tracing::info!(level = ?notice.level, "{}", notice.message);
    }

    match outcome? {
        SubmitOutcome::Saved {
            record,
            dropped_images,
        } => {
            if dropped_images > 0 {
                tracing::warn!(dropped_images, "Some images failed to upload");
            }
            println!("{}", record.id);
            Ok(true)
        }
        SubmitOutcome::Rejected(errors) => {
            print_errors(&errors)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stationdesk_core::form::apply_command;

    use super::*;

    fn record() -> StationRecord {
        serde_json::from_value(json!({
            "id": 4,
            "name": "Kim Ma post",
            "type": 0,
            "address": {
                "building": "12A",
                "city": { "id": 1, "name": "Hanoi" },
                "district": { "id": 10, "name": "Ba Dinh", "parentId": 1, "parentName": "Hanoi" },
                "ward": { "id": 100, "name": "Kim Ma", "parentId": 10, "parentName": "Ba Dinh" },
                "street": { "id": 1000, "name": "Lieu Giai", "parentId": 100, "parentName": "Kim Ma" }
            },
            "parentStation": { "id": 3, "name": "Ba Dinh hub", "type": 1 },
            "wards": [{ "id": 100, "name": "Kim Ma" }]
        }))
        .unwrap()
    }

    #[test]
    fn replayed_commands_rebuild_the_form() {
        let source = to_editable_form(&record()).unwrap();

        let mut target = FormState::new();
        target.address.building = "old".into();
        for command in replay_commands(&source) {
            apply_command(&mut target, command);
        }

        assert_eq!(target.name, source.name);
        assert_eq!(target.station_type, source.station_type);
        assert_eq!(target.address, source.address);
        assert_eq!(target.parent_station, source.parent_station);
        assert_eq!(target.wards, source.wards);
    }

    #[test]
    fn replay_clears_levels_the_source_lacks() {
        let mut source = to_editable_form(&record()).unwrap();
        source.address.street = None;

        let mut target = to_editable_form(&record()).unwrap();
        for command in replay_commands(&source) {
            apply_command(&mut target, command);
        }

        assert!(target.address.street.is_none());
        assert!(target.address.ward.is_some());
    }
}
