//! Image merge pipeline.
//!
//! Reconciles photos the service already stores with files picked locally.
//! On load, existing photos are fetched concurrently and each becomes a
//! [`ImageSlot::Persisted`]. On submit, pending slots are uploaded one at a
//! time in slot order; a failed upload drops that slot from the result and
//! the submission carries on without it.

use std::collections::HashMap;

use futures::future::join_all;
use stationdesk_core::error::ServiceError;
use stationdesk_core::images::{ImageSlot, PhotoRef, PreviewHandle};
use stationdesk_core::services::PhotoService;

use crate::preview::PreviewStore;

/// What happened to one slot during finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Already persisted; the id is reused by reference.
    Reused(PhotoRef),
    /// Pending file uploaded successfully.
    Uploaded(PhotoRef),
    /// Pending file could not be uploaded.
    Failed(ServiceError),
}

impl SlotOutcome {
    pub fn photo(&self) -> Option<PhotoRef> {
        match self {
            Self::Reused(photo) | Self::Uploaded(photo) => Some(*photo),
            Self::Failed(_) => None,
        }
    }
}

/// Fetch every persisted photo and build a slot for each one that loads.
///
/// Requests are issued concurrently; the returned slots follow the order of
/// `refs`. Photos that fail to load are left out.
pub async fn load_existing_photos(
    photos: &dyn PhotoService,
    refs: &[PhotoRef],
    previews: &mut PreviewStore,
) -> Vec<ImageSlot> {
    let results = join_all(refs.iter().map(|photo| photos.get(photo.id))).await;

    refs.iter()
        .zip(results)
        .filter_map(|(photo, result)| match result {
            Ok(bytes) => Some(ImageSlot::Persisted {
                id: photo.id,
                preview: previews.create(bytes),
            }),
            Err(e) => {
                tracing::warn!(photo_id = photo.id, error = %e, "Failed to load station photo");
                None
            }
        })
        .collect()
}

/// Uploads that finished for slots still pending in the form, by preview.
pub type UploadedPhotos = HashMap<PreviewHandle, PhotoRef>;

/// Upload pending slots sequentially and report an outcome per slot.
///
/// The returned vector is index-aligned with `slots`. A pending slot found
/// in `uploaded` is not sent again; each new upload is recorded there as
/// soon as it finishes.
pub async fn upload_slots(
    photos: &dyn PhotoService,
    slots: &[ImageSlot],
    uploaded: &mut UploadedPhotos,
) -> Vec<SlotOutcome> {
    let mut outcomes = Vec::with_capacity(slots.len());

    for (slot_index, slot) in slots.iter().enumerate() {
        let outcome = match slot {
            ImageSlot::Persisted { id, .. } => SlotOutcome::Reused(PhotoRef { id: *id }),
            ImageSlot::Pending { preview, .. } if uploaded.contains_key(preview) => {
                let photo = uploaded[preview];
                tracing::debug!(slot = slot_index, photo_id = photo.id, "Reusing earlier upload");
                SlotOutcome::Uploaded(photo)
            }
            ImageSlot::Pending { file, preview } => {
                tracing::debug!(slot = slot_index, file = %file.name, "Uploading station photo");
                match photos.upload(file).await {
                    Ok(photo) => {
                        tracing::debug!(slot = slot_index, photo_id = photo.id, "Photo uploaded");
                        uploaded.insert(preview.clone(), photo);
                        SlotOutcome::Uploaded(photo)
                    }
                    Err(e) => {
                        tracing::warn!(
                            slot = slot_index,
                            file = %file.name,
                            error = %e,
                            "Photo upload failed, dropping it from the submission",
                        );
                        SlotOutcome::Failed(e)
                    }
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

/// Ordered photo list for submission, skipping failed slots.
pub fn collect_photo_refs(outcomes: &[SlotOutcome]) -> Vec<PhotoRef> {
    outcomes.iter().filter_map(SlotOutcome::photo).collect()
}

/// Upload whatever is pending and return the ordered photo list.
pub async fn finalize_for_submit(photos: &dyn PhotoService, slots: &[ImageSlot]) -> Vec<PhotoRef> {
    collect_photo_refs(&upload_slots(photos, slots, &mut UploadedPhotos::new()).await)
}

/// Index at which the persisted photo at position `rank` of `order` goes
/// when it arrives after other slots are already in place.
///
/// Persisted slots stay in record order and ahead of any pending slot.
pub(crate) fn insertion_index(slots: &[ImageSlot], order: &[PhotoRef], rank: usize) -> usize {
    slots
        .iter()
        .position(|slot| match slot.persisted_id() {
            Some(id) => order
                .iter()
                .position(|photo| photo.id == id)
                .is_some_and(|existing| existing > rank),
            None => slot.is_pending(),
        })
        .unwrap_or(slots.len())
}
