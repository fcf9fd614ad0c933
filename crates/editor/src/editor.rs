//! The station form-state engine.
//!
//! [`StationEditor`] owns one form for one route. Every mutation goes
//! through a `&mut self` method, so edits are applied one at a time. The
//! read path is split into a ticket ([`StationEditor::begin`]), a fetch that
//! does not borrow the editor ([`hydrate`]), and a commit that discards
//! results from an older generation. [`StationEditor::load`] and
//! [`StationEditor::resolve_photos`] chain those steps for callers that
//! don't need to interleave them with other work.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use stationdesk_core::form::{apply_command, FormCommand};
use stationdesk_core::images::{validate_image_file, ImageSlot, LocalFile, PhotoRef, PreviewHandle};
use stationdesk_core::services::{PhotoService, StationDirectory};
use stationdesk_core::station::{
    eligible_parents, to_editable_form, to_submission_payload, FormState, StationFilter,
    StationRecord, StationRef,
};
use stationdesk_core::validation::{validate, FormErrors, ValidationOutcome};
use tokio::sync::{broadcast, watch};

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::hydration::{fetch_photo, hydrate, Hydration, PhotoArrival, PhotoRequest};
use crate::notify::{Notice, Notifier};
use crate::photos::{collect_photo_refs, insertion_index, upload_slots, SlotOutcome, UploadedPhotos};
use crate::preview::PreviewStore;
use crate::route::{HydrationTicket, Route};

pub const MSG_CREATED: &str = "Create station successfully";
pub const MSG_UPDATED: &str = "Update station successfully";

/// Where the editor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No route entered yet.
    Idle,
    /// Waiting for the record and candidate list.
    Loading,
    /// Form is editable and can be submitted.
    Ready,
    /// Hydration failed; the form holds a blank state.
    LoadFailed,
    /// Uploads and the write request are in flight.
    Submitting,
}

/// Result of [`StationEditor::commit`].
#[derive(Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The form was hydrated; these photos still need fetching.
    Applied { photo_requests: Vec<PhotoRequest> },
    /// The result belonged to an earlier route and was dropped.
    Stale,
}

/// Result of [`StationEditor::commit_photo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoCommit {
    /// A slot was inserted at this index.
    Inserted(usize),
    /// The fetch failed; no slot was created.
    Failed,
    /// The photo belongs to an earlier route, or is already present.
    Skipped,
}

/// Result of [`StationEditor::submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The station was written. `dropped_images` counts uploads that failed
    /// and were left out of the submission.
    Saved {
        record: StationRecord,
        dropped_images: usize,
    },
    /// Validation failed; nothing was sent.
    Rejected(FormErrors),
}

pub struct StationEditor {
    config: EditorConfig,
    stations: Arc<dyn StationDirectory>,
    photos: Arc<dyn PhotoService>,
    notifier: Notifier,
    previews: PreviewStore,
    route: Route,
    generation: u64,
    phase: Arc<watch::Sender<Phase>>,
    form: FormState,
    errors: FormErrors,
    candidates: Vec<StationRecord>,
    /// Photo order of the loaded record, used to place late arrivals.
    photo_order: Vec<PhotoRef>,
    /// Uploads kept across a failed or cancelled submission.
    uploaded: UploadedPhotos,
}

impl StationEditor {
    pub fn new(
        config: EditorConfig,
        stations: Arc<dyn StationDirectory>,
        photos: Arc<dyn PhotoService>,
    ) -> Self {
        let notifier = Notifier::new(config.notice_auto_close);
        Self {
            config,
            stations,
            photos,
            notifier,
            previews: PreviewStore::new(),
            route: Route::New,
            generation: 0,
            phase: Arc::new(watch::channel(Phase::Idle).0),
            form: FormState::new(),
            errors: FormErrors::default(),
            candidates: Vec::new(),
            photo_order: Vec::new(),
            uploaded: UploadedPhotos::new(),
        }
    }

    // ---- accessors ----

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Follow phase changes, including the busy span of a submission.
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.send_replace(phase);
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Submitting
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notifier.subscribe()
    }

    pub fn photo_service(&self) -> Arc<dyn PhotoService> {
        Arc::clone(&self.photos)
    }

    pub fn station_directory(&self) -> Arc<dyn StationDirectory> {
        Arc::clone(&self.stations)
    }

    /// The unfiltered candidate list from the last hydration.
    pub fn candidates(&self) -> &[StationRecord] {
        &self.candidates
    }

    /// Candidates that may be chosen as parent for the current form.
    pub fn parent_candidates(&self) -> Vec<StationRef> {
        eligible_parents(self.form.id, self.form.station_type, &self.candidates)
    }

    pub fn preview(&self, handle: &PreviewHandle) -> Option<Arc<Vec<u8>>> {
        self.previews.resolve(handle)
    }

    pub fn candidate_filter(&self) -> StationFilter {
        StationFilter::query(self.config.candidate_query.clone())
    }

    // ---- read path ----

    /// Enter `route`: discard the current form and issue a new ticket.
    ///
    /// Any result still in flight under an older ticket will be dropped
    /// when it is committed.
    pub fn begin(&mut self, route: Route) -> HydrationTicket {
        self.generation += 1;
        self.route = route;
        self.set_phase(Phase::Loading);
        self.form = FormState::new();
        self.errors = FormErrors::default();
        self.candidates.clear();
        self.photo_order.clear();
        self.uploaded.clear();
        self.previews.revoke_all();

        tracing::debug!(route = %route, generation = self.generation, "Entered station route");

        HydrationTicket {
            generation: self.generation,
            route,
        }
    }

    pub fn is_current(&self, ticket: &HydrationTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a finished hydration if it still matches the current route.
    pub fn commit(&mut self, hydration: Hydration) -> EditorResult<CommitOutcome> {
        let Hydration { ticket, outcome } = hydration;

        if !self.is_current(&ticket) {
            tracing::debug!(
                route = %ticket.route,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale hydration",
            );
            return Ok(CommitOutcome::Stale);
        }

        let loaded = match outcome {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(route = %ticket.route, error = %e, "Failed to load station");
                self.set_phase(Phase::LoadFailed);
                self.notifier.error(format!("Failed to load station: {e}"));
                return Err(e.into());
            }
        };

        let form = match loaded.record.as_ref().map(to_editable_form).transpose() {
            Ok(form) => form,
            Err(e) => {
                tracing::error!(route = %ticket.route, error = %e, "Station record is not editable");
                self.set_phase(Phase::LoadFailed);
                self.notifier.error(format!("Failed to load station: {e}"));
                return Err(e.into());
            }
        };

        self.candidates = loaded.candidates;
        let photo_requests = match (form, loaded.record) {
            (Some(form), Some(record)) => {
                self.form = form;
                self.photo_order = record.photos;
                self.photo_order
                    .iter()
                    .enumerate()
                    .map(|(rank, photo)| PhotoRequest {
                        ticket,
                        rank,
                        photo: *photo,
                    })
                    .collect()
            }
            _ => Vec::new(),
        };
        self.set_phase(Phase::Ready);

        tracing::info!(
            route = %ticket.route,
            candidates = self.candidates.len(),
            photos = photo_requests.len(),
            "Station form ready",
        );

        Ok(CommitOutcome::Applied { photo_requests })
    }

    /// Insert one fetched photo into the image list.
    ///
    /// Slots keep the record's photo order no matter which fetch finishes
    /// first, and stay ahead of files added locally in the meantime.
    pub fn commit_photo(&mut self, arrival: PhotoArrival) -> PhotoCommit {
        let PhotoArrival { request, result } = arrival;

        if !self.is_current(&request.ticket) {
            tracing::debug!(photo_id = request.photo.id, "Discarding stale photo");
            return PhotoCommit::Skipped;
        }
        if self
            .form
            .images
            .iter()
            .any(|slot| slot.persisted_id() == Some(request.photo.id))
        {
            return PhotoCommit::Skipped;
        }

        match result {
            Ok(bytes) => {
                let preview = self.previews.create(bytes);
                let index = insertion_index(&self.form.images, &self.photo_order, request.rank);
                self.form.images.insert(
                    index,
                    ImageSlot::Persisted {
                        id: request.photo.id,
                        preview,
                    },
                );
                PhotoCommit::Inserted(index)
            }
            Err(e) => {
                tracing::warn!(photo_id = request.photo.id, error = %e, "Failed to load station photo");
                PhotoCommit::Failed
            }
        }
    }

    /// Enter `route` and wait for the record and candidate list.
    pub async fn load(&mut self, route: Route) -> EditorResult<CommitOutcome> {
        let ticket = self.begin(route);
        let filter = self.candidate_filter();
        let hydration = hydrate(self.stations.as_ref(), ticket, &filter).await;
        self.commit(hydration)
    }

    /// Fetch `requests` concurrently, committing each photo as it arrives.
    ///
    /// Returns how many slots were inserted.
    pub async fn resolve_photos(&mut self, requests: Vec<PhotoRequest>) -> usize {
        let photos = self.photo_service();
        let mut pending: FuturesUnordered<_> = requests
            .into_iter()
            .map(|request| fetch_photo(photos.as_ref(), request))
            .collect();

        let mut inserted = 0;
        while let Some(arrival) = pending.next().await {
            if let PhotoCommit::Inserted(_) = self.commit_photo(arrival) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Load `route` and all of its existing photos.
    pub async fn open(&mut self, route: Route) -> EditorResult<()> {
        if let CommitOutcome::Applied { photo_requests } = self.load(route).await? {
            self.resolve_photos(photo_requests).await;
        }
        Ok(())
    }

    // ---- edits ----

    fn ensure_editable(&self) -> EditorResult<()> {
        match self.phase() {
            Phase::Submitting => Err(EditorError::Busy),
            _ => Ok(()),
        }
    }

    pub fn apply(&mut self, command: FormCommand) -> EditorResult<()> {
        self.ensure_editable()?;
        apply_command(&mut self.form, command);
        Ok(())
    }

    /// Add a locally selected file as a pending slot at the end of the list.
    ///
    /// Files that fail [`validate_image_file`] are refused with a warning
    /// notice. Returns the new slot's index.
    pub fn add_image(&mut self, file: LocalFile) -> EditorResult<usize> {
        self.ensure_editable()?;
        if let Err(e) = validate_image_file(&file, self.config.max_image_bytes) {
            tracing::warn!(file = %file.name, error = %e, "Rejected image file");
            self.notifier.warning(e.to_string());
            return Err(e.into());
        }

        let preview = self.previews.create(file.bytes.clone());
        self.form.images.push(ImageSlot::Pending { file, preview });
        Ok(self.form.images.len() - 1)
    }

    /// Remove the slot at `index` and revoke its preview.
    pub fn remove_image(&mut self, index: usize) -> EditorResult<ImageSlot> {
        self.ensure_editable()?;
        if index >= self.form.images.len() {
            return Err(EditorError::SlotOutOfRange(index));
        }
        let slot = self.form.images.remove(index);
        self.uploaded.remove(slot.preview());
        self.previews.revoke(slot.preview());
        Ok(slot)
    }

    // ---- write path ----

    /// Run every check and keep the errors for display.
    pub fn validate(&mut self) -> ValidationOutcome {
        let outcome = validate(&self.form);
        self.errors = outcome.errors.clone();
        outcome
    }

    /// Validate, upload pending images, and create or update the station.
    ///
    /// A transport failure on the write leaves the form untouched so the
    /// operator can retry; files already uploaded are not sent again. On
    /// success, uploaded slots become persisted and a newly created station
    /// switches the editor to its id. Dropping the returned future ends the
    /// busy phase as well.
    pub async fn submit(&mut self) -> EditorResult<SubmitOutcome> {
        match self.phase() {
            Phase::Ready => {}
            Phase::Submitting => return Err(EditorError::Busy),
            _ => return Err(EditorError::NotReady),
        }

        let outcome = self.validate();
        if !outcome.passed {
            tracing::debug!(route = %self.route, "Station form failed validation");
            return Ok(SubmitOutcome::Rejected(outcome.errors));
        }

        let _busy = SubmittingGuard::enter(&self.phase);
        self.write().await
    }

    async fn write(&mut self) -> EditorResult<SubmitOutcome> {
        let outcomes =
            upload_slots(self.photos.as_ref(), &self.form.images, &mut self.uploaded).await;
        let photos = collect_photo_refs(&outcomes);
        let payload = to_submission_payload(&self.form, photos.clone());

        let saved = match self.route {
            Route::Existing(_) => self.stations.update(&payload).await,
            Route::New => self.stations.create(&payload).await,
        };

        let record = match saved {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(route = %self.route, error = %e, "Failed to save station");
                self.notifier.error(format!("Failed to save station: {e}"));
                return Err(e.into());
            }
        };

        for (slot, outcome) in self.form.images.iter_mut().zip(&outcomes) {
            if let (SlotOutcome::Uploaded(photo), true) = (outcome, slot.is_pending()) {
                let preview = slot.preview().clone();
                *slot = ImageSlot::Persisted {
                    id: photo.id,
                    preview,
                };
            }
        }
        self.photo_order = photos;
        self.uploaded.clear();

        let message = match self.route {
            Route::New => {
                self.route = Route::Existing(record.id);
                self.form.id = Some(record.id);
                MSG_CREATED
            }
            Route::Existing(_) => MSG_UPDATED,
        };
        let dropped_images = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, SlotOutcome::Failed(_)))
            .count();

        tracing::info!(station_id = record.id, dropped_images, "Station saved");
        self.notifier.success(message);

        Ok(SubmitOutcome::Saved {
            record,
            dropped_images,
        })
    }
}

/// Holds the phase at `Submitting` and puts it back to `Ready` when
/// dropped, whether the submission finished or was cancelled.
struct SubmittingGuard(Arc<watch::Sender<Phase>>);

impl SubmittingGuard {
    fn enter(phase: &Arc<watch::Sender<Phase>>) -> Self {
        phase.send_replace(Phase::Submitting);
        Self(Arc::clone(phase))
    }
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        self.0.send_if_modified(|phase| {
            let submitting = *phase == Phase::Submitting;
            if submitting {
                *phase = Phase::Ready;
            }
            submitting
        });
    }
}
