//! Provides the session that owns the page state and runs its operations.
//!
//! The session is the only owner of the preview and the generation state.
//! The lock guarding them is held only for synchronous transitions, never
//! across a file read or a network request, so a new image can be dropped
//! while a generation is in flight.

use std::path::PathBuf;

use parking_lot::Mutex;

use crate::client::{GenerateError, GenerateRequest, GenerateResponse, GenerationBackend};
use crate::generation::{Completion, GenerationState, Orchestrator, Ticket, ViewerPanel};
use crate::upload::{self, DropRejection, Preview, UploadPanel, UploadView};

/// Label of the generate button while idle.
pub const GENERATE_LABEL: &str = "Generate Model!";
/// Label of the generate button while a request is in flight.
pub const GENERATING_LABEL: &str = "Generating...";

#[derive(Debug, Default)]
struct PageState {
    upload: UploadPanel,
    orchestrator: Orchestrator,
}

/// An in-flight request. Dropped before completing, it abandons its ticket
/// so the page does not stay loading.
struct PendingRequest<'a> {
    state: &'a Mutex<PageState>,
    ticket: Option<Ticket>,
}

impl PendingRequest<'_> {
    fn complete(mut self, result: Result<GenerateResponse, GenerateError>) -> Completion {
        match self.ticket.take() {
            Some(ticket) => self.state.lock().orchestrator.complete(ticket, result),
            None => Completion::Stale,
        }
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            log::warn!("Generation {} dropped before it resolved", ticket);
            self.state.lock().orchestrator.abandon(ticket);
        }
    }
}

/// A snapshot of everything the page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub preview: Option<Preview>,
    pub drag_active: bool,
    pub generation: GenerationState,
    pub trigger_enabled: bool,
    pub trigger_label: &'static str,
    pub error_banner: Option<String>,
}

impl PageView {
    /// Returns what the upload panel displays.
    pub fn upload(&self) -> UploadView<'_> {
        match &self.preview {
            Some(preview) => UploadView::Image(preview),
            None => UploadView::Placeholder {
                drag_active: self.drag_active,
            },
        }
    }

    /// Returns what the viewer panel displays.
    pub fn viewer(&self) -> ViewerPanel<'_> {
        ViewerPanel::for_state(&self.generation)
    }
}

/// Drop target, generation trigger, and their shared state.
pub struct Session<B> {
    backend: B,
    state: Mutex<PageState>,
}

impl<B: GenerationBackend> Session<B> {
    /// Creates a session with no image and no model.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(PageState::default()),
        }
    }

    /// Returns the generation backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Highlights the drop target while a drag hovers over it.
    pub fn drag_enter(&self) {
        self.state.lock().upload.drag_enter();
    }

    /// Clears the drop target highlight.
    pub fn drag_leave(&self) {
        self.state.lock().upload.drag_leave();
    }

    /// Handles a drop. On success the preview is replaced once the file has
    /// been read; the generation state is never touched.
    ///
    /// # Errors
    /// Returns the rejection reason; the preview is left as it was.
    pub async fn drop_files(&self, files: Vec<PathBuf>) -> Result<(), DropRejection> {
        self.drag_leave();
        match upload::load_drop(&files).await {
            Ok(preview) => {
                log::info!("Selected {}", preview.file_name());
                self.state.lock().upload.set_preview(preview);
                Ok(())
            }
            Err(rejection) => {
                log::warn!("Drop ignored: {}", rejection);
                Err(rejection)
            }
        }
    }

    /// Handles a file picked through the file dialog.
    ///
    /// # Errors
    /// Returns the rejection reason; the preview is left as it was.
    pub async fn select_file(&self, path: PathBuf) -> Result<(), DropRejection> {
        self.drop_files(vec![path]).await
    }

    /// Sends the current preview to the generation backend.
    ///
    /// Returns `None` without doing anything when no image is selected. If the
    /// returned future is dropped before the backend answers, the request is
    /// abandoned and the page goes back to the model shown before it.
    pub async fn generate(&self) -> Option<Completion> {
        let (ticket, request) = {
            let mut state = self.state.lock();
            let request = GenerateRequest::from_preview(state.upload.preview()?);
            (state.orchestrator.begin(), request)
        };

        let pending = PendingRequest {
            state: &self.state,
            ticket: Some(ticket),
        };
        let result = self.backend.generate(request).await;

        Some(pending.complete(result))
    }

    /// Whether the generate button accepts clicks.
    pub fn trigger_enabled(&self) -> bool {
        let state = self.state.lock();
        state.upload.preview().is_some() && !state.orchestrator.is_loading()
    }

    /// Returns the selected image, if any.
    pub fn preview(&self) -> Option<Preview> {
        self.state.lock().upload.preview().cloned()
    }

    /// Returns a copy of the generation state.
    pub fn generation(&self) -> GenerationState {
        self.state.lock().orchestrator.state().clone()
    }

    /// Returns a snapshot of the whole page.
    pub fn view(&self) -> PageView {
        let state = self.state.lock();
        let loading = state.orchestrator.is_loading();
        let preview = state.upload.preview().cloned();
        PageView {
            trigger_enabled: preview.is_some() && !loading,
            trigger_label: if loading {
                GENERATING_LABEL
            } else {
                GENERATE_LABEL
            },
            preview,
            drag_active: state.upload.is_drag_active(),
            generation: state.orchestrator.state().clone(),
            error_banner: state.orchestrator.error_banner(),
        }
    }
}
