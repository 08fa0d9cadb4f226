//! Provides the generation request lifecycle.
//!
//! The lifecycle is a single tagged value instead of independent loading,
//! error, and model slots. Every request is issued a [`Ticket`]; only the
//! most recently issued ticket may change the state when it resolves, so a
//! slow earlier request can never overwrite a newer one.
//!
//! # Examples
//! ```
//! use shapecast::client::GenerateResponse;
//! use shapecast::generation::{Completion, Orchestrator, ViewerPanel};
//!
//! let mut orchestrator = Orchestrator::new();
//! let ticket = orchestrator.begin();
//! assert_eq!(orchestrator.viewer_panel(), ViewerPanel::Spinner);
//!
//! let response = GenerateResponse { glb_data: "Z2xURg==".into() };
//! assert_eq!(orchestrator.complete(ticket, Ok(response)), Completion::Applied);
//! assert_eq!(orchestrator.viewer_panel(), ViewerPanel::Canvas("Z2xURg=="));
//! ```

use crate::client::{GenerateError, GenerateResponse};

/// Identifies one dispatched generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Returns the sequence number; later requests have larger numbers.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The state of the most recent generation request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GenerationState {
    /// Nothing generated, nothing in flight.
    #[default]
    Empty,
    /// A request is in flight; `shown` keeps the previous model visible.
    Loading {
        ticket: Ticket,
        shown: Option<String>,
    },
    /// The last request produced this base64 GLB payload.
    Populated(String),
    /// The last request failed; `shown` is a model from an earlier success.
    Failed {
        message: String,
        shown: Option<String>,
    },
}

impl GenerationState {
    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, GenerationState::Loading { .. })
    }

    /// Returns the in-flight ticket, if a request is loading.
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            GenerationState::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// Returns the failure message of the last request, if it failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the model payload currently on display.
    pub fn model(&self) -> Option<&str> {
        match self {
            GenerationState::Empty => None,
            GenerationState::Populated(model) => Some(model),
            GenerationState::Loading { shown, .. } | GenerationState::Failed { shown, .. } => {
                shown.as_deref()
            }
        }
    }

    fn take_model(&mut self) -> Option<String> {
        match std::mem::take(self) {
            GenerationState::Empty => None,
            GenerationState::Populated(model) => Some(model),
            GenerationState::Loading { shown, .. } | GenerationState::Failed { shown, .. } => shown,
        }
    }
}

/// What the viewer panel displays. A shown model always takes precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerPanel<'a> {
    Placeholder,
    Spinner,
    Canvas(&'a str),
}

impl<'a> ViewerPanel<'a> {
    /// Picks the panel for a generation state.
    pub fn for_state(state: &'a GenerationState) -> Self {
        match state.model() {
            Some(model) => ViewerPanel::Canvas(model),
            None if state.is_loading() => ViewerPanel::Spinner,
            None => ViewerPanel::Placeholder,
        }
    }

    /// Returns the caption shown when no canvas is displayed.
    pub fn caption(&self) -> Option<&'static str> {
        match self {
            ViewerPanel::Placeholder => Some("3D model will appear here"),
            ViewerPanel::Spinner => Some("Generating 3D model..."),
            ViewerPanel::Canvas(_) => None,
        }
    }
}

/// How a resolved request affected the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The result was stored.
    Applied,
    /// A newer request was issued meanwhile; the result was dropped.
    Stale,
}

/// Owns the generation state and issues tickets.
#[derive(Debug, Default, Clone)]
pub struct Orchestrator {
    state: GenerationState,
    issued: u64,
}

impl Orchestrator {
    /// Creates an orchestrator in the `Empty` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Starts a new request: clears any error and keeps the shown model.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        let shown = self.state.take_model();
        log::debug!("Generation {} started", ticket);
        self.state = GenerationState::Loading { ticket, shown };
        ticket
    }

    /// Records the outcome of the request identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<GenerateResponse, GenerateError>,
    ) -> Completion {
        if ticket.0 != self.issued || !self.state.is_loading() {
            log::debug!("Generation {} resolved after a newer request, dropped", ticket);
            return Completion::Stale;
        }

        self.state = match result {
            Ok(response) => {
                log::info!("Generation {} succeeded", ticket);
                GenerationState::Populated(response.glb_data)
            }
            Err(e) => {
                log::warn!("Generation {} failed: {}", ticket, e);
                let shown = self.state.take_model();
                GenerationState::Failed {
                    message: e.to_string(),
                    shown,
                }
            }
        };
        Completion::Applied
    }

    /// Ends the request identified by `ticket` without a result, going back
    /// to the model shown before it started. Does nothing if the ticket is
    /// no longer the one loading.
    pub fn abandon(&mut self, ticket: Ticket) -> Completion {
        if self.state.ticket() != Some(ticket) {
            return Completion::Stale;
        }

        log::debug!("Generation {} abandoned", ticket);
        self.state = match self.state.take_model() {
            Some(model) => GenerationState::Populated(model),
            None => GenerationState::Empty,
        };
        Completion::Applied
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Returns what the viewer panel displays.
    pub fn viewer_panel(&self) -> ViewerPanel<'_> {
        ViewerPanel::for_state(&self.state)
    }

    /// Returns the text of the error banner, if the last request failed.
    pub fn error_banner(&self) -> Option<String> {
        self.state.error().map(|message| format!("Error: {}", message))
    }
}
