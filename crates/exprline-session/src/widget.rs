//! Host-facing widget wrapper: create the editor once, reconfigure the
//! mutable slot on every settings change thereafter.

use std::sync::Arc;

use exprline_core::complete::{HistoryComplete, RemoteConfig, SymbolComplete};

use crate::types::{KeyEvent, KeyResponse, PopupAction, PLACEHOLDER};
use crate::worker::CompletionWorker;
use crate::{EditorSession, SessionConfig};

/// Feature flags; may change at any time after mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub autocomplete: bool,
    pub highlighting: bool,
    pub linting: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            autocomplete: true,
            highlighting: true,
            linting: true,
        }
    }
}

/// Inbound construction parameters.
pub struct ExpressionInputProps {
    /// Bound into the session at mount only; later changes are ignored so
    /// external resets never fight user edits.
    pub initial_text: String,
    /// Past queries, newest-last, caller-owned and passed in verbatim.
    pub history: Vec<String>,
    /// Base address and initial symbol cache seeding the language source.
    pub remote: RemoteConfig,
    pub settings: EditorSettings,
    /// Presentation only; the host renders a spinner while set.
    pub loading: bool,
}

/// Focus capability of the host's rendering surface.
pub trait HostSurface {
    fn focus(&mut self);
    fn blur(&mut self);
}

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// Programming-invariant violation: the host tried to create the editor
    /// without anywhere to put it.
    #[error("expected a host surface to mount the editor into")]
    MissingSurface,
}

/// Two-state widget: unmounted until the first [`mount`](Self::mount), then
/// live for the rest of its lifetime. The live session is only ever mutated
/// in place — recreating it would lose cursor, undo history, and focus.
pub struct ExpressionInput {
    props: ExpressionInputProps,
    on_change: Box<dyn FnMut(&str)>,
    on_execute: Box<dyn FnMut()>,
    surface: Option<Box<dyn HostSurface>>,
    session: Option<EditorSession>,
    worker: Option<CompletionWorker>,
    background: bool,
}

impl ExpressionInput {
    pub fn new(
        props: ExpressionInputProps,
        on_change: Box<dyn FnMut(&str)>,
        on_execute: Box<dyn FnMut()>,
    ) -> Self {
        Self {
            props,
            on_change,
            on_execute,
            surface: None,
            session: None,
            worker: None,
            background: false,
        }
    }

    /// Create the editor session, or reconfigure it if it already exists.
    /// The first call needs a surface; a missing one is a bug in the host,
    /// reported loudly rather than silently skipped.
    pub fn mount(&mut self, surface: Option<Box<dyn HostSurface>>) -> Result<(), WidgetError> {
        if self.session.is_some() {
            self.sync();
            return Ok(());
        }

        let mut surface = surface.ok_or(WidgetError::MissingSurface)?;
        let mut session = EditorSession::new(&self.props.initial_text, self.build_config());
        session.set_defer_completions(self.background);
        surface.focus();
        self.surface = Some(surface);
        self.session = Some(session);
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    /// Rebuild the merger from the current history snapshot and symbol
    /// cache, then swap the session's configuration slot in one step.
    pub fn sync(&mut self) -> PopupAction {
        let config = self.build_config();
        let action = match &mut self.session {
            Some(session) => session.reconfigure(config),
            None => PopupAction::Keep,
        };
        if matches!(action, PopupAction::Hide) {
            if let Some(worker) = &self.worker {
                worker.invalidate();
            }
        }
        action
    }

    fn build_config(&self) -> SessionConfig {
        let primary = SymbolComplete::new(&self.props.remote);
        let merger = HistoryComplete::new(Box::new(primary), self.props.history.clone());
        SessionConfig {
            autocomplete: self.props.settings.autocomplete,
            highlighting: self.props.settings.highlighting,
            linting: self.props.settings.linting,
            complete: Arc::new(merger),
        }
    }

    pub fn set_settings(&mut self, settings: EditorSettings) -> PopupAction {
        self.props.settings = settings;
        self.sync()
    }

    pub fn set_history(&mut self, history: Vec<String>) -> PopupAction {
        self.props.history = history;
        self.sync()
    }

    pub fn set_remote(&mut self, remote: RemoteConfig) -> PopupAction {
        self.props.remote = remote;
        self.sync()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.props.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.props.loading
    }

    pub fn set_on_change(&mut self, on_change: Box<dyn FnMut(&str)>) {
        self.on_change = on_change;
    }

    pub fn set_on_execute(&mut self, on_execute: Box<dyn FnMut()>) {
        self.on_execute = on_execute;
    }

    /// Run the completion source on a background thread instead of inside
    /// `handle_key`. Responses come back through [`poll_completions`](Self::poll_completions).
    pub fn set_background_completion(&mut self, enabled: bool) {
        self.background = enabled;
        if enabled && self.worker.is_none() {
            self.worker = Some(CompletionWorker::new());
        }
        if let Some(session) = &mut self.session {
            session.set_defer_completions(enabled);
        }
    }

    /// Forward a key event and apply its response: callbacks, focus, and
    /// background submission.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let mut resp = match self.session.as_mut() {
            Some(session) => session.handle_key(event),
            None => return KeyResponse::not_consumed(),
        };

        if resp.executed {
            (self.on_execute)();
        }
        if resp.text_changed {
            let text = self
                .session
                .as_ref()
                .map(|s| s.text().to_string())
                .unwrap_or_default();
            (self.on_change)(&text);
        }
        if resp.side_effects.blurred {
            if let Some(surface) = &mut self.surface {
                surface.blur();
            }
        }
        if let Some(ctx) = resp.async_request.take() {
            if let (Some(session), Some(worker)) = (&self.session, &self.worker) {
                worker.submit(session.completion_source(), ctx);
            }
        }
        if matches!(resp.popup, PopupAction::Hide) {
            if let Some(worker) = &self.worker {
                worker.invalidate();
            }
        }

        resp
    }

    /// Drain one background completion outcome, if any survived the
    /// staleness checks.
    pub fn poll_completions(&mut self) -> Option<KeyResponse> {
        let outcome = self.worker.as_ref()?.try_recv()?;
        self.session
            .as_mut()?
            .receive_completions(&outcome.text, outcome.pos, outcome.result)
    }

    /// Host-triggered execution (e.g. an execute button next to the input).
    pub fn execute(&mut self) {
        (self.on_execute)();
    }

    pub fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    pub fn text(&self) -> &str {
        match &self.session {
            Some(session) => session.text(),
            None => &self.props.initial_text,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        PLACEHOLDER
    }
}
