//! Stateful expression-editor session: document, popup, and key handling.
//!
//! [`EditorSession`] owns the editing state and processes each keystroke,
//! returning responses that the host translates into rendering and focus
//! calls. [`ExpressionInput`] wraps a session with the mount/reconfigure
//! protocol and the host callbacks.

mod buffer;
mod completion;
mod key_handlers;
pub(crate) mod types;
mod widget;
mod worker;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use exprline_core::complete::Complete;
use exprline_core::lint::{self, Diagnostic};
use exprline_core::syntax::{self, HighlightClass, Span};

pub use buffer::{Buffer, Selection};
pub use types::{KeyEvent, KeyResponse, PopupAction, SideEffects, PLACEHOLDER};
pub use widget::{
    EditorSettings, ExpressionInput, ExpressionInputProps, HostSurface, WidgetError,
};
pub use worker::{CompletionOutcome, CompletionWorker};

use completion::PopupState;

/// The mutable configuration slot: everything that may change after the
/// session exists. Swapped whole on reconfiguration, never edited in place.
pub struct SessionConfig {
    pub autocomplete: bool,
    pub highlighting: bool,
    pub linting: bool,
    /// Completion source for this configuration generation.
    pub complete: Arc<dyn Complete>,
}

/// Stateful editor session. Structural state (buffer, undo, popup
/// machinery) is built once here and survives every reconfiguration.
pub struct EditorSession {
    buffer: Buffer,
    config: SessionConfig,
    popup: PopupState,
    /// When true, handle_key skips synchronous completion and sets
    /// `async_request` in the response for the worker to pick up.
    defer_completions: bool,
}

impl EditorSession {
    pub fn new(initial_text: &str, config: SessionConfig) -> Self {
        Self {
            buffer: Buffer::new(initial_text),
            config,
            popup: PopupState::new(),
            defer_completions: false,
        }
    }

    /// Swap the mutable configuration slot. One assignment; the document,
    /// cursor, selection, and undo history are untouched.
    pub fn reconfigure(&mut self, config: SessionConfig) -> PopupAction {
        self.config = config;
        if !self.config.autocomplete && self.popup.is_open() {
            self.popup.close();
            return PopupAction::Hide;
        }
        PopupAction::Keep
    }

    pub fn set_defer_completions(&mut self, enabled: bool) {
        self.defer_completions = enabled;
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup.is_open()
    }

    /// The completion source of the current configuration generation.
    pub fn completion_source(&self) -> Arc<dyn Complete> {
        Arc::clone(&self.config.complete)
    }

    /// Token decorations for the current document; empty when highlighting
    /// is off.
    pub fn decorations(&self) -> Vec<(Span, HighlightClass)> {
        if !self.config.highlighting {
            return Vec::new();
        }
        syntax::highlight(self.buffer.text())
    }

    /// Structural diagnostics for the current document; empty when linting
    /// is off.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        if !self.config.linting {
            return Vec::new();
        }
        lint::lint(self.buffer.text())
    }
}

/// Auto-close pairing for typed characters: brackets plus quotes.
pub(crate) fn pairing(c: char) -> Option<char> {
    syntax::closing_bracket(c).or(match c {
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    })
}
