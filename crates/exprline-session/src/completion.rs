//! Suggestion popup state and completion plumbing.
//!
//! A result stays active while the typed prefix still matches its
//! token-shape filter; narrowing then happens in place without a new
//! request. Anything else re-requests, either synchronously against the
//! configured source or via `async_request` for the worker.

use tracing::warn;
use unicode_width::UnicodeWidthStr;

use exprline_core::complete::{Candidate, CompletionContext, CompletionResult};
use exprline_core::settings::settings;

use crate::types::{cyclic_index, KeyResponse, PopupAction};
use crate::EditorSession;

pub(crate) struct PopupState {
    result: Option<CompletionResult>,
    /// Indices into `result.options` surviving the current prefix.
    visible: Vec<usize>,
    selected: usize,
}

impl PopupState {
    pub(crate) fn new() -> Self {
        Self {
            result: None,
            visible: Vec::new(),
            selected: 0,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        !self.visible.is_empty()
    }

    pub(crate) fn close(&mut self) {
        self.result = None;
        self.visible.clear();
        self.selected = 0;
    }

    fn set(&mut self, result: CompletionResult) {
        self.visible = (0..result.options.len()).collect();
        self.selected = 0;
        self.result = Some(result);
    }

    fn refilter(&mut self, prefix: &str) {
        let Some(result) = &self.result else {
            return;
        };
        self.visible = result
            .options
            .iter()
            .enumerate()
            .filter(|(_, c)| starts_with_ignore_case(&c.insert, prefix))
            .map(|(i, _)| i)
            .collect();
        self.selected = 0;
        if self.visible.is_empty() {
            self.close();
        }
    }

    fn rows(&self) -> Vec<Candidate> {
        let Some(result) = &self.result else {
            return Vec::new();
        };
        self.visible
            .iter()
            .map(|&i| result.options[i].clone())
            .collect()
    }

    fn show_action(&self) -> PopupAction {
        PopupAction::Show {
            options: self.rows(),
            selected: self.selected,
        }
    }

    fn selected_candidate(&self) -> Option<(usize, &Candidate)> {
        let result = self.result.as_ref()?;
        let idx = *self.visible.get(self.selected)?;
        Some((result.from, &result.options[idx]))
    }
}

impl EditorSession {
    pub(crate) fn close_popup_into(&mut self, resp: &mut KeyResponse) {
        if self.popup.is_open() {
            self.popup.close();
            resp.popup = PopupAction::Hide;
        }
    }

    /// After a document edit: narrow the active result in place when the
    /// typed prefix still fits its filter, otherwise start a fresh request.
    pub(crate) fn update_completions(&mut self, resp: &mut KeyResponse) {
        if !self.config.autocomplete {
            self.close_popup_into(resp);
            return;
        }

        let active = self.popup.result.as_ref().map(|r| (r.from, r.filter));
        if let Some((from, filter)) = active {
            let cursor = self.buffer.cursor();
            if from <= cursor && self.buffer.text().is_char_boundary(from) {
                let prefix = self.buffer.text()[from..cursor].to_string();
                if filter.matches(&prefix) {
                    self.popup.refilter(&prefix);
                    resp.popup = if self.popup.is_open() {
                        self.popup.show_action()
                    } else {
                        PopupAction::Hide
                    };
                    return;
                }
            }
        }

        self.request_completions(resp);
    }

    pub(crate) fn request_completions(&mut self, resp: &mut KeyResponse) {
        let ctx = CompletionContext::new(self.buffer.text().to_string(), self.buffer.cursor());

        if self.defer_completions {
            // Keep whatever is showing until fresh results arrive; the
            // worker's generation counter drops anything stale.
            resp.async_request = Some(ctx);
            return;
        }

        match self.config.complete.complete(&ctx) {
            Ok(Some(result)) if !result.options.is_empty() => {
                self.popup.set(result);
                resp.popup = self.popup.show_action();
            }
            Ok(_) => self.close_popup_into(resp),
            Err(err) => {
                // A failed request means no suggestions this time; the
                // editor itself is unaffected.
                warn!(error = %err, "completion request failed");
                self.close_popup_into(resp);
            }
        }
    }

    /// Receive an asynchronously produced result. Returns `None` if it is
    /// stale — the document or cursor moved on since the request.
    pub fn receive_completions(
        &mut self,
        for_text: &str,
        for_pos: usize,
        result: Option<CompletionResult>,
    ) -> Option<KeyResponse> {
        if !self.config.autocomplete {
            return None;
        }
        if self.buffer.text() != for_text || self.buffer.cursor() != for_pos {
            return None;
        }

        let mut resp = KeyResponse::consumed();
        match result {
            Some(r) if !r.options.is_empty() => {
                self.popup.set(r);
                resp.popup = self.popup.show_action();
            }
            _ => self.close_popup_into(&mut resp),
        }
        Some(resp)
    }

    pub(crate) fn navigate_popup(&mut self, delta: i32) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        self.popup.selected = cyclic_index(self.popup.selected, delta, self.popup.visible.len());
        resp.popup = self.popup.show_action();
        resp
    }

    /// Replace the active span with the selected candidate's insert text.
    pub(crate) fn accept_selected(&mut self) -> KeyResponse {
        let Some((from, candidate)) = self.popup.selected_candidate() else {
            return KeyResponse::consumed();
        };
        let insert = candidate.insert.clone();
        self.buffer.replace(from, self.buffer.cursor(), &insert);
        let mut resp = KeyResponse::consumed();
        resp.text_changed = true;
        self.popup.close();
        resp.popup = PopupAction::Hide;
        resp
    }

    /// Column hint for the host's popup layout: the widest visible row,
    /// measured in display cells, capped rows per the popup settings.
    pub fn popup_width_hint(&self) -> usize {
        let rows = self.popup.rows();
        rows.iter()
            .take(settings().popup.max_visible_rows)
            .map(|c| {
                c.label.width() + c.detail.map_or(0, |d| d.width() + 1)
            })
            .max()
            .unwrap_or(0)
    }
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name
            .chars()
            .zip(prefix.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}
