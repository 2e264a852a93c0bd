use tracing::debug_span;

use crate::buffer::Buffer;
use crate::types::{KeyEvent, KeyResponse};
use crate::{pairing, EditorSession};

impl EditorSession {
    /// Process a key event. Returns a KeyResponse describing what the host
    /// should do (fire callbacks, move focus, update the popup).
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", ?event).entered();

        match event {
            // Execution key: evaluated above the default newline binding, so
            // the document is never touched.
            KeyEvent::Enter => {
                let mut resp = KeyResponse::consumed();
                resp.executed = true;
                resp
            }

            // Modified execution key inserts the line break instead.
            KeyEvent::ShiftEnter => {
                self.buffer.insert_newline_indent();
                let mut resp = KeyResponse::consumed();
                resp.text_changed = true;
                self.close_popup_into(&mut resp);
                resp
            }

            // Escape blurs without consuming, so the popup's own dismissal
            // still runs after this handler (layered below override
            // precedence, as the execution key is layered above it).
            KeyEvent::Escape => {
                let mut resp = KeyResponse::not_consumed();
                resp.side_effects.blurred = true;
                self.close_popup_into(&mut resp);
                resp
            }

            // Popup dispatch
            KeyEvent::Down if self.is_popup_open() => self.navigate_popup(1),
            KeyEvent::Up if self.is_popup_open() => self.navigate_popup(-1),
            KeyEvent::Tab if self.is_popup_open() => self.accept_selected(),

            KeyEvent::Char(c) => self.handle_char(c),

            KeyEvent::Backspace => {
                if !self.buffer.backspace() {
                    return KeyResponse::consumed();
                }
                let mut resp = KeyResponse::consumed();
                resp.text_changed = true;
                self.update_completions(&mut resp);
                resp
            }

            KeyEvent::Delete => {
                if !self.buffer.delete_forward() {
                    return KeyResponse::consumed();
                }
                let mut resp = KeyResponse::consumed();
                resp.text_changed = true;
                self.update_completions(&mut resp);
                resp
            }

            KeyEvent::Left => self.handle_move(|b| b.move_left()),
            KeyEvent::Right => self.handle_move(|b| b.move_right()),
            KeyEvent::Home => self.handle_move(|b| b.move_home()),
            KeyEvent::End => self.handle_move(|b| b.move_end()),
            KeyEvent::Up => self.handle_move(|b| b.move_vertical(-1)),
            KeyEvent::Down => self.handle_move(|b| b.move_vertical(1)),

            KeyEvent::Undo => self.handle_history_step(Buffer::undo),
            KeyEvent::Redo => self.handle_history_step(Buffer::redo),

            // Tab with no popup falls through to the host's focus handling.
            KeyEvent::Tab => KeyResponse::not_consumed(),
        }
    }

    fn handle_char(&mut self, c: char) -> KeyResponse {
        let mut resp = KeyResponse::consumed();

        // Typing a closer right before the auto-closed one skips over it
        // instead of doubling; the document is unchanged.
        if matches!(c, ')' | ']' | '}' | '"' | '\'') && self.buffer.char_after() == Some(c) {
            self.buffer.move_right();
            self.close_popup_into(&mut resp);
            return resp;
        }

        if let Some(close) = pairing(c) {
            let mut s = String::with_capacity(c.len_utf8() + close.len_utf8());
            s.push(c);
            s.push(close);
            self.buffer.insert(&s, c.len_utf8());
        } else {
            let mut scratch = [0u8; 4];
            self.buffer.insert(c.encode_utf8(&mut scratch), c.len_utf8());
        }

        resp.text_changed = true;
        self.update_completions(&mut resp);
        resp
    }

    fn handle_move(&mut self, mv: impl FnOnce(&mut Buffer)) -> KeyResponse {
        mv(&mut self.buffer);
        let mut resp = KeyResponse::consumed();
        self.close_popup_into(&mut resp);
        resp
    }

    fn handle_history_step(&mut self, step: impl FnOnce(&mut Buffer) -> bool) -> KeyResponse {
        if !step(&mut self.buffer) {
            return KeyResponse::consumed();
        }
        let mut resp = KeyResponse::consumed();
        resp.text_changed = true;
        self.close_popup_into(&mut resp);
        resp
    }
}
