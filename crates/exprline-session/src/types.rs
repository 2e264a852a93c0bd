use exprline_core::complete::{Candidate, CompletionContext};

/// Hint shown by the host while the document is empty.
pub const PLACEHOLDER: &str = "Expression (press Shift+Enter for newlines)";

/// Key events the session understands. The host maps its native key codes
/// onto these; anything else should bypass the session entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable input.
    Char(char),
    /// Execute the query (primary execution key).
    Enter,
    /// Insert a line break with auto-indent (modified execution key).
    ShiftEnter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Undo,
    Redo,
}

/// Suggestion popup action — exactly one of three states, so "show" and
/// "hide" can never both be requested by one response.
#[derive(Debug)]
pub enum PopupAction {
    /// Leave the popup as-is.
    Keep,
    /// Show or update the popup with these rows.
    Show {
        options: Vec<Candidate>,
        selected: usize,
    },
    /// Hide the popup.
    Hide,
}

/// Orthogonal side-effects that accompany a response.
#[derive(Debug, Default)]
pub struct SideEffects {
    /// The session resigned input focus (Escape).
    pub blurred: bool,
}

/// Response from `handle_key`, describing what the host should do.
pub struct KeyResponse {
    pub consumed: bool,
    /// The execute callback fired.
    pub executed: bool,
    /// The document was mutated (the change callback has already fired).
    pub text_changed: bool,
    pub popup: PopupAction,
    /// Completion request to hand to the worker (deferred mode only).
    pub async_request: Option<CompletionContext>,
    pub side_effects: SideEffects,
}

impl KeyResponse {
    pub(crate) fn not_consumed() -> Self {
        Self {
            consumed: false,
            executed: false,
            text_changed: false,
            popup: PopupAction::Keep,
            async_request: None,
            side_effects: SideEffects::default(),
        }
    }

    pub(crate) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }
}

pub(crate) fn cyclic_index(current: usize, delta: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let c = current as i32;
    let n = count as i32;
    ((c + delta + n) % n) as usize
}
