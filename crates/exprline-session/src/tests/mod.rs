mod proptest_fsm;
mod reconfigure;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use exprline_core::complete::{HistoryComplete, RemoteConfig, SymbolComplete};

use super::types::KeyEvent;
use super::{
    EditorSession, EditorSettings, ExpressionInput, ExpressionInputProps, HostSurface,
    KeyResponse, SessionConfig,
};

pub(super) fn test_remote() -> RemoteConfig {
    RemoteConfig {
        url: String::new(),
        initial_symbols: vec![
            "node_load1".to_string(),
            "node_load5".to_string(),
            "up".to_string(),
            "http_requests_total".to_string(),
        ],
    }
}

pub(super) fn make_config(history: &[&str], autocomplete: bool) -> SessionConfig {
    let primary = SymbolComplete::new(&test_remote());
    let merger = HistoryComplete::new(
        Box::new(primary),
        history.iter().map(|s| s.to_string()).collect(),
    );
    SessionConfig {
        autocomplete,
        highlighting: true,
        linting: true,
        complete: Arc::new(merger),
    }
}

pub(super) fn make_session(history: &[&str]) -> EditorSession {
    EditorSession::new("", make_config(history, true))
}

// Helper: simulate typing a string one character at a time
pub(super) fn type_string(session: &mut EditorSession, s: &str) -> Vec<KeyResponse> {
    s.chars()
        .map(|c| session.handle_key(KeyEvent::Char(c)))
        .collect()
}

pub(super) struct TestSurface {
    pub(super) log: Rc<RefCell<Vec<&'static str>>>,
}

impl HostSurface for TestSurface {
    fn focus(&mut self) {
        self.log.borrow_mut().push("focus");
    }

    fn blur(&mut self) {
        self.log.borrow_mut().push("blur");
    }
}

/// A mounted widget with recording callbacks and surface.
pub(super) struct Harness {
    pub(super) widget: ExpressionInput,
    pub(super) changes: Rc<RefCell<Vec<String>>>,
    pub(super) executes: Rc<Cell<usize>>,
    pub(super) surface_log: Rc<RefCell<Vec<&'static str>>>,
}

pub(super) fn mount_widget(initial: &str, history: &[&str]) -> Harness {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let executes = Rc::new(Cell::new(0));
    let surface_log = Rc::new(RefCell::new(Vec::new()));

    let changes_cb = Rc::clone(&changes);
    let executes_cb = Rc::clone(&executes);
    let props = ExpressionInputProps {
        initial_text: initial.to_string(),
        history: history.iter().map(|s| s.to_string()).collect(),
        remote: test_remote(),
        settings: EditorSettings::default(),
        loading: false,
    };
    let mut widget = ExpressionInput::new(
        props,
        Box::new(move |text| changes_cb.borrow_mut().push(text.to_string())),
        Box::new(move || executes_cb.set(executes_cb.get() + 1)),
    );
    widget
        .mount(Some(Box::new(TestSurface {
            log: Rc::clone(&surface_log),
        })))
        .unwrap();

    Harness {
        widget,
        changes,
        executes,
        surface_log,
    }
}
