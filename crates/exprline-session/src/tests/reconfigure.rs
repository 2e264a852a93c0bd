use super::*;
use crate::types::PopupAction;
use crate::WidgetError;

#[test]
fn reconfigure_preserves_document_cursor_and_undo_depth() {
    let mut session = make_session(&[]);
    type_string(&mut session, "sum(rate(x");
    session.handle_key(KeyEvent::Left);

    let text = session.text().to_string();
    let cursor = session.cursor();
    let depth = session.buffer().undo_depth();

    let mut config = make_config(&["sum(up)"], true);
    config.linting = false;
    session.reconfigure(config);

    assert_eq!(session.text(), text);
    assert_eq!(session.cursor(), cursor);
    assert_eq!(session.buffer().undo_depth(), depth);
}

#[test]
fn reconfigure_never_fires_the_change_callback() {
    let mut h = mount_widget("", &[]);
    h.widget.handle_key(KeyEvent::Char('u'));
    h.widget.handle_key(KeyEvent::Char('p'));
    let notified = h.changes.borrow().len();

    h.widget.set_settings(EditorSettings {
        autocomplete: false,
        highlighting: false,
        linting: false,
    });
    h.widget.set_history(vec!["sum(up)".to_string()]);

    assert_eq!(h.changes.borrow().len(), notified);
    assert_eq!(h.widget.text(), "up");
}

#[test]
fn disabling_autocomplete_closes_an_open_popup() {
    let mut session = make_session(&[]);
    session.handle_key(KeyEvent::Char('u'));
    assert!(session.is_popup_open());

    let action = session.reconfigure(make_config(&[], false));
    assert!(matches!(action, PopupAction::Hide));
    assert!(!session.is_popup_open());
}

#[test]
fn mount_without_a_surface_is_a_loud_failure() {
    let props = ExpressionInputProps {
        initial_text: String::new(),
        history: Vec::new(),
        remote: test_remote(),
        settings: EditorSettings::default(),
        loading: false,
    };
    let mut widget = ExpressionInput::new(props, Box::new(|_| {}), Box::new(|| {}));
    let err = widget.mount(None).unwrap_err();
    assert!(matches!(err, WidgetError::MissingSurface));
    assert!(!widget.is_mounted());
}

#[test]
fn second_mount_reconfigures_instead_of_recreating() {
    let mut h = mount_widget("", &[]);
    type_string_widget(&mut h, "sum(up)");
    let depth = h.widget.session().unwrap().buffer().undo_depth();

    // A later render pass carries no surface; the live session must survive.
    h.widget.mount(None).unwrap();
    assert_eq!(h.widget.text(), "sum(up)");
    assert_eq!(h.widget.session().unwrap().buffer().undo_depth(), depth);
    // Still exactly one focus, from the first mount.
    assert_eq!(
        h.surface_log.borrow().iter().filter(|e| **e == "focus").count(),
        1
    );
}

#[test]
fn new_history_snapshot_is_visible_after_reconfigure() {
    let mut h = mount_widget("", &[]);
    h.widget.set_history(vec!["up_total".to_string()]);

    let resp = h.widget.handle_key(KeyEvent::Char('u'));
    let PopupAction::Show { options, .. } = resp.popup else {
        panic!("expected popup to open");
    };
    assert_eq!(options[0].label, "up_total");
    assert_eq!(options[0].detail, Some("past query"));
}

#[test]
fn callback_swap_takes_effect_without_touching_the_session() {
    let mut h = mount_widget("up", &[]);
    let swapped = Rc::new(Cell::new(0));
    let swapped_cb = Rc::clone(&swapped);
    h.widget
        .set_on_execute(Box::new(move || swapped_cb.set(swapped_cb.get() + 1)));

    h.widget.handle_key(KeyEvent::Enter);
    assert_eq!(h.executes.get(), 0);
    assert_eq!(swapped.get(), 1);
    assert_eq!(h.widget.text(), "up");
}

fn type_string_widget(h: &mut Harness, s: &str) {
    for c in s.chars() {
        h.widget.handle_key(KeyEvent::Char(c));
    }
}
