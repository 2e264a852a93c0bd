use proptest::prelude::*;

use super::*;

#[derive(Debug, Clone)]
enum Op {
    Type(char),
    Backspace,
    Left,
    Right,
    ShiftEnter,
    Undo,
    Toggle {
        autocomplete: bool,
        highlighting: bool,
        linting: bool,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::sample::select(vec![
            'a', 'n', 'u', 's', '(', ')', '[', ']', '{', '}', '5', 'm', '_', ':', ' ', '"',
        ])
        .prop_map(Op::Type),
        1 => Just(Op::Backspace),
        1 => Just(Op::Left),
        1 => Just(Op::Right),
        1 => Just(Op::ShiftEnter),
        1 => Just(Op::Undo),
        2 => (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(a, h, l)| Op::Toggle {
            autocomplete: a,
            highlighting: h,
            linting: l,
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Arbitrary interleavings of edits and reconfigurations: a
    /// reconfigure never changes the buffer, and the change callback fires
    /// exactly once per mutating edit, carrying the post-edit document.
    #[test]
    fn edits_and_reconfigures_interleave_safely(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let mut h = mount_widget("", &[]);

        for op in ops {
            let changes_before = h.changes.borrow().len();
            match op {
                Op::Toggle { autocomplete, highlighting, linting } => {
                    let text = h.widget.text().to_string();
                    let session = h.widget.session().unwrap();
                    let cursor = session.cursor();
                    let depth = session.buffer().undo_depth();

                    h.widget.set_settings(EditorSettings { autocomplete, highlighting, linting });

                    let session = h.widget.session().unwrap();
                    prop_assert_eq!(h.widget.text(), text);
                    prop_assert_eq!(session.cursor(), cursor);
                    prop_assert_eq!(session.buffer().undo_depth(), depth);
                    prop_assert_eq!(h.changes.borrow().len(), changes_before);
                }
                op => {
                    let event = match op {
                        Op::Type(c) => KeyEvent::Char(c),
                        Op::Backspace => KeyEvent::Backspace,
                        Op::Left => KeyEvent::Left,
                        Op::Right => KeyEvent::Right,
                        Op::ShiftEnter => KeyEvent::ShiftEnter,
                        Op::Undo => KeyEvent::Undo,
                        Op::Toggle { .. } => unreachable!(),
                    };
                    let resp = h.widget.handle_key(event);
                    let changes_after = h.changes.borrow().len();
                    prop_assert_eq!(changes_after - changes_before, resp.text_changed as usize);
                    if resp.text_changed {
                        let last = h.changes.borrow().last().cloned().unwrap();
                        prop_assert_eq!(last.as_str(), h.widget.text());
                    }
                }
            }
        }
    }
}
