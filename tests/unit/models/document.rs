use super::*;
use std::cell::RefCell;
use std::rc::Rc;

struct Recorder {
    events: Rc<RefCell<Vec<DocumentEvent>>>,
}

impl DocumentListener for Recorder {
    fn on_event(&mut self, _doc: &Document, event: &DocumentEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn recorded(doc: &mut Document) -> Rc<RefCell<Vec<DocumentEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    doc.add_listener(Box::new(Recorder {
        events: events.clone(),
    }));
    events
}

#[test]
fn test_document_queries() {
    let doc = Document::from_text("one\ntwo\n");

    assert_eq!(doc.len(), 8);
    assert_eq!(doc.line_count(), 3);
    assert_eq!(doc.line_of_offset(5), Ok(1));
    assert_eq!(doc.line_start(1), Ok(4));
    assert_eq!(doc.line_end(1), Ok(8));
    assert_eq!(doc.char_at(4), Ok('t'));
    assert_eq!(doc.slice(4, 7).unwrap(), "two");
}

#[test]
fn test_insert_delete_keep_lines_in_sync() {
    let mut doc = Document::from_text("ab");

    doc.insert(1, "\n\n").unwrap();
    assert_eq!(doc.text(), "a\n\nb");
    assert_eq!(doc.line_count(), 3);

    let removed = doc.delete(1, 3).unwrap();
    assert_eq!(removed, "\n\n");
    assert_eq!(doc.line_count(), 1);
    assert_eq!(doc.lines().len(), doc.len());
}

#[test]
fn test_out_of_range_edit_changes_nothing() {
    let mut doc = Document::from_text("abc");

    assert!(doc.insert(5, "x").is_err());
    assert!(doc.delete(1, 7).is_err());
    assert!(doc.replace_range(3, 2, "x").is_err());
    assert_eq!(doc.text(), "abc");
    assert!(!doc.can_undo());
}

#[test]
fn test_undo_redo_single_edits() {
    let mut doc = Document::from_text("abc");
    doc.insert(3, "d").unwrap();
    doc.delete(0, 1).unwrap();

    assert_eq!(doc.undo(), Ok(true));
    assert_eq!(doc.text(), "abcd");
    assert_eq!(doc.undo(), Ok(true));
    assert_eq!(doc.text(), "abc");
    assert_eq!(doc.undo(), Ok(false));

    assert_eq!(doc.redo(), Ok(true));
    assert_eq!(doc.text(), "abcd");
    assert!(doc.can_redo());
}

#[test]
fn test_replace_range_is_one_undo_step() {
    let mut doc = Document::from_text("hello world");
    doc.replace_range(6, 11, "there\nfriend").unwrap();

    assert_eq!(doc.text(), "hello there\nfriend");
    assert_eq!(doc.line_count(), 2);

    assert_eq!(doc.undo(), Ok(true));
    assert_eq!(doc.text(), "hello world");
    assert_eq!(doc.line_count(), 1);
    assert!(!doc.can_undo());
}

#[test]
fn test_nested_atomic_edit_commits_once() {
    let mut doc = Document::from_text("");

    doc.begin_atomic_edit();
    doc.insert(0, "a").unwrap();
    doc.atomic_edit(|doc| doc.insert(1, "b")).unwrap();
    assert!(doc.in_atomic_edit());
    // 作用域内的撤销被忽略
    assert_eq!(doc.undo(), Ok(false));
    doc.insert(2, "c").unwrap();
    doc.end_atomic_edit();

    assert_eq!(doc.text(), "abc");
    assert_eq!(doc.undo(), Ok(true));
    assert_eq!(doc.text(), "");
    assert!(!doc.can_undo());
}

#[test]
fn test_unbalanced_end_atomic_edit_is_ignored() {
    let mut doc = Document::from_text("x");
    doc.end_atomic_edit();

    assert!(!doc.in_atomic_edit());
    doc.insert(1, "y").unwrap();
    assert_eq!(doc.undo(), Ok(true));
    assert_eq!(doc.text(), "x");
}

#[test]
fn test_listener_events() {
    let mut doc = Document::from_text("abc");
    let events = recorded(&mut doc);

    doc.replace_range(0, 1, "xy").unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            DocumentEvent::Removed { start: 0, end: 1 },
            DocumentEvent::Inserted { offset: 0, len: 2 },
            DocumentEvent::AtomicEditEnded,
        ]
    );

    events.borrow_mut().clear();
    doc.undo().unwrap();
    assert_eq!(
        *events.borrow(),
        vec![
            DocumentEvent::Removed { start: 0, end: 2 },
            DocumentEvent::Inserted { offset: 0, len: 1 },
        ]
    );
}

#[test]
fn test_listener_sees_consistent_lines() {
    struct Checker {
        checked: Rc<RefCell<usize>>,
    }

    impl DocumentListener for Checker {
        fn on_event(&mut self, doc: &Document, _event: &DocumentEvent) {
            assert_eq!(doc.lines().len(), doc.len());
            let last = doc.line_count() - 1;
            assert_eq!(doc.line_end(last), Ok(doc.len()));
            *self.checked.borrow_mut() += 1;
        }
    }

    let checked = Rc::new(RefCell::new(0));
    let mut doc = Document::from_text("a\nb\nc");
    doc.add_listener(Box::new(Checker {
        checked: checked.clone(),
    }));

    doc.replace_range(1, 4, "\n\n\n").unwrap();
    doc.undo().unwrap();

    assert_eq!(*checked.borrow(), 5);
}

#[test]
fn test_with_config_undo_limit() {
    let config = EngineConfig {
        undo_limit: 1,
        ..EngineConfig::default()
    };
    let mut doc = Document::with_config("", &config);
    doc.insert(0, "a").unwrap();
    doc.insert(1, "b").unwrap();

    assert_eq!(doc.undo(), Ok(true));
    assert_eq!(doc.undo(), Ok(false));
    assert_eq!(doc.text(), "a");
}
