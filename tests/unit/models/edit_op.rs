use super::*;

fn state(text: &str) -> (TextBuffer, LineIndex) {
    (
        TextBuffer::from_text(text),
        LineIndex::from_text(text, crate::models::line_index::DEFAULT_BLOCK_SIZE),
    )
}

#[test]
fn test_apply_updates_buffer_and_lines() {
    let (mut buffer, mut lines) = state("hello");

    EditOp::insert(5, "\nworld").apply(&mut buffer, &mut lines).unwrap();
    assert_eq!(buffer.text(), "hello\nworld");
    assert_eq!(lines.line_count(), 2);

    EditOp::delete(0, 6, "hello\n")
        .apply(&mut buffer, &mut lines)
        .unwrap();
    assert_eq!(buffer.text(), "world");
    assert_eq!(lines.line_count(), 1);
    assert_eq!(lines.len(), buffer.len());
}

#[test]
fn test_inverse_restores_text() {
    let (mut buffer, mut lines) = state("abc");
    let op = EditOp::insert(1, "你好\n");

    op.apply(&mut buffer, &mut lines).unwrap();
    op.inverse().apply(&mut buffer, &mut lines).unwrap();

    assert_eq!(buffer.text(), "abc");
    assert_eq!(lines.line_count(), 1);
    assert_eq!(op.inverse(), EditOp::delete(1, 4, "你好\n"));
    assert_eq!(op.inverse().inverse(), op);
}

#[test]
fn test_apply_out_of_range() {
    let (mut buffer, mut lines) = state("abc");

    assert!(EditOp::insert(9, "x").apply(&mut buffer, &mut lines).is_err());
    assert!(EditOp::delete(2, 9, "").apply(&mut buffer, &mut lines).is_err());
    assert_eq!(buffer.text(), "abc");
}

