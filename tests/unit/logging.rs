use super::*;

#[test]
fn test_line_sender_splits_lines() {
    let (tx, rx) = mpsc::channel();
    let mut sender = LineSender::new(tx);

    sender.write_all(b"first\nsec").unwrap();
    sender.write_all(b"ond\r\nthird").unwrap();
    assert_eq!(rx.try_recv().as_deref(), Ok("first"));
    assert_eq!(rx.try_recv().as_deref(), Ok("second"));
    assert!(rx.try_recv().is_err());

    drop(sender);
    assert_eq!(rx.try_recv().as_deref(), Ok("third"));
}

#[test]
fn test_line_sender_ignores_closed_receiver() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let mut sender = LineSender::new(tx);

    assert_eq!(sender.write(b"lost\n").unwrap(), 5);
}

#[test]
fn test_line_sender_skips_blank_lines() {
    let (tx, rx) = mpsc::channel();
    let mut sender = LineSender::new(tx);

    sender.write_all(b"\n\nx\n").unwrap();
    drop(sender);
    let lines: Vec<String> = rx.iter().collect();
    assert_eq!(lines, vec!["x".to_string()]);
}
