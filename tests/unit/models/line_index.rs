use super::*;

/// 逐行校验：首行从 0 开始，相邻行首尾相接，末行结束于 len
fn assert_invariants(index: &LineIndex) {
    assert_eq!(index.line_start(0), Ok(0));
    let last = index.line_count() - 1;
    assert_eq!(index.line_end(last), Ok(index.len()));
    for line in 0..last {
        assert_eq!(index.line_end(line), index.line_start(line + 1));
    }
}

fn assert_matches_text(index: &LineIndex, text: &str) {
    let expected = LineIndex::from_text(text, DEFAULT_BLOCK_SIZE);
    assert_eq!(index.len(), text.chars().count());
    assert_eq!(index.line_count(), expected.line_count());
    for line in 0..index.line_count() {
        assert_eq!(index.line_range(line), expected.line_range(line));
    }
    assert_invariants(index);
}

#[test]
fn test_empty_document_has_one_line() {
    let index = LineIndex::new();

    assert_eq!(index.line_count(), 1);
    assert_eq!(index.line_range(0), Ok((0, 0)));
    assert_eq!(index.line_of_offset(0), Ok(0));
}

#[test]
fn test_line_break_belongs_to_the_line_it_ends() {
    let index = LineIndex::from_text("ab\ncd\n", DEFAULT_BLOCK_SIZE);

    assert_eq!(index.line_count(), 3);
    assert_eq!(index.line_range(0), Ok((0, 3)));
    assert_eq!(index.line_range(1), Ok((3, 6)));
    assert_eq!(index.line_range(2), Ok((6, 6)));
    assert_eq!(index.line_of_offset(2), Ok(0));
    assert_eq!(index.line_of_offset(3), Ok(1));
    assert_eq!(index.line_of_offset(6), Ok(2));
}

#[test]
fn test_queries_out_of_range() {
    let index = LineIndex::from_text("a\nb", DEFAULT_BLOCK_SIZE);

    assert!(index.line_of_offset(4).is_err());
    assert_eq!(
        index.line_start(2),
        Err(RangeError::Line {
            line: 2,
            line_count: 2
        })
    );
    assert!(index.line_end(2).is_err());
}

#[test]
fn test_insert_without_newline_changes_one_line() {
    let mut index = LineIndex::from_text("ab\ncd", DEFAULT_BLOCK_SIZE);
    index.insert(4, "xyz").unwrap();

    assert_eq!(index.line_count(), 2);
    assert_eq!(index.line_range(1), Ok((3, 8)));
    assert_matches_text(&index, "ab\ncxyzd");
}

#[test]
fn test_insert_with_newlines_splits_line() {
    let mut index = LineIndex::from_text("abcd", DEFAULT_BLOCK_SIZE);
    index.insert(2, "1\n2\n3").unwrap();

    assert_matches_text(&index, "ab1\n2\n3cd");
}

#[test]
fn test_remove_within_line() {
    let mut index = LineIndex::from_text("hello\nworld", DEFAULT_BLOCK_SIZE);
    index.remove(7, 9).unwrap();

    assert_matches_text(&index, "hello\nwld");
}

#[test]
fn test_remove_across_lines_merges() {
    let mut index = LineIndex::from_text("aa\nbb\ncc\ndd", DEFAULT_BLOCK_SIZE);
    index.remove(1, 7).unwrap();

    assert_matches_text(&index, "ac\ndd");
}

#[test]
fn test_remove_out_of_range() {
    let mut index = LineIndex::from_text("abc", DEFAULT_BLOCK_SIZE);

    assert!(index.remove(2, 4).is_err());
    assert!(index.remove(2, 1).is_err());
    assert!(index.insert(4, "x").is_err());
    assert_matches_text(&index, "abc");
}

#[test]
fn test_small_blocks_split_and_merge() {
    let mut text = String::new();
    let mut index = LineIndex::from_text("", 4);

    for i in 0..100 {
        let line = format!("line {}\n", i);
        let at = text.chars().count();
        index.insert(at, &line).unwrap();
        text.push_str(&line);
    }
    assert_matches_text(&index, &text);

    // 删掉中间一大段，跨越多个块
    let start = text.char_indices().nth(37).map(|(i, _)| i).unwrap();
    let end = text.char_indices().nth(501).map(|(i, _)| i).unwrap();
    index.remove(37, 501).unwrap();
    text.replace_range(start..end, "");
    assert_matches_text(&index, &text);

    index.remove(0, index.len()).unwrap();
    assert_matches_text(&index, "");
}

#[test]
fn test_line_of_offset_round_trip() {
    let text = "one\n\ntwo\nthree\n";
    let index = LineIndex::from_text(text, 4);

    for offset in 0..=index.len() {
        let line = index.line_of_offset(offset).unwrap();
        let start = index.line_start(line).unwrap();
        assert_eq!(index.line_of_offset(start), Ok(line));
        assert!(start <= offset);
        assert!(offset < index.line_end(line).unwrap() || line + 1 == index.line_count());
    }
}

#[test]
fn test_scripted_edits_keep_invariants() {
    let mut text = String::from("alpha\nbeta\ngamma\n");
    let mut index = LineIndex::from_text(&text, 4);

    // 伪随机但确定的编辑序列
    let mut seed = 7usize;
    for step in 0..300 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345) % 1_000_003;
        let len = text.chars().count();
        if step % 3 == 2 && len > 0 {
            let start = seed % len;
            let end = (start + seed % 9).min(len);
            let byte = |c: usize| text.char_indices().nth(c).map_or(text.len(), |(i, _)| i);
            let (bs, be) = (byte(start), byte(end));
            text.replace_range(bs..be, "");
            index.remove(start, end).unwrap();
        } else {
            let at = seed % (len + 1);
            let piece = ["x", "\n", "ab\ncd", "\n\n", "é\n"][seed % 5];
            let byte = text.char_indices().nth(at).map_or(text.len(), |(i, _)| i);
            text.insert_str(byte, piece);
            index.insert(at, piece).unwrap();
        }
        assert_invariants(&index);
    }
    assert_matches_text(&index, &text);
}
