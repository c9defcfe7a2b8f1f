//! 替换模板展开
//!
//! `\n` 换行，`\t` 制表符，`\x` 字面 x；`$N` 引用捕获组，贪心取最长的合法组号。

use super::matcher::ByteRange;
use super::ports::{Result, SearchError};
use std::iter::Peekable;
use std::str::Chars;

/// groups[0] 是整个匹配；未参与匹配的组展开为空串
pub fn expand(template: &str, text: &str, groups: &[Option<ByteRange>]) -> Result<String> {
    let group_count = groups.len().saturating_sub(1);
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            '$' => {
                let index = group_reference(&mut chars, group_count)?;
                if let Some(Some(range)) = groups.get(index) {
                    out.push_str(&text[range.clone()]);
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn group_reference(chars: &mut Peekable<Chars<'_>>, group_count: usize) -> Result<usize> {
    let mut reference = String::from("$");
    let mut index: Option<usize> = None;

    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        let next = index.unwrap_or(0) * 10 + digit as usize;
        if index.is_some() && next > group_count {
            break;
        }
        reference.push(char::from(b'0' + digit as u8));
        chars.next();
        index = Some(next);
        if next > group_count {
            break;
        }
    }

    match index {
        Some(index) if index <= group_count => Ok(index),
        _ => Err(SearchError::GroupReference {
            reference,
            group_count,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/template.rs"]
mod tests;
