//! 匹配原语
//!
//! - Literal 模式：memchr 子串搜索，大小写不敏感时对模式和窗口各折叠一次
//! - Regex 模式：fancy-regex（支持环视），多行锚点，窗口两侧都保留上下文
//!
//! 所有区间都是相对完整文本的字节偏移，由调用方换算为字符偏移。

use super::ports::{Result, SearchError, SearchSpec};
use memchr::memmem::{Finder, FinderRev};
use std::ops::Range;

pub type ByteRange = Range<usize>;

pub enum Matcher {
    Literal { needle: String, match_case: bool },
    Regex { regex: fancy_regex::Regex },
}

impl Matcher {
    pub fn literal(pattern: &str, match_case: bool) -> Self {
        let needle = if match_case {
            pattern.to_string()
        } else {
            pattern.chars().map(fold_char).collect()
        };
        Self::Literal { needle, match_case }
    }

    pub fn regex(pattern: &str, match_case: bool, backtrack_limit: usize) -> Result<Self> {
        let flags = if match_case { "(?m)" } else { "(?mi)" };
        let source = format!("{}{}", flags, pattern);
        let regex = fancy_regex::RegexBuilder::new(&source)
            .backtrack_limit(backtrack_limit)
            .build()
            .map_err(SearchError::PatternSyntax)?;
        Ok(Self::Regex { regex })
    }

    pub fn compile(spec: &SearchSpec, backtrack_limit: usize) -> Result<Self> {
        if spec.regex {
            Self::regex(&spec.pattern, spec.match_case, backtrack_limit)
        } else {
            Ok(Self::literal(&spec.pattern, spec.match_case))
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Self::Regex { .. })
    }

    /// 窗口内最左的匹配（起点 >= window.start）
    pub fn find_forward(
        &self,
        text: &str,
        window: ByteRange,
        whole_word: bool,
    ) -> Result<Option<ByteRange>> {
        let mut first = None;
        self.scan(text, window, whole_word, |found| {
            first = Some(found);
            false
        })?;
        Ok(first)
    }

    /// 窗口内最右的匹配（终点 <= window.end，起点 >= window.start）
    pub fn find_backward(
        &self,
        text: &str,
        window: ByteRange,
        whole_word: bool,
    ) -> Result<Option<ByteRange>> {
        match self {
            Self::Literal { needle, match_case } => Ok(literal_backward(
                needle,
                *match_case,
                text,
                window,
                whole_word,
            )),
            Self::Regex { .. } => {
                // 正则只能正向匹配：先收集全部，再取最后一个
                let mut last = None;
                self.scan(text, window, whole_word, |found| {
                    last = Some(found);
                    true
                })?;
                Ok(last)
            }
        }
    }

    /// 整个文本中的全部匹配，从左到右
    pub fn find_all(&self, text: &str, whole_word: bool) -> Result<Vec<ByteRange>> {
        let mut all = Vec::new();
        self.scan(text, 0..text.len(), whole_word, |found| {
            all.push(found);
            true
        })?;
        Ok(all)
    }

    /// 匹配的各捕获组，下标 0 是整个匹配
    pub fn groups_at(&self, text: &str, found: &ByteRange) -> Result<Vec<Option<ByteRange>>> {
        let Self::Regex { regex } = self else {
            return Ok(vec![Some(found.clone())]);
        };

        let caps = regex
            .captures_from_pos(text, found.start)
            .map_err(SearchError::Matcher)?;
        let groups = match caps {
            Some(caps) if caps.get(0).map(|m| m.start()) == Some(found.start) => (0..caps.len())
                .map(|i| caps.get(i).map(|m| m.start()..m.end()))
                .collect(),
            _ => vec![Some(found.clone())],
        };
        Ok(groups)
    }

    /// 从左到右枚举窗口内通过整词检查的匹配；visit 返回 false 时停止
    fn scan(
        &self,
        text: &str,
        window: ByteRange,
        whole_word: bool,
        mut visit: impl FnMut(ByteRange) -> bool,
    ) -> Result<()> {
        if window.start >= window.end {
            return Ok(());
        }

        match self {
            Self::Literal { needle, match_case } => {
                if needle.is_empty() {
                    return Ok(());
                }
                let folded = Folded::new(&text[window.clone()], *match_case);
                let finder = Finder::new(needle.as_bytes());
                let haystack = folded.text.as_bytes();
                let mut pos = 0usize;

                while let Some(i) = finder.find(&haystack[pos..]) {
                    let start = pos + i;
                    let end = start + needle.len();
                    let found = folded.original(start, end, window.start);
                    if !whole_word || is_whole_word(text, &found) {
                        if !visit(found) {
                            return Ok(());
                        }
                        pos = end;
                    } else {
                        pos = start + 1;
                    }
                }
            }
            Self::Regex { regex } => {
                // 始终在完整文本上匹配，环视和行锚点能看到窗口两侧的上下文
                let mut pos = window.start;

                while pos <= window.end {
                    let Some(m) = regex
                        .find_from_pos(text, pos)
                        .map_err(SearchError::Matcher)?
                    else {
                        break;
                    };
                    let found = m.start()..m.end();
                    if found.end > window.end {
                        if found.start >= window.end {
                            break;
                        }
                        // 越过窗口终点：从下一个字符重新尝试更靠后的起点
                        pos = next_char_boundary(text, found.start);
                        continue;
                    }
                    pos = if found.is_empty() {
                        next_char_boundary(text, found.end)
                    } else {
                        found.end
                    };
                    if (!whole_word || is_whole_word(text, &found)) && !visit(found) {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}

/// 真正的反向扫描：从窗口末尾向前找
fn literal_backward(
    needle: &str,
    match_case: bool,
    text: &str,
    window: ByteRange,
    whole_word: bool,
) -> Option<ByteRange> {
    if needle.is_empty() || window.start >= window.end {
        return None;
    }

    let folded = Folded::new(&text[window.clone()], match_case);
    let finder = FinderRev::new(needle.as_bytes());
    let haystack = folded.text.as_bytes();
    let mut end = haystack.len();

    while let Some(start) = finder.rfind(&haystack[..end]) {
        let found = folded.original(start, start + needle.len(), window.start);
        if !whole_word || is_whole_word(text, &found) {
            return Some(found);
        }
        // 下一个候选的起点必须在 start 之前
        end = start + needle.len() - 1;
    }
    None
}

/// 前后字符都不存在（文本首尾）或不是字母/数字
pub fn is_whole_word(text: &str, found: &ByteRange) -> bool {
    let before = text[..found.start].chars().next_back();
    let after = text[found.end..].chars().next();
    let is_boundary = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());
    is_boundary(before) && is_boundary(after)
}

/// 单字符小写折叠；小写形式不是单个字符时保持原样，保证字符一一对应
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    pos + text[pos..].chars().next().map_or(1, char::len_utf8)
}

/// 折叠后的窗口文本；字节长度变化时记录到原文的偏移映射
struct Folded<'a> {
    text: std::borrow::Cow<'a, str>,
    offsets: Option<Vec<usize>>,
}

impl<'a> Folded<'a> {
    fn new(window: &'a str, match_case: bool) -> Self {
        if match_case {
            return Self {
                text: std::borrow::Cow::Borrowed(window),
                offsets: None,
            };
        }

        let mut text = String::with_capacity(window.len());
        let mut offsets: Option<Vec<usize>> = None;
        for (i, c) in window.char_indices() {
            let f = fold_char(c);
            if f.len_utf8() != c.len_utf8() && offsets.is_none() {
                // 此前所有字符长度不变，映射是恒等的
                offsets = Some((0..text.len()).collect());
            }
            if let Some(offsets) = offsets.as_mut() {
                offsets.extend(std::iter::repeat(i).take(f.len_utf8()));
            }
            text.push(f);
        }
        if let Some(offsets) = offsets.as_mut() {
            offsets.push(window.len());
        }

        Self {
            text: std::borrow::Cow::Owned(text),
            offsets,
        }
    }

    /// 折叠文本中的 [start, end) → 原文中的绝对字节区间
    fn original(&self, start: usize, end: usize, base: usize) -> ByteRange {
        match &self.offsets {
            Some(offsets) => base + offsets[start]..base + offsets[end],
            None => base + start..base + end,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/matcher.rs"]
mod tests;
