//! 文本存储（Content Store）
//!
//! 职责：
//! - 字符序列存储（Rope）
//! - 按字符偏移插入/删除/切片
//! - 字符偏移 ↔ 字节偏移转换（供搜索使用）
//!
//! 所有偏移均以 char 计数，越界一律返回 `RangeError`，不做静默截断。

use ropey::{Rope, RopeSlice};
use std::borrow::Cow;
use std::fmt;

/// 从 RopeSlice 获取字符串，优先零拷贝
pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    Offset { offset: usize, len: usize },
    Span { start: usize, end: usize, len: usize },
    Line { line: usize, line_count: usize },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Offset { offset, len } => {
                write!(f, "offset {} out of range (len {})", offset, len)
            }
            RangeError::Span { start, end, len } => {
                write!(f, "range {}..{} out of range (len {})", start, end, len)
            }
            RangeError::Line { line, line_count } => {
                write!(f, "line {} out of range ({} lines)", line, line_count)
            }
        }
    }
}

impl std::error::Error for RangeError {}

#[derive(Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn char_at(&self, offset: usize) -> Result<char, RangeError> {
        if offset >= self.len() {
            return Err(RangeError::Offset {
                offset,
                len: self.len(),
            });
        }
        Ok(self.rope.char(offset))
    }

    pub fn slice(&self, start: usize, end: usize) -> Result<Cow<'_, str>, RangeError> {
        self.check_span(start, end)?;
        Ok(slice_to_cow(self.rope.slice(start..end)))
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), RangeError> {
        self.check_offset(offset)?;
        if !text.is_empty() {
            self.rope.insert(offset, text);
        }
        Ok(())
    }

    /// 删除 [start, end)，返回被删除的文本
    pub fn delete(&mut self, start: usize, end: usize) -> Result<String, RangeError> {
        self.check_span(start, end)?;
        let removed = self.rope.slice(start..end).to_string();
        if start < end {
            self.rope.remove(start..end);
        }
        Ok(removed)
    }

    pub fn char_to_byte(&self, offset: usize) -> Result<usize, RangeError> {
        self.check_offset(offset)?;
        Ok(self.rope.char_to_byte(offset))
    }

    /// 字节偏移必须落在字符边界上（搜索结果总是如此）
    pub fn byte_to_char(&self, byte: usize) -> Result<usize, RangeError> {
        if byte > self.rope.len_bytes() {
            return Err(RangeError::Offset {
                offset: byte,
                len: self.rope.len_bytes(),
            });
        }
        Ok(self.rope.byte_to_char(byte))
    }

    pub fn check_offset(&self, offset: usize) -> Result<(), RangeError> {
        if offset > self.len() {
            return Err(RangeError::Offset {
                offset,
                len: self.len(),
            });
        }
        Ok(())
    }

    pub fn check_span(&self, start: usize, end: usize) -> Result<(), RangeError> {
        if start > end || end > self.len() {
            return Err(RangeError::Span {
                start,
                end,
                len: self.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;
