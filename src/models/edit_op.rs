use super::line_index::LineIndex;
use super::text_buffer::{RangeError, TextBuffer};
use compact_str::CompactString;

/// 单个原子编辑，偏移均为字符偏移
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    Insert {
        offset: usize,
        text: CompactString,
    },
    Delete {
        start: usize,
        end: usize,
        deleted: CompactString,
    },
}

impl EditOp {
    pub fn insert(offset: usize, text: &str) -> Self {
        Self::Insert {
            offset,
            text: CompactString::from(text),
        }
    }

    pub fn delete(start: usize, end: usize, deleted: &str) -> Self {
        Self::Delete {
            start,
            end,
            deleted: CompactString::from(deleted),
        }
    }

    pub fn inverse(&self) -> EditOp {
        match self {
            EditOp::Insert { offset, text } => EditOp::Delete {
                start: *offset,
                end: offset + text.chars().count(),
                deleted: text.clone(),
            },
            EditOp::Delete { start, deleted, .. } => EditOp::Insert {
                offset: *start,
                text: deleted.clone(),
            },
        }
    }

    /// 同时作用于文本和行索引，两者保持一致
    pub fn apply(&self, buffer: &mut TextBuffer, lines: &mut LineIndex) -> Result<(), RangeError> {
        match self {
            EditOp::Insert { offset, text } => {
                buffer.insert(*offset, text)?;
                lines.insert(*offset, text)?;
            }
            EditOp::Delete { start, end, .. } => {
                buffer.delete(*start, *end)?;
                lines.remove(*start, *end)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_op.rs"]
mod tests;
