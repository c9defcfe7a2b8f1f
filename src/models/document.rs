//! 文档：文本存储 + 行索引 + 编辑历史
//!
//! 每次编辑都在同一调用内同时更新 Rope 与行索引，监听器收到事件时两者已经一致。
//! 原子编辑作用域内的所有编辑合并为一个撤销步骤。

use super::edit_history::{EditGroup, EditHistory};
use super::edit_op::EditOp;
use super::line_index::LineIndex;
use super::text_buffer::{RangeError, TextBuffer};
use crate::config::EngineConfig;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Inserted { offset: usize, len: usize },
    Removed { start: usize, end: usize },
    AtomicEditEnded,
}

pub trait DocumentListener {
    fn on_event(&mut self, doc: &Document, event: &DocumentEvent);
}

pub struct Document {
    buffer: TextBuffer,
    lines: LineIndex,
    history: EditHistory,
    pending: Vec<EditOp>,
    atomic_depth: usize,
    listeners: Vec<Box<dyn DocumentListener>>,
}

impl Document {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self::with_config(text, &EngineConfig::default())
    }

    pub fn with_config(text: &str, config: &EngineConfig) -> Self {
        Self {
            buffer: TextBuffer::from_text(text),
            lines: LineIndex::from_text(text, config.line_block_size),
            history: EditHistory::new(config.undo_limit),
            pending: Vec::new(),
            atomic_depth: 0,
            listeners: Vec::new(),
        }
    }

    // ==================== 只读访问 ====================

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn char_at(&self, offset: usize) -> Result<char, RangeError> {
        self.buffer.char_at(offset)
    }

    pub fn slice(&self, start: usize, end: usize) -> Result<Cow<'_, str>, RangeError> {
        self.buffer.slice(start, end)
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    pub fn line_of_offset(&self, offset: usize) -> Result<usize, RangeError> {
        self.lines.line_of_offset(offset)
    }

    pub fn line_start(&self, line: usize) -> Result<usize, RangeError> {
        self.lines.line_start(line)
    }

    pub fn line_end(&self, line: usize) -> Result<usize, RangeError> {
        self.lines.line_end(line)
    }

    // ==================== 编辑 ====================

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), RangeError> {
        self.buffer.check_offset(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        self.commit(EditOp::insert(offset, text))
    }

    /// 删除 [start, end)，返回被删除的文本
    pub fn delete(&mut self, start: usize, end: usize) -> Result<String, RangeError> {
        let deleted = self.buffer.slice(start, end)?.into_owned();
        if start < end {
            self.commit(EditOp::delete(start, end, &deleted))?;
        }
        Ok(deleted)
    }

    /// 用 text 替换 [start, end)，作为一个撤销步骤
    pub fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
    ) -> Result<(), RangeError> {
        self.buffer.check_span(start, end)?;
        self.atomic_edit(|doc| {
            doc.delete(start, end)?;
            doc.insert(start, text)
        })
    }

    // ==================== 原子编辑 ====================

    pub fn begin_atomic_edit(&mut self) {
        self.atomic_depth += 1;
    }

    pub fn end_atomic_edit(&mut self) {
        if self.atomic_depth == 0 {
            tracing::warn!("end_atomic_edit without matching begin");
            return;
        }
        self.atomic_depth -= 1;
        if self.atomic_depth > 0 {
            return;
        }

        let ops = std::mem::take(&mut self.pending);
        if !ops.is_empty() {
            self.history.push(EditGroup::new(ops));
        }
        self.emit(DocumentEvent::AtomicEditEnded);
    }

    pub fn in_atomic_edit(&self) -> bool {
        self.atomic_depth > 0
    }

    /// 在原子编辑作用域内执行 f；f 返回错误时已完成的编辑保留
    pub fn atomic_edit<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_atomic_edit();
        let result = f(self);
        self.end_atomic_edit();
        result
    }

    // ==================== Undo/Redo ====================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Result<bool, RangeError> {
        if self.in_atomic_edit() {
            tracing::warn!("undo ignored inside atomic edit");
            return Ok(false);
        }
        let Some(group) = self.history.pop_undo() else {
            return Ok(false);
        };
        for op in group.ops().iter().rev() {
            self.apply(&op.inverse())?;
        }
        tracing::debug!(ops = group.ops().len(), "undo");
        self.history.push_undone(group);
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, RangeError> {
        if self.in_atomic_edit() {
            tracing::warn!("redo ignored inside atomic edit");
            return Ok(false);
        }
        let Some(group) = self.history.pop_redo() else {
            return Ok(false);
        };
        for op in group.ops() {
            self.apply(op)?;
        }
        tracing::debug!(ops = group.ops().len(), "redo");
        self.history.push_redone(group);
        Ok(true)
    }

    // ==================== 监听 ====================

    pub fn add_listener(&mut self, listener: Box<dyn DocumentListener>) {
        self.listeners.push(listener);
    }

    // ==================== 内部辅助 ====================

    fn commit(&mut self, op: EditOp) -> Result<(), RangeError> {
        self.apply(&op)?;
        if self.in_atomic_edit() {
            self.pending.push(op);
        } else {
            self.history.push(EditGroup::single(op));
        }
        Ok(())
    }

    fn apply(&mut self, op: &EditOp) -> Result<(), RangeError> {
        op.apply(&mut self.buffer, &mut self.lines)?;
        let event = match op {
            EditOp::Insert { offset, text } => DocumentEvent::Inserted {
                offset: *offset,
                len: text.chars().count(),
            },
            EditOp::Delete { start, end, .. } => DocumentEvent::Removed {
                start: *start,
                end: *end,
            },
        };
        self.emit(event);
        Ok(())
    }

    fn emit(&mut self, event: DocumentEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener.on_event(self, &event);
        }
        self.listeners = listeners;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/document.rs"]
mod tests;
