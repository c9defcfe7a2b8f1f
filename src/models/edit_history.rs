//! 编辑历史：撤销/重做栈
//!
//! - 每个撤销步骤是一组 EditOp（原子编辑作用域内的所有编辑）
//! - Undo 后的新编辑会丢弃重做分支
//! - 超过上限时丢弃最早的步骤

use super::edit_op::EditOp;
use std::collections::VecDeque;

/// 默认保留的撤销步骤数
pub const DEFAULT_UNDO_LIMIT: usize = 1000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditGroup {
    ops: Vec<EditOp>,
}

impl EditGroup {
    pub fn new(ops: Vec<EditOp>) -> Self {
        Self { ops }
    }

    pub fn single(op: EditOp) -> Self {
        Self { ops: vec![op] }
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

pub struct EditHistory {
    undo: VecDeque<EditGroup>,
    redo: Vec<EditGroup>,
    limit: usize,
}

impl EditHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// 记录新步骤
    pub fn push(&mut self, group: EditGroup) {
        if group.is_empty() {
            return;
        }
        self.redo.clear();
        self.push_undo(group);
    }

    /// 取出待撤销的步骤；调用方应用其逆操作后交给 `push_undone`
    pub fn pop_undo(&mut self) -> Option<EditGroup> {
        self.undo.pop_back()
    }

    pub fn push_undone(&mut self, group: EditGroup) {
        self.redo.push(group);
    }

    /// 取出待重做的步骤；调用方重放后交给 `push_redone`
    pub fn pop_redo(&mut self) -> Option<EditGroup> {
        self.redo.pop()
    }

    pub fn push_redone(&mut self, group: EditGroup) {
        self.push_undo(group);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn push_undo(&mut self, group: EditGroup) {
        self.undo.push_back(group);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_history.rs"]
mod tests;
