//! 选区模型：dot（光标端）与 mark（锚点端），均为字符偏移

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    dot: usize,
    mark: usize,
}

impl Selection {
    pub fn new(mark: usize, dot: usize) -> Self {
        Self { dot, mark }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            dot: offset,
            mark: offset,
        }
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    pub fn mark(&self) -> usize {
        self.mark
    }

    pub fn start(&self) -> usize {
        self.dot.min(self.mark)
    }

    pub fn end(&self) -> usize {
        self.dot.max(self.mark)
    }

    pub fn is_empty(&self) -> bool {
        self.dot == self.mark
    }

    /// 折叠为一个光标：向前取起点，向后取终点
    pub fn collapse(&self, forward: bool) -> Self {
        if forward {
            Self::caret(self.start())
        } else {
            Self::caret(self.end())
        }
    }

    pub fn clamp_to(&self, len: usize) -> Self {
        Self {
            dot: self.dot.min(len),
            mark: self.mark.min(len),
        }
    }
}

impl From<usize> for Selection {
    fn from(offset: usize) -> Self {
        Self::caret(offset)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/selection.rs"]
mod tests;
