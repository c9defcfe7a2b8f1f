//! 行索引：字符偏移 ↔ 行号映射
//!
//! 存储每行长度（含结尾 '\n'），按块分组，每块缓存字符总数：
//! - 查询跳过整块，只在目标块内线性扫描
//! - 编辑只改动一个块（跨行删除时拼接涉及的几个块），随后拆分过大的块、合并过小的块
//!
//! 空文档有且只有一行（长度 0）；以 '\n' 结尾的文档最后一行长度为 0。

use super::text_buffer::RangeError;

pub const DEFAULT_BLOCK_SIZE: usize = 256;

#[derive(Clone, Debug)]
struct LineBlock {
    lens: Vec<usize>,
    chars: usize,
}

impl LineBlock {
    fn new(lens: Vec<usize>) -> Self {
        let chars = lens.iter().sum();
        Self { lens, chars }
    }

    fn recount(&mut self) {
        self.chars = self.lens.iter().sum();
    }
}

/// 某一行在块结构中的位置
#[derive(Clone, Copy, Debug)]
struct LineCursor {
    block: usize,
    index: usize,
    line: usize,
    start: usize,
}

#[derive(Clone, Debug)]
pub struct LineIndex {
    blocks: Vec<LineBlock>,
    block_size: usize,
    line_count: usize,
    len: usize,
}

/// 按 '\n' 切分，返回各行字符长度（最后一段不含换行，可能为 0）
fn line_lengths(text: &str) -> Vec<usize> {
    let mut lens = Vec::new();
    let mut current = 0usize;
    for ch in text.chars() {
        current += 1;
        if ch == '\n' {
            lens.push(current);
            current = 0;
        }
    }
    lens.push(current);
    lens
}

impl LineIndex {
    pub fn new() -> Self {
        Self::from_text("", DEFAULT_BLOCK_SIZE)
    }

    pub fn from_text(text: &str, block_size: usize) -> Self {
        let block_size = block_size.max(4);
        let lens = line_lengths(text);
        let line_count = lens.len();
        let len = lens.iter().sum();
        let blocks = lens
            .chunks(block_size)
            .map(|chunk| LineBlock::new(chunk.to_vec()))
            .collect();

        Self {
            blocks,
            block_size,
            line_count,
            len,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// 索引覆盖的字符总数，应与文本长度一致
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn line_of_offset(&self, offset: usize) -> Result<usize, RangeError> {
        if offset > self.len {
            return Err(RangeError::Offset {
                offset,
                len: self.len,
            });
        }
        Ok(self.locate_offset(offset).line)
    }

    pub fn line_start(&self, line: usize) -> Result<usize, RangeError> {
        self.check_line(line)?;
        Ok(self.locate_line(line).start)
    }

    /// 行尾偏移（含换行符），等于下一行的起始偏移
    pub fn line_end(&self, line: usize) -> Result<usize, RangeError> {
        self.line_range(line).map(|(_, end)| end)
    }

    pub fn line_range(&self, line: usize) -> Result<(usize, usize), RangeError> {
        self.check_line(line)?;
        let cursor = self.locate_line(line);
        let len = self.blocks[cursor.block].lens[cursor.index];
        Ok((cursor.start, cursor.start + len))
    }

    /// 在 offset 处插入 text：无换行时只改一行长度，含 k 个换行时把该行拆成 k+1 行
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), RangeError> {
        if offset > self.len {
            return Err(RangeError::Offset {
                offset,
                len: self.len,
            });
        }
        if text.is_empty() {
            return Ok(());
        }

        let mut inserted = line_lengths(text);
        let added: usize = inserted.iter().sum();
        let cursor = self.locate_offset(offset);
        let block = &mut self.blocks[cursor.block];

        if inserted.len() == 1 {
            block.lens[cursor.index] += added;
            block.chars += added;
        } else {
            let old = block.lens[cursor.index];
            let head = offset - cursor.start;
            let tail = old - head;
            let new_lines = inserted.len() - 1;

            inserted[0] += head;
            if let Some(last) = inserted.last_mut() {
                *last += tail;
            }
            block.lens.splice(cursor.index..=cursor.index, inserted);
            block.chars += added;
            self.line_count += new_lines;
            self.rebalance(cursor.block);
        }

        self.len += added;
        Ok(())
    }

    /// 删除 [start, end)：同一行内只改长度，跨行时把首尾之间的所有行合并为一行
    pub fn remove(&mut self, start: usize, end: usize) -> Result<(), RangeError> {
        if start > end || end > self.len {
            return Err(RangeError::Span {
                start,
                end,
                len: self.len,
            });
        }
        if start == end {
            return Ok(());
        }

        let first = self.locate_offset(start);
        let last = self.locate_offset(end);
        let removed = end - start;

        if first.line == last.line {
            let block = &mut self.blocks[first.block];
            block.lens[first.index] -= removed;
            block.chars -= removed;
        } else {
            let last_len = self.blocks[last.block].lens[last.index];
            let merged = (start - first.start) + (last.start + last_len - end);
            self.splice_lines(first, last, merged);
            self.line_count -= last.line - first.line;
        }

        self.len -= removed;
        Ok(())
    }

    fn check_line(&self, line: usize) -> Result<(), RangeError> {
        if line >= self.line_count {
            return Err(RangeError::Line {
                line,
                line_count: self.line_count,
            });
        }
        Ok(())
    }

    fn last_cursor(&self) -> LineCursor {
        let block = self.blocks.len() - 1;
        let lens = &self.blocks[block].lens;
        let index = lens.len() - 1;
        LineCursor {
            block,
            index,
            line: self.line_count - 1,
            start: self.len - lens[index],
        }
    }

    /// 调用方保证 offset <= len
    fn locate_offset(&self, offset: usize) -> LineCursor {
        let last_block = self.blocks.len() - 1;
        let mut start = 0usize;
        let mut line = 0usize;

        for (b, block) in self.blocks.iter().enumerate() {
            if offset >= start + block.chars && b != last_block {
                start += block.chars;
                line += block.lens.len();
                continue;
            }

            let mut line_start = start;
            for (i, &len) in block.lens.iter().enumerate() {
                let final_line = b == last_block && i + 1 == block.lens.len();
                if offset < line_start + len || final_line {
                    return LineCursor {
                        block: b,
                        index: i,
                        line: line + i,
                        start: line_start,
                    };
                }
                line_start += len;
            }
            break;
        }

        self.last_cursor()
    }

    /// 调用方保证 line < line_count
    fn locate_line(&self, line: usize) -> LineCursor {
        let mut start = 0usize;
        let mut first = 0usize;

        for (b, block) in self.blocks.iter().enumerate() {
            if line < first + block.lens.len() {
                let index = line - first;
                let start = start + block.lens[..index].iter().sum::<usize>();
                return LineCursor {
                    block: b,
                    index,
                    line,
                    start,
                };
            }
            first += block.lens.len();
            start += block.chars;
        }

        self.last_cursor()
    }

    /// 用一行（长度 merged）替换 first..=last 之间的所有行
    fn splice_lines(&mut self, first: LineCursor, last: LineCursor, merged: usize) {
        if first.block == last.block {
            let block = &mut self.blocks[first.block];
            block
                .lens
                .splice(first.index..=last.index, std::iter::once(merged));
            block.recount();
        } else {
            let tail = &mut self.blocks[last.block];
            tail.lens.drain(..=last.index);
            tail.recount();

            let head = &mut self.blocks[first.block];
            head.lens.truncate(first.index);
            head.lens.push(merged);
            head.recount();

            self.blocks.drain(first.block + 1..last.block);
            if self.blocks[first.block + 1].lens.is_empty() {
                self.blocks.remove(first.block + 1);
            }
        }
        self.rebalance(first.block);
    }

    fn rebalance(&mut self, b: usize) {
        let max = self.block_size * 2;
        let min = (self.block_size / 4).max(1);

        if self.blocks[b].lens.len() > max {
            let block = self.blocks.remove(b);
            let pieces: Vec<LineBlock> = block
                .lens
                .chunks(self.block_size)
                .map(|chunk| LineBlock::new(chunk.to_vec()))
                .collect();
            self.blocks.splice(b..b, pieces);
        } else if self.blocks[b].lens.len() < min && self.blocks.len() > 1 {
            let (left, right) = if b + 1 < self.blocks.len() {
                (b, b + 1)
            } else {
                (b - 1, b)
            };
            let right_block = self.blocks.remove(right);
            let left_block = &mut self.blocks[left];
            left_block.chars += right_block.chars;
            left_block.lens.extend(right_block.lens);
            if left_block.lens.len() > max {
                self.rebalance(left);
            }
        }
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/line_index.rs"]
mod tests;
