//! 搜索引擎：find / replace / replace_all / mark_all
//!
//! 对外全部使用字符偏移；内部在物化的文本上按字节匹配，再通过 Rope 换算。

use super::matcher::{ByteRange, Matcher};
use super::ports::{MatchRange, Result, SearchResult, SearchSpec};
use super::template;
use crate::config::{EngineConfig, DEFAULT_BACKTRACK_LIMIT};
use crate::models::{Document, Selection, TextBuffer};

/// 一次定位的结果
struct Located {
    range: MatchRange,
    bytes: ByteRange,
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    backtrack_limit: usize,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            backtrack_limit: config.regex_backtrack_limit,
        }
    }

    /// 在 [anchor, len)（正向）或 [0, anchor)（反向）中查找
    ///
    /// 正向从选区终点开始，反向从选区起点开始，已选中的匹配不会被再次命中。
    pub fn find(
        &self,
        doc: &Document,
        spec: &SearchSpec,
        anchor: impl Into<Selection>,
    ) -> Result<Option<MatchRange>> {
        let Some(matcher) = self.compile(spec)? else {
            return Ok(None);
        };
        let text = doc.text();
        let located = locate(doc.buffer(), &text, &matcher, spec, anchor.into())?;
        Ok(located.map(|l| l.range))
    }

    /// find，并在 spec.mark_all 时附带全文匹配数，供调用方高亮
    pub fn search(
        &self,
        doc: &Document,
        spec: &SearchSpec,
        anchor: impl Into<Selection>,
    ) -> Result<SearchResult> {
        let mut result = match self.find(doc, spec, anchor)? {
            Some(range) => SearchResult::found(range),
            None => SearchResult::default(),
        };
        if spec.mark_all {
            result.marked_count = self.mark_all(doc, spec)?.len();
        }
        Ok(result)
    }

    /// 替换下一个匹配；返回的 range 覆盖插入的文本
    pub fn replace(
        &self,
        doc: &mut Document,
        spec: &SearchSpec,
        anchor: impl Into<Selection>,
    ) -> Result<SearchResult> {
        let Some(matcher) = self.compile(spec)? else {
            return Ok(SearchResult::default());
        };
        // 先把选区收拢到起点（正向）/终点（反向），让上一次 find 选中的匹配被替换而不是被跳过
        let anchor = anchor.into().collapse(spec.forward);
        let text = doc.text();
        let Some(located) = locate(doc.buffer(), &text, &matcher, spec, anchor)? else {
            return Ok(SearchResult::default());
        };

        let replacement = replacement_for(&matcher, spec, &text, &located.bytes)?;
        let start = located.range.start;
        doc.replace_range(start, located.range.end, &replacement)?;

        Ok(SearchResult::found(MatchRange::new(
            start,
            start + replacement.chars().count(),
        )))
    }

    /// 从文档开头替换全部匹配，整体是一个撤销步骤
    ///
    /// 出错时已经提交的替换保留。
    pub fn replace_all(&self, doc: &mut Document, spec: &SearchSpec) -> Result<SearchResult> {
        let Some(matcher) = self.compile(spec)? else {
            return Ok(SearchResult::default());
        };

        let mut text = doc.text();
        let mut result = SearchResult::default();

        let outcome = doc.atomic_edit(|doc| -> Result<()> {
            let mut pos = 0usize;
            while pos < text.len() {
                let window = pos..text.len();
                let Some(found) = matcher.find_forward(&text, window, spec.whole_word)? else {
                    break;
                };
                let replacement = replacement_for(&matcher, spec, &text, &found)?;

                let start = doc.buffer().byte_to_char(found.start)?;
                let end = doc.buffer().byte_to_char(found.end)?;
                doc.replace_range(start, end, &replacement)?;
                text.replace_range(found.clone(), &replacement);

                result.count += 1;
                result.range = Some(MatchRange::new(
                    start,
                    start + replacement.chars().count(),
                ));

                pos = found.start + replacement.len();
                if found.is_empty() {
                    // 零宽匹配：跳过其后的一个字符，否则会在同一位置无限匹配
                    pos += text[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
            Ok(())
        });

        tracing::debug!(count = result.count, "replace_all");
        outcome.map(|()| result)
    }

    /// 全文全部匹配，按文档顺序；不修改文档
    pub fn mark_all(&self, doc: &Document, spec: &SearchSpec) -> Result<Vec<MatchRange>> {
        let Some(matcher) = self.compile(spec)? else {
            return Ok(Vec::new());
        };
        let text = doc.text();
        let buffer = doc.buffer();
        matcher
            .find_all(&text, spec.whole_word)?
            .into_iter()
            .map(|found| to_char_range(buffer, &found))
            .collect()
    }

    /// 空模式不匹配任何内容
    fn compile(&self, spec: &SearchSpec) -> Result<Option<Matcher>> {
        if spec.pattern.is_empty() {
            return Ok(None);
        }
        match Matcher::compile(spec, self.backtrack_limit) {
            Ok(matcher) => Ok(Some(matcher)),
            Err(e) => {
                tracing::warn!(pattern = %spec.pattern, error = %e, "compile pattern failed");
                Err(e)
            }
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn locate(
    buffer: &TextBuffer,
    text: &str,
    matcher: &Matcher,
    spec: &SearchSpec,
    anchor: Selection,
) -> Result<Option<Located>> {
    let at = if spec.forward {
        anchor.end()
    } else {
        anchor.start()
    };
    let at = buffer.char_to_byte(at)?;

    let found = if spec.forward {
        matcher.find_forward(text, at..text.len(), spec.whole_word)?
    } else {
        matcher.find_backward(text, 0..at, spec.whole_word)?
    };

    let Some(bytes) = found else {
        return Ok(None);
    };
    Ok(Some(Located {
        range: to_char_range(buffer, &bytes)?,
        bytes,
    }))
}

fn to_char_range(buffer: &TextBuffer, found: &ByteRange) -> Result<MatchRange> {
    Ok(MatchRange::new(
        buffer.byte_to_char(found.start)?,
        buffer.byte_to_char(found.end)?,
    ))
}

/// 字面模式原样插入；正则模式展开模板
fn replacement_for(
    matcher: &Matcher,
    spec: &SearchSpec,
    text: &str,
    found: &ByteRange,
) -> Result<String> {
    if !matcher.is_regex() {
        return Ok(spec.replace_with.clone());
    }
    let groups = matcher.groups_at(text, found)?;
    template::expand(&spec.replace_with, text, &groups)
}

#[cfg(test)]
#[path = "../../tests/unit/search/engine.rs"]
mod tests;
