//! 搜索会话：选区、上一次搜索参数、搜索历史
//!
//! 由调用方持有，每个编辑器/窗口一个。

use super::engine::SearchEngine;
use super::ports::{MatchRange, Result, SearchResult, SearchSpec};
use crate::config::{EngineConfig, DEFAULT_SEARCH_HISTORY_LIMIT};
use crate::models::{Document, Selection};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct SearchSession {
    engine: SearchEngine,
    selection: Selection,
    last_spec: Option<SearchSpec>,
    /// 最近的在前，不重复
    history: VecDeque<String>,
    history_limit: usize,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            engine: SearchEngine::new(),
            selection: Selection::default(),
            last_spec: None,
            history: VecDeque::new(),
            history_limit: DEFAULT_SEARCH_HISTORY_LIMIT,
        }
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            engine: SearchEngine::with_config(config),
            history_limit: config.search_history_limit,
            ..Self::new()
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: impl Into<Selection>) {
        self.selection = selection.into();
    }

    pub fn last_spec(&self) -> Option<&SearchSpec> {
        self.last_spec.as_ref()
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn find(&mut self, doc: &Document, spec: &SearchSpec) -> Result<Option<MatchRange>> {
        self.remember(spec);
        let found = self.engine.find(doc, spec, self.selection)?;
        if let Some(range) = found {
            self.selection = if spec.forward {
                Selection::new(range.start, range.end)
            } else {
                Selection::new(range.end, range.start)
            };
        }
        Ok(found)
    }

    /// 按给定方向重复上一次搜索；没有上一次搜索时返回 None
    pub fn find_again(&mut self, doc: &Document, forward: bool) -> Result<Option<MatchRange>> {
        let Some(spec) = self.last_spec.clone() else {
            return Ok(None);
        };
        self.find(doc, &spec.forward(forward))
    }

    pub fn replace(&mut self, doc: &mut Document, spec: &SearchSpec) -> Result<SearchResult> {
        self.remember(spec);
        let result = self.engine.replace(doc, spec, self.selection)?;
        if let Some(range) = result.range {
            let caret = if spec.forward { range.end } else { range.start };
            self.selection = Selection::caret(caret);
        }
        Ok(result)
    }

    pub fn replace_all(&mut self, doc: &mut Document, spec: &SearchSpec) -> Result<SearchResult> {
        self.remember(spec);
        let outcome = self.engine.replace_all(doc, spec);
        self.selection = match &outcome {
            Ok(SearchResult {
                range: Some(range), ..
            }) => Selection::caret(range.end),
            _ => self.selection.clamp_to(doc.len()),
        };
        outcome
    }

    /// 不改变选区，也不记录为上一次搜索
    pub fn mark_all(&self, doc: &Document, spec: &SearchSpec) -> Result<Vec<MatchRange>> {
        self.engine.mark_all(doc, spec)
    }

    fn remember(&mut self, spec: &SearchSpec) {
        self.last_spec = Some(spec.clone());
        if spec.pattern.is_empty() {
            return;
        }
        self.history.retain(|p| p != &spec.pattern);
        self.history.push_front(spec.pattern.clone());
        self.history.truncate(self.history_limit);
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/session.rs"]
mod tests;
