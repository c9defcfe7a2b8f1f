use crate::models::{RangeError, Selection};
use std::fmt;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    OutOfRange(RangeError),
    PatternSyntax(fancy_regex::Error),
    GroupReference {
        reference: String,
        group_count: usize,
    },
    Matcher(fancy_regex::Error),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::OutOfRange(e) => write!(f, "Out of range: {}", e),
            SearchError::PatternSyntax(e) => write!(f, "Invalid regex: {}", e),
            SearchError::GroupReference {
                reference,
                group_count,
            } => write!(
                f,
                "No group for reference '{}' ({} groups)",
                reference, group_count
            ),
            SearchError::Matcher(e) => write!(f, "Regex match failed: {}", e),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::OutOfRange(e) => Some(e),
            SearchError::PatternSyntax(e) | SearchError::Matcher(e) => Some(e),
            SearchError::GroupReference { .. } => None,
        }
    }
}

impl From<RangeError> for SearchError {
    fn from(e: RangeError) -> Self {
        SearchError::OutOfRange(e)
    }
}

/// 一次搜索/替换的参数，每次调用构造，不做持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    pub pattern: String,
    pub replace_with: String,
    pub match_case: bool,
    pub whole_word: bool,
    pub regex: bool,
    /// replace_all / mark_all 忽略方向
    pub forward: bool,
    /// 仅供调用方决定是否高亮全部匹配
    pub mark_all: bool,
}

impl SearchSpec {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replace_with: String::new(),
            match_case: false,
            whole_word: false,
            regex: false,
            forward: true,
            mark_all: false,
        }
    }

    pub fn replace_with(mut self, replacement: impl Into<String>) -> Self {
        self.replace_with = replacement.into();
        self
    }

    pub fn match_case(mut self, yes: bool) -> Self {
        self.match_case = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    pub fn regex(mut self, yes: bool) -> Self {
        self.regex = yes;
        self
    }

    pub fn forward(mut self, yes: bool) -> Self {
        self.forward = yes;
        self
    }

    pub fn mark_all(mut self, yes: bool) -> Self {
        self.mark_all = yes;
        self
    }
}

/// 半开区间 [start, end)，字符偏移，可以为空
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<MatchRange> for Selection {
    fn from(range: MatchRange) -> Self {
        Selection::new(range.start, range.end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// 新选区（查找到的匹配，或替换后插入的文本）
    pub range: Option<MatchRange>,
    /// 匹配数或替换数
    pub count: usize,
    pub marked_count: usize,
}

impl SearchResult {
    pub fn found(range: MatchRange) -> Self {
        Self {
            range: Some(range),
            count: 1,
            marked_count: 0,
        }
    }

    pub fn was_found(&self) -> bool {
        self.count > 0
    }
}
