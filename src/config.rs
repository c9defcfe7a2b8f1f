//! 引擎配置
//!
//! 所有字段都有默认值，JSON 中缺省的字段回落到默认值。

use crate::models::edit_history::DEFAULT_UNDO_LIMIT;
use crate::models::line_index::DEFAULT_BLOCK_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SEARCH_HISTORY_LIMIT: usize = 32;
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 行索引每块的目标行数
    pub line_block_size: usize,
    pub undo_limit: usize,
    pub search_history_limit: usize,
    /// 正则回溯步数上限，超出时搜索失败而不是卡死
    pub regex_backtrack_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            line_block_size: DEFAULT_BLOCK_SIZE,
            undo_limit: DEFAULT_UNDO_LIMIT,
            search_history_limit: DEFAULT_SEARCH_HISTORY_LIMIT,
            regex_backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub fn load_config(path: &Path) -> Option<EngineConfig> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "read config failed");
            return None;
        }
    };
    match EngineConfig::from_json(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "parse config failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
