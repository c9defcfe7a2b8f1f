//! ztext - 文本存储与搜索引擎核心
//!
//! 模块结构：
//! - models: 数据模型（TextBuffer, LineIndex, Document, Selection, EditHistory）
//! - search: 搜索/替换（Matcher, SearchEngine, SearchSession）
//! - config: 引擎配置（EngineConfig）
//! - logging: tracing 初始化

pub mod config;
pub mod logging;
pub mod models;
pub mod search;

pub use config::EngineConfig;
pub use models::{Document, DocumentEvent, DocumentListener, RangeError, Selection};
pub use search::{MatchRange, SearchEngine, SearchError, SearchResult, SearchSession, SearchSpec};
