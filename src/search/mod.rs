//! 搜索/替换

pub mod engine;
pub mod matcher;
pub mod ports;
pub mod session;
pub mod template;

pub use engine::SearchEngine;
pub use matcher::Matcher;
pub use ports::{MatchRange, Result, SearchError, SearchResult, SearchSpec};
pub use session::SearchSession;
