//! 数据模型层

pub mod document;
pub mod edit_history;
pub mod edit_op;
pub mod line_index;
pub mod selection;
pub mod text_buffer;

pub use document::{Document, DocumentEvent, DocumentListener};
pub use edit_history::{EditGroup, EditHistory};
pub use edit_op::EditOp;
pub use line_index::LineIndex;
pub use selection::Selection;
pub use text_buffer::{slice_to_cow, RangeError, TextBuffer};
