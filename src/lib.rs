pub mod core;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use crate::core::collapse::CollapseState;
pub use crate::core::parse::parse_document;
pub use crate::core::value::Value;
pub use crate::core::value_path::{PathSegment, ValuePath};

pub use crate::widgets::tree::TreeView;
