pub mod line_edit;
pub mod unicode;

pub use line_edit::LineEdit;
