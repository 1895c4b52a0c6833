pub mod collapse;
pub mod rendered;
pub mod renderer;

pub use collapse::{capture_collapsed, is_collapsed, toggle_collapse};
pub use rendered::*;
pub use renderer::{Focus, indent_input, move_input_to_list_of, open_sub_input, rebuild};
