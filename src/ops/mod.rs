pub mod session;
pub mod tree_ops;

pub use session::Session;
pub use tree_ops::TreeError;
