pub mod todo;
pub mod config;

pub use todo::*;
pub use config::*;
