pub mod commands;
pub mod launch;

pub use commands::Cli;
pub use launch::{Launch, resolve};
