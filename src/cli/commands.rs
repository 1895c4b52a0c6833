use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "nt", about = concat!("nestodo v", env!("CARGO_PKG_VERSION"), " - a nested todo tree"), version)]
pub struct Cli {
    /// Use this data directory instead of searching for .nestodo/
    #[arg(short = 'C', long = "data-dir")]
    pub data_dir: Option<String>,

    /// Store key for the todo list (overrides config)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Read configuration from this file instead of <data dir>/config.toml
    #[arg(long)]
    pub config: Option<String>,
}
