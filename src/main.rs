use clap::Parser;
use nestodo::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = launch(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn launch(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let launch = cli::resolve(cli, &cwd)?;
    nestodo::tui::run(&launch.data_dir, &launch.namespace, &launch.config)
}
