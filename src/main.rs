use clap::Parser;
use ssh_checker::{app, cli::args::Cli, utils::logging};

#[tokio::main]
async fn main() {
    logging::route_panics();

    let cli = Cli::parse();
    if let Err(err) = app::run(cli).await {
        eprintln!("fatal: {:#}", err);
        std::process::exit(1);
    }
}
