use clap::Parser;
use ghost_admin::cli::{run, Cli};

#[tokio::main]
async fn main() {
    let code = run(Cli::parse()).await;
    std::process::exit(code);
}
