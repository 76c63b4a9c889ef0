use clap::Parser;
use tracing_subscriber::EnvFilter;

use compound::cli::{Cli, Command, run_project};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("compound=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => {
            if let Err(e) = compound::api::run_http_server(args.addr()).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project { args, format } => {
            if let Err(e) = run_project(&args, format) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}
