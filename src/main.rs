use std::io;

use clap::Parser;
use launch_effort::cli::{Cli, Command, run_report};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { host, port } => {
            if let Err(e) = launch_effort::api::run_http_server(host, port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Report {
            base,
            compare,
            decimals,
        } => match run_report(base.as_deref(), compare.as_deref(), decimals) {
            Ok(report) => print!("{report}"),
            Err(msg) => {
                eprintln!("{msg}");
                std::process::exit(1);
            }
        },
    }
}
