use clap::Parser;
use name_resolver::cmd::server::{self, ServerCli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = ServerCli::parse();
    match server::run(cli, &mut std::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
