use clap::Parser;
use name_resolver::cmd::client::{self, ClientCli};
use name_resolver::logging::{self, Verbosity};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init(Verbosity::Warn);

    let cli = ClientCli::parse();
    match client::run(cli, &mut std::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
