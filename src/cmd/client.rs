//! `resolver-cli`: one-shot name resolution.

use crate::base::Address;
use crate::config;
use crate::resolver::MultiResolver;
use crate::version::VERSION;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::{io::Write, path::PathBuf};

/// Chain connected by `resolve`.
const ENS_TLD: &str = ".eth";

#[derive(Parser, Debug)]
#[command(name = "resolver-cli", version = VERSION, about = "Resolve names from the command line")]
pub struct ClientCli {
    /// Configuration file path
    #[arg(long, global = true, env = "RESOLVER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// Resolve a name to an address
    Resolve {
        /// ENS name, e.g. nickjohnson.eth
        name: String,
    },
    /// Print the version
    Version,
}

/// Rejects names that cannot be ENS names before any network traffic.
pub fn validate_ens_name(name: &str) -> Result<()> {
    if !name.ends_with("eth") {
        bail!("not a valid ENS name: {:?}", name);
    }
    Ok(())
}

/// Connects the `.eth` chain and resolves `name` on the connected backend.
pub async fn resolve_name(resolver: &MultiResolver, name: &str) -> Result<Address> {
    validate_ens_name(name)?;
    let backend = resolver.connect(ENS_TLD).await?;
    let addr = backend.resolve(name).await?;
    Ok(addr)
}

pub async fn run(cli: ClientCli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        ClientCommand::Version => crate::cmd::print_version(out)?,
        ClientCommand::Resolve { name } => {
            validate_ens_name(&name)?;
            let config = config::load(cli.config.as_deref())?;
            let resolver = config
                .build_resolver()
                .context("failed to build resolver")?;
            let addr = resolve_name(&resolver, &name).await?;
            writeln!(out, "{}", addr)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ens_name() {
        assert!(validate_ens_name("nickjohnson.eth").is_ok());
        assert!(validate_ens_name("example.com").is_err());
        assert!(validate_ens_name("").is_err());
    }

    #[test]
    fn test_parse_resolve() {
        let cli = ClientCli::try_parse_from(["resolver-cli", "resolve", "foo.eth"]).unwrap();
        assert!(matches!(cli.command, ClientCommand::Resolve { ref name } if name == "foo.eth"));
    }

    #[test]
    fn test_resolve_requires_exactly_one_name() {
        assert!(ClientCli::try_parse_from(["resolver-cli", "resolve"]).is_err());
        assert!(ClientCli::try_parse_from(["resolver-cli", "resolve", "a.eth", "b.eth"]).is_err());
    }

    #[tokio::test]
    async fn test_version_output() {
        let cli = ClientCli::try_parse_from(["resolver-cli", "version"]).unwrap();
        let mut out = Vec::new();
        run(cli, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", VERSION));
    }

    #[tokio::test]
    async fn test_invalid_name_fails_before_config() {
        let cli = ClientCli::try_parse_from([
            "resolver-cli",
            "--config",
            "/nonexistent/config.toml",
            "resolve",
            "example.com",
        ])
        .unwrap();
        let err = run(cli, &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("not a valid ENS name"));
    }
}
