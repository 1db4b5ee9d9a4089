//! # CLI Interface
//!
//! Command-line structure for `ledgerline`, defined with `clap` derive.
//! Every subcommand works offline: nothing here opens a connection.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Offline tooling for ledgerline transactions.
///
/// Generates keys, inspects node tables, and builds or co-signs serialized
/// transactions so they can be passed between signers before submission.
#[derive(Parser, Debug)]
#[command(
    name = "ledgerline",
    about = "Offline tooling for ledgerline transactions",
    version,
    propagate_version = true
)]
pub struct LedgerlineCli {
    /// Log output format on stderr.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "LEDGERLINE_LOG_FORMAT",
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// More log output: -v info, -vv debug, -vvv trace. `RUST_LOG` wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh Ed25519 key pair.
    Keygen,
    /// Print the node table from a client config file.
    Network(NetworkArgs),
    /// Build, freeze and operator-sign a transaction with an opaque payload.
    Freeze(FreezeArgs),
    /// Add a signature to a serialized transaction.
    Sign(SignArgs),
}

#[derive(Parser, Debug)]
pub struct NetworkArgs {
    /// Path to the client configuration file (JSON).
    #[arg(long, short = 'c', env = "LEDGERLINE_CONFIG")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct FreezeArgs {
    /// Path to the client configuration file (JSON). Must name an operator.
    #[arg(long, short = 'c', env = "LEDGERLINE_CONFIG")]
    pub config: PathBuf,

    /// Method selector: a short name such as `cryptoTransfer` or a full
    /// service path.
    #[arg(long, short = 'm')]
    pub method: String,

    /// Hex-encoded operation payload, embedded untouched.
    #[arg(long, short = 'p', default_value = "")]
    pub payload: String,

    /// Transaction memo (at most 100 bytes).
    #[arg(long)]
    pub memo: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SignArgs {
    /// Hex-encoded Ed25519 private key.
    ///
    /// Prefer the environment variable over the flag so the key stays out
    /// of shell history.
    #[arg(long, short = 'k', env = "LEDGERLINE_SIGNING_KEY", hide_env_values = true)]
    pub key: String,

    /// Hex-encoded serialized transaction, as printed by `freeze` or `sign`.
    #[arg(long, short = 't')]
    pub transaction: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        LedgerlineCli::command().debug_assert();
    }

    #[test]
    fn parses_freeze_arguments() {
        let cli = LedgerlineCli::try_parse_from([
            "ledgerline",
            "freeze",
            "--config",
            "client.json",
            "--method",
            "updateToken",
            "--payload",
            "0a0b",
            "--memo",
            "rotate keys",
        ])
        .unwrap();

        match cli.command {
            Commands::Freeze(args) => {
                assert_eq!(args.config, PathBuf::from("client.json"));
                assert_eq!(args.method, "updateToken");
                assert_eq!(args.payload, "0a0b");
                assert_eq!(args.memo.as_deref(), Some("rotate keys"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn logging_flags_are_global() {
        let cli =
            LedgerlineCli::try_parse_from(["ledgerline", "keygen", "-vv", "--log-format", "json"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);

        let quiet = LedgerlineCli::try_parse_from(["ledgerline", "keygen"]).unwrap();
        assert_eq!(quiet.verbose, 0);
    }
}
