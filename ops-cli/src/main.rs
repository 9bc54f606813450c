use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use auth_identity::{DigestEncoding, IdentityConfig, ProbeStrategy};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use logger_redacted::{init_tracing, LoggerConfig};
use ops_cli::{hash_password, run_login, Fixtures};

/// ClinicCare credential administration
#[derive(Parser, Debug)]
#[command(name = "clinicare")]
#[command(about = "Credential tooling for ClinicCare patient, doctor and staff logins")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored digest for a password
    HashPassword {
        /// Password to hash; prompted for when omitted
        #[arg(long)]
        password: Option<String>,

        #[arg(long, value_enum, default_value_t = EncodingArg::Hex)]
        encoding: EncodingArg,
    },

    /// Resolve a login against a fixture file
    Login {
        /// JSON file with patients, doctors and staff records
        #[arg(long)]
        fixtures: PathBuf,

        #[arg(long)]
        email: String,

        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,

        /// Overrides the configured probe strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Identity configuration file (AUTH_IDENTITY__* variables also apply)
        #[arg(short, long, env = "AUTH_IDENTITY_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncodingArg {
    Hex,
    Base64,
}

impl From<EncodingArg> for DigestEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Hex => DigestEncoding::Hex,
            EncodingArg::Base64 => DigestEncoding::Base64,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Sequential,
    Concurrent,
}

impl From<StrategyArg> for ProbeStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sequential => ProbeStrategy::Sequential,
            StrategyArg::Concurrent => ProbeStrategy::Concurrent,
        }
    }
}

fn read_password(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(dialoguer::Password::new().with_prompt("Password").interact()?),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::HashPassword { password, encoding } => {
            let password = read_password(password)?;
            println!("{}", hash_password(&password, encoding.into()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Login {
            fixtures,
            email,
            password,
            strategy,
            config,
        } => {
            let mut identity_config = IdentityConfig::load(config.as_deref())?;
            if let Some(strategy) = strategy {
                identity_config.probe_strategy = strategy.into();
            }

            let fixtures = Fixtures::load(&fixtures)?;
            let password = read_password(password)?;
            let response = run_login(fixtures, identity_config, &email, &password).await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.success {
                eprintln!("{}", "✅ Login resolved".bright_green());
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{}", "❌ Login rejected".bright_red());
                Ok(ExitCode::from(1))
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let logger_config = LoggerConfig::default()
        .with_log_level(level)
        .with_json(cli.json_logs);
    if let Err(e) = init_tracing(&logger_config) {
        eprintln!("{}: {}", "Logging disabled".yellow(), e);
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}: {:#}", "Error".bright_red(), e);
            ExitCode::from(2)
        }
    }
}
