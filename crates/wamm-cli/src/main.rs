mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{bulk, completions, contacts, phone, probe, send, Context};
use crate::error::{exit_code_for, report_error};
use wamm_client::{ClientSettings, ManagerClient};
use wamm_config as config;

#[derive(Debug, Parser)]
#[command(name = "wamm", version, about = "WhatsApp Message Manager CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the Manager service (overrides config and WAMM_SERVER_URL)
    #[arg(long, global = true, value_name = "URL")]
    server_url: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one message
    Send(send::SendArgs),
    /// Send the same message to many contacts
    Bulk(bulk::BulkArgs),
    #[command(subcommand)]
    Contacts(contacts::ContactsCommand),
    /// Show canonical form and validity of phone numbers
    Phone(phone::PhoneArgs),
    /// Check that the Manager service is up
    Health,
    /// Ask the service to probe the Evolution API
    Ping,
    /// Show instance and WhatsApp connection state
    Status,
    Instances,
    Diagnose,
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        server_url,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let mut app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if let Some(raw) = server_url {
        app_config.server.base_url =
            config::parse_server_url(&raw).with_context(|| "parse --server-url")?;
    }
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
        debug!(url = %app_config.server.base_url, "manager service");
    }

    let settings = ClientSettings {
        base_url: app_config.server.base_url.clone(),
        api_key: app_config.server.api_key.clone(),
        timeout: app_config.server.timeout,
        connect_timeout: app_config.server.connect_timeout,
        user_agent: app_config.server.user_agent.clone(),
    };
    let client = ManagerClient::new(settings).with_context(|| "build http client")?;

    let ctx = Context {
        client: &client,
        config: &app_config,
        json,
    };

    match command {
        Command::Send(args) => send::send(&ctx, args),
        Command::Bulk(args) => bulk::bulk(&ctx, args),
        Command::Contacts(cmd) => match cmd {
            contacts::ContactsCommand::Check(args) => contacts::check(&ctx, args),
        },
        Command::Phone(args) => phone::phone(&ctx, args),
        Command::Health => probe::health(&ctx),
        Command::Ping => probe::ping(&ctx),
        Command::Status => probe::status(&ctx),
        Command::Instances => probe::instances(&ctx),
        Command::Diagnose => probe::diagnose(&ctx),
        Command::Completions(_) => unreachable!("completions handled before config load"),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
