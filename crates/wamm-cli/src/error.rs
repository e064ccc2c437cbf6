use anyhow::Error;
use std::process::ExitCode;
use thiserror::Error as ThisError;
use wamm_client::ClientError;
use wamm_config::ConfigError;
use wamm_core::CoreError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_SEND_FAILED: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("send failed: {0}")]
    SendFailed(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn send_failed(message: impl Into<String>) -> Error {
    CliError::SendFailed(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
                CliError::SendFailed(_) => EXIT_SEND_FAILED,
            });
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(client_err) = cause.downcast_ref::<ClientError>() {
            return ExitCode::from(client_exit_code(client_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir | ConfigError::Read { .. } => EXIT_FAILURE,
        ConfigError::MissingConfigFile(_) => EXIT_NOT_FOUND,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidServerUrl { .. }
        | ConfigError::InvalidTimeout { .. }
        | ConfigError::InvalidUserAgent
        | ConfigError::InvalidApiKey
        | ConfigError::InvalidCountryCode(_)
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn client_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::InvalidBaseUrl(_) => EXIT_INVALID_INPUT,
        ClientError::Status { status: 404, .. } => EXIT_NOT_FOUND,
        ClientError::Http(_) | ClientError::Status { .. } | ClientError::Parse(_) => EXIT_FAILURE,
    }
}
