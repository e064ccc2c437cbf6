use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use wamm_client::ManagerClient;
use wamm_config::AppConfig;
use wamm_core::{ContactRegistry, Dispatcher, SendOutcome};

pub mod bulk;
pub mod completions;
pub mod contacts;
pub mod phone;
pub mod probe;
pub mod send;

pub struct Context<'a> {
    pub client: &'a ManagerClient,
    pub config: &'a AppConfig,
    pub json: bool,
}

impl<'a> Context<'a> {
    pub fn dispatcher(&self) -> Dispatcher<&'a ManagerClient> {
        Dispatcher::new(self.client).with_country_code(self.config.dispatch.country_code.clone())
    }

    pub fn registry(&self) -> ContactRegistry {
        ContactRegistry::new(self.config.dispatch.country_code.clone())
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn print_outcome(outcome: &SendOutcome) {
    let name = if outcome.name.is_empty() {
        "-"
    } else {
        outcome.name.as_str()
    };
    if outcome.success {
        let id = outcome.message_id.as_deref().unwrap_or("N/A");
        println!("sent    {} ({})  id {}", name, outcome.sent_to, id);
    } else {
        let kind = outcome.error_kind.map(|kind| kind.as_str()).unwrap_or("error");
        let error = outcome.error.as_deref().unwrap_or_default();
        println!("failed  {} ({})  {}: {}", name, outcome.sent_to, kind, error);
    }
}
