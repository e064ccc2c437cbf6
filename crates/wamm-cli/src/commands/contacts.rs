use crate::commands::{print_json, Context};
use crate::util::load_contacts_file;
use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use wamm_core::RegistryEntry;

#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// Normalize a contacts file and report invalid or duplicate rows
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct RejectedRow {
    row: usize,
    name: String,
    phone: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    accepted: &'a [RegistryEntry],
    rejected: Vec<RejectedRow>,
}

pub fn check(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let contacts = load_contacts_file(&args.file)?;
    let mut registry = ctx.registry();
    let mut rejected = Vec::new();
    for (index, contact) in contacts.into_iter().enumerate() {
        if let Err(err) = registry.add_contact(&contact.name, &contact.phone) {
            rejected.push(RejectedRow {
                row: index + 1,
                name: contact.name,
                phone: contact.phone,
                error: err.to_string(),
            });
        }
    }

    if ctx.json {
        return print_json(&CheckReport {
            accepted: registry.entries(),
            rejected,
        });
    }

    for entry in registry.entries() {
        println!("ok       {}  {}", entry.phone, entry.name);
    }
    for row in &rejected {
        println!("rejected #{} {} ({}): {}", row.row, row.name, row.phone, row.error);
    }
    println!("{} accepted, {} rejected", registry.len(), rejected.len());
    Ok(())
}
