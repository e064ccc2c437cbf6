use crate::commands::{print_json, print_outcome, Context};
use crate::error::{invalid_input, send_failed};
use crate::util::{load_contacts_file, parse_contact_spec, read_message};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use wamm_core::{BulkSendReport, BulkSendRequest, CancelToken, CancellablePacer, Contact};

#[derive(Debug, Args)]
pub struct BulkArgs {
    #[arg(long, short)]
    pub message: Option<String>,
    #[arg(long, value_name = "FILE", conflicts_with = "message")]
    pub message_file: Option<PathBuf>,
    /// JSON array of {name, phone} or one `name,phone` per line
    #[arg(long, value_name = "FILE")]
    pub contacts_file: Option<PathBuf>,
    #[arg(long, value_name = "NAME=PHONE")]
    pub to: Vec<String>,
    /// Pause between consecutive sends (defaults to dispatch.default_delay_ms)
    #[arg(long)]
    pub delay_ms: Option<u64>,
    /// Drop invalid and duplicate contacts before sending
    #[arg(long)]
    pub skip_invalid: bool,
}

#[derive(Debug, Serialize)]
struct BulkOutput<'a> {
    #[serde(flatten)]
    report: &'a BulkSendReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected: Vec<String>,
}

pub fn bulk(ctx: &Context<'_>, args: BulkArgs) -> Result<()> {
    let message = read_message(args.message, args.message_file.as_deref())?;

    let mut contacts = Vec::new();
    if let Some(path) = &args.contacts_file {
        contacts.extend(load_contacts_file(path)?);
    }
    for spec in &args.to {
        contacts.push(parse_contact_spec(spec)?);
    }
    if contacts.is_empty() {
        return Err(invalid_input(
            "no contacts given: use --contacts-file or --to NAME=PHONE",
        ));
    }

    let mut rejected = Vec::new();
    if args.skip_invalid {
        let (accepted, problems) = filter_contacts(ctx, contacts);
        for problem in &problems {
            tracing::warn!(%problem, "skipping contact");
        }
        contacts = accepted;
        rejected = problems;
    }

    let delay_ms = args
        .delay_ms
        .unwrap_or(ctx.config.dispatch.default_delay_ms);
    let request = BulkSendRequest::new(contacts, message).with_delay_ms(delay_ms);
    let token = CancelToken::new();
    let handler_token = token.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(error = %err, "cannot install interrupt handler");
    }
    let report = ctx
        .dispatcher()
        .with_pacer(CancellablePacer::new(token))
        .send_bulk(&request)
        .with_context(|| "bulk send")?;

    if ctx.json {
        print_json(&BulkOutput {
            report: &report,
            rejected,
        })?;
    } else {
        for problem in &rejected {
            println!("skipped {problem}");
        }
        for outcome in &report.results {
            print_outcome(outcome);
        }
        println!(
            "total {}, sent {}, failed {}",
            report.total_contacts, report.successful_sends, report.failed_sends
        );
        if report.cancelled {
            println!("interrupted, {} contact(s) not attempted", report.skipped_contacts);
        }
    }

    if report.cancelled {
        return Err(send_failed(format!(
            "interrupted after {} of {} contacts",
            report.total_contacts,
            report.total_contacts + report.skipped_contacts
        )));
    }
    if report.all_succeeded() {
        Ok(())
    } else {
        Err(send_failed(format!(
            "{} of {} messages not sent",
            report.failed_sends, report.total_contacts
        )))
    }
}

/// Runs contacts through the registry the way the web form builds its list.
fn filter_contacts(ctx: &Context<'_>, contacts: Vec<Contact>) -> (Vec<Contact>, Vec<String>) {
    let mut registry = ctx.registry();
    let mut problems = Vec::new();
    for contact in contacts {
        if let Err(err) = registry.add_contact(&contact.name, &contact.phone) {
            problems.push(format!("{} ({}): {}", contact.name, contact.phone, err));
        }
    }
    (registry.contacts(), problems)
}
