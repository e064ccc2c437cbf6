use crate::commands::{print_json, print_outcome, Context};
use crate::error::send_failed;
use crate::util::read_message;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use wamm_core::Contact;

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, short)]
    pub message: Option<String>,
    #[arg(long, value_name = "FILE", conflicts_with = "message")]
    pub message_file: Option<PathBuf>,
}

pub fn send(ctx: &Context<'_>, args: SendArgs) -> Result<()> {
    let message = read_message(args.message, args.message_file.as_deref())?;
    let contact = Contact::new(args.name, args.phone);
    let outcome = ctx.dispatcher().send_one(&contact, &message);

    if ctx.json {
        print_json(&outcome)?;
    } else {
        print_outcome(&outcome);
    }

    if outcome.success {
        Ok(())
    } else {
        Err(send_failed(format!(
            "message to {} not sent",
            outcome.sent_to
        )))
    }
}
