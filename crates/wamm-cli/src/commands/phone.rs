use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use wamm_core::{is_valid_phone, normalize_phone, phone_digit_count};

#[derive(Debug, Args)]
pub struct PhoneArgs {
    #[arg(required = true)]
    pub numbers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PhoneCheck {
    input: String,
    canonical: String,
    digits: usize,
    valid: bool,
}

pub fn phone(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let country_code = &ctx.config.dispatch.country_code;
    let checks: Vec<PhoneCheck> = args
        .numbers
        .into_iter()
        .map(|input| {
            let canonical = normalize_phone(&input, country_code);
            PhoneCheck {
                digits: phone_digit_count(&canonical),
                valid: is_valid_phone(&canonical),
                canonical,
                input,
            }
        })
        .collect();

    if ctx.json {
        return print_json(&checks);
    }
    for check in &checks {
        let verdict = if check.valid { "valid" } else { "invalid" };
        println!(
            "{} -> {}  {} ({} digits)",
            check.input, check.canonical, verdict, check.digits
        );
    }
    Ok(())
}
