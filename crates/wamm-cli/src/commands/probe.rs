use crate::commands::{print_json, Context};
use anyhow::{anyhow, Context as _, Result};
use serde::Serialize;
use wamm_client::{InstanceStatus, WhatsAppConnection};

pub fn health(ctx: &Context<'_>) -> Result<()> {
    let health = ctx.client.health().with_context(|| "health check")?;
    if ctx.json {
        print_json(&health)?;
    } else {
        println!(
            "{} {} ({})",
            health.service.as_deref().unwrap_or("service"),
            health.version.as_deref().unwrap_or("-"),
            health.status
        );
    }
    if !health.is_healthy() {
        return Err(anyhow!("service reports status {}", health.status));
    }
    Ok(())
}

pub fn ping(ctx: &Context<'_>) -> Result<()> {
    let test = ctx
        .client
        .test_connection()
        .with_context(|| "test evolution api connection")?;
    if ctx.json {
        print_json(&test)?;
    } else if test.success {
        match test.status_code {
            Some(code) => println!("evolution api reachable (HTTP {code})"),
            None => println!("evolution api reachable"),
        }
    }
    if !test.success {
        let reason = test.error.as_deref().unwrap_or("no detail");
        return Err(anyhow!("evolution api unreachable: {reason}"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusOutput {
    instance: InstanceStatus,
    whatsapp: WhatsAppConnection,
}

pub fn status(ctx: &Context<'_>) -> Result<()> {
    let instance = ctx
        .client
        .instance_status()
        .with_context(|| "instance status")?;
    let whatsapp = ctx
        .client
        .whatsapp_connection()
        .with_context(|| "whatsapp connection")?;

    if ctx.json {
        return print_json(&StatusOutput { instance, whatsapp });
    }

    if instance.success {
        println!(
            "instance   {} ({})",
            instance.instance_name.as_deref().unwrap_or("-"),
            instance.connection_status.as_deref().unwrap_or("unknown")
        );
        if let Some(profile) = &instance.profile_name {
            println!("profile    {profile}");
        }
        if let Some(number) = &instance.phone_number {
            println!("number     {number}");
        }
    } else {
        println!(
            "instance   unavailable: {}",
            instance.error.as_deref().unwrap_or("no detail")
        );
        let available: Vec<&str> = instance
            .available_instances
            .iter()
            .map(|name| name.as_deref().unwrap_or("(unnamed)"))
            .collect();
        if !available.is_empty() {
            println!("available  {}", available.join(", "));
        }
    }
    let state = if whatsapp.is_connected() {
        "connected"
    } else {
        "disconnected"
    };
    println!("whatsapp   {state}");
    Ok(())
}

pub fn instances(ctx: &Context<'_>) -> Result<()> {
    let list = ctx.client.list_instances().with_context(|| "list instances")?;
    if ctx.json {
        return print_json(&list);
    }
    if !list.success {
        return Err(anyhow!(
            "cannot list instances: {}",
            list.error.as_deref().unwrap_or("no detail")
        ));
    }
    let current = list.current_instance.as_deref();
    for instance in &list.instances {
        let name = instance.instance_name.as_deref().unwrap_or("(unnamed)");
        let marker = if Some(name) == current { "*" } else { " " };
        let state = if instance.is_connected {
            "connected"
        } else {
            instance.connection_status.as_deref().unwrap_or("unknown")
        };
        println!(
            "{marker} {name}  {state}  {}",
            instance.phone_number.as_deref().unwrap_or("-")
        );
    }
    println!("{} instance(s)", list.total_instances);
    Ok(())
}

pub fn diagnose(ctx: &Context<'_>) -> Result<()> {
    let diagnosis = ctx
        .client
        .full_diagnosis()
        .with_context(|| "full diagnosis")?;
    if ctx.json {
        print_json(&diagnosis)?;
    } else if let Some(summary) = &diagnosis.summary {
        println!("api reachable       {}", yes_no(summary.api_reachable));
        println!("instance found      {}", yes_no(summary.instance_found));
        println!("whatsapp connected  {}", yes_no(summary.whatsapp_connected));
    }
    if diagnosis.is_ready() {
        if !ctx.json {
            println!("ready to send");
        }
        return Ok(());
    }
    let issues = diagnosis.issues();
    if issues.is_empty() {
        return Err(anyhow!("service is not ready to send"));
    }
    Err(anyhow!("service is not ready to send: {}", issues.join("; ")))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
