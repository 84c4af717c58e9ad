//! Protoset inspection commands.

use anyhow::{Context, Result};
use colored::Colorize;
use rpcdesk_protoset::{list_methods, resolve_request_fields, ResolvedField};
use std::path::Path;

pub fn cmd_methods(protoset: &Path) -> Result<()> {
    let set = rpcdesk_protoset::load(protoset)
        .with_context(|| format!("cannot list methods of {}", protoset.display()))?;
    let methods = list_methods(&set);
    if methods.is_empty() {
        eprintln!("{}", "(protoset declares no services)".dimmed());
    }
    for method in methods {
        println!("{method}");
    }
    Ok(())
}

pub fn cmd_fields(protoset: &Path, method: &str) -> Result<()> {
    let set = rpcdesk_protoset::load(protoset)
        .with_context(|| format!("cannot resolve fields from {}", protoset.display()))?;
    let fields = resolve_request_fields(&set, method);
    if fields.is_empty() {
        println!("{}", "(No body fields required for this method)".dimmed());
        return Ok(());
    }
    println!("{}", "BODY".green().bold());
    for field in &fields {
        println!("  {}", format_field(field));
    }
    Ok(())
}

/// `name` for free-text fields, `name: A | B` for enums.
pub(crate) fn format_field(field: &ResolvedField) -> String {
    if field.options.is_empty() {
        field.name.clone()
    } else {
        format!("{}: {}", field.name, field.options.join(" | "))
    }
}
