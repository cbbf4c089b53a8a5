//! Config command - read or patch individual records

use crate::cli::ConfigAction;
use crate::config::{ConfigStore, DocumentKind};
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::str::FromStr;

/// Run the config command
pub fn run(store: &ConfigStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { kind, id } => get(store, &kind, &id),
        ConfigAction::Set {
            kind,
            id,
            field,
            value,
        } => set(store, &kind, &id, &field, &value),
    }
}

fn get(store: &ConfigStore, kind: &str, id: &str) -> Result<()> {
    let kind = DocumentKind::from_str(kind)?;
    let record = store
        .get_record(kind, id)
        .with_context(|| format!("Could not load {kind} record '{id}'"))?;
    print!("{}", serde_yaml::to_string(&record)?);
    Ok(())
}

fn set(store: &ConfigStore, kind: &str, id: &str, field: &str, value: &str) -> Result<()> {
    let kind = DocumentKind::from_str(kind)?;

    // Parse the raw argument the way YAML would read it, so numbers,
    // booleans, and dates keep their type; anything else stays a string.
    let parsed: Value =
        serde_yaml::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut updates = Mapping::new();
    updates.insert(Value::String(field.to_string()), parsed);
    store
        .update_record(kind, id, &Value::Mapping(updates))
        .with_context(|| format!("Could not update {kind} record '{id}'"))?;

    eprintln!("Updated {kind}.{id}.{field}");
    Ok(())
}
