//! Record-level accessors over the generic document store
//!
//! The four well-known documents of a config root are addressed by
//! [`DocumentKind`], which knows its file name, its top-level collection
//! key, and its built-in schema. Record accessors are thin wrappers over
//! `load`/`update`: one whole-document load plus a lookup, or one
//! generic update with a correctly-nested payload.

use crate::config::schema::{FieldKind, FieldSpec, Schema};
use crate::config::store::{ConfigError, ConfigStore, Result, UpdateOptions};
use crate::models::{Project, Stakeholder, TeamMember};
use anyhow::anyhow;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The well-known documents of a config root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Projects,
    Team,
    Stakeholders,
    Decisions,
}

impl DocumentKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKind::Projects => "projects.yaml",
            DocumentKind::Team => "team.yaml",
            DocumentKind::Stakeholders => "stakeholders.yaml",
            DocumentKind::Decisions => "decisions.yaml",
        }
    }

    /// Top-level key holding this kind's record collection
    pub fn collection(&self) -> &'static str {
        match self {
            DocumentKind::Projects => "projects",
            DocumentKind::Team => "team",
            DocumentKind::Stakeholders => "stakeholders",
            DocumentKind::Decisions => "decisions",
        }
    }

    /// Built-in validation contract for this document kind
    pub fn schema(&self) -> Schema {
        match self {
            DocumentKind::Projects => Schema::new(
                "projects",
                vec![
                    FieldSpec::required("name", FieldKind::String),
                    FieldSpec::required(
                        "status",
                        FieldKind::Enum(&[
                            "planning",
                            "active",
                            "in_progress",
                            "completed",
                            "on_hold",
                            "cancelled",
                        ]),
                    ),
                    FieldSpec::optional(
                        "priority",
                        FieldKind::Enum(&["critical", "high", "medium", "low"]),
                    ),
                    FieldSpec::optional("owner", FieldKind::String),
                    FieldSpec::optional("start_date", FieldKind::Date),
                    FieldSpec::optional("target_date", FieldKind::Date),
                    FieldSpec::optional("github_repos", FieldKind::Sequence),
                    FieldSpec::optional("dependencies", FieldKind::Sequence),
                    FieldSpec::optional("milestones", FieldKind::Sequence),
                    FieldSpec::optional("blockers", FieldKind::Sequence),
                    FieldSpec::optional("activity", FieldKind::Mapping),
                    FieldSpec::optional("activity_baseline", FieldKind::Float),
                ],
            ),
            DocumentKind::Team => Schema::new(
                "team",
                vec![
                    FieldSpec::required("name", FieldKind::String),
                    FieldSpec::optional("role", FieldKind::String),
                    FieldSpec::optional("email", FieldKind::String),
                ],
            ),
            DocumentKind::Stakeholders => Schema::new(
                "stakeholders",
                vec![
                    FieldSpec::required("name", FieldKind::String),
                    FieldSpec::optional("role", FieldKind::String),
                    FieldSpec::optional("team", FieldKind::String),
                    FieldSpec::optional("interests", FieldKind::Sequence),
                ],
            ),
            DocumentKind::Decisions => Schema::new(
                "decisions",
                vec![
                    FieldSpec::required("title", FieldKind::String),
                    FieldSpec::optional("status", FieldKind::String),
                    FieldSpec::optional("decided_on", FieldKind::Date),
                    FieldSpec::optional("context", FieldKind::String),
                ],
            ),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection())
    }
}

impl FromStr for DocumentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "projects" | "project" => Ok(DocumentKind::Projects),
            "team" => Ok(DocumentKind::Team),
            "stakeholders" | "stakeholder" => Ok(DocumentKind::Stakeholders),
            "decisions" | "decision" => Ok(DocumentKind::Decisions),
            _ => Err(anyhow!(
                "Unknown record kind '{}'. Valid kinds: projects, team, stakeholders, decisions",
                s
            )),
        }
    }
}

/// Allow-list filter on one record field: the record matches only if the
/// field's value is a member of `allowed`.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    pub field: String,
    pub allowed: Vec<String>,
}

impl RecordFilter {
    pub fn new(field: impl Into<String>, allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            field: field.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, record: &Value) -> bool {
        record
            .get(self.field.as_str())
            .and_then(scalar_to_string)
            .map(|value| self.allowed.contains(&value))
            .unwrap_or(false)
    }
}

/// Render a scalar value the way it reads in the YAML source.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Wrap a leaf value in nested single-key mappings, innermost key last.
fn nested_payload(keys: &[&str], leaf: Value) -> Value {
    keys.iter().rev().fold(leaf, |inner, key| {
        let mut map = Mapping::new();
        map.insert(Value::String((*key).to_string()), inner);
        Value::Mapping(map)
    })
}

impl ConfigStore {
    /// Load a kind's whole document (validated) and look up one record.
    pub fn get_record(&self, kind: DocumentKind, id: &str) -> Result<Value> {
        let doc = self.load_with(kind.file_name(), Some(&kind.schema()), true)?;
        doc.get(kind.collection())
            .and_then(|collection| collection.get(id))
            .cloned()
            .ok_or_else(|| ConfigError::RecordNotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            })
    }

    /// Load a kind's document once and return `(id, record)` pairs, with
    /// an optional allow-list filter per field. A record matches only if
    /// every filtered field's value is a member of that field's set.
    pub fn get_all_records(
        &self,
        kind: DocumentKind,
        filters: &[RecordFilter],
    ) -> Result<Vec<(String, Value)>> {
        let doc = self.load_with(kind.file_name(), Some(&kind.schema()), true)?;
        let mut records = Vec::new();
        let collection = doc.get(kind.collection()).and_then(Value::as_mapping);
        if let Some(collection) = collection {
            for (id, record) in collection {
                let Some(id) = id.as_str() else { continue };
                if filters.iter().all(|f| f.matches(record)) {
                    records.push((id.to_string(), record.clone()));
                }
            }
        }
        Ok(records)
    }

    /// Apply a partial update to one record via the generic atomic update.
    pub fn update_record(&self, kind: DocumentKind, id: &str, updates: &Value) -> Result<()> {
        // Surface a record-level error rather than writing a new record.
        self.get_record(kind, id)?;
        let payload = nested_payload(&[kind.collection(), id], updates.clone());
        let schema = kind.schema();
        self.update_with(
            kind.file_name(),
            &payload,
            &UpdateOptions {
                schema: Some(&schema),
                backup: true,
            },
        )
    }

    /// One project record, deserialized.
    pub fn project(&self, id: &str) -> Result<Project> {
        let value = self.get_record(DocumentKind::Projects, id)?;
        from_record(DocumentKind::Projects, id, value)
    }

    /// Every project record, deserialized, with optional filters.
    pub fn projects(&self, filters: &[RecordFilter]) -> Result<Vec<(String, Project)>> {
        self.get_all_records(DocumentKind::Projects, filters)?
            .into_iter()
            .map(|(id, value)| from_record(DocumentKind::Projects, &id, value).map(|p| (id, p)))
            .collect()
    }

    /// Every team roster record, deserialized.
    pub fn team_members(&self) -> Result<Vec<(String, TeamMember)>> {
        self.get_all_records(DocumentKind::Team, &[])?
            .into_iter()
            .map(|(id, value)| from_record(DocumentKind::Team, &id, value).map(|m| (id, m)))
            .collect()
    }

    /// Every stakeholder record, deserialized.
    pub fn stakeholders(&self) -> Result<Vec<(String, Stakeholder)>> {
        self.get_all_records(DocumentKind::Stakeholders, &[])?
            .into_iter()
            .map(|(id, value)| from_record(DocumentKind::Stakeholders, &id, value).map(|s| (id, s)))
            .collect()
    }

    /// Copy a project's summary fields into `summaries.yaml`.
    ///
    /// Best-effort, one-directional: returns `Ok(false)` without touching
    /// anything when the destination document does not exist yet.
    pub fn sync_project_summary(&self, id: &str) -> Result<bool> {
        let destination = self.root().join("summaries.yaml");
        if !destination.exists() {
            debug!("summaries.yaml absent; skipping summary sync for {id}");
            return Ok(false);
        }

        let project = self.get_record(DocumentKind::Projects, id)?;
        let mut summary = Mapping::new();
        for field in ["name", "status", "priority", "target_date"] {
            if let Some(value) = project.get(field) {
                summary.insert(Value::String(field.to_string()), value.clone());
            }
        }

        let payload = nested_payload(&["summaries", id], Value::Mapping(summary));
        self.update_with("summaries.yaml", &payload, &UpdateOptions::default())?;
        Ok(true)
    }

    /// Propagate team-roster name/role into stakeholder profiles that
    /// share a record ID with a roster entry.
    ///
    /// Returns the number of profiles updated; `Ok(0)` without touching
    /// anything when the stakeholder document does not exist yet.
    pub fn propagate_team_profiles(&self) -> Result<usize> {
        let destination = self.root().join("stakeholders.yaml");
        if !destination.exists() {
            debug!("stakeholders.yaml absent; skipping roster propagation");
            return Ok(0);
        }

        let team = self.get_all_records(DocumentKind::Team, &[])?;
        let stakeholder_doc =
            self.load_with("stakeholders.yaml", Some(&DocumentKind::Stakeholders.schema()), true)?;
        let profiles = stakeholder_doc
            .get("stakeholders")
            .and_then(Value::as_mapping);

        let mut updates = Mapping::new();
        if let Some(profiles) = profiles {
            for (id, member) in &team {
                let key = Value::String(id.clone());
                if !profiles.contains_key(&key) {
                    continue;
                }
                let mut fields = Mapping::new();
                for field in ["name", "role"] {
                    if let Some(value) = member.get(field) {
                        fields.insert(Value::String(field.to_string()), value.clone());
                    }
                }
                if !fields.is_empty() {
                    updates.insert(key, Value::Mapping(fields));
                }
            }
        }

        let count = updates.len();
        if count == 0 {
            return Ok(0);
        }

        let payload = nested_payload(&["stakeholders"], Value::Mapping(updates));
        let schema = DocumentKind::Stakeholders.schema();
        self.update_with(
            "stakeholders.yaml",
            &payload,
            &UpdateOptions {
                schema: Some(&schema),
                backup: true,
            },
        )?;
        Ok(count)
    }
}

fn from_record<T: serde::de::DeserializeOwned>(
    kind: DocumentKind,
    id: &str,
    value: Value,
) -> Result<T> {
    serde_yaml::from_value(value).map_err(|source| ConfigError::Parse {
        path: std::path::PathBuf::from(format!("{}#{id}", kind.file_name())),
        source,
    })
}
