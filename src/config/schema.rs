//! Schema validation for configuration documents
//!
//! A [`Schema`] is a validation contract for one document kind: the
//! top-level collection key plus per-field rules (presence, type, enum
//! membership) applied to every record in that collection. Validation
//! collects every violation it finds rather than stopping at the first,
//! so a single pass reports everything the operator has to fix.

use chrono::NaiveDate;
use serde_yaml::Value;
use std::fmt;

/// Expected type of a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Bool,
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    Sequence,
    Mapping,
    /// String restricted to a fixed set of values
    Enum(&'static [&'static str]),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Date => write!(f, "date (YYYY-MM-DD)"),
            FieldKind::Sequence => write!(f, "sequence"),
            FieldKind::Mapping => write!(f, "mapping"),
            FieldKind::Enum(values) => write!(f, "one of {}", values.join(", ")),
        }
    }
}

/// One field rule within a record schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A single schema violation, pointing at the record and field at fault
#[derive(Debug, Clone)]
pub struct Violation {
    /// Record ID within the collection; `None` for document-level problems
    pub record: Option<String>,
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record {
            Some(record) => write!(f, "{}.{}: {}", record, self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Validation contract for one document kind
#[derive(Debug, Clone)]
pub struct Schema {
    /// Top-level key holding the record collection (e.g. `projects`)
    pub collection: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(collection: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { collection, fields }
    }

    /// Validate a parsed document, collecting every violation found.
    /// An empty result means the document passed.
    pub fn validate(&self, doc: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();

        let Some(root) = doc.as_mapping() else {
            violations.push(Violation {
                record: None,
                field: "<document>".to_string(),
                message: "document root must be a mapping".to_string(),
            });
            return violations;
        };

        let collection_key = Value::String(self.collection.to_string());
        let Some(collection) = root.get(&collection_key) else {
            violations.push(Violation {
                record: None,
                field: self.collection.to_string(),
                message: "missing top-level collection key".to_string(),
            });
            return violations;
        };

        // A missing-but-present collection (e.g. `projects:` with no
        // entries) parses as null; treat it as empty rather than invalid.
        if collection.is_null() {
            return violations;
        }

        let Some(records) = collection.as_mapping() else {
            violations.push(Violation {
                record: None,
                field: self.collection.to_string(),
                message: "collection must be a mapping keyed by record ID".to_string(),
            });
            return violations;
        };

        for (id, record) in records {
            let id = id.as_str().unwrap_or("<non-string-id>").to_string();
            let Some(fields) = record.as_mapping() else {
                violations.push(Violation {
                    record: Some(id),
                    field: "<record>".to_string(),
                    message: "record must be a mapping".to_string(),
                });
                continue;
            };

            for spec in &self.fields {
                let key = Value::String(spec.name.to_string());
                match fields.get(&key) {
                    None | Some(Value::Null) => {
                        if spec.required {
                            violations.push(Violation {
                                record: Some(id.clone()),
                                field: spec.name.to_string(),
                                message: "required field is missing".to_string(),
                            });
                        }
                    }
                    Some(value) => {
                        if let Some(message) = check_kind(value, &spec.kind) {
                            violations.push(Violation {
                                record: Some(id.clone()),
                                field: spec.name.to_string(),
                                message,
                            });
                        }
                    }
                }
            }
        }

        violations
    }
}

/// Check a value against an expected kind; `Some(message)` on mismatch.
fn check_kind(value: &Value, kind: &FieldKind) -> Option<String> {
    let ok = match kind {
        FieldKind::String => value.is_string(),
        FieldKind::Integer => value.is_i64() || value.is_u64(),
        FieldKind::Float => value.is_f64() || value.is_i64() || value.is_u64(),
        FieldKind::Bool => value.is_bool(),
        FieldKind::Sequence => value.is_sequence(),
        FieldKind::Mapping => value.is_mapping(),
        FieldKind::Date => value
            .as_str()
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
            .unwrap_or(false),
        FieldKind::Enum(allowed) => value
            .as_str()
            .map(|s| allowed.contains(&s))
            .unwrap_or(false),
    };

    if ok {
        None
    } else {
        Some(format!("expected {kind}, got {}", describe(value)))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool `{b}`"),
        Value::Number(n) => format!("number `{n}`"),
        Value::String(s) => format!("string `{s}`"),
        Value::Sequence(_) => "sequence".to_string(),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(_) => "tagged value".to_string(),
    }
}
