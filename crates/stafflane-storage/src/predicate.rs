//! Predicate tree handed from the query engine to a store.
//!
//! The tree is the contract between the engine and the persistence layer:
//! leaf conditions on scalar fields, membership conditions reaching into
//! one-to-many relations, and AND/OR groups. It is independent of any
//! concrete query language; backends translate it (or, for the in-memory
//! backend, evaluate it directly via [`Predicate::matches`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stafflane_core::EntityRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Exact match on a scalar field (e.g. status=pending)
    Equals { field: String, value: String },
    /// Case-insensitive substring match on a scalar field
    Contains { field: String, value: String },
    /// Boolean field match (e.g. archived=false)
    Bool { field: String, value: bool },
    /// At least one related row whose `field` contains `value`,
    /// case-insensitively (e.g. any interview note mentioning the term)
    AnyRelated {
        relation: String,
        field: String,
        value: String,
    },
    /// All members must match; an empty group matches every record
    And(Vec<Predicate>),
    /// Any member must match
    Or(Vec<Predicate>),
}

impl Predicate {
    /// A predicate that matches every record.
    pub fn all() -> Self {
        Predicate::And(Vec::new())
    }

    /// Whether this tree constrains anything at all.
    pub fn is_vacuous(&self) -> bool {
        match self {
            Predicate::And(members) => members.iter().all(|m| m.is_vacuous()),
            _ => false,
        }
    }

    /// Check if a record matches this predicate
    pub fn matches(&self, record: &EntityRecord) -> bool {
        match self {
            Predicate::Equals { field, value } => Self::match_equals(record, field, value),
            Predicate::Contains { field, value } => Self::match_contains(record, field, value),
            Predicate::Bool { field, value } => Self::match_bool(record, field, *value),
            Predicate::AnyRelated {
                relation,
                field,
                value,
            } => Self::match_any_related(record, relation, field, value),
            Predicate::And(members) => members.iter().all(|m| m.matches(record)),
            Predicate::Or(members) => members.iter().any(|m| m.matches(record)),
        }
    }

    fn match_equals(record: &EntityRecord, field: &str, value: &str) -> bool {
        match field {
            "id" => record.id == value,
            _ => match record.get_field(field) {
                Some(Value::String(s)) => s == value,
                Some(Value::Number(n)) => n.to_string() == value,
                Some(Value::Bool(b)) => b.to_string() == value,
                _ => false,
            },
        }
    }

    fn match_contains(record: &EntityRecord, field: &str, value: &str) -> bool {
        match record.get_field(field) {
            Some(Value::String(s)) => s.to_lowercase().contains(&value.to_lowercase()),
            _ => false,
        }
    }

    fn match_bool(record: &EntityRecord, field: &str, value: bool) -> bool {
        match record.get_field(field) {
            Some(Value::Bool(b)) => *b == value,
            Some(Value::String(s)) => match s.to_lowercase().as_str() {
                "true" => value,
                "false" => !value,
                _ => false,
            },
            _ => false,
        }
    }

    fn match_any_related(record: &EntityRecord, relation: &str, field: &str, value: &str) -> bool {
        let Some(rows) = record.related(relation) else {
            return false;
        };
        rows.iter().any(|row| {
            row.get(field)
                .and_then(|v| v.as_str())
                .is_some_and(|s| s.to_lowercase().contains(&value.to_lowercase()))
        })
    }
}
