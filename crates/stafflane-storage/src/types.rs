//! Fetch options and projection types consumed by [`crate::ListStore`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use stafflane_core::EntityRecord;

use crate::predicate::Predicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// A single relation to eager-load, optionally narrowed to a field subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationShape {
    pub relation: String,
    /// `None` loads related rows in full
    pub fields: Option<Vec<String>>,
}

impl RelationShape {
    pub fn full(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            fields: None,
        }
    }

    pub fn narrowed(relation: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            relation: relation.into(),
            fields: Some(fields),
        }
    }
}

/// Relations to attach to each fetched record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RelationPlan {
    pub includes: Vec<RelationShape>,
    /// Relations whose row count is reported under `_count`
    pub counts: Vec<String>,
}

impl RelationPlan {
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.counts.is_empty()
    }
}

/// What each fetched record carries back: everything, all scalars plus a
/// relation plan, or an explicit field allow-list plus a relation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    All,
    Include(RelationPlan),
    Select {
        fields: Vec<String>,
        plan: RelationPlan,
    },
}

impl Projection {
    /// Materialize this projection against a stored record.
    ///
    /// Relation detection: a field holding a non-empty array of objects is
    /// treated as a relation and is dropped unless the plan names it, so a
    /// relation payload never leaks past a projection that did not ask for
    /// it. Scalar arrays (e.g. a list of strings) are left alone.
    pub fn apply(&self, record: &EntityRecord) -> EntityRecord {
        match self {
            Projection::All => record.clone(),
            Projection::Include(plan) => {
                let mut out = record.clone();
                out.data = project_data(&record.data, None, plan);
                out
            }
            Projection::Select { fields, plan } => {
                let mut out = record.clone();
                out.data = project_data(&record.data, Some(fields), plan);
                out
            }
        }
    }
}

fn project_data(
    data: &std::collections::HashMap<String, Value>,
    allow_list: Option<&Vec<String>>,
    plan: &RelationPlan,
) -> std::collections::HashMap<String, Value> {
    let mut out = std::collections::HashMap::new();

    for (key, value) in data {
        if is_relation_value(value) {
            // Relations only survive through the plan below
            continue;
        }
        let keep = match allow_list {
            Some(fields) => fields.iter().any(|f| f == key),
            None => true,
        };
        if keep {
            out.insert(key.clone(), value.clone());
        }
    }

    for shape in &plan.includes {
        let Some(Value::Array(rows)) = data.get(&shape.relation) else {
            continue;
        };
        let shaped: Vec<Value> = match &shape.fields {
            None => rows.clone(),
            Some(fields) => rows.iter().map(|row| narrow_row(row, fields)).collect(),
        };
        out.insert(shape.relation.clone(), Value::Array(shaped));
    }

    if !plan.counts.is_empty() {
        let mut counts = Map::new();
        for relation in &plan.counts {
            let n = match data.get(relation) {
                Some(Value::Array(rows)) => rows.len(),
                _ => 0,
            };
            counts.insert(relation.clone(), json!(n));
        }
        out.insert("_count".to_string(), Value::Object(counts));
    }

    out
}

fn is_relation_value(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}

fn narrow_row(row: &Value, fields: &[String]) -> Value {
    let Value::Object(obj) = row else {
        return row.clone();
    };
    let narrowed: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| fields.iter().any(|f| f == *k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(narrowed)
}

/// Parameters for a single paged fetch against a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchOptions {
    pub predicate: Predicate,
    pub order_by: OrderBy,
    pub skip: usize,
    pub take: usize,
    pub projection: Projection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stafflane_core::EntityKind;

    fn article() -> EntityRecord {
        let mut r = EntityRecord::new("ar1".to_string(), EntityKind::Article);
        r.set_field("title", json!("Hiring trends"));
        r.set_field("body", json!("Long body text"));
        r.set_field("published", json!(true));
        r.set_field("keywords", json!(["hiring", "trends"]));
        r.set_field(
            "tags",
            json!([
                { "id": "t1", "name": "market", "internalNote": "hide me" },
                { "id": "t2", "name": "salary", "internalNote": "hide me" }
            ]),
        );
        r.set_field(
            "comments",
            json!([{ "id": "c1", "text": "Nice" }, { "id": "c2", "text": "+1" }]),
        );
        r
    }

    #[test]
    fn all_projection_is_identity() {
        let r = article();
        assert_eq!(Projection::All.apply(&r), r);
    }

    #[test]
    fn include_keeps_scalars_and_planned_relations_only() {
        let r = article();
        let plan = RelationPlan {
            includes: vec![RelationShape::narrowed(
                "tags",
                vec!["id".to_string(), "name".to_string()],
            )],
            counts: vec![],
        };
        let out = Projection::Include(plan).apply(&r);

        assert_eq!(out.get_field("title"), Some(&json!("Hiring trends")));
        // Scalar arrays are not relations
        assert_eq!(out.get_field("keywords"), Some(&json!(["hiring", "trends"])));
        // Unplanned relation is stripped
        assert!(out.get_field("comments").is_none());
        // Narrowed shape drops extra keys
        assert_eq!(
            out.get_field("tags"),
            Some(&json!([
                { "id": "t1", "name": "market" },
                { "id": "t2", "name": "salary" }
            ]))
        );
    }

    #[test]
    fn select_applies_allow_list_and_counts() {
        let r = article();
        let plan = RelationPlan {
            includes: vec![],
            counts: vec!["comments".to_string(), "documents".to_string()],
        };
        let out = Projection::Select {
            fields: vec!["title".to_string()],
            plan,
        }
        .apply(&r);

        assert_eq!(out.get_field("title"), Some(&json!("Hiring trends")));
        assert!(out.get_field("body").is_none());
        assert!(out.get_field("tags").is_none());
        // Missing relation counts as zero
        assert_eq!(
            out.get_field("_count"),
            Some(&json!({ "comments": 2, "documents": 0 }))
        );
    }
}
