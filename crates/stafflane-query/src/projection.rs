//! Projection planning: which relations to eager-load or count, and which
//! scalar fields to select, for one request.

use crate::config::ListConfig;
use crate::error::QueryError;
use crate::params::ListParams;
use stafflane_storage::{Projection, RelationPlan, RelationShape};

/// Guard against pathological fan-out from a misconfigured endpoint.
pub const MAX_COUNT_RELATIONS: usize = 10;
pub const MAX_INCLUDE_RELATIONS: usize = 20;

/// Relations narrowed to id + label by default to avoid over-fetching.
const NARROWED_BY_DEFAULT: [(&str, &[&str; 2]); 2] =
    [("tags", &["id", "name"]), ("author", &["id", "name"])];

/// Plan the projection for one request.
pub fn plan_projection(config: &ListConfig, params: &ListParams) -> Result<Projection, QueryError> {
    ProjectionBuilder::new()
        .with_relations(config, params)?
        .with_base(config.base_projection.clone())
        .with_conditional(config, params)
        .build()
}

/// Step-wise assembly of an immutable [`Projection`]. Branches add to the
/// builder; nothing downstream mutates the built value.
#[derive(Debug, Default)]
pub struct ProjectionBuilder {
    plan: RelationPlan,
    base: Option<Vec<String>>,
    extra_fields: Vec<String>,
}

impl ProjectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the relation plan: unconditional includes, gated includes,
    /// the opt-in history relation, and relation counts.
    pub fn with_relations(
        mut self,
        config: &ListConfig,
        params: &ListParams,
    ) -> Result<Self, QueryError> {
        if config.count_relations.len() > MAX_COUNT_RELATIONS {
            return Err(QueryError::TooManyCountRelations {
                requested: config.count_relations.len(),
                max: MAX_COUNT_RELATIONS,
            });
        }

        let mut includes: Vec<RelationShape> = config
            .include_relations
            .iter()
            .map(|inc| resolve_shape(&inc.relation, inc.shape.as_ref()))
            .collect();

        for conditional in &config.conditional_includes {
            if gate_passes(params, &conditional.param, conditional.expected.as_deref()) {
                includes.push(resolve_shape(
                    &conditional.relation,
                    conditional.shape.as_ref(),
                ));
            }
        }

        if params.history
            && let Some(relation) = &config.history_relation
        {
            includes.push(RelationShape::full(relation.clone()));
        }

        if includes.len() > MAX_INCLUDE_RELATIONS {
            return Err(QueryError::TooManyIncludeRelations {
                requested: includes.len(),
                max: MAX_INCLUDE_RELATIONS,
            });
        }

        self.plan = RelationPlan {
            includes,
            counts: config.count_relations.clone(),
        };
        Ok(self)
    }

    pub fn with_base(mut self, base: Option<Vec<String>>) -> Self {
        self.base = base;
        self
    }

    /// Append conditional scalar fields whose gating parameter matches.
    /// Only meaningful together with a base projection.
    pub fn with_conditional(mut self, config: &ListConfig, params: &ListParams) -> Self {
        for conditional in &config.conditional_fields {
            if gate_passes(params, &conditional.param, conditional.expected.as_deref()) {
                self.extra_fields.extend(conditional.fields.iter().cloned());
            }
        }
        self
    }

    pub fn build(self) -> Result<Projection, QueryError> {
        Ok(match self.base {
            Some(mut fields) => {
                for field in self.extra_fields {
                    if !fields.contains(&field) {
                        fields.push(field);
                    }
                }
                Projection::Select {
                    fields,
                    plan: self.plan,
                }
            }
            None => Projection::Include(self.plan),
        })
    }
}

fn resolve_shape(relation: &str, custom: Option<&Vec<String>>) -> RelationShape {
    if let Some(fields) = custom {
        return RelationShape::narrowed(relation, fields.clone());
    }
    for (name, fields) in NARROWED_BY_DEFAULT {
        if relation == name {
            return RelationShape::narrowed(relation, fields.iter().map(|f| f.to_string()).collect());
        }
    }
    RelationShape::full(relation)
}

/// A gate passes when the parameter equals the expected value, or, with no
/// expected value configured, when the parameter is present and truthy.
fn gate_passes(params: &ListParams, param: &str, expected: Option<&str>) -> bool {
    match params.raw_param(param) {
        None => false,
        Some(value) => match expected {
            Some(e) => value == e,
            None => !matches!(value, "" | "false" | "0"),
        },
    }
}
