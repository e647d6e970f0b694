//! Where-clause assembly: archived/active defaults, scalar filters, the
//! endpoint's predicate augmenter, and search, composed in that order.

use crate::config::ListConfig;
use crate::error::QueryError;
use crate::params::{FilterValue, ListParams};
use crate::search::compile_search;
use stafflane_storage::Predicate;

/// Build the full predicate tree for one request.
///
/// Search predicates are attached last and always narrow: an existing tree
/// `t` becomes `And[t, Or[search...]]`, never a flat OR that would bypass
/// the other filters.
pub fn build_where(params: &ListParams, config: &ListConfig) -> Result<Predicate, QueryError> {
    let mut conditions: Vec<Predicate> = Vec::new();

    if let Some(field) = &config.archived_field {
        conditions.push(Predicate::Bool {
            field: field.clone(),
            value: params.archived.unwrap_or(config.default_archived),
        });
    }
    if let Some(field) = &config.active_field {
        conditions.push(Predicate::Bool {
            field: field.clone(),
            value: params.active.unwrap_or(config.default_active),
        });
    }

    for (param, field) in &config.filter_fields {
        let Some(value) = params.filters.get(param) else {
            continue;
        };
        conditions.push(match value {
            FilterValue::Text(s) => Predicate::Equals {
                field: field.clone(),
                value: s.clone(),
            },
            FilterValue::Flag(b) => Predicate::Bool {
                field: field.clone(),
                value: *b,
            },
        });
    }

    let mut tree = match conditions.len() {
        0 => None,
        1 => conditions.pop(),
        _ => Some(Predicate::And(conditions)),
    };

    if let Some(augmenter) = &config.predicate_augmenter {
        tree = augmenter
            .augment(tree, params)
            .map_err(|e| QueryError::PredicateHook(e.to_string()))?;
    }

    if let Some(term) = &params.search {
        let branches = compile_search(term, config);
        if !branches.is_empty() {
            tree = Some(match tree {
                Some(existing) => Predicate::And(vec![existing, Predicate::Or(branches)]),
                None => Predicate::Or(branches),
            });
        }
    }

    Ok(tree.unwrap_or_else(Predicate::all))
}
