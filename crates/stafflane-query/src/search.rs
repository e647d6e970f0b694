//! Search compilation: sanitized term + field configuration in, OR-branch
//! predicates out.

use crate::config::ListConfig;
use stafflane_storage::Predicate;

/// Compile the search term into one predicate per searchable scalar field
/// and one per configured relation field. The caller ORs them together; a
/// match on any branch qualifies the parent record, with no ranking.
pub fn compile_search(term: &str, config: &ListConfig) -> Vec<Predicate> {
    let mut branches =
        Vec::with_capacity(config.searchable_fields.len() + config.relation_search.len());

    for field in &config.searchable_fields {
        branches.push(Predicate::Contains {
            field: field.clone(),
            value: term.to_string(),
        });
    }

    for fields in config.relation_search.values() {
        for pair in fields {
            branches.push(Predicate::AnyRelated {
                relation: pair.relation.clone(),
                field: pair.field.clone(),
                value: term.to_string(),
            });
        }
    }

    branches
}
