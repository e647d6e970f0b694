//! Parameter validation: raw query string in, [`ListParams`] out.
//!
//! User-input problems are always returned as [`QueryError`] values, never
//! panics. Repeated parameters use the first occurrence.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use url::form_urlencoded;

use crate::config::ListConfig;
use crate::error::QueryError;
use stafflane_storage::SortDirection;

pub const MAX_SEARCH_TERM_LEN: usize = 200;
pub const MAX_FILTER_VALUE_LEN: usize = 255;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// A validated scalar filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Flag(bool),
}

/// A validated list request derived from the raw query string.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: usize,
    pub limit: usize,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    /// Sanitized search term
    pub search: Option<String>,
    pub archived: Option<bool>,
    pub active: Option<bool>,
    /// Present filter parameters, keyed by parameter name
    pub filters: IndexMap<String, FilterValue>,
    pub history: bool,
    /// First-occurrence raw parameters, for conditional-include gates
    raw: IndexMap<String, String>,
    /// All (name, value) pairs in sorted order, for cache keying
    cache_parts: Vec<(String, String)>,
}

impl ListParams {
    pub fn from_query(query: &str, config: &ListConfig) -> Result<Self, QueryError> {
        let mut raw: IndexMap<String, String> = IndexMap::new();
        let mut cache_parts: Vec<(String, String)> = Vec::new();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            cache_parts.push((name.to_string(), value.to_string()));
            raw.entry(name.into_owned()).or_insert_with(|| value.into_owned());
        }
        cache_parts.sort();

        let page = match raw.get("page") {
            None => 1,
            Some(v) if !DIGITS.is_match(v) => {
                return Err(QueryError::invalid_pagination(
                    "page",
                    "must be a positive integer",
                ));
            }
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(QueryError::invalid_pagination("page", "must be >= 1")),
            },
        };

        let limit = match raw.get("limit") {
            None => config.default_page_size,
            Some(v) if !DIGITS.is_match(v) => {
                return Err(QueryError::invalid_pagination(
                    "limit",
                    "must be a positive integer",
                ));
            }
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n >= 1 && n <= config.max_page_size => n,
                Ok(n) if n > config.max_page_size => {
                    return Err(QueryError::invalid_pagination(
                        "limit",
                        format!("exceeds maximum of {}", config.max_page_size),
                    ));
                }
                _ => return Err(QueryError::invalid_pagination("limit", "must be >= 1")),
            },
        };

        // Unknown sort fields silently fall back to the default; this is
        // an allow-list, not an error surface
        let sort_field = match raw.get("sortBy") {
            Some(field) if config.sortable_fields.iter().any(|f| f == field) => field.clone(),
            _ => config.default_sort.0.clone(),
        };
        let sort_direction = match raw.get("sortOrder").map(String::as_str) {
            Some("desc") => SortDirection::Desc,
            _ => config.default_sort.1,
        };

        let archived = parse_bool_param(&raw, "archived")?;
        let active = parse_bool_param(&raw, "active")?;

        let search = match raw.get("search") {
            None => None,
            Some(term) => Some(sanitize_search_term(term)?),
        };

        let mut filters = IndexMap::new();
        for param in config.filter_fields.keys() {
            let Some(value) = raw.get(param) else {
                continue;
            };
            if ListConfig::is_boolean_filter(param) {
                let flag = parse_bool(value)
                    .ok_or_else(|| QueryError::invalid_boolean(param.clone()))?;
                filters.insert(param.clone(), FilterValue::Flag(flag));
            } else {
                if value.chars().count() > MAX_FILTER_VALUE_LEN {
                    return Err(QueryError::FilterValueTooLong {
                        param: param.clone(),
                        max: MAX_FILTER_VALUE_LEN,
                    });
                }
                filters.insert(param.clone(), FilterValue::Text(value.clone()));
            }
        }

        let history = raw.get("history").map(String::as_str) == Some("true");

        Ok(Self {
            page,
            limit,
            sort_field,
            sort_direction,
            search,
            archived,
            active,
            filters,
            history,
            raw,
            cache_parts,
        })
    }

    /// Offset of the first record of the requested page.
    pub fn skip(&self) -> usize {
        (self.page - 1) * self.limit
    }

    /// First-occurrence raw value of a query parameter.
    pub fn raw_param(&self, name: &str) -> Option<&str> {
        self.raw.get(name).map(String::as_str)
    }

    /// Sorted (name, value) pairs for deterministic cache keys.
    pub fn cache_key_parts(&self) -> &[(String, String)] {
        &self.cache_parts
    }

    /// Loggable parameter shape. Search terms and filter values are
    /// redacted; pagination and sort stay verbatim.
    pub fn shape(&self) -> String {
        let mut parts = vec![
            format!("page={}", self.page),
            format!("limit={}", self.limit),
            format!("sortBy={}", self.sort_field),
        ];
        if self.search.is_some() {
            parts.push("search=<redacted>".to_string());
        }
        for name in self.filters.keys() {
            parts.push(format!("{name}=<redacted>"));
        }
        parts.join("&")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_bool_param(
    raw: &IndexMap<String, String>,
    name: &str,
) -> Result<Option<bool>, QueryError> {
    match raw.get(name) {
        None => Ok(None),
        Some(value) => parse_bool(value)
            .map(Some)
            .ok_or_else(|| QueryError::invalid_boolean(name)),
    }
}

/// Strip characters with injection potential, trim, and cap the length.
/// Defense in depth for values that end up in logs or echoed responses;
/// store-level parameterization remains the real barrier.
fn sanitize_search_term(term: &str) -> Result<String, QueryError> {
    if term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(QueryError::SearchTermTooLong {
            max: MAX_SEARCH_TERM_LEN,
        });
    }
    let stripped: String = term
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '\'' | '"'))
        .collect();
    let sanitized: String = stripped.trim().chars().take(MAX_SEARCH_TERM_LEN).collect();
    if sanitized.is_empty() {
        return Err(QueryError::SearchTermEmpty);
    }
    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stafflane_core::EntityKind;

    fn config() -> ListConfig {
        ListConfig::new(EntityKind::Application)
            .with_sortable_fields(vec!["createdAt", "status"])
            .with_default_sort("createdAt", SortDirection::Desc)
            .with_max_page_size(50)
            .with_filter_field("status", "status")
            .with_filter_field("published", "published")
    }

    #[test]
    fn defaults_when_absent() {
        let p = ListParams::from_query("", &config()).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.sort_field, "createdAt");
        assert_eq!(p.sort_direction, SortDirection::Desc);
        assert!(p.search.is_none());
        assert!(p.filters.is_empty());
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn page_and_limit_parse_and_skip() {
        let p = ListParams::from_query("page=3&limit=20", &config()).unwrap();
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 20);
        assert_eq!(p.skip(), 40);
    }

    #[test]
    fn page_rejects_non_numeric_zero_and_negative() {
        for query in ["page=abc", "page=0", "page=-1", "page=1.5"] {
            let err = ListParams::from_query(query, &config()).unwrap_err();
            assert!(
                matches!(err, QueryError::InvalidPagination { param: "page", .. }),
                "query {query} gave {err:?}"
            );
        }
    }

    #[test]
    fn limit_rejects_out_of_range() {
        let err = ListParams::from_query("limit=0", &config()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidPagination { param: "limit", .. }
        ));
        let err = ListParams::from_query("limit=51", &config()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidPagination { param: "limit", .. }
        ));
        // Exactly the maximum is fine
        let p = ListParams::from_query("limit=50", &config()).unwrap();
        assert_eq!(p.limit, 50);
    }

    #[test]
    fn unknown_sort_field_falls_back_silently() {
        let p = ListParams::from_query("sortBy=salary", &config()).unwrap();
        assert_eq!(p.sort_field, "createdAt");
        let p = ListParams::from_query("sortBy=status", &config()).unwrap();
        assert_eq!(p.sort_field, "status");
    }

    #[test]
    fn only_desc_literal_selects_descending() {
        let asc_default = ListConfig::new(EntityKind::Contact)
            .with_default_sort("createdAt", SortDirection::Asc);
        let p = ListParams::from_query("sortOrder=desc", &asc_default).unwrap();
        assert_eq!(p.sort_direction, SortDirection::Desc);
        // Anything else maps to the configured default
        for query in ["sortOrder=asc", "sortOrder=DESC", "sortOrder=down"] {
            let p = ListParams::from_query(query, &asc_default).unwrap();
            assert_eq!(p.sort_direction, SortDirection::Asc, "query {query}");
        }
    }

    #[test]
    fn boolean_params_are_strict() {
        let p = ListParams::from_query("archived=true&active=false", &config()).unwrap();
        assert_eq!(p.archived, Some(true));
        assert_eq!(p.active, Some(false));

        let err = ListParams::from_query("archived=yes", &config()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidBoolean { ref param } if param == "archived"));
        let err = ListParams::from_query("active=1", &config()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidBoolean { ref param } if param == "active"));
    }

    #[test]
    fn reserved_filter_names_coerce_to_boolean() {
        let p = ListParams::from_query("published=true", &config()).unwrap();
        assert_eq!(p.filters.get("published"), Some(&FilterValue::Flag(true)));

        let err = ListParams::from_query("published=yes", &config()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidBoolean { ref param } if param == "published"));
    }

    #[test]
    fn text_filters_are_captured_and_bounded() {
        let p = ListParams::from_query("status=pending", &config()).unwrap();
        assert_eq!(
            p.filters.get("status"),
            Some(&FilterValue::Text("pending".to_string()))
        );

        let long = "x".repeat(256);
        let err = ListParams::from_query(&format!("status={long}"), &config()).unwrap_err();
        assert!(matches!(err, QueryError::FilterValueTooLong { .. }));
        // Exactly 255 is accepted
        let ok = "x".repeat(255);
        assert!(ListParams::from_query(&format!("status={ok}"), &config()).is_ok());
    }

    #[test]
    fn undeclared_params_are_not_filters() {
        let p = ListParams::from_query("favouriteColor=blue", &config()).unwrap();
        assert!(p.filters.is_empty());
        assert_eq!(p.raw_param("favouriteColor"), Some("blue"));
    }

    #[test]
    fn search_term_is_sanitized() {
        let p = ListParams::from_query("search=%3Cb%3Edev%3C%2Fb%3E", &config()).unwrap();
        assert_eq!(p.search.as_deref(), Some("bdev/b"));

        let p = ListParams::from_query("search=++rust+engineer++", &config()).unwrap();
        assert_eq!(p.search.as_deref(), Some("rust engineer"));
    }

    #[test]
    fn search_term_201_chars_rejected_before_sanitization() {
        let term = "a".repeat(201);
        let err = ListParams::from_query(&format!("search={term}"), &config()).unwrap_err();
        assert!(matches!(err, QueryError::SearchTermTooLong { .. }));
        // 200 is fine
        let term = "a".repeat(200);
        assert!(ListParams::from_query(&format!("search={term}"), &config()).is_ok());
    }

    #[test]
    fn search_term_sanitizing_to_empty_rejected() {
        for query in ["search=%3C%3E", "search=%22%27", "search=++"] {
            let err = ListParams::from_query(query, &config()).unwrap_err();
            assert!(matches!(err, QueryError::SearchTermEmpty), "query {query}");
        }
    }

    #[test]
    fn repeated_params_use_first_occurrence() {
        let p = ListParams::from_query("page=2&page=9", &config()).unwrap();
        assert_eq!(p.page, 2);
    }

    #[test]
    fn history_toggle_requires_true_literal() {
        assert!(ListParams::from_query("history=true", &config()).unwrap().history);
        assert!(!ListParams::from_query("history=false", &config()).unwrap().history);
        assert!(!ListParams::from_query("", &config()).unwrap().history);
    }

    #[test]
    fn cache_parts_are_sorted_and_complete() {
        let p = ListParams::from_query("status=pending&page=2&limit=5", &config()).unwrap();
        assert_eq!(
            p.cache_key_parts(),
            &[
                ("limit".to_string(), "5".to_string()),
                ("page".to_string(), "2".to_string()),
                ("status".to_string(), "pending".to_string()),
            ]
        );
    }

    #[test]
    fn shape_redacts_sensitive_values() {
        let p = ListParams::from_query("search=jane&status=pending", &config()).unwrap();
        let shape = p.shape();
        assert!(shape.contains("search=<redacted>"));
        assert!(shape.contains("status=<redacted>"));
        assert!(!shape.contains("jane"));
        assert!(!shape.contains("pending"));
    }
}
