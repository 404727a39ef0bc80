//! The upstream scheme list (`/mf`) and name search over it.

use serde::{Deserialize, Serialize};

use super::payload::code_from_any;

/// One entry of the scheme list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeSummary {
    #[serde(default, alias = "schemeCode", deserialize_with = "code_from_any")]
    pub scheme_code: String,
    #[serde(default, alias = "schemeName")]
    pub scheme_name: String,
}

impl SchemeSummary {
    pub fn new(scheme_code: impl Into<String>, scheme_name: impl Into<String>) -> Self {
        Self {
            scheme_code: scheme_code.into(),
            scheme_name: scheme_name.into(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.scheme_code == needle || self.scheme_name.to_lowercase().contains(needle)
    }
}

/// Schemes whose name contains `query` (case-insensitive) or whose code
/// equals it, in list order. A blank query returns the whole list.
pub fn search_schemes(schemes: &[SchemeSummary], query: &str) -> Vec<SchemeSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return schemes.to_vec();
    }
    schemes
        .iter()
        .filter(|s| s.matches(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Vec<SchemeSummary> {
        vec![
            SchemeSummary::new("120503", "Axis Bluechip Fund - Direct Plan - Growth"),
            SchemeSummary::new("118989", "ICICI Prudential Bluechip Fund - Growth"),
            SchemeSummary::new("120716", "SBI Large Cap Fund - Regular Plan - Growth"),
        ]
    }

    #[test]
    fn test_name_match_ignores_case() {
        let hits = search_schemes(&list(), "BLUECHIP");
        let codes: Vec<_> = hits.iter().map(|s| s.scheme_code.as_str()).collect();
        assert_eq!(codes, vec!["120503", "118989"]);
    }

    #[test]
    fn test_exact_code_match() {
        let hits = search_schemes(&list(), " 120716 ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].scheme_name, "SBI Large Cap Fund - Regular Plan - Growth");
    }

    #[test]
    fn test_blank_query_returns_everything() {
        assert_eq!(search_schemes(&list(), "  ").len(), 3);
        assert!(search_schemes(&list(), "gilt").is_empty());
    }

    #[test]
    fn test_upstream_list_shape() {
        let json = r#"[
            {"schemeCode": 100027, "schemeName": "Grindlays Super Saver Income Fund"},
            {"schemeCode": "100028", "schemeName": "Grindlays Super Saver Half Yearly"}
        ]"#;
        let parsed: Vec<SchemeSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].scheme_code, "100027");
        assert_eq!(parsed[1].scheme_code, "100028");
    }
}
