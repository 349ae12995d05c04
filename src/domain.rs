use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DirectoryError;

/// Filterable dimension of the directory. The closed set mirrors the facet
/// panels of the browser; anything else is rejected at the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetAttribute {
    MaterialTypes,
    Quality,
    Countries,
    DiseaseTypes,
}

impl FacetAttribute {
    /// Backend column path queried when filtering collections on this facet.
    pub fn column_name(&self) -> &'static str {
        match self {
            FacetAttribute::MaterialTypes => "materials.id",
            FacetAttribute::Quality => "standard.id",
            FacetAttribute::Countries => "country.id",
            FacetAttribute::DiseaseTypes => "diagnosis_available.id",
        }
    }
}

impl fmt::Display for FacetAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetAttribute::MaterialTypes => write!(f, "material_types"),
            FacetAttribute::Quality => write!(f, "quality"),
            FacetAttribute::Countries => write!(f, "countries"),
            FacetAttribute::DiseaseTypes => write!(f, "disease_types"),
        }
    }
}

impl FromStr for FacetAttribute {
    type Err = DirectoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "material_types" => Ok(FacetAttribute::MaterialTypes),
            "quality" => Ok(FacetAttribute::Quality),
            "countries" => Ok(FacetAttribute::Countries),
            "disease_types" => Ok(FacetAttribute::DiseaseTypes),
            other => Err(DirectoryError::UnknownFacet(other.to_string())),
        }
    }
}

/// One facet with the option identifiers currently selected for it.
#[derive(Debug, Clone)]
pub struct FacetFilter {
    pub attribute: FacetAttribute,
    pub options: Vec<String>,
}

/// Distinct biobank identifiers from a list of collection records.
///
/// Each record is expected to carry a nested `biobank.id`; records without
/// one are skipped. Numeric identifiers are rendered in decimal. First-seen
/// order is preserved so follow-up queries are deterministic, but callers
/// must not rely on ordering.
pub fn unique_biobank_ids(collections: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for record in collections {
        let id = match record.get("biobank").and_then(|v| v.get("id")) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Number(value)) => value.to_string(),
            _ => continue,
        };
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn facet_column_mapping() {
        assert_eq!(FacetAttribute::MaterialTypes.column_name(), "materials.id");
        assert_eq!(FacetAttribute::Quality.column_name(), "standard.id");
        assert_eq!(FacetAttribute::Countries.column_name(), "country.id");
        assert_eq!(
            FacetAttribute::DiseaseTypes.column_name(),
            "diagnosis_available.id"
        );
    }

    #[test]
    fn parse_facet_valid() {
        let facet: FacetAttribute = "material_types".parse().unwrap();
        assert_eq!(facet, FacetAttribute::MaterialTypes);
        assert_eq!(facet.to_string(), "material_types");
    }

    #[test]
    fn parse_facet_invalid() {
        let err = "collections".parse::<FacetAttribute>().unwrap_err();
        assert_matches!(err, DirectoryError::UnknownFacet(_));
    }

    #[test]
    fn unique_ids_deduplicates() {
        let records = vec![
            json!({"id": "c1", "biobank": {"id": "bb-1"}}),
            json!({"id": "c2", "biobank": {"id": "bb-1"}}),
            json!({"id": "c3", "biobank": {"id": "bb-2"}}),
        ];
        assert_eq!(unique_biobank_ids(&records), vec!["bb-1", "bb-2"]);
    }

    #[test]
    fn unique_ids_accepts_numeric_identifiers() {
        let records = vec![
            json!({"biobank": {"id": 1}}),
            json!({"biobank": {"id": 1}}),
            json!({"biobank": {"id": 2}}),
        ];
        assert_eq!(unique_biobank_ids(&records), vec!["1", "2"]);
    }

    #[test]
    fn unique_ids_skips_malformed_records() {
        let records = vec![
            json!({"id": "c1"}),
            json!({"biobank": {"name": "no id"}}),
            json!({"biobank": {"id": "bb-3"}}),
        ];
        assert_eq!(unique_biobank_ids(&records), vec!["bb-3"]);
    }

    #[test]
    fn unique_ids_empty_input() {
        assert!(unique_biobank_ids(&[]).is_empty());
    }
}
