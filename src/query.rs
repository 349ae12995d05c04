//! URI builders for the directory backend's query grammar.
//!
//! The backend speaks an RSQL-flavoured query string: `,` between predicates
//! means OR, `==` is equality, `=q=` is text match, `=in=(…)` is set
//! membership. Values are embedded verbatim; encoding them would change the
//! grammar the backend parses.

use crate::domain::FacetAttribute;

pub const BIOBANK_CATALOG: &str = "/api/v2/eu_bbmri_eric_biobanks";
pub const COLLECTION_CATALOG: &str = "/api/v2/eu_bbmri_eric_collections";
pub const COUNTRY_CATALOG: &str = "/api/v2/eu_bbmri_eric_countries";
pub const MATERIAL_TYPE_CATALOG: &str = "/api/v2/eu_bbmri_eric_material_types";
pub const QUALITY_CATALOG: &str = "/api/v2/eu_bbmri_eric_lab_standards";
pub const DISEASE_TYPE_CATALOG: &str = "/api/v2/eu_bbmri_eric_disease_types";

/// Collection facets expanded alongside each biobank record.
const COLLECTION_ATTRS: &str =
    "collections(materials,standards,diagnosis_available,name,type,order_of_magnitude),*";

/// Result ceiling for bulk biobank/collection lookups.
pub const BULK_RESULT_CAP: usize = 2000;

/// Result ceiling for disease-type suggestions.
pub const DISEASE_RESULT_CAP: usize = 20;

/// Full biobank catalog with expanded collections, no filter.
pub fn biobank_catalog_uri() -> String {
    format!("{BIOBANK_CATALOG}?attrs={COLLECTION_ATTRS}")
}

/// Expanded biobank records restricted to an identifier set.
pub fn biobanks_by_id_uri(ids: &[String]) -> String {
    format!(
        "{BIOBANK_CATALOG}?num={BULK_RESULT_CAP}&attrs={COLLECTION_ATTRS}&q=id=in=({})",
        ids.join(",")
    )
}

/// Collection catalog filtered on one facet column, reduced to the biobank
/// reference attribute. `column==v1,column==v2,…` reads as OR.
pub fn collections_by_facet_uri(attribute: FacetAttribute, options: &[String]) -> String {
    let column = attribute.column_name();
    let predicates = options
        .iter()
        .map(|option| format!("{column}=={option}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("{COLLECTION_CATALOG}?num={BULK_RESULT_CAP}&attrs=biobank&q={predicates}")
}

/// Disease-type suggestions matching a free-text query on label or id.
pub fn disease_types_uri(query: &str) -> String {
    format!("{DISEASE_TYPE_CATALOG}?num={DISEASE_RESULT_CAP}&q=label=q={query},id=q={query}")
}
