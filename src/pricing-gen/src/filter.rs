//! The one transformation this tool is allowed to make.
//!
//! Only the `Reserved` and `savingsPlan` subtrees of `terms` are removed.
//! Products and their attributes pass through untouched: stripping product
//! attributes once silently zeroed pricing for most instance types in a
//! shipped release, so any further filtering here is a bug by definition.

use serde_json::Value;

pub fn retain_on_demand_terms(document: &mut Value) {
    if let Some(terms) = document.get_mut("terms").and_then(Value::as_object_mut) {
        terms.retain(|term_kind, _| term_kind == "OnDemand");
    }
}

pub fn product_count(document: &Value) -> usize {
    document
        .get("products")
        .and_then(Value::as_object)
        .map(|products| products.len())
        .unwrap_or(0)
}
