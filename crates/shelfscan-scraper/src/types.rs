//! Response types for the retailer's catalog API.
//!
//! ## Category tree (`GET categories_url`)
//!
//! ```json
//! {"categories": [{"id": 10, "subcategories": [{"id": 11}, {"id": 12, "subcategories": []}]}]}
//! ```
//!
//! `subcategories` is absent on most leaves but some leaves carry an empty
//! array; both mean "leaf".
//!
//! ## Items page (`GET items_url?limit=&offset=&sort_type=popular&category_id=`)
//!
//! ```json
//! {"metadata": {"count": 450},
//!  "products": [{"name": "Dry food 2kg",
//!                "offers": [{"code": "100231", "retail_price": 1299,
//!                            "discount_price": 1099, "is_available": true}]}]}
//! ```
//!
//! `code` has been observed both as a string and as a bare number.
//! Prices are decimals, sent as JSON numbers; `discount_price` is `null`
//! when the offer is not discounted.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use shelfscan_core::CategoryId;

/// Top-level response of the category tree endpoint.
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
}

/// One node of the category tree.
#[derive(Debug, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    #[serde(default)]
    pub subcategories: Option<Vec<CategoryNode>>,
}

/// Only the part of the probe response the planner needs.
#[derive(Debug, Deserialize)]
pub struct ProbeResponse {
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub count: u64,
}

/// One page of items.
#[derive(Debug, Deserialize)]
pub struct ItemsPage {
    pub products: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct Item {
    pub name: String,
    pub offers: Vec<Offer>,
}

/// A purchasable variant of an [`Item`].
#[derive(Debug, Deserialize)]
pub struct Offer {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    pub retail_price: Decimal,
    pub discount_price: Option<Decimal>,
    pub is_available: bool,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offer_code_accepts_string_and_number() {
        let page: ItemsPage = serde_json::from_value(json!({
            "products": [{"name": "Ball", "offers": [
                {"code": "A-1", "retail_price": 100, "discount_price": null, "is_available": true},
                {"code": 1002, "retail_price": 99.5, "discount_price": 80, "is_available": false}
            ]}]
        }))
        .unwrap();
        let offers = &page.products[0].offers;
        assert_eq!(offers[0].code, "A-1");
        assert_eq!(offers[1].code, "1002");
        assert_eq!(offers[1].retail_price, Decimal::new(995, 1));
        assert_eq!(offers[1].discount_price, Some(Decimal::from(80)));
        assert!(offers[0].discount_price.is_none());
    }

    #[test]
    fn missing_discount_price_is_none() {
        let offer: Offer = serde_json::from_value(json!({
            "code": "X", "retail_price": "10.50", "is_available": true
        }))
        .unwrap();
        assert_eq!(offer.retail_price, Decimal::new(1050, 2));
        assert!(offer.discount_price.is_none());
    }

    #[test]
    fn offer_without_availability_is_rejected() {
        let result = serde_json::from_value::<Offer>(json!({
            "code": "X", "retail_price": 10, "discount_price": null
        }));
        assert!(result.is_err());
    }

    #[test]
    fn probe_requires_metadata_count() {
        assert!(serde_json::from_value::<ProbeResponse>(json!({"products": []})).is_err());
        let probe: ProbeResponse =
            serde_json::from_value(json!({"metadata": {"count": 3}, "products": []})).unwrap();
        assert_eq!(probe.metadata.count, 3);
    }

    #[test]
    fn category_tree_parses_nested_and_missing_subcategories() {
        let tree: CategoriesResponse = serde_json::from_value(json!({
            "categories": [{"id": 1, "subcategories": [{"id": 2}, {"id": "x", "subcategories": null}]}]
        }))
        .unwrap();
        let children = tree.categories[0].subcategories.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].id, CategoryId::Text("x".to_owned()));
        assert!(children[0].subcategories.is_none());
    }
}
