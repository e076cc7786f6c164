//! Flattens item pages into export rows.

use serde::Deserialize as _;
use shelfscan_core::OutputRow;

use crate::error::ScraperError;
use crate::types::ItemsPage;

/// Turns one raw items page into one [`OutputRow`] per (item, offer) pair,
/// stamping every row with the configured town.
#[derive(Debug, Clone)]
pub struct RowProjector {
    town: String,
}

impl RowProjector {
    #[must_use]
    pub fn new(town: impl Into<String>) -> Self {
        Self { town: town.into() }
    }

    /// Projects a page. Either every offer on the page becomes a row or the
    /// whole page is rejected; there is no partial result.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MalformedPage`] if the payload is missing
    /// `products` or any item/offer field.
    pub fn project(&self, page: &serde_json::Value) -> Result<Vec<OutputRow>, ScraperError> {
        let parsed = ItemsPage::deserialize(page).map_err(|e| ScraperError::MalformedPage {
            context: "items page".to_owned(),
            source: e,
        })?;

        Ok(parsed
            .products
            .into_iter()
            .flat_map(|item| {
                let item_name = item.name;
                item.offers.into_iter().map(move |offer| OutputRow {
                    town: self.town.clone(),
                    offer_code: offer.code,
                    item_name: item_name.clone(),
                    retail_price: offer.retail_price,
                    discount_price: offer.discount_price,
                    is_available: offer.is_available,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn projector() -> RowProjector {
        RowProjector::new("Москва")
    }

    #[test]
    fn item_with_two_offers_yields_two_rows() {
        let page = json!({"metadata": {"count": 1}, "products": [{
            "name": "Dry food 2kg",
            "offers": [
                {"code": "100231", "retail_price": 1299, "discount_price": 1099, "is_available": true},
                {"code": "100232", "retail_price": 2399, "discount_price": null, "is_available": false}
            ]
        }]});

        let rows = projector().project(&page).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.town == "Москва" && r.item_name == "Dry food 2kg"));
        assert_eq!(rows[0].offer_code, "100231");
        assert_eq!(rows[0].retail_price, Decimal::from(1299));
        assert_eq!(rows[0].discount_price, Some(Decimal::from(1099)));
        assert!(rows[0].is_available);
        assert_eq!(rows[1].offer_code, "100232");
        assert!(rows[1].discount_price.is_none());
        assert!(!rows[1].is_available);
    }

    #[test]
    fn page_with_no_items_yields_no_rows() {
        let rows = projector().project(&json!({"products": []})).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn item_with_no_offers_yields_no_rows() {
        let rows = projector()
            .project(&json!({"products": [{"name": "Leash", "offers": []}]}))
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn rows_follow_item_then_offer_order() {
        let page = json!({"products": [
            {"name": "A", "offers": [
                {"code": 1, "retail_price": 1, "discount_price": null, "is_available": true},
                {"code": 2, "retail_price": 1, "discount_price": null, "is_available": true}
            ]},
            {"name": "B", "offers": [
                {"code": 3, "retail_price": 1, "discount_price": null, "is_available": true}
            ]}
        ]});
        let rows = projector().project(&page).unwrap();
        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.item_name.as_str(), r.offer_code.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "1"), ("A", "2"), ("B", "3")]);
    }

    #[test]
    fn missing_products_is_malformed() {
        let err = projector().project(&json!({"metadata": {"count": 0}})).unwrap_err();
        assert!(
            matches!(err, ScraperError::MalformedPage { .. }),
            "expected MalformedPage, got: {err:?}"
        );
    }

    #[test]
    fn one_bad_offer_rejects_the_whole_page() {
        let page = json!({"products": [
            {"name": "A", "offers": [
                {"code": 1, "retail_price": 1, "discount_price": null, "is_available": true}
            ]},
            {"name": "B", "offers": [{"code": 2, "discount_price": null, "is_available": true}]}
        ]});
        assert!(matches!(
            projector().project(&page),
            Err(ScraperError::MalformedPage { .. })
        ));
    }
}
