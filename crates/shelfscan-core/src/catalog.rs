//! Domain values that flow through a scrape run.
//!
//! Everything here is created once and never mutated: category ids come out
//! of the category tree (or config), page descriptors out of the planner, and
//! output rows out of the projector.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a leaf category in the retailer's taxonomy.
///
/// The upstream API uses numeric ids, but nothing downstream depends on that,
/// so string ids are accepted as well. Displays as the raw value, which is
/// what goes into the `category_id` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryId::Numeric(id) => write!(f, "{id}"),
            CategoryId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        CategoryId::Numeric(id)
    }
}

impl From<&str> for CategoryId {
    /// Input that is exactly the canonical form of an integer becomes
    /// [`CategoryId::Numeric`] so that ids from config compare equal to ids
    /// parsed out of the category tree. Anything else (`"007"`, `"+5"`) stays
    /// text and is sent upstream verbatim.
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(id) if id.to_string() == trimmed => CategoryId::Numeric(id),
            _ => CategoryId::Text(trimmed.to_owned()),
        }
    }
}

/// One bounded request into a category's item listing: `[offset, offset + limit)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub category_id: CategoryId,
    pub offset: u64,
    /// Always greater than zero.
    pub limit: u64,
}

impl PageDescriptor {
    /// Exclusive end of the item range covered by this page.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.offset + self.limit
    }
}

impl fmt::Display for PageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "category {} [{}..{})",
            self.category_id,
            self.offset,
            self.end()
        )
    }
}

/// One exported row: a single offer of a single item, stamped with the town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub town: String,
    pub offer_code: String,
    pub item_name: String,
    pub retail_price: Decimal,
    pub discount_price: Option<Decimal>,
    pub is_available: bool,
}
