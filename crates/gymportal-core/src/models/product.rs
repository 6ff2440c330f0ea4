use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A shop item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Body of `POST /products` and `PATCH /products/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Shopping cart kept client-side only; there is no checkout endpoint.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: BTreeMap<String, u32>,
}

impl Cart {
    pub fn add(&mut self, product_id: &str) {
        *self.lines.entry(product_id.to_string()).or_insert(0) += 1;
    }

    /// Remove one unit; the line disappears when it reaches zero.
    pub fn remove(&mut self, product_id: &str) {
        if let Some(qty) = self.lines.get_mut(product_id) {
            *qty -= 1;
            if *qty == 0 {
                self.lines.remove(product_id);
            }
        }
    }

    pub fn quantity(&self, product_id: &str) -> u32 {
        self.lines.get(product_id).copied().unwrap_or(0)
    }

    pub fn item_count(&self) -> u32 {
        self.lines.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total price of the cart; products missing from `catalog` are ignored.
    pub fn total(&self, catalog: &[Product]) -> f64 {
        self.lines
            .iter()
            .filter_map(|(id, qty)| {
                catalog
                    .iter()
                    .find(|p| &p.id == id)
                    .map(|p| p.price * f64::from(*qty))
            })
            .sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
