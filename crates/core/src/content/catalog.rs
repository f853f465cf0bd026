//! Product catalog structure.

use serde::{Deserialize, Serialize};

/// A product category as listed by the catalog pages. `level` is the depth
/// in the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub level: Option<u32>,
}

impl ProductCategory {
    /// Site path of the product list filtered to this category.
    pub fn target_url(&self) -> String {
        format!("/products?category={}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_filters_by_document_id() {
        let category = ProductCategory {
            id: "k2x9".to_string(),
            name: "Box PC".to_string(),
            slug: Some("box-pc".to_string()),
            level: Some(1),
        };
        assert_eq!(category.target_url(), "/products?category=k2x9");
    }
}
