//! Searchable content model.
//!
//! Products and articles are projections of the CMS records, trimmed down to
//! the fields the ranking engine matches against plus what a result row needs
//! to render and link.

use serde::{Deserialize, Serialize};

/// A short technical attribute of a product (CPU type, memory, operating system).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecField {
    pub label: String,
    pub value: String,
}

impl SpecField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Product record as seen by search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableProduct {
    pub id: String,
    pub name: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub feature_text: Option<String>,
    pub application_text: Option<String>,
    pub category_name: Option<String>,
    /// Ordered; each entry is matched on its own.
    #[serde(default)]
    pub spec_fields: Vec<SpecField>,
    pub link_slug: String,
    pub thumbnail_url: Option<String>,
}

impl SearchableProduct {
    pub fn new(id: impl Into<String>, name: impl Into<String>, link_slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            link_slug: link_slug.into(),
            ..Self::default()
        }
    }

    /// Site path of the product detail page.
    pub fn target_url(&self) -> String {
        format!("/products/{}", self.link_slug)
    }
}

/// News article record as seen by search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableArticle {
    pub id: String,
    pub title: String,
    /// Raw body, may contain HTML or markdown.
    pub body_text: String,
    pub thumbnail_url: Option<String>,
}

impl SearchableArticle {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body_text: body_text.into(),
            thumbnail_url: None,
        }
    }

    /// Site path of the article page.
    pub fn target_url(&self) -> String {
        format!("/news/{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Product,
    Article,
}

impl ResultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::Product => "product",
            ResultKind::Article => "article",
        }
    }
}

/// One row of search output. Never persisted; rebuilt for every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: ResultKind,
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub score: u32,
}
