//! Field weight tables.
//!
//! Each table is an ordered list of `(field, weight, accessor)` entries. An
//! item's relevance is the sum of the weights of every entry whose text
//! contains the query; a multi-valued entry scores once per matching value.
//!
//! | Product field       | Weight |
//! |---------------------|--------|
//! | name                | 10     |
//! | category            | 5      |
//! | short description   | 5      |
//! | full description    | 3      |
//! | features            | 3      |
//! | applications        | 3      |
//! | each spec field     | 2      |
//!
//! | Article field | Weight |
//! |---------------|--------|
//! | title         | 10     |
//! | body          | 5      |

use std::fmt;
use yx_common::{SearchableArticle, SearchableProduct, SpecField};

/// Text an entry contributes for one item.
#[derive(Debug, Clone, Copy)]
pub enum FieldValues<'a> {
    /// A single, possibly absent, field.
    One(Option<&'a str>),
    /// Independently matched values.
    Each(&'a [SpecField]),
}

pub struct WeightedField<T> {
    pub field: &'static str,
    pub weight: u32,
    pub values: fn(&T) -> FieldValues<'_>,
}

impl<T> fmt::Debug for WeightedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedField")
            .field("field", &self.field)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

impl<T> WeightedField<T> {
    /// Score contributed by this entry. `needle` must already be lower-cased.
    pub fn score(&self, item: &T, needle: &str) -> u32 {
        match (self.values)(item) {
            FieldValues::One(Some(text)) if contains(text, needle) => self.weight,
            FieldValues::One(_) => 0,
            FieldValues::Each(specs) => {
                let hits = specs
                    .iter()
                    .filter(|spec| contains(&spec.value, needle))
                    .count() as u32;
                hits * self.weight
            }
        }
    }
}

/// Sum of all entry scores for `item`.
pub fn score<T>(item: &T, fields: &[WeightedField<T>], needle: &str) -> u32 {
    fields.iter().map(|entry| entry.score(item, needle)).sum()
}

fn contains(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

pub static PRODUCT_FIELDS: &[WeightedField<SearchableProduct>] = &[
    WeightedField {
        field: "name",
        weight: 10,
        values: product_name,
    },
    WeightedField {
        field: "category",
        weight: 5,
        values: product_category,
    },
    WeightedField {
        field: "short_description",
        weight: 5,
        values: product_short_description,
    },
    WeightedField {
        field: "full_description",
        weight: 3,
        values: product_full_description,
    },
    WeightedField {
        field: "features",
        weight: 3,
        values: product_features,
    },
    WeightedField {
        field: "applications",
        weight: 3,
        values: product_applications,
    },
    WeightedField {
        field: "spec",
        weight: 2,
        values: product_specs,
    },
];

pub static ARTICLE_FIELDS: &[WeightedField<SearchableArticle>] = &[
    WeightedField {
        field: "title",
        weight: 10,
        values: article_title,
    },
    WeightedField {
        field: "body",
        weight: 5,
        values: article_body,
    },
];

fn product_name(p: &SearchableProduct) -> FieldValues<'_> {
    FieldValues::One(Some(&p.name))
}

fn product_category(p: &SearchableProduct) -> FieldValues<'_> {
    FieldValues::One(p.category_name.as_deref())
}

fn product_short_description(p: &SearchableProduct) -> FieldValues<'_> {
    FieldValues::One(p.short_description.as_deref())
}

fn product_full_description(p: &SearchableProduct) -> FieldValues<'_> {
    FieldValues::One(p.full_description.as_deref())
}

fn product_features(p: &SearchableProduct) -> FieldValues<'_> {
    FieldValues::One(p.feature_text.as_deref())
}

fn product_applications(p: &SearchableProduct) -> FieldValues<'_> {
    FieldValues::One(p.application_text.as_deref())
}

fn product_specs(p: &SearchableProduct) -> FieldValues<'_> {
    FieldValues::Each(&p.spec_fields)
}

fn article_title(a: &SearchableArticle) -> FieldValues<'_> {
    FieldValues::One(Some(&a.title))
}

fn article_body(a: &SearchableArticle) -> FieldValues<'_> {
    FieldValues::One(Some(&a.body_text))
}
