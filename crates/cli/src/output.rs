//! Terminal rendering of search results and download listings.

use console::style;
use serde::Serialize;
use yx_common::{ResultKind, SearchResult, SearchableProduct};
use yx_core::LoadState;
use yx_core::SearchView;
use yx_core::content::catalog::ProductCategory;
use yx_core::content::downloads::DownloadItem;

#[derive(Debug, Serialize)]
struct SearchJson<'a> {
    query: &'a str,
    state: &'static str,
    count: usize,
    results: &'a [SearchResult],
}

pub fn search_json(query: &str, state: LoadState, results: &[SearchResult]) -> Result<String, String> {
    serde_json::to_string_pretty(&SearchJson {
        query,
        state: state.as_str(),
        count: results.len(),
        results,
    })
    .map_err(|err| format!("Failed to serialize results: {err}"))
}

fn kind_label(kind: ResultKind) -> String {
    match kind {
        ResultKind::Product => style("product").cyan().to_string(),
        ResultKind::Article => style("news").magenta().to_string(),
    }
}

/// Numbered, human-readable result list.
pub fn format_results(results: &[SearchResult]) -> String {
    let mut out = String::new();
    for (index, result) in results.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {} {} {}\n    {}\n    {}\n",
            index + 1,
            kind_label(result.kind),
            style(&result.title).bold(),
            style(format!("({})", result.score)).dim(),
            result.description,
            style(&result.target_url).underlined(),
        ));
    }
    out
}

pub fn format_view(view: &SearchView) -> String {
    match view {
        SearchView::Idle => style("Type to search products and news.").dim().to_string(),
        SearchView::Loading => style("Searching...").dim().to_string(),
        SearchView::NoResults => style("No results found.").yellow().to_string(),
        SearchView::Results(results) => format_results(results),
    }
}

/// Product detail: name, category, description and spec fields.
pub fn format_product(product: &SearchableProduct) -> String {
    let mut out = style(&product.name).bold().to_string();
    if let Some(category) = &product.category_name {
        out.push_str(&format!(" {}", style(format!("[{category}]")).cyan()));
    }
    out.push('\n');
    if let Some(description) = product
        .short_description
        .as_deref()
        .filter(|text| !text.is_empty())
    {
        out.push_str(&format!("    {description}\n"));
    }
    for spec in &product.spec_fields {
        out.push_str(&format!("    {}: {}\n", style(&spec.label).dim(), spec.value));
    }
    out.push_str(&format!("    {}\n", style(product.target_url()).underlined()));
    out
}

pub fn format_categories(categories: &[ProductCategory]) -> String {
    let mut out = String::new();
    for category in categories {
        out.push_str(&style(&category.name).bold().to_string());
        if let Some(level) = category.level {
            out.push_str(&format!(" {}", style(format!("(level {level})")).dim()));
        }
        out.push_str(&format!("\n    {}\n", style(category.target_url()).underlined()));
    }
    out
}

pub fn format_downloads(items: &[DownloadItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&style(&item.title).bold().to_string());
        if let Some(version) = &item.version {
            out.push_str(&format!(" {}", style(version).dim()));
        }
        out.push('\n');
        match &item.file {
            Some(file) => out.push_str(&format!(
                "    [{}] {} {}\n",
                file.kind,
                file.size,
                style(&file.url).underlined()
            )),
            None => out.push_str(&format!("    {}\n", style("no file attached").dim())),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn result() -> SearchResult {
        SearchResult {
            kind: ResultKind::Product,
            id: "p1".to_string(),
            title: "YX-IPC-3000".to_string(),
            description: "Embedded controller".to_string(),
            target_url: "/products/yx-ipc-3000".to_string(),
            thumbnail_url: None,
            score: 15,
        }
    }

    #[test]
    fn test_format_results_lists_target() {
        console::set_colors_enabled(false);
        let text = format_results(&[result()]);
        assert!(text.starts_with(" 1. product YX-IPC-3000 (15)"));
        assert!(text.contains("/products/yx-ipc-3000"));
    }

    #[test]
    fn test_search_json_shape() {
        let json = search_json("ipc", LoadState::Partial, &[result()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"], "partial");
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0]["kind"], "product");
    }

    #[test]
    fn test_format_product_lists_specs() {
        console::set_colors_enabled(false);
        let product = SearchableProduct {
            category_name: Some("Box PC".to_string()),
            spec_fields: vec![yx_common::SpecField::new("cpu", "Intel Core i5")],
            ..SearchableProduct::new("p1", "YX-IPC-3000", "yx-ipc-3000")
        };
        let text = format_product(&product);
        assert!(text.starts_with("YX-IPC-3000 [Box PC]\n"));
        assert!(text.contains("    cpu: Intel Core i5\n"));
        assert!(text.ends_with("    /products/yx-ipc-3000\n"));
    }

    #[test]
    fn test_format_categories() {
        console::set_colors_enabled(false);
        let text = format_categories(&[ProductCategory {
            id: "c-box".to_string(),
            name: "Box PC".to_string(),
            slug: None,
            level: Some(1),
        }]);
        assert_eq!(text, "Box PC (level 1)\n    /products?category=c-box\n");
    }

    #[test]
    fn test_format_view_states() {
        console::set_colors_enabled(false);
        assert_eq!(format_view(&SearchView::NoResults), "No results found.");
        assert!(format_view(&SearchView::Results(vec![result()])).contains("YX-IPC-3000"));
    }
}
