//! Resolution of CMS upload URLs.

use regex::Regex;
use std::sync::LazyLock;

/// Origin the CMS writes into rich-text bodies when content is authored locally.
pub const LOCAL_UPLOAD_ORIGIN: &str = "http://localhost:1337";

/// Markdown image, `<img src>`, or a bare image URL, first match wins.
const BODY_IMAGE_PATTERN: &str = r#"(?i)!\[[^\]]*\]\((http[^)]+)\)|<img[^>]+src=["'](http[^"']+)["']|https?://\S+\.(?:jpg|jpeg|png|gif|webp)"#;

static BODY_IMAGE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(BODY_IMAGE_PATTERN).ok());

/// Absolute URL for an upload path returned by the CMS.
///
/// Paths are relative to the CMS origin (`/uploads/x.png`); absolute URLs, as
/// produced by external upload providers, are returned unchanged.
pub fn media_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// First image URL referenced in an article body.
///
/// URLs pointing at [`LOCAL_UPLOAD_ORIGIN`] are rebased onto `base_url`.
pub fn first_body_image(body: &str, base_url: &str) -> Option<String> {
    let captures = BODY_IMAGE.as_ref()?.captures(body)?;
    let url = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(0))?
        .as_str();
    Some(url.replacen(LOCAL_UPLOAD_ORIGIN, base_url.trim_end_matches('/'), 1))
}
