//! HTTP client for the headless CMS.
//!
//! Collections come back wrapped as `{ "data": [...], "meta": { "pagination": ... } }`
//! and entries are created by posting `{ "data": {...} }`. Records are
//! projected into the search model here; missing or oddly typed optional
//! fields are treated as absent rather than failing the whole collection.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use url::Url;
use yx_common::{SearchableArticle, SearchableProduct, SpecField};

use super::ContentRepository;
use super::catalog::ProductCategory;
use super::downloads::{DownloadFile, DownloadItem, FileKind, format_file_size};
use super::forms::{CustomRequest, SampleRequest};
use super::media::{first_body_image, media_url};
use crate::config::CmsConfig;
use crate::error::ContentError;

const PRODUCTS_PATH: &str = "/api/product-infos?populate=product_category&populate=image";
const CATEGORIES_PATH: &str = "/api/product-categories";
const DOWNLOADS_PATH: &str = "/api/download-center-items?populate=file";
const SAMPLE_REQUESTS_PATH: &str = "/api/sample-applications";
const CUSTOM_REQUESTS_PATH: &str = "/api/custom-requestes";

fn product_path(slug: &str) -> String {
    let slug: String = url::form_urlencoded::byte_serialize(slug.as_bytes()).collect();
    format!("/api/product-infos?filters[slug][$eq]={slug}&populate=*")
}

fn articles_path(limit: usize) -> String {
    format!("/api/news-articles?pagination[limit]={limit}&sort=publishedAt:desc&populate=fengmiantu")
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    data: Vec<T>,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Pagination {
    total: Option<u64>,
}

#[derive(Debug, Serialize)]
struct Entry<'a, T> {
    data: &'a T,
}

#[derive(Debug, Deserialize)]
struct MediaRecord {
    url: String,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductCategoryRecord {
    #[serde(rename = "documentId")]
    document_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    slug: Option<String>,
    #[serde(default)]
    level: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(rename = "documentId")]
    document_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    short_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    full_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    features: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    applications: Option<String>,
    #[serde(default, rename = "cpuLeiXing", deserialize_with = "lenient_text")]
    cpu: Option<String>,
    #[serde(default, rename = "neiCun", deserialize_with = "lenient_text")]
    memory: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    operating_system: Option<String>,
    #[serde(default)]
    product_category: Option<CategoryRecord>,
    #[serde(default)]
    image: Option<Vec<MediaRecord>>,
}

#[derive(Debug, Deserialize)]
struct ArticleRecord {
    #[serde(rename = "documentId")]
    document_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    content: Option<String>,
    /// Cover image.
    #[serde(default)]
    fengmiantu: Option<MediaRecord>,
}

#[derive(Debug, Deserialize)]
struct FileRecord {
    url: String,
    #[serde(default)]
    size: f64,
    #[serde(default)]
    mime: String,
}

#[derive(Debug, Deserialize)]
struct DownloadRecord {
    #[serde(rename = "documentId")]
    document_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    version: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    published_date: Option<String>,
    #[serde(default)]
    file: Option<FileRecord>,
}

/// Keep string values; anything else (null, rich-text blocks, numbers) is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    scan_body_images: bool,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self, ContentError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|err| {
                warn!(error = %err, "Failed to build CMS HTTP client.");
                ContentError::Client(err)
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            scan_body_images: config.scan_body_images,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path_and_query: &str) -> Result<Url, ContentError> {
        let raw = format!("{}{path_and_query}", self.base_url);
        Url::parse(&raw).map_err(|source| ContentError::Url { url: raw, source })
    }

    async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ContentError> {
        let url = self.endpoint(path_and_query)?;
        debug!(%method, %url, "Sending CMS request.");

        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(|source| {
            warn!(error = %source, %url, "CMS request failed.");
            ContentError::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, %url, "CMS responded with an error.");
            return Err(ContentError::Status {
                url: url.to_string(),
                status,
            });
        }
        debug!(%status, %url, "CMS request succeeded.");
        Ok(response)
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<Vec<T>, ContentError> {
        let response = self.send(Method::GET, path_and_query, None).await?;
        let url = response.url().to_string();
        let collection: Collection<T> = response.json().await.map_err(|source| {
            warn!(error = %source, %url, "Failed to decode CMS collection.");
            ContentError::Decode { url, source }
        })?;
        if let Some(pagination) = collection.meta.pagination {
            debug!(
                returned = collection.data.len(),
                total = pagination.total,
                "Decoded CMS collection."
            );
        }
        Ok(collection.data)
    }

    async fn create_entry<T: Serialize + Sync>(
        &self,
        path: &str,
        data: &T,
    ) -> Result<StatusCode, ContentError> {
        let url = self.endpoint(path)?.to_string();
        let body = serde_json::to_value(Entry { data }).map_err(|source| {
            ContentError::Encode {
                url: url.clone(),
                source,
            }
        })?;
        let response = self.send(Method::POST, path, Some(body)).await?;
        Ok(response.status())
    }

    pub async fn fetch_products(&self) -> Result<Vec<SearchableProduct>, ContentError> {
        let records: Vec<ProductRecord> = self.get_collection(PRODUCTS_PATH).await?;
        Ok(records
            .into_iter()
            .map(|record| self.project_product(record))
            .collect())
    }

    /// The product whose slug is `slug`, if the CMS has one.
    pub async fn fetch_product(&self, slug: &str) -> Result<Option<SearchableProduct>, ContentError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Ok(None);
        }
        let records: Vec<ProductRecord> = self.get_collection(&product_path(slug)).await?;
        if records.len() > 1 {
            debug!(slug, matches = records.len(), "Several products share a slug, using the first.");
        }
        Ok(records
            .into_iter()
            .next()
            .map(|record| self.project_product(record)))
    }

    pub async fn fetch_categories(&self) -> Result<Vec<ProductCategory>, ContentError> {
        let records: Vec<ProductCategoryRecord> = self.get_collection(CATEGORIES_PATH).await?;
        Ok(records
            .into_iter()
            .map(|record| ProductCategory {
                id: record.document_id,
                name: record.name.unwrap_or_default(),
                slug: record.slug,
                level: record.level,
            })
            .collect())
    }

    pub async fn fetch_articles(&self, limit: usize) -> Result<Vec<SearchableArticle>, ContentError> {
        let records: Vec<ArticleRecord> = self.get_collection(&articles_path(limit)).await?;
        Ok(records
            .into_iter()
            .map(|record| self.project_article(record))
            .collect())
    }

    pub async fn fetch_downloads(&self) -> Result<Vec<DownloadItem>, ContentError> {
        let records: Vec<DownloadRecord> = self.get_collection(DOWNLOADS_PATH).await?;
        Ok(records
            .into_iter()
            .map(|record| self.project_download(record))
            .collect())
    }

    /// Validate, normalize and submit a sample request.
    pub async fn submit_sample_request(&self, request: &SampleRequest) -> Result<(), ContentError> {
        let normalized = request.normalized()?;
        let status = self.create_entry(SAMPLE_REQUESTS_PATH, &normalized).await?;
        debug!(%status, "Sample request submitted.");
        Ok(())
    }

    /// Validate, normalize and submit a custom-service inquiry.
    pub async fn submit_custom_request(&self, request: &CustomRequest) -> Result<(), ContentError> {
        let normalized = request.normalized()?;
        let status = self.create_entry(CUSTOM_REQUESTS_PATH, &normalized).await?;
        debug!(%status, "Custom request submitted.");
        Ok(())
    }

    fn project_product(&self, record: ProductRecord) -> SearchableProduct {
        let spec_fields = [
            ("cpu", record.cpu),
            ("memory", record.memory),
            ("operating_system", record.operating_system),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| SpecField::new(label, value)))
        .collect();

        let thumbnail_url = record
            .image
            .as_deref()
            .and_then(<[MediaRecord]>::first)
            .map(|image| media_url(&self.base_url, &image.url));

        SearchableProduct {
            link_slug: record
                .slug
                .filter(|slug| !slug.is_empty())
                .unwrap_or_else(|| record.document_id.clone()),
            id: record.document_id,
            name: record.product_name.unwrap_or_default(),
            short_description: record.short_description,
            full_description: record.full_description,
            feature_text: record.features,
            application_text: record.applications,
            category_name: record.product_category.and_then(|category| category.name),
            spec_fields,
            thumbnail_url,
        }
    }

    fn project_article(&self, record: ArticleRecord) -> SearchableArticle {
        let body_text = record.content.unwrap_or_default();
        let thumbnail_url = match record.fengmiantu {
            Some(cover) => Some(media_url(&self.base_url, &cover.url)),
            None if self.scan_body_images => first_body_image(&body_text, &self.base_url),
            None => None,
        };
        SearchableArticle {
            id: record.document_id,
            title: record.title.unwrap_or_default(),
            body_text,
            thumbnail_url,
        }
    }

    fn project_download(&self, record: DownloadRecord) -> DownloadItem {
        DownloadItem {
            id: record.document_id,
            title: record.title.unwrap_or_default(),
            description: record.description,
            category: record.category,
            version: record.version,
            published_date: record.published_date,
            file: record.file.map(|file| DownloadFile {
                url: media_url(&self.base_url, &file.url),
                size: format_file_size(file.size),
                kind: FileKind::from_mime(&file.mime),
            }),
        }
    }
}

impl ContentRepository for CmsClient {
    async fn fetch_all_products(&self) -> Result<Vec<SearchableProduct>, ContentError> {
        self.fetch_products().await
    }

    async fn fetch_all_articles(&self, limit: usize) -> Result<Vec<SearchableArticle>, ContentError> {
        self.fetch_articles(limit).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn client(scan_body_images: bool) -> CmsClient {
        CmsClient::new(&CmsConfig {
            base_url: "http://cms.test:1337/".to_string(),
            timeout_secs: 5,
            scan_body_images,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client(true);
        assert_eq!(client.base_url(), "http://cms.test:1337");
        assert_eq!(
            client.endpoint(PRODUCTS_PATH).unwrap().path(),
            "/api/product-infos"
        );
    }

    #[test]
    fn test_product_path_encodes_slug() {
        assert_eq!(
            product_path("yx-ipc-3000"),
            "/api/product-infos?filters[slug][$eq]=yx-ipc-3000&populate=*"
        );
        assert_eq!(
            product_path("a&b c"),
            "/api/product-infos?filters[slug][$eq]=a%26b+c&populate=*"
        );
    }

    #[test]
    fn test_articles_path() {
        assert_eq!(
            articles_path(100),
            "/api/news-articles?pagination[limit]=100&sort=publishedAt:desc&populate=fengmiantu"
        );
    }

    #[test]
    fn test_project_product() {
        let record: ProductRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "documentId": "abc123",
            "slug": "yx-ipc-3000",
            "product_name": "YX-IPC-3000",
            "short_description": "Embedded controller",
            "features": [{"type": "paragraph"}],
            "cpuLeiXing": "Intel Core i5",
            "operating_system": "Ubuntu 22.04",
            "product_category": {"id": 1, "name": "Box PC"},
            "image": [{"id": 3, "url": "/uploads/ipc.png"}, {"id": 4, "url": "/uploads/other.png"}]
        }))
        .unwrap();

        let product = client(true).project_product(record);
        assert_eq!(product.id, "abc123");
        assert_eq!(product.name, "YX-IPC-3000");
        assert_eq!(product.link_slug, "yx-ipc-3000");
        assert_eq!(product.feature_text, None);
        assert_eq!(product.category_name.as_deref(), Some("Box PC"));
        assert_eq!(
            product.spec_fields,
            vec![
                SpecField::new("cpu", "Intel Core i5"),
                SpecField::new("operating_system", "Ubuntu 22.04"),
            ]
        );
        assert_eq!(
            product.thumbnail_url.as_deref(),
            Some("http://cms.test:1337/uploads/ipc.png")
        );
    }

    #[test]
    fn test_project_product_without_slug_uses_document_id() {
        let record: ProductRecord =
            serde_json::from_value(serde_json::json!({"documentId": "d1", "product_name": "Panel"}))
                .unwrap();
        let product = client(true).project_product(record);
        assert_eq!(product.target_url(), "/products/d1");
        assert!(product.spec_fields.is_empty());
        assert_eq!(product.thumbnail_url, None);
    }

    #[test]
    fn test_project_article_cover_wins() {
        let record: ArticleRecord = serde_json::from_value(serde_json::json!({
            "documentId": "n1",
            "title": "Launch",
            "content": "![x](http://localhost:1337/uploads/body.jpg)",
            "fengmiantu": {"url": "/uploads/cover.jpg"}
        }))
        .unwrap();
        let article = client(true).project_article(record);
        assert_eq!(
            article.thumbnail_url.as_deref(),
            Some("http://cms.test:1337/uploads/cover.jpg")
        );
    }

    #[test]
    fn test_project_article_body_scan_toggle() {
        let json = serde_json::json!({
            "documentId": "n1",
            "title": "Launch",
            "content": "![x](http://localhost:1337/uploads/body.jpg)"
        });
        let record: ArticleRecord = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(
            client(true).project_article(record).thumbnail_url.as_deref(),
            Some("http://cms.test:1337/uploads/body.jpg")
        );

        let record: ArticleRecord = serde_json::from_value(json).unwrap();
        assert_eq!(client(false).project_article(record).thumbnail_url, None);
    }

    #[test]
    fn test_project_download() {
        let record: DownloadRecord = serde_json::from_value(serde_json::json!({
            "documentId": "dl1",
            "title": "IPC-3000 datasheet",
            "version": "v1.2",
            "file": {"url": "/uploads/ds.pdf", "size": 2048, "mime": "application/pdf"}
        }))
        .unwrap();
        let item = client(true).project_download(record);
        let file = item.file.unwrap();
        assert_eq!(file.url, "http://cms.test:1337/uploads/ds.pdf");
        assert_eq!(file.size, "2.0 KB");
        assert_eq!(file.kind, FileKind::Pdf);
        assert_eq!(item.version.as_deref(), Some("v1.2"));
    }
}
