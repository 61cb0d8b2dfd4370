//! Loading and assembling the served Swagger document.

use axum::body::Bytes;
use domain_products::contract::{self, ContractError};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// Upper bound for a single remote fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Base path under which the product routes are mounted.
pub const API_BASE_PATH: &str = "/api";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: Url, status: StatusCode },

    #[error("invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to merge product contract: {0}")]
    Contract(#[from] ContractError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// True for absolute URLs with a scheme and a non-empty host.
pub fn is_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false)
}

/// Origin of the Swagger document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocSource {
    File(PathBuf),
    Remote(Url),
}

impl DocSource {
    /// Interprets `raw` as a URL when it looks like one, otherwise as a path.
    ///
    /// Relative paths are joined onto `base_dir` when one is given.
    pub fn resolve(raw: &str, base_dir: Option<&Path>) -> Self {
        if is_url(raw) {
            if let Ok(url) = Url::parse(raw) {
                return DocSource::Remote(url);
            }
        }

        let path = Path::new(raw);
        match base_dir {
            Some(base) if path.is_relative() => DocSource::File(base.join(path)),
            _ => DocSource::File(path.to_path_buf()),
        }
    }

    /// Like [`resolve`](Self::resolve), relative to the running executable's directory.
    pub fn resolve_from_exe(raw: &str) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::resolve(raw, exe_dir.as_deref())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DocSource::Remote(_))
    }
}

impl fmt::Display for DocSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocSource::File(path) => write!(f, "{}", path.display()),
            DocSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Parses `raw`, merges the product contract into it and points it at [`API_BASE_PATH`].
///
/// This server answers only under [`API_BASE_PATH`], so a different `basePath`
/// in the loaded document is replaced, which also moves every other path the
/// document declares. The replacement is logged. References the document
/// leaves unresolved are logged, not rejected.
pub fn assemble(raw: &[u8]) -> Result<Bytes, LoadError> {
    let mut document: Value = serde_json::from_slice(raw)?;
    contract::merge_into(&mut document)?;

    if let Some(root) = document.as_object_mut() {
        let previous = root.insert(
            "basePath".to_string(),
            Value::String(API_BASE_PATH.to_string()),
        );
        if let Some(previous) = previous.filter(|p| p.as_str() != Some(API_BASE_PATH)) {
            warn!(
                %previous,
                base_path = API_BASE_PATH,
                "Replaced basePath of the loaded Swagger document"
            );
        }
    }

    let unresolved = contract::unresolved_refs(&document);
    if !unresolved.is_empty() {
        warn!(?unresolved, "Swagger document leaves product references unresolved");
    }

    Ok(Bytes::from(serde_json::to_vec(&document)?))
}

/// Holds the current assembled document and knows how to refresh it.
///
/// Clones share the same document.
#[derive(Clone)]
pub struct SwaggerLoader {
    source: DocSource,
    client: Client,
    document: Arc<RwLock<Bytes>>,
}

impl SwaggerLoader {
    /// Creates a loader and performs the initial load; failure here is fatal to the caller.
    pub async fn new(source: DocSource) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(LoadError::Client)?;

        let loader = Self {
            source,
            client,
            document: Arc::new(RwLock::new(Bytes::new())),
        };
        loader.reload().await?;

        info!(source = %loader.source, "Loaded Swagger document");
        Ok(loader)
    }

    pub fn source(&self) -> &DocSource {
        &self.source
    }

    /// Current assembled document.
    pub async fn document(&self) -> Bytes {
        self.document.read().await.clone()
    }

    /// Re-reads the source. On error the previous document stays in place.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn reload(&self) -> Result<(), LoadError> {
        let raw = self.fetch().await?;
        let assembled = assemble(&raw)?;

        *self.document.write().await = assembled;
        Ok(())
    }

    async fn fetch(&self) -> Result<Bytes, LoadError> {
        match &self.source {
            DocSource::File(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                }),
            DocSource::Remote(url) => {
                let fetch_error = |source| LoadError::Fetch {
                    url: url.clone(),
                    source,
                };

                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(fetch_error)?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: url.clone(),
                        status,
                    });
                }

                response.bytes().await.map_err(fetch_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn external_document() -> Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "Catalog", "version": "1.0"},
            "paths": {"/orders": {"get": {"operationId": "listOrders"}}},
            "definitions": {"product_status": {"type": "string"}},
            "parameters": {
                "product_id_in_path_required": {
                    "name": "product_id", "in": "path", "required": true,
                    "type": "integer", "format": "int64"
                },
                "product_in_body": {
                    "name": "body", "in": "body", "required": true,
                    "schema": {"$ref": "#/definitions/product"}
                }
            },
            "responses": {
                "product": {"description": "A product", "schema": {"$ref": "#/definitions/product"}}
            }
        })
    }

    fn write_temp(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    async fn served(loader: &SwaggerLoader) -> Value {
        serde_json::from_slice(&loader.document().await).unwrap()
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("http://localhost:8080/swagger.json"));
        assert!(is_url("https://docs.example.com/api/swagger.json"));
        assert!(!is_url("./swagger.json"));
        assert!(!is_url("/etc/swagger.json"));
        assert!(!is_url("swagger.json"));
        assert!(!is_url("file:///etc/swagger.json"));
    }

    #[test]
    fn test_resolve_joins_relative_paths_onto_base() {
        let base = Path::new("/opt/products");

        assert_eq!(
            DocSource::resolve("./swagger.json", Some(base)),
            DocSource::File(PathBuf::from("/opt/products/./swagger.json"))
        );
        assert_eq!(
            DocSource::resolve("/etc/swagger.json", Some(base)),
            DocSource::File(PathBuf::from("/etc/swagger.json"))
        );
        assert_eq!(
            DocSource::resolve("swagger.json", None),
            DocSource::File(PathBuf::from("swagger.json"))
        );
    }

    #[test]
    fn test_resolve_keeps_urls_untouched() {
        let source = DocSource::resolve("https://docs.example.com/swagger.json", Some(Path::new("/opt")));

        assert!(source.is_remote());
        assert_eq!(source.to_string(), "https://docs.example.com/swagger.json");
    }

    #[test]
    fn test_assemble_merges_contract_and_sets_base_path() {
        let raw = serde_json::to_vec(&external_document()).unwrap();

        let document: Value = serde_json::from_slice(&assemble(&raw).unwrap()).unwrap();

        assert_eq!(document["basePath"], "/api");
        assert_eq!(document["info"]["title"], "Catalog");
        assert_eq!(document["paths"]["/orders"]["get"]["operationId"], "listOrders");
        assert_eq!(
            document["paths"]["/products/{product_id}"]["get"]["operationId"],
            "getProduct"
        );
        assert_eq!(document["paths"]["/products"]["post"]["operationId"], "addProduct");
        assert_eq!(document["definitions"]["product_status"]["type"], "string");
        assert!(document["definitions"]["product"].is_object());
        assert!(contract::unresolved_refs(&document).is_empty());
    }

    #[test]
    fn test_assemble_replaces_foreign_base_path() {
        let mut external = external_document();
        external["basePath"] = json!("/v1");
        let raw = serde_json::to_vec(&external).unwrap();

        let document: Value = serde_json::from_slice(&assemble(&raw).unwrap()).unwrap();

        assert_eq!(document["basePath"], "/api");
        assert_eq!(document["paths"]["/orders"]["get"]["operationId"], "listOrders");
    }

    #[test]
    fn test_assemble_rejects_invalid_json() {
        let err = assemble(b"{not json").unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson(_)));
    }

    #[test]
    fn test_assemble_rejects_non_object_root() {
        let err = assemble(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, LoadError::Contract(_)));
    }

    #[tokio::test]
    async fn test_loads_local_file() {
        let file = write_temp(&serde_json::to_vec(&external_document()).unwrap());

        let loader = SwaggerLoader::new(DocSource::File(file.path().to_path_buf()))
            .await
            .unwrap();

        let document = served(&loader).await;
        assert_eq!(document["swagger"], "2.0");
        assert_eq!(document["basePath"], "/api");
    }

    #[tokio::test]
    async fn test_initial_load_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("swagger.json");

        let result = SwaggerLoader::new(DocSource::File(missing)).await;

        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[tokio::test]
    async fn test_load_error_keeps_its_source_for_reports() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("swagger.json");

        let Err(err) = SwaggerLoader::new(DocSource::File(missing)).await else {
            panic!("missing file must not load");
        };
        let report = eyre::Report::new(err).wrap_err("Initial load failed");

        let chain: Vec<String> = report.chain().map(ToString::to_string).collect();
        assert_eq!(chain[0], "Initial load failed");
        assert!(chain[1].starts_with("failed to read"));
        assert!(chain.len() >= 3, "io error is lost: {:?}", chain);
    }

    #[tokio::test]
    async fn test_initial_load_fails_for_invalid_json() {
        let file = write_temp(b"<html>not swagger</html>");

        let result = SwaggerLoader::new(DocSource::File(file.path().to_path_buf())).await;

        assert!(matches!(result, Err(LoadError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_last_good_document() {
        let file = write_temp(&serde_json::to_vec(&external_document()).unwrap());
        let loader = SwaggerLoader::new(DocSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        let before = loader.document().await;

        std::fs::write(file.path(), b"{broken").unwrap();
        let result = loader.reload().await;

        assert!(matches!(result, Err(LoadError::InvalidJson(_))));
        assert_eq!(loader.document().await, before);
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_content() {
        let file = write_temp(&serde_json::to_vec(&external_document()).unwrap());
        let loader = SwaggerLoader::new(DocSource::File(file.path().to_path_buf()))
            .await
            .unwrap();

        let mut updated = external_document();
        updated["info"]["title"] = json!("Catalog v2");
        std::fs::write(file.path(), serde_json::to_vec(&updated).unwrap()).unwrap();
        loader.reload().await.unwrap();

        let document = served(&loader).await;
        assert_eq!(document["info"]["title"], "Catalog v2");
    }

    #[tokio::test]
    async fn test_clones_share_the_document() {
        let file = write_temp(br#"{"swagger": "2.0"}"#);
        let loader = SwaggerLoader::new(DocSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        let clone = loader.clone();

        std::fs::write(file.path(), br#"{"swagger": "2.0", "host": "example.com"}"#).unwrap();
        loader.reload().await.unwrap();

        let document = served(&clone).await;
        assert_eq!(document["host"], "example.com");
    }

    #[tokio::test]
    async fn test_unreachable_remote_fails() {
        let url = Url::parse("http://127.0.0.1:9/swagger.json").unwrap();

        let result = SwaggerLoader::new(DocSource::Remote(url)).await;

        assert!(matches!(result, Err(LoadError::Fetch { .. })));
    }
}
