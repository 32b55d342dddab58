//! Where CRD schema documents come from

use super::schema::CrdDocument;
use crate::resources::ResourceKind;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Published operator repository; CRDs live under `v<version>/config/crd/bases`
pub const DEFAULT_SCHEMA_BASE_URL: &str =
    "https://raw.githubusercontent.com/mongodb/mongodb-atlas-kubernetes";

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// File name of a kind's CRD document
pub fn crd_file_name(kind: ResourceKind) -> String {
    format!("atlas.mongodb.com_{}.yaml", kind.plural())
}

/// Fetches the CRD document for a kind at an operator version
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    async fn fetch(&self, kind: ResourceKind, version: &str) -> Result<CrdDocument>;
}

fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

fn parse_document(content: &str, source: &str) -> Result<CrdDocument> {
    CrdDocument::from_yaml(content).map_err(|e| anyhow!("{}: {}", source, e))
}

/// Downloads CRDs from the operator's published sources
#[derive(Clone)]
pub struct HttpSchemaProvider {
    client: Client,
    base_url: Url,
}

impl HttpSchemaProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("atlas-k8s/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        // Url::join drops the last segment unless the base ends with '/'
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid schema base URL {:?}", base_url))?;

        Ok(Self { client, base_url })
    }

    pub fn document_url(&self, kind: ResourceKind, version: &str) -> Result<Url> {
        let path = format!(
            "v{}/config/crd/bases/{}",
            version.trim_start_matches('v'),
            crd_file_name(kind)
        );
        self.base_url
            .join(&path)
            .with_context(|| format!("Failed to build schema URL for {}", kind))
    }
}

#[async_trait]
impl SchemaProvider for HttpSchemaProvider {
    async fn fetch(&self, kind: ResourceKind, version: &str) -> Result<CrdDocument> {
        let url = self.document_url(kind, version)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("Schema fetch error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow!("schema request for {} failed: {}", kind, status));
        }

        parse_document(&body, url.as_str())
    }
}

/// Reads CRDs from a local directory laid out as `<dir>/<file name>`
/// or `<dir>/v<version>/<file name>`
#[derive(Debug, Clone)]
pub struct DirSchemaProvider {
    root: PathBuf,
}

impl DirSchemaProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SchemaProvider for DirSchemaProvider {
    async fn fetch(&self, kind: ResourceKind, version: &str) -> Result<CrdDocument> {
        let file = crd_file_name(kind);
        let versioned = self
            .root
            .join(format!("v{}", version.trim_start_matches('v')))
            .join(&file);
        let path = if versioned.is_file() {
            versioned
        } else {
            self.root.join(&file)
        };
        tracing::debug!("Reading schema {:?}", path);

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read schema {}", path.display()))?;
        parse_document(&content, &path.display().to_string())
    }
}

/// In-memory CRD documents keyed by kind, shared by every version
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    documents: HashMap<ResourceKind, String>,
}

impl StaticSchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, kind: ResourceKind, yaml: impl Into<String>) -> Self {
        self.documents.insert(kind, yaml.into());
        self
    }
}

#[async_trait]
impl SchemaProvider for StaticSchemaProvider {
    async fn fetch(&self, kind: ResourceKind, _version: &str) -> Result<CrdDocument> {
        let yaml = self
            .documents
            .get(&kind)
            .ok_or_else(|| anyhow!("no schema registered for {}", kind))?;
        parse_document(yaml, kind.kind_name())
    }
}
