//! Specification acquisition and inspection.
//!
//! A spec reference is tried as a local path first and treated as a
//! download URL only when no local file exists. Inspection reads just
//! enough of the document to identify it: the format-discriminating
//! top-level key plus `info.title` and `info.version`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::debug;
use url::Url;

use crate::error::GatewayError;

/// Specification formats the gateway accepts.
///
/// OpenAPI and Swagger documents are content-inspected; RAML and WSDL are
/// recognized by file extension only.
///
/// ## Examples
///
/// ```rust
/// use apigw_client::SpecFormat;
///
/// assert_eq!(SpecFormat::OpenApi.to_string(), "openapi");
/// let parsed: SpecFormat = "swagger".parse().unwrap();
/// assert_eq!(parsed, SpecFormat::Swagger);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SpecFormat {
    /// OpenAPI 3.x, JSON serialization.
    OpenApi,
    /// Swagger 2.0, JSON serialization.
    Swagger,
    /// RAML, accepted by extension only.
    Raml,
    /// WSDL, accepted by extension only.
    Wsdl,
}

impl SpecFormat {
    /// File extensions the gateway accepts for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::OpenApi | Self::Swagger => &["json"],
            Self::Raml => &["raml"],
            Self::Wsdl => &["wsdl"],
        }
    }

    /// Whether `path` carries an extension this format permits.
    pub fn permits(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

/// Identifying metadata extracted from a specification document, consumed
/// once per reconciliation call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDescriptor {
    /// Local copy of the document.
    pub local_path: PathBuf,
    /// The API name the document declares (`info.title`).
    pub name: String,
    /// The version the document declares (`info.version`).
    pub version: String,
    /// The declared format.
    pub format: SpecFormat,
}

impl SpecDescriptor {
    /// Checks the file extension against the declared format.
    pub(crate) fn check_extension(&self) -> Result<(), GatewayError> {
        if self.format.permits(&self.local_path) {
            return Ok(());
        }
        Err(GatewayError::UnsupportedFormat {
            path: self.local_path.clone(),
            reason: format!("not a valid {} specification", self.format),
        })
    }
}

/// Resolves spec references into local files and extracts their metadata.
///
/// Local paths are checked against a workspace directory (the process
/// working directory by default); references that do not exist locally are
/// treated as download URLs, with the copy landing in the workspace under
/// the URL's file name.
#[derive(Debug)]
pub struct SpecResolver {
    workspace: PathBuf,
    http: reqwest::Client,
}

impl SpecResolver {
    /// Creates a resolver rooted at the process working directory.
    pub fn new() -> Result<Self, GatewayError> {
        let workspace = std::env::current_dir().map_err(|source| GatewayError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Self::with_workspace(workspace)
    }

    /// Creates a resolver rooted at `workspace`.
    pub fn with_workspace(workspace: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|source| GatewayError::Init { source })?;

        Ok(Self {
            workspace: workspace.into(),
            http,
        })
    }

    /// Produces a local copy of `reference`: the file itself when the
    /// reference is a path that exists, a downloaded copy when it is a
    /// live http(s) URL.
    ///
    /// ## Errors
    ///
    /// [`GatewayError::SourceNotFound`] when the reference is neither.
    pub async fn resolve(&self, reference: &str) -> Result<PathBuf, GatewayError> {
        if let Some(local) = self.find_local(reference) {
            return Ok(local);
        }
        if let Some(copy) = self.download(reference).await {
            return Ok(copy);
        }
        Err(GatewayError::SourceNotFound {
            reference: reference.to_string(),
        })
    }

    /// Extracts `{name, version, format}` from a local specification file.
    ///
    /// Only JSON serializations are inspected. The top-level `openapi` key
    /// marks an OpenAPI document, `swagger` a Swagger one; a document with
    /// neither, or a non-JSON extension, is unsupported.
    pub fn inspect(&self, path: &Path) -> Result<SpecDescriptor, GatewayError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if !extension.eq_ignore_ascii_case("json") {
            return Err(GatewayError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!("cannot inspect `.{extension}` files, only JSON"),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| GatewayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: Value =
            serde_json::from_str(&raw).map_err(|err| GatewayError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!("not valid JSON: {err}"),
            })?;

        let format = if doc.get("openapi").is_some() {
            SpecFormat::OpenApi
        } else if doc.get("swagger").is_some() {
            SpecFormat::Swagger
        } else {
            return Err(GatewayError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "neither an `openapi` nor a `swagger` document".to_string(),
            });
        };

        let info = doc.get("info");
        let name = info
            .and_then(|info| info.get("title"))
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "missing `info.title`".to_string(),
            })?;
        let version = info
            .and_then(|info| info.get("version"))
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "missing `info.version`".to_string(),
            })?;

        Ok(SpecDescriptor {
            local_path: path.to_path_buf(),
            name: name.to_string(),
            version: version.to_string(),
            format,
        })
    }

    /// Resolves and inspects in one step; this is what feeds
    /// [`reconcile`](crate::GatewayClient::reconcile).
    pub async fn descriptor(&self, reference: &str) -> Result<SpecDescriptor, GatewayError> {
        let local = self.resolve(reference).await?;
        self.inspect(&local)
    }

    fn find_local(&self, reference: &str) -> Option<PathBuf> {
        let path = Path::new(reference);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        };

        if absolute.exists() {
            debug!("specification found locally at {}", absolute.display());
            Some(absolute)
        } else {
            None
        }
    }

    async fn download(&self, reference: &str) -> Option<PathBuf> {
        let url = Url::parse(reference).ok()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }

        // probe before committing to a download
        debug!("HEAD {url}");
        let probe = self.http.head(url.clone()).send().await.ok()?;
        if !probe.status().is_success() {
            return None;
        }

        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())?
            .to_string();
        let local = self.workspace.join(&file_name);

        debug!("GET {url}");
        let response = self.http.get(url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let bytes = response.bytes().await.ok()?;
        tokio::fs::write(&local, &bytes).await.ok()?;

        debug!("specification downloaded to {}", local.display());
        Some(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_spec(dir: &tempfile::TempDir, file_name: &str, doc: &Value) -> PathBuf {
        let path = dir.path().join(file_name);
        std::fs::write(&path, doc.to_string()).unwrap();
        path
    }

    fn openapi_doc() -> Value {
        json!({
            "openapi": "3.0.2",
            "info": {"title": "Swagger Petstore - OpenAPI 3.0", "version": "1.0.11"},
            "paths": {}
        })
    }

    fn swagger_doc() -> Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "Swagger Petstore", "version": "1.0.6"},
            "paths": {}
        })
    }

    #[test]
    fn format_covers_all_gateway_types() {
        assert_eq!(SpecFormat::iter().count(), 4);
        assert_eq!("openapi".parse::<SpecFormat>().unwrap(), SpecFormat::OpenApi);
        assert_eq!("wsdl".parse::<SpecFormat>().unwrap(), SpecFormat::Wsdl);
    }

    #[test]
    fn extension_permissions_follow_the_format() {
        assert!(SpecFormat::OpenApi.permits(Path::new("petstore.json")));
        assert!(SpecFormat::Swagger.permits(Path::new("petstore.JSON")));
        assert!(!SpecFormat::Raml.permits(Path::new("petstore.json")));
        assert!(SpecFormat::Raml.permits(Path::new("api.raml")));
        assert!(SpecFormat::Wsdl.permits(Path::new("service.wsdl")));
        assert!(!SpecFormat::OpenApi.permits(Path::new("petstore.yaml")));
        assert!(!SpecFormat::OpenApi.permits(Path::new("no-extension")));
    }

    #[test]
    fn inspect_identifies_openapi() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_spec(&dir, "petstore.openapi.json", &openapi_doc());
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let spec = resolver.inspect(&path).unwrap();

        assert_eq!(spec.format, SpecFormat::OpenApi);
        assert_eq!(spec.name, "Swagger Petstore - OpenAPI 3.0");
        assert_eq!(spec.version, "1.0.11");
        assert_eq!(spec.local_path, path);
    }

    #[test]
    fn inspect_identifies_swagger() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_spec(&dir, "petstore.swagger.json", &swagger_doc());
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let spec = resolver.inspect(&path).unwrap();

        assert_eq!(spec.format, SpecFormat::Swagger);
        assert_eq!(spec.name, "Swagger Petstore");
        assert_eq!(spec.version, "1.0.6");
    }

    #[test]
    fn inspect_rejects_non_json_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.yaml");
        std::fs::write(&path, "openapi: 3.0.2").unwrap();
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let err = resolver.inspect(&path).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedFormat { .. }));
    }

    #[test]
    fn inspect_rejects_documents_without_a_discriminator() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_spec(&dir, "mystery.json", &json!({"info": {"title": "X"}}));
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let err = resolver.inspect(&path).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedFormat { .. }));
    }

    #[test]
    fn inspect_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let err = resolver.inspect(&path).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn resolve_prefers_the_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_spec(&dir, "petstore.openapi.json", &openapi_doc());
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let resolved = resolver.resolve("petstore.openapi.json").await.unwrap();
        assert_eq!(resolved, path);
    }

    #[tokio::test]
    async fn resolve_accepts_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_spec(&dir, "petstore.openapi.json", &openapi_doc());
        // workspace intentionally elsewhere
        let other = tempfile::tempdir().unwrap();
        let resolver = SpecResolver::with_workspace(other.path()).unwrap();

        let resolved = resolver.resolve(path.to_str().unwrap()).await.unwrap();
        assert_eq!(resolved, path);
    }

    #[tokio::test]
    async fn resolve_downloads_when_no_local_file_exists() {
        let server = MockServer::start().await;
        let doc = openapi_doc();
        Mock::given(method("HEAD"))
            .and(path("/api/v3/openapi.json"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/openapi.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(doc))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let reference = format!("{}/api/v3/openapi.json", server.uri());
        let resolved = resolver.resolve(&reference).await.unwrap();

        assert_eq!(resolved, dir.path().join("openapi.json"));
        let spec = resolver.inspect(&resolved).unwrap();
        assert_eq!(spec.format, SpecFormat::OpenApi);
    }

    #[tokio::test]
    async fn resolve_fails_when_the_probe_fails() {
        let server = MockServer::start().await;
        // no HEAD mock: the probe gets a 404 and the download is abandoned

        let dir = tempfile::tempdir().unwrap();
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let reference = format!("{}/missing.json", server.uri());
        let err = resolver.resolve(&reference).await.unwrap_err();

        assert!(matches!(err, GatewayError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn resolve_rejects_non_http_schemes() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let err = resolver.resolve("ftp://example.com/spec.json").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::SourceNotFound { ref reference } if reference == "ftp://example.com/spec.json"
        ));
    }

    #[tokio::test]
    async fn descriptor_resolves_and_inspects() {
        let dir = tempfile::tempdir().unwrap();
        write_spec(&dir, "petstore.swagger.json", &swagger_doc());
        let resolver = SpecResolver::with_workspace(dir.path()).unwrap();

        let spec = resolver.descriptor("petstore.swagger.json").await.unwrap();

        assert_eq!(spec.name, "Swagger Petstore");
        assert_eq!(spec.version, "1.0.6");
        assert_eq!(spec.format, SpecFormat::Swagger);
    }
}
