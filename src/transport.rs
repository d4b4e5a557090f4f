//! HTTP transport adapter for the gateway management API.
//!
//! One pooled `reqwest::Client` behind a small surface: every call applies
//! basic auth from the session's credentials, asks for JSON, logs the
//! request at debug, and normalizes failures into
//! [`TransportFault`](crate::error::TransportFault). Timeouts and
//! cancellation are whatever reqwest provides; no retries happen here.

use std::path::Path;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{GatewayError, TransportFault};
use crate::session::Credentials;
use crate::spec::SpecFormat;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub(crate) struct Transport {
    http: reqwest::Client,
}

impl Transport {
    pub(crate) fn new() -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|source| GatewayError::Init { source })?;

        Ok(Self { http })
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: &Credentials,
    ) -> Result<T, TransportFault> {
        debug!("GET {url}");
        let request = self.prepare(self.http.get(url), auth);
        Self::dispatch(request).await
    }

    pub(crate) async fn post_json<T, B>(
        &self,
        url: Url,
        auth: &Credentials,
        body: &B,
    ) -> Result<T, TransportFault>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("POST {url}");
        let request = self.prepare(self.http.post(url), auth).json(body);
        Self::dispatch(request).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: &Credentials,
        form: Form,
    ) -> Result<T, TransportFault> {
        debug!("POST {url}");
        let request = self.prepare(self.http.post(url), auth).multipart(form);
        Self::dispatch(request).await
    }

    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: &Credentials,
        form: Form,
    ) -> Result<T, TransportFault> {
        debug!("PUT {url}");
        let request = self.prepare(self.http.put(url), auth).multipart(form);
        Self::dispatch(request).await
    }

    /// PUT with no request payload, used by the activation endpoints.
    pub(crate) async fn put_empty<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: &Credentials,
    ) -> Result<T, TransportFault> {
        debug!("PUT {url}");
        let request = self.prepare(self.http.put(url), auth);
        Self::dispatch(request).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: &Credentials,
    ) -> Result<T, TransportFault> {
        debug!("DELETE {url}");
        let request = self.prepare(self.http.delete(url), auth);
        Self::dispatch(request).await
    }

    fn prepare(
        &self,
        request: reqwest::RequestBuilder,
        auth: &Credentials,
    ) -> reqwest::RequestBuilder {
        request
            .basic_auth(auth.username(), Some(auth.password()))
            .header(ACCEPT, "application/json")
    }

    async fn dispatch<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, TransportFault> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(TransportFault::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Builds the multipart payload for spec upload: the file contents under
/// `file`, the declared format under `type`.
pub(crate) async fn spec_form(path: &Path, format: SpecFormat) -> Result<Form, GatewayError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| GatewayError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spec.json".to_string());

    let part = Part::bytes(bytes).file_name(file_name);
    Ok(Form::new().part("file", part).text("type", format.to_string()))
}
