use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub mod actions;
pub mod auth;
pub mod display;
pub mod error;
pub mod invalidation;
mod mutator;
pub mod reader;
pub mod validation;

pub use error::RemoteError;
pub use invalidation::{Invalidation, Invalidations};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PAGE_SIZE: u32 = 6;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub page_size: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Resources with create/update/delete routes on the resource API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Invoices,
    Customers,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Self::Invoices => "invoices",
            Self::Customers => "customers",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Invoices => "invoice",
            Self::Customers => "customer",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Invoices => "Invoice",
            Self::Customers => "Customer",
        }
    }

    /// Dashboard page that lists this resource and goes stale after a mutation.
    pub fn listing_path(self) -> &'static str {
        match self {
            Self::Invoices => "/dashboard/invoices",
            Self::Customers => "/dashboard/customers",
        }
    }
}

/// JSON-over-HTTP client for the resource API.
///
/// Holds no per-request state; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: Client,
    base_url: Url,
    page_size: u32,
}

impl ResourceClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, RemoteError> {
        let base_url = Url::parse(settings.base_url.trim())
            .map_err(|e| RemoteError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(settings.base_url.clone()));
        }
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| RemoteError::from_reqwest(base_url.as_str(), e))?;
        Ok(Self {
            http,
            base_url,
            page_size: settings.page_size.max(1),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Joins percent-encoded path segments onto the configured origin.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.http
            .get(url)
            .header(header::ACCEPT, "application/json")
    }

    pub(crate) fn with_json_body<B: serde::Serialize + ?Sized>(
        request: RequestBuilder,
        body: &B,
    ) -> RequestBuilder {
        request
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Sends the request and maps transport failures and non-2xx statuses to [`RemoteError`].
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let request = request
            .build()
            .map_err(|e| RemoteError::from_reqwest(self.base_url.as_str(), e))?;
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| RemoteError::from_reqwest(&url, e))?;

        let status = response.status();
        if status.is_success() {
            debug!(%method, %url, status = status.as_u16(), "resource api: ok");
            return Ok(response);
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                debug!(%url, error = %err, "resource api: unreadable error body");
                Default::default()
            }
        };
        let err = error::classify_status(&url, status, &body);
        warn!(%method, %url, status = status.as_u16(), error = %err, "resource api: request failed");
        Err(err)
    }

    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
        let url = response.url().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::from_reqwest(&url, e))?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteError> {
        let response = self.execute(self.get(url)).await?;
        Self::decode(response).await
    }
}

/// Bundles what every dashboard action needs: the remote client and the stale-view signal.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub client: ResourceClient,
    pub invalidations: Invalidations,
}

impl AdminContext {
    pub fn new(settings: &ClientSettings) -> Result<Self, RemoteError> {
        Ok(Self {
            client: ResourceClient::new(settings)?,
            invalidations: Invalidations::default(),
        })
    }
}

#[cfg(test)]
#[path = "tests/stub_api.rs"]
pub(crate) mod stub_api;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
