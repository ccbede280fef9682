//! Remote access gateway for the monitoring backend.
//!
//! [`ServerGateway`] is the seam the projector talks to. [`HttpGateway`] is
//! the real implementation over the backend's REST API:
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | list | GET | `/server/list` |
//! | save | POST | `/server/save` |
//! | ping | GET | `/server/ping/{ipAddress}` |
//! | delete | DELETE | `/server/delete/{serverId}` |
//!
//! Filtering never touches the network; see [`filter_servers`].

use std::future::Future;

use reqwest::{Client, Method, RequestBuilder, header};
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::GatewayConfig;
use crate::error::{ConfigError, GatewayError, GatewayResult};
use crate::types::{
    ApiEnvelope, ServerCollectionResponse, ServerFields, ServerId, StatusFilter,
};

/// Backend operations consumed by the projector.
///
/// This trait allows for testing with fake implementations.
pub trait ServerGateway: Send + Sync {
    /// Fetch every server known to the backend.
    fn list_servers(
        &self,
    ) -> impl Future<Output = GatewayResult<ServerCollectionResponse>> + Send;

    /// Create a server.
    fn save_server(
        &self,
        candidate: &ServerFields,
    ) -> impl Future<Output = GatewayResult<ServerCollectionResponse>> + Send;

    /// Delete the server with `id`.
    fn delete_server(
        &self,
        id: ServerId,
    ) -> impl Future<Output = GatewayResult<ServerCollectionResponse>> + Send;

    /// Ask the backend to ping `ip_address`; the payload carries the updated server.
    fn ping_server(
        &self,
        ip_address: &str,
    ) -> impl Future<Output = GatewayResult<ServerCollectionResponse>> + Send;

    /// Narrow an already-fetched response by status. Never fails.
    fn filter_servers(
        &self,
        status: StatusFilter,
        base: &ServerCollectionResponse,
    ) -> ServerCollectionResponse {
        filter_servers(status, base)
    }
}

/// Project `base` through a status filter without touching the network.
///
/// `ALL` keeps the collection as is and only replaces the message.
#[must_use]
pub fn filter_servers(
    status: StatusFilter,
    base: &ServerCollectionResponse,
) -> ServerCollectionResponse {
    if status == StatusFilter::All {
        return ServerCollectionResponse::new(
            format!("Servers filtered by {status} status"),
            base.servers.clone(),
        );
    }

    let servers: Vec<_> = base
        .servers
        .iter()
        .filter(|server| status.matches(server.status))
        .cloned()
        .collect();

    let message = if servers.is_empty() {
        format!("No servers of {status} found")
    } else {
        format!("Servers filtered by {status} status")
    };
    trace!(%status, matched = servers.len(), total = base.servers.len(), "filtered servers");
    ServerCollectionResponse::new(message, servers)
}

/// [`ServerGateway`] backed by the backend's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    base: Url,
    http: Client,
}

impl HttpGateway {
    /// Build a gateway from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let base = config.validate()?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: config.base_url.clone(),
            base,
            http: builder.build()?,
        })
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `segments` below the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path, so this never falls through.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "building request");
        self.http.request(method, url)
    }

    /// Send a request and decode the shared envelope.
    ///
    /// Non-2xx statuses and undecodable bodies both become
    /// [`GatewayError::Network`] carrying the received status code.
    async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> GatewayResult<ServerCollectionResponse> {
        let response = request.send().await.map_err(|err| {
            warn!(operation, error = %err, "request failed");
            GatewayError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation, status = status.as_u16(), "backend returned an error status");
            return Err(GatewayError::network(status.as_u16()));
        }

        let envelope: ApiEnvelope =
            response
                .json()
                .await
                .map_err(|source| GatewayError::Network {
                    code: status.as_u16(),
                    source: Some(source),
                })?;

        debug!(
            operation,
            status = status.as_u16(),
            message = %envelope.message,
            "received response"
        );
        Ok(envelope.into())
    }
}

impl ServerGateway for HttpGateway {
    async fn list_servers(&self) -> GatewayResult<ServerCollectionResponse> {
        self.execute("list", self.request(Method::GET, &["server", "list"]))
            .await
    }

    async fn save_server(
        &self,
        candidate: &ServerFields,
    ) -> GatewayResult<ServerCollectionResponse> {
        let request = self.request(Method::POST, &["server", "save"]).json(candidate);
        self.execute("save", request).await
    }

    async fn delete_server(&self, id: ServerId) -> GatewayResult<ServerCollectionResponse> {
        let id = id.to_string();
        self.execute("delete", self.request(Method::DELETE, &["server", "delete", id.as_str()]))
            .await
    }

    async fn ping_server(&self, ip_address: &str) -> GatewayResult<ServerCollectionResponse> {
        let request = self.request(Method::GET, &["server", "ping", ip_address]);
        self.execute("ping", request).await
    }
}
