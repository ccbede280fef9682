//! Data model shared by the gateway and the projector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend-assigned server identifier.
pub type ServerId = i64;

/// Health status reported by the backend for a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    /// The last ping reached the host.
    ServerUp,
    /// The host was unreachable, or has never been pinged.
    #[default]
    ServerDown,
}

impl ServerStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServerUp => "SERVER_UP",
            Self::ServerDown => "SERVER_DOWN",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host managed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Server identifier.
    pub id: ServerId,
    /// Display name.
    pub name: String,
    /// Address the backend pings.
    pub ip_address: String,
    /// Memory description, e.g. `"16 GB"`.
    pub memory: String,
    /// Server type, e.g. `"Dell Tower Server"`.
    #[serde(rename = "type")]
    pub server_type: String,
    /// Current health status.
    #[serde(default)]
    pub status: ServerStatus,
    /// Image reference shown next to the server.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Fields submitted when creating a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerFields {
    /// Display name.
    pub name: String,
    /// Address the backend pings.
    pub ip_address: String,
    /// Memory description.
    pub memory: String,
    /// Server type.
    #[serde(rename = "type")]
    pub server_type: String,
    /// Initial status; the form defaults this to [`ServerStatus::ServerDown`].
    #[serde(default)]
    pub status: ServerStatus,
    /// Optional image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ServerFields {
    /// Create a candidate with the required fields and a `SERVER_DOWN` status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ip_address: impl Into<String>,
        memory: impl Into<String>,
        server_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ip_address: ip_address.into(),
            memory: memory.into(),
            server_type: server_type.into(),
            status: ServerStatus::ServerDown,
            image_url: None,
        }
    }

    /// Set the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: ServerStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Status filter selected by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFilter {
    /// Every server.
    #[default]
    All,
    /// Only servers that are up.
    ServerUp,
    /// Only servers that are down.
    ServerDown,
}

impl StatusFilter {
    /// Wire name of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::ServerUp => "SERVER_UP",
            Self::ServerDown => "SERVER_DOWN",
        }
    }

    /// Whether a server with `status` passes this filter.
    #[must_use]
    pub fn matches(self, status: ServerStatus) -> bool {
        match self {
            Self::All => true,
            Self::ServerUp => status == ServerStatus::ServerUp,
            Self::ServerDown => status == ServerStatus::ServerDown,
        }
    }
}

impl From<ServerStatus> for StatusFilter {
    fn from(status: ServerStatus) -> Self {
        match status {
            ServerStatus::ServerUp => Self::ServerUp,
            ServerStatus::ServerDown => Self::ServerDown,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "UP" | "SERVER_UP" => Ok(Self::ServerUp),
            "DOWN" | "SERVER_DOWN" => Ok(Self::ServerDown),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

/// Uniform result of every gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerCollectionResponse {
    /// Message from the backend, or a locally built description for filters.
    pub message: String,
    /// Servers carried by the response, in backend order.
    pub servers: Vec<Server>,
}

impl ServerCollectionResponse {
    /// Create a response.
    #[must_use]
    pub fn new(message: impl Into<String>, servers: Vec<Server>) -> Self {
        Self {
            message: message.into(),
            servers,
        }
    }

    /// The first server in the payload, if any.
    ///
    /// Ping and save responses carry exactly one server.
    #[must_use]
    pub fn single(&self) -> Option<&Server> {
        self.servers.first()
    }
}

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    /// Backend timestamp, passed through untouched.
    #[serde(default)]
    pub time_stamp: Option<serde_json::Value>,
    /// HTTP status code echoed in the body.
    #[serde(default)]
    pub status_code: Option<u16>,
    /// HTTP status name echoed in the body.
    #[serde(default)]
    pub status: Option<String>,
    /// Failure reason, if any.
    #[serde(default)]
    pub reason: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Developer-facing detail.
    #[serde(default)]
    pub developer_message: Option<String>,
    /// Endpoint payload; absent or `null` on responses that carry none.
    #[serde(default)]
    pub data: Option<EnvelopeData>,
}

/// Payload section of [`ApiEnvelope`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeData {
    /// Present on list responses.
    #[serde(default)]
    pub servers: Option<Vec<Server>>,
    /// Present on ping and save responses.
    #[serde(default)]
    pub server: Option<Server>,
}

impl From<ApiEnvelope> for ServerCollectionResponse {
    fn from(envelope: ApiEnvelope) -> Self {
        let data = envelope.data.unwrap_or_default();
        let mut servers = data.servers.unwrap_or_default();
        if let Some(server) = data.server {
            servers.push(server);
        }
        Self {
            message: envelope.message,
            servers,
        }
    }
}

#[cfg(test)]
pub(crate) fn server(id: ServerId, ip: &str, status: ServerStatus) -> Server {
    Server {
        id,
        name: format!("server-{id}"),
        ip_address: ip.to_string(),
        memory: "16 GB".to_string(),
        server_type: "Dell Tower Server".to_string(),
        status,
        image_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn server_uses_backend_field_names() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Ubuntu Linux",
            "ipAddress": "192.168.1.160",
            "memory": "16 GB",
            "type": "Personal PC",
            "status": "SERVER_UP",
            "imageUrl": "http://localhost:8080/server/image/server1.png"
        });

        let server: Server = serde_json::from_value(json).unwrap();
        assert_eq!(server.id, 7);
        assert_eq!(server.ip_address, "192.168.1.160");
        assert_eq!(server.server_type, "Personal PC");
        assert_eq!(server.status, ServerStatus::ServerUp);

        let back = serde_json::to_value(&server).unwrap();
        assert_eq!(back["ipAddress"], "192.168.1.160");
        assert_eq!(back["type"], "Personal PC");
    }

    #[test]
    fn fields_default_to_server_down() {
        let fields: ServerFields = serde_json::from_value(serde_json::json!({
            "name": "web",
            "ipAddress": "10.0.0.1",
            "memory": "8 GB",
            "type": "VM"
        }))
        .unwrap();
        assert_eq!(fields.status, ServerStatus::ServerDown);
        assert_eq!(ServerFields::default().status, ServerStatus::ServerDown);
    }

    #[test]
    fn fields_skip_missing_image() {
        let json = serde_json::to_value(ServerFields::new("web", "10.0.0.1", "8 GB", "VM")).unwrap();
        assert!(json.get("imageUrl").is_none());
        assert_eq!(json["status"], "SERVER_DOWN");
    }

    #[test_case("all", StatusFilter::All ; "lowercase all")]
    #[test_case("up", StatusFilter::ServerUp ; "short up")]
    #[test_case("SERVER_DOWN", StatusFilter::ServerDown ; "wire name")]
    fn status_filter_parses(input: &str, expected: StatusFilter) {
        assert_eq!(input.parse::<StatusFilter>(), Ok(expected));
    }

    #[test]
    fn status_filter_rejects_unknown() {
        assert!("sideways".parse::<StatusFilter>().is_err());
    }

    #[test_case(StatusFilter::All, ServerStatus::ServerDown, true ; "all accepts down")]
    #[test_case(StatusFilter::ServerUp, ServerStatus::ServerUp, true ; "up accepts up")]
    #[test_case(StatusFilter::ServerUp, ServerStatus::ServerDown, false ; "up rejects down")]
    #[test_case(StatusFilter::ServerDown, ServerStatus::ServerUp, false ; "down rejects up")]
    fn status_filter_matches(filter: StatusFilter, status: ServerStatus, expected: bool) {
        assert_eq!(filter.matches(status), expected);
    }

    #[test]
    fn envelope_with_server_list() {
        let envelope: ApiEnvelope = serde_json::from_value(serde_json::json!({
            "timeStamp": "2024-01-01T00:00:00",
            "statusCode": 200,
            "status": "OK",
            "message": "Servers retrieved",
            "data": { "servers": [
                { "id": 1, "name": "a", "ipAddress": "10.0.0.1", "memory": "1 GB", "type": "VM", "status": "SERVER_UP" }
            ] }
        }))
        .unwrap();

        let response = ServerCollectionResponse::from(envelope);
        assert_eq!(response.message, "Servers retrieved");
        assert_eq!(response.servers.len(), 1);
    }

    #[test]
    fn envelope_with_single_server() {
        let envelope: ApiEnvelope = serde_json::from_value(serde_json::json!({
            "message": "Ping success",
            "data": { "server": { "id": 3, "name": "c", "ipAddress": "10.0.0.5", "memory": "1 GB", "type": "VM", "status": "SERVER_DOWN" } }
        }))
        .unwrap();

        let response = ServerCollectionResponse::from(envelope);
        assert_eq!(response.single().map(|s| s.id), Some(3));
    }

    #[test]
    fn envelope_without_data() {
        let envelope: ApiEnvelope =
            serde_json::from_value(serde_json::json!({ "message": "Server deleted", "data": { "deleted": true } })).unwrap();
        let response = ServerCollectionResponse::from(envelope);
        assert!(response.servers.is_empty());
        assert_eq!(response.message, "Server deleted");
    }

    #[test]
    fn envelope_with_null_data() {
        let envelope: ApiEnvelope = serde_json::from_value(serde_json::json!({
            "statusCode": 200,
            "message": "Server deleted",
            "data": null
        }))
        .unwrap();
        let response = ServerCollectionResponse::from(envelope);
        assert!(response.servers.is_empty());
        assert_eq!(response.message, "Server deleted");
    }
}
