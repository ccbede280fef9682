//! Server commands.
//!
//! Every command starts a fresh session: it loads the server list, runs one
//! projector action and prints the resulting view state.

use std::io::Write;
use std::path::Path;

use serverwatch_core::{
    GatewayConfig, HttpGateway, Projector, ServerFields, ServerGateway, ServerId, StatusFilter,
};
use tracing::debug;

use crate::error::CliError;
use crate::notify::StderrNotifier;
use crate::output::{OutputFormat, ReportWritten, ServerView};

/// Server command executor.
pub struct ServerCommand<G> {
    projector: Projector<G, StderrNotifier>,
}

impl ServerCommand<HttpGateway> {
    /// Create a command talking to the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn connect(config: &GatewayConfig, notifier: StderrNotifier) -> Result<Self, CliError> {
        let gateway = HttpGateway::new(config)?;
        debug!(base_url = gateway.base_url(), "gateway ready");
        Ok(Self::new(gateway, notifier))
    }
}

impl<G: ServerGateway> ServerCommand<G> {
    /// Create a command over any gateway.
    pub fn new(gateway: G, notifier: StderrNotifier) -> Self {
        Self {
            projector: Projector::new(gateway, notifier),
        }
    }

    /// The projector driving this command.
    #[must_use]
    pub fn projector(&self) -> &Projector<G, StderrNotifier> {
        &self.projector
    }

    /// List servers, narrowed to `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or output fails.
    pub async fn list<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        status: StatusFilter,
    ) -> Result<(), CliError> {
        self.load().await?;
        self.projector.filter(status);
        self.render(writer, format)
    }

    /// Ping the server at `ip_address`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or the ping fails.
    pub async fn ping<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        ip_address: &str,
    ) -> Result<(), CliError> {
        self.load().await?;
        self.projector.ping(ip_address).await;
        self.render(writer, format)
    }

    /// Create a server.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or the save fails.
    pub async fn add<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        fields: ServerFields,
    ) -> Result<(), CliError> {
        self.load().await?;
        self.projector.save(fields).await;
        self.render(writer, format)
    }

    /// Delete the loaded server with `id`.
    ///
    /// With `force`, the id goes to the backend even when it is not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not in the loaded list (unless forced)
    /// or the delete fails.
    pub async fn delete<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        id: ServerId,
        force: bool,
    ) -> Result<(), CliError> {
        self.load().await?;
        let known = self
            .projector
            .cached()
            .is_some_and(|cache| cache.servers.iter().any(|s| s.id == id));
        if !known && !force {
            return Err(CliError::ServerNotFound(id));
        }
        self.projector.delete_id(id).await;
        self.render(writer, format)
    }

    /// Export the loaded servers to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or writing the report fails.
    pub async fn report<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        path: &Path,
    ) -> Result<(), CliError> {
        self.load().await?;
        let rows = self.projector.current().servers().len();
        let written = self.projector.export_report(path)?;
        format.write(
            writer,
            &ReportWritten {
                path: written.display().to_string(),
                rows,
            },
        )
    }

    async fn load(&self) -> Result<(), CliError> {
        self.projector.initial_load().await;
        self.ensure_ok()
    }

    fn ensure_ok(&self) -> Result<(), CliError> {
        match self.projector.current().error() {
            Some(message) => Err(CliError::Action(message.to_string())),
            None => Ok(()),
        }
    }

    /// Print the current view state; an error state also fails the command.
    fn render<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let view = ServerView::new(&self.projector.current(), self.projector.selected_status());
        format.write(writer, &view)?;
        self.ensure_ok()
    }
}

#[cfg(test)]
mod tests {
    use serverwatch_core::{
        GatewayError, GatewayResult, Server, ServerCollectionResponse, ServerStatus,
    };

    use super::*;
    use crate::cli::Format;

    /// Gateway with a fixed list; saves are rejected and deletes of unknown ids 404.
    struct FixedGateway {
        servers: Vec<Server>,
    }

    impl FixedGateway {
        fn new() -> Self {
            let server = |id: ServerId, status| Server {
                id,
                name: format!("server-{id}"),
                ip_address: format!("10.0.0.{id}"),
                memory: "16 GB".into(),
                server_type: "VM".into(),
                status,
                image_url: None,
            };
            Self {
                servers: vec![
                    server(1, ServerStatus::ServerUp),
                    server(2, ServerStatus::ServerDown),
                ],
            }
        }
    }

    impl ServerGateway for FixedGateway {
        async fn list_servers(&self) -> GatewayResult<ServerCollectionResponse> {
            Ok(ServerCollectionResponse::new("Servers retrieved", self.servers.clone()))
        }

        async fn save_server(&self, _candidate: &ServerFields) -> GatewayResult<ServerCollectionResponse> {
            Err(GatewayError::network(400))
        }

        async fn delete_server(&self, id: ServerId) -> GatewayResult<ServerCollectionResponse> {
            if !self.servers.iter().any(|s| s.id == id) {
                return Err(GatewayError::network(404));
            }
            Ok(ServerCollectionResponse::new("Server deleted", Vec::new()))
        }

        async fn ping_server(&self, ip_address: &str) -> GatewayResult<ServerCollectionResponse> {
            let mut server = self
                .servers
                .iter()
                .find(|s| s.ip_address == ip_address)
                .cloned()
                .ok_or(GatewayError::network(500))?;
            server.status = ServerStatus::ServerDown;
            Ok(ServerCollectionResponse::new("Ping success", vec![server]))
        }
    }

    fn command() -> ServerCommand<FixedGateway> {
        ServerCommand::new(FixedGateway::new(), StderrNotifier::new(true))
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let mut out = Vec::new();
        command()
            .list(&mut out, &OutputFormat::new(Format::Json), StatusFilter::ServerUp)
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["filter"], "SERVER_UP");
        assert_eq!(json["servers"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn ping_updates_row() {
        let mut out = Vec::new();
        let cmd = command();
        cmd.ping(&mut out, &OutputFormat::default(), "10.0.0.1").await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Ping success"));
        assert!(!text.contains("SERVER_UP"));
    }

    #[tokio::test]
    async fn add_rejected_fails_command() {
        let mut out = Vec::new();
        let cmd = command();
        let err = cmd
            .add(&mut out, &OutputFormat::default(), ServerFields::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "An Error occurred - Error code: 400");
        assert!(!cmd.projector().busy());
    }

    #[tokio::test]
    async fn delete_known_server() {
        let mut out = Vec::new();
        let cmd = command();
        cmd.delete(&mut out, &OutputFormat::default(), 2, false).await.unwrap();

        let remaining = cmd.projector().cached().unwrap();
        assert_eq!(remaining.servers.len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_server() {
        let mut out = Vec::new();
        let err = command()
            .delete(&mut out, &OutputFormat::default(), 77, false)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::ServerNotFound(77)));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn forced_delete_surfaces_backend_status() {
        let mut out = Vec::new();
        let err = command()
            .delete(&mut out, &OutputFormat::default(), 77, true)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "An Error occurred - Error code: 404");
        assert!(String::from_utf8(out).unwrap().contains("Error code: 404"));
    }

    #[tokio::test]
    async fn report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.xls");
        let mut out = Vec::new();

        command()
            .report(&mut out, &OutputFormat::default(), &path)
            .await
            .unwrap();

        assert!(path.exists());
        assert!(String::from_utf8(out).unwrap().contains("Wrote 2 row(s)"));
    }

    #[tokio::test]
    async fn unreachable_backend_fails_load() {
        let cmd = ServerCommand::connect(&GatewayConfig::new("http://127.0.0.1:1"), StderrNotifier::new(true))
            .unwrap();
        let mut out = Vec::new();

        let err = cmd
            .list(&mut out, &OutputFormat::default(), StatusFilter::All)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "An Error occurred - Error code: 0");
    }

    #[test]
    fn connect_rejects_invalid_url() {
        let result = ServerCommand::connect(&GatewayConfig::new("ws://localhost"), StderrNotifier::default());
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
