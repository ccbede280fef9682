//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;
use serverwatch_core::{Server, ServerId, StatusFilter, ViewState};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A server row for display.
#[derive(Debug, Clone, Serialize)]
pub struct ServerRow {
    /// Server id.
    pub id: ServerId,
    /// Display name.
    pub name: String,
    /// IP address.
    pub ip_address: String,
    /// Memory description.
    pub memory: String,
    /// Server type.
    #[serde(rename = "type")]
    pub server_type: String,
    /// Status wire name.
    pub status: String,
}

impl From<&Server> for ServerRow {
    fn from(server: &Server) -> Self {
        Self {
            id: server.id,
            name: server.name.clone(),
            ip_address: server.ip_address.clone(),
            memory: server.memory.clone(),
            server_type: server.server_type.clone(),
            status: server.status.to_string(),
        }
    }
}

/// Rendered view state.
#[derive(Debug, Clone, Serialize)]
pub struct ServerView {
    /// View state name (`loaded`, `error`, ...).
    pub state: String,
    /// Selected status filter.
    pub filter: String,
    /// Message from the last response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error text, when the view is an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Servers on screen.
    pub servers: Vec<ServerRow>,
}

impl ServerView {
    /// Build a view from a projector state.
    #[must_use]
    pub fn new(state: &ViewState, filter: StatusFilter) -> Self {
        Self {
            state: state.name().to_string(),
            filter: filter.to_string(),
            message: state.payload().map(|payload| payload.message.clone()),
            error: state.error().map(str::to_string),
            servers: state.servers().iter().map(ServerRow::from).collect(),
        }
    }
}

impl TableDisplay for ServerView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if let Some(ref error) = self.error {
            writeln!(writer, "✗ {error}")?;
            return Ok(());
        }
        if let Some(ref message) = self.message {
            writeln!(writer, "{message}")?;
            writeln!(writer)?;
        }
        if self.servers.is_empty() {
            writeln!(writer, "No servers to display")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:>6}  {:<16}  {:<20}  {:<10}  {:<20}  {:<11}",
            "ID", "IP ADDRESS", "NAME", "MEMORY", "TYPE", "STATUS"
        )?;
        writeln!(writer, "{}", "─".repeat(94))?;

        for server in &self.servers {
            writeln!(
                writer,
                "{:>6}  {:<16}  {:<20}  {:<10}  {:<20}  {:<11}",
                server.id,
                truncate(&server.ip_address, 16),
                truncate(&server.name, 20),
                truncate(&server.memory, 10),
                truncate(&server.server_type, 20),
                server.status
            )?;
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "Total: {} server(s), filter {}",
            self.servers.len(),
            self.filter
        )?;
        Ok(())
    }
}

/// Report export result.
#[derive(Debug, Clone, Serialize)]
pub struct ReportWritten {
    /// Destination path.
    pub path: String,
    /// Number of rows written.
    pub rows: usize,
}

impl TableDisplay for ReportWritten {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "✓ Wrote {} row(s) to {}", self.rows, self.path)?;
        Ok(())
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serverwatch_core::{ServerCollectionResponse, ServerStatus};

    fn sample_server(id: ServerId, status: ServerStatus) -> Server {
        Server {
            id,
            name: format!("server-{id}"),
            ip_address: format!("10.0.0.{id}"),
            memory: "16 GB".into(),
            server_type: "Dell Tower Server".into(),
            status,
            image_url: None,
        }
    }

    fn loaded_view() -> ServerView {
        let state = ViewState::Loaded(ServerCollectionResponse::new(
            "Servers retrieved",
            vec![
                sample_server(1, ServerStatus::ServerUp),
                sample_server(2, ServerStatus::ServerDown),
            ],
        ));
        ServerView::new(&state, StatusFilter::All)
    }

    #[test]
    fn output_format_default_is_table() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt.format(), Format::Table);
        assert!(!fmt.is_json());
    }

    #[test]
    fn server_view_table_output() {
        let output = OutputFormat::new(Format::Table)
            .to_string(&loaded_view())
            .expect("should format");

        assert!(output.starts_with("Servers retrieved"));
        assert!(output.contains("IP ADDRESS"));
        assert!(output.contains("10.0.0.2"));
        assert!(output.contains("SERVER_DOWN"));
        assert!(output.contains("Total: 2 server(s), filter ALL"));
    }

    #[test]
    fn server_view_json_output() {
        let output = OutputFormat::new(Format::Json)
            .to_string(&loaded_view())
            .expect("should format");

        assert!(output.contains("\"state\": \"loaded\""));
        assert!(output.contains("\"ip_address\": \"10.0.0.1\""));
        assert!(!output.contains("\"error\""));
    }

    #[test]
    fn error_view_table_output() {
        let state = ViewState::Error {
            message: "An Error occurred - Error code: 400".into(),
        };
        let view = ServerView::new(&state, StatusFilter::ServerUp);
        let output = OutputFormat::default().to_string(&view).expect("should format");

        assert_eq!(output, "✗ An Error occurred - Error code: 400\n");
        assert!(view.servers.is_empty());
    }

    #[test]
    fn empty_view_table_output() {
        let state = ViewState::Loaded(ServerCollectionResponse::new("No servers found", Vec::new()));
        let output = OutputFormat::default()
            .to_string(&ServerView::new(&state, StatusFilter::All))
            .expect("should format");

        assert!(output.contains("No servers to display"));
    }

    #[test]
    fn report_written_output() {
        let written = ReportWritten {
            path: "server-report.xls".into(),
            rows: 3,
        };
        let output = OutputFormat::default().to_string(&written).expect("should format");
        assert_eq!(output, "✓ Wrote 3 row(s) to server-report.xls\n");
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "hel");
    }
}
