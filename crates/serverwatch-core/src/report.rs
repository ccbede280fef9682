//! Spreadsheet-flavoured report export.
//!
//! The report is the server table rendered as HTML and saved with an `.xls`
//! extension, which spreadsheet applications open as a sheet.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::ReportError;
use crate::types::Server;

/// Default report file name.
pub const REPORT_FILE_NAME: &str = "server-report.xls";

/// Render `servers` as the `servers` HTML table.
#[must_use]
pub fn render_table(servers: &[Server]) -> String {
    let mut html = String::from("<table id=\"servers\">\n<thead>\n<tr>");
    for heading in ["Image", "IP Address", "Name", "Memory", "Type", "Status"] {
        let _ = write!(html, "<th>{heading}</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for server in servers {
        let image = server
            .image_url
            .as_deref()
            .map(|url| format!("<img src=\"{}\" width=\"40\" height=\"40\">", escape(url)))
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<tr><td>{image}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&server.ip_address),
            escape(&server.name),
            escape(&server.memory),
            escape(&server.server_type),
            server.status,
        );
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// Write the rendered table for `servers` to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_report(path: &Path, servers: &[Server]) -> Result<(), ReportError> {
    std::fs::write(path, render_table(servers)).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = servers.len(), "report written");
    Ok(())
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
