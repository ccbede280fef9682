//! Command-line argument parsing with clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serverwatch_core::{
    DEFAULT_BASE_URL, GatewayConfig, REPORT_FILE_NAME, ServerFields, ServerId, ServerStatus,
    StatusFilter,
};

/// serverwatch - monitor backend-managed servers.
#[derive(Parser, Debug, Clone)]
#[command(name = "serverwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL.
    #[arg(short, long, env = "SERVERWATCH_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Client-side request timeout in seconds. Off by default.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Gateway configuration derived from the global flags.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        let config = GatewayConfig::new(&self.api_url);
        match self.timeout_secs {
            Some(secs) => config.with_request_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List servers, optionally filtered by status.
    List {
        /// Status to filter by.
        #[arg(short, long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
    },

    /// Ping a server by IP address.
    Ping {
        /// IP address to ping.
        ip_address: String,
    },

    /// Add a server.
    Add(AddArgs),

    /// Delete a server by id.
    Delete {
        /// Server id.
        id: ServerId,

        /// Send the delete even if the id is not in the loaded list.
        #[arg(short, long)]
        force: bool,
    },

    /// Export the server table as a spreadsheet report.
    Report {
        /// Destination file.
        #[arg(short, long, default_value = REPORT_FILE_NAME)]
        output: PathBuf,
    },
}

/// Status filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum StatusArg {
    /// Every server.
    #[default]
    All,
    /// Servers that are up.
    Up,
    /// Servers that are down.
    Down,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => Self::All,
            StatusArg::Up => Self::ServerUp,
            StatusArg::Down => Self::ServerDown,
        }
    }
}

/// Initial status of a new server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum InitialStatus {
    /// Server is up.
    Up,
    /// Server is down.
    #[default]
    Down,
}

impl From<InitialStatus> for ServerStatus {
    fn from(arg: InitialStatus) -> Self {
        match arg {
            InitialStatus::Up => Self::ServerUp,
            InitialStatus::Down => Self::ServerDown,
        }
    }
}

/// Arguments for the add command.
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Display name.
    #[arg(short, long)]
    pub name: String,

    /// IP address.
    #[arg(short, long)]
    pub ip: String,

    /// Memory description, e.g. "16 GB".
    #[arg(short, long)]
    pub memory: String,

    /// Server type, e.g. "Dell Tower Server".
    #[arg(short = 't', long = "type")]
    pub server_type: String,

    /// Initial status.
    #[arg(short, long, value_enum, default_value_t = InitialStatus::Down)]
    pub status: InitialStatus,

    /// Image reference.
    #[arg(long)]
    pub image_url: Option<String>,
}

impl From<AddArgs> for ServerFields {
    fn from(args: AddArgs) -> Self {
        let fields = Self::new(args.name, args.ip, args.memory, args.server_type)
            .with_status(args.status.into());
        match args.image_url {
            Some(url) => fields.with_image_url(url),
            None => fields,
        }
    }
}
