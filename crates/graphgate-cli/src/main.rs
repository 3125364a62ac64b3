//! CLI entry point for the graphgate FalkorDB toolkit.
//!
//! Runs one toolkit operation and writes the JSON result to stdout.
//! Logs go to stderr.

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

use graphgate_core::{ConfigLoader, ConnectionConfig, ConnectionOptions, CoreError};
use graphgate_graph::{FalkorConnector, GraphGateway, ToolFlags, ToolName, Toolkit};

#[derive(Parser)]
#[command(name = "graphgate")]
#[command(about = "Query a FalkorDB graph through the agent toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// FalkorDB host (falls back to FALKORDB_HOST, then localhost).
    #[arg(long, global = true)]
    host: Option<String>,

    /// FalkorDB port (falls back to FALKORDB_PORT, then 6379).
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Username (falls back to FALKORDB_USERNAME).
    #[arg(long, global = true)]
    username: Option<String>,

    /// Password (falls back to FALKORDB_PASSWORD).
    #[arg(long, global = true)]
    password: Option<String>,

    /// Graph name (falls back to FALKORDB_GRAPH, then agno).
    #[arg(short, long, global = true)]
    graph: Option<String>,

    /// Per-query timeout in milliseconds (default: none).
    #[arg(long, global = true)]
    query_timeout_ms: Option<u64>,

    /// Comma-separated tools to enable (default: all).
    #[arg(long, global = true, value_delimiter = ',')]
    tools: Option<Vec<String>>,

    /// Config file prefix (default: graphgate).
    #[arg(short, long, default_value = "graphgate", global = true)]
    config: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List node labels.
    Labels,
    /// List relationship types.
    Relationships,
    /// Show labels and relationship types.
    Schema,
    /// Run a Cypher query ("-" reads it from stdin).
    Query { cypher: String },
    /// Print the advertised tool specs.
    Tools,
    /// Invoke a tool by name, as an agent host would.
    Call {
        tool: String,
        /// JSON arguments object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = resolve_config(&cli)?;
    let flags = tool_flags(cli.tools.as_deref())?;
    let gateway = GraphGateway::open(&FalkorConnector, config, flags).await?;

    let output = match cli.command {
        Command::Labels => serde_json::to_value(gateway.list_labels().await)?,
        Command::Relationships => serde_json::to_value(gateway.list_relationship_types().await)?,
        Command::Schema => serde_json::to_value(gateway.get_schema().await)?,
        Command::Query { ref cypher } => {
            let cypher = if cypher == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                cypher.clone()
            };
            serde_json::to_value(gateway.run_cypher_query(cypher.trim()).await)?
        }
        Command::Tools => serde_json::to_value(gateway.tools())?,
        Command::Call { ref tool, ref args } => {
            let args: Value = serde_json::from_str(args)?;
            gateway.call(tool, args).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve_config(cli: &Cli) -> Result<ConnectionConfig, CoreError> {
    ConfigLoader::new()
        .with_file(cli.config.clone())
        .resolve(&connection_options(cli))
        .map_err(|e| {
            tracing::error!(error = %e, file = %cli.config, "Invalid FalkorDB configuration");
            e
        })
}

fn connection_options(cli: &Cli) -> ConnectionOptions {
    ConnectionOptions {
        host: cli.host.clone(),
        port: cli.port,
        username: cli.username.clone(),
        password: cli.password.clone(),
        graph_name: cli.graph.clone(),
        connect_timeout_ms: None,
        query_timeout_ms: cli.query_timeout_ms,
    }
}

fn tool_flags(tools: Option<&[String]>) -> anyhow::Result<ToolFlags> {
    let Some(names) = tools else {
        return Ok(ToolFlags::default());
    };
    let names = names
        .iter()
        .map(|name| name.trim().parse::<ToolName>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ToolFlags::only(&names))
}
