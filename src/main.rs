use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use mindmap_mcp::{McpServer, Result, ServerConfig};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mindmap-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for mind maps, relationship graphs and AI knowledge graphs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mind-map renderer binary (default: markmap, or $MINDMAP_MARKMAP_BIN)
    #[arg(long, global = true)]
    markmap_bin: Option<String>,

    /// Diagram renderer binary (default: mmdc, or $MINDMAP_MMDC_BIN)
    #[arg(long, global = true)]
    mmdc_bin: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,

    /// Print the tool catalog as JSON
    Tools,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to start runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run_async(cli: Cli) -> Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(bin) = cli.markmap_bin {
        config = config.with_markmap_bin(bin);
    }
    if let Some(bin) = cli.mmdc_bin {
        config = config.with_mmdc_bin(bin);
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::debug!(renderers = ?config.renderers, "starting server");
            Arc::new(McpServer::new(config)).run().await?;
        }

        Commands::Tools => {
            let tools = McpServer::new(config).list_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "mindmap-mcp", &mut io::stdout());
        }
    }

    Ok(())
}
