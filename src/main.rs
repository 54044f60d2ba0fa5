use anyhow::Result;
use clap::{Parser, ValueEnum};
use mcp_github_tools::{github, server};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// MCP server for GitHub: search repositories and code, manage issues, read files
#[derive(Parser)]
#[command(name = "mcp-github-tools", version, about)]
struct Cli {
    /// GitHub personal access token.
    /// Can also be set via GITHUB_TOKEN environment variable.
    #[arg(long)]
    token: Option<String>,

    /// Read GitHub token from an environment variable.
    /// Default: GITHUB_TOKEN
    #[arg(long = "token-env")]
    token_env: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise Server
    #[arg(long, env = "GITHUB_API_URL")]
    base_url: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format (logs always go to stderr)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_ansi(false).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_format)?;

    // Resolve token: --token > --token-env > GITHUB_TOKEN
    let token = if let Some(t) = cli.token {
        Some(t)
    } else {
        let env_name = cli.token_env.as_deref().unwrap_or("GITHUB_TOKEN");
        match std::env::var(env_name) {
            Ok(t) if !t.is_empty() => {
                tracing::info!(env = env_name, "Read GitHub token from environment variable");
                Some(t)
            }
            _ => None,
        }
    };

    if token.is_none() {
        tracing::warn!("No GitHub token provided; API rate limits will be very restrictive");
    }

    let github = github::build_client(token.as_deref(), cli.base_url.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to create GitHub client: {}", e))?;

    tracing::info!(
        authenticated = token.is_some(),
        base_url = cli.base_url.as_deref().unwrap_or("https://api.github.com"),
        tools = server::TOOL_NAMES.len(),
        "Starting mcp-github-tools server"
    );

    let service = server::McpGithubServer::new(github);
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}
