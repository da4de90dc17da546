//! `linkpulse` command line entry point.
//!
//! # Usage
//!
//! ```bash
//! # Start the HTTP server, click workers and health monitor
//! linkpulse run-server
//!
//! # Shorten one or more URLs
//! linkpulse create --url https://example.com/some/long/path
//! linkpulse create --url https://a.example --url https://b.example
//! linkpulse create --url '["https://a.example", "https://b.example"]'
//!
//! # Show click statistics for a short code
//! linkpulse stats --code aB3xYz
//!
//! # Apply database migrations
//! linkpulse migrate
//!
//! # Use another configuration file
//! linkpulse --config /etc/linkpulse.yaml run-server
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use linkpulse::application::services::LinkService;
use linkpulse::config::{Config, LoggingConfig};
use linkpulse::error::AppError;
use linkpulse::infrastructure::database;
use linkpulse::infrastructure::persistence::SqliteLinkRepository;
use linkpulse::server;

/// URL shortener with click analytics and destination monitoring.
#[derive(Parser)]
#[command(name = "linkpulse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create short links for one or more URLs
    Create {
        /// URL to shorten. Repeatable; also accepts a JSON array of URLs
        #[arg(long = "url", required = true, action = ArgAction::Append)]
        urls: Vec<String>,
    },

    /// Show click statistics for a short link
    Stats {
        /// The short code to inspect
        #[arg(long)]
        code: String,
    },

    /// Apply database migrations
    Migrate,

    /// Run the HTTP server
    RunServer,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = linkpulse::config::load(cli.config.as_deref())?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Create { urls } => handle_create(&config, &urls).await,
        Commands::Stats { code } => handle_stats(&config, code).await,
        Commands::Migrate => handle_migrate(&config).await,
        Commands::RunServer => {
            config.print_summary();
            server::run(config).await
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn link_service(config: &Config) -> Result<LinkService<SqliteLinkRepository>> {
    let pool = database::connect(&config.database.name).await?;
    database::run_migrations(&pool).await?;

    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
    Ok(LinkService::new(repository, config.server.base_url.as_str()))
}

/// Shortens every URL given with `--url`.
///
/// All URLs are validated before any link is created. A failed creation is
/// reported and the remaining URLs are still processed; the command fails
/// only if no link was created.
async fn handle_create(config: &Config, args: &[String]) -> Result<()> {
    let urls = parse_url_args(args)?;
    for (i, url) in urls.iter().enumerate() {
        validate_url(url).with_context(|| format!("URL #{} is invalid", i + 1))?;
    }

    let service = link_service(config).await?;
    let total = urls.len();
    let mut created = 0;

    println!(
        "{}",
        format!("Creating short links for {total} URL(s)").bright_blue().bold()
    );
    println!();

    for (i, url) in urls.into_iter().enumerate() {
        println!("[{}/{}] {}", i + 1, total, url.cyan());

        match service.create_link(url).await {
            Ok(link) => {
                created += 1;
                println!("  {}", "Short link created".green());
                println!("    Code:      {}", link.short_code.bright_yellow().bold());
                println!(
                    "    Short URL: {}",
                    service.short_url(&link.short_code).bright_cyan()
                );
            }
            Err(e) => {
                println!("  {} {}", "Failed:".red().bold(), e);
            }
        }
        println!();
    }

    if created == total {
        println!(
            "{}",
            format!("All {total} URL(s) shortened successfully").green().bold()
        );
    } else {
        println!(
            "{}",
            format!("{created} out of {total} URL(s) shortened successfully").yellow().bold()
        );
    }

    if created == 0 {
        anyhow::bail!("No short links were created");
    }

    Ok(())
}

/// Expands `--url` values into individual URLs.
///
/// Each value is either a single URL or an array of URLs: JSON
/// (`["https://a.example"]`), single-quoted (`['https://a.example']`) or
/// unquoted (`[https://a.example, https://b.example]`).
fn parse_url_args(args: &[String]) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for arg in args {
        urls.extend(parse_url_arg(arg)?);
    }

    if urls.is_empty() {
        anyhow::bail!("No URLs given");
    }
    Ok(urls)
}

fn parse_url_arg(arg: &str) -> Result<Vec<String>> {
    let arg = arg.trim();
    if !(arg.starts_with('[') && arg.ends_with(']')) {
        return Ok(vec![arg.to_string()]);
    }

    let urls = serde_json::from_str::<Vec<String>>(arg)
        .or_else(|_| serde_json::from_str::<Vec<String>>(&arg.replace('\'', "\"")))
        .unwrap_or_else(|_| {
            arg[1..arg.len() - 1]
                .split(',')
                .map(|part| part.trim().trim_matches(['\'', '"']).to_string())
                .collect()
        });

    let urls: Vec<String> = urls
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();

    if urls.is_empty() {
        anyhow::bail!("URL array '{arg}' is empty");
    }
    Ok(urls)
}

fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL '{url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Invalid URL '{url}': only http and https are supported");
    }
    Ok(())
}

/// Prints click statistics for `code`.
async fn handle_stats(config: &Config, code: String) -> Result<()> {
    let service = link_service(config).await?;

    let stats = match service.get_link_stats(&code).await {
        Ok(stats) => stats,
        Err(AppError::NotFound { .. }) => {
            anyhow::bail!("No link found for short code '{code}'");
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to load statistics: {}", e)),
    };

    println!("{}", "Link statistics".bright_blue().bold());
    println!("  Code:         {}", stats.link.short_code.bright_yellow());
    println!("  Long URL:     {}", stats.link.long_url.cyan());
    println!(
        "  Created:      {}",
        stats
            .link
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!(
        "  Total clicks: {}",
        stats.total_clicks.to_string().bright_white().bold()
    );

    Ok(())
}

async fn handle_migrate(config: &Config) -> Result<()> {
    let pool = database::connect(&config.database.name).await?;
    database::run_migrations(&pool).await?;
    pool.close().await;

    println!(
        "{} {}",
        "Migrations applied to".green(),
        config.database.name.bright_white().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_single_url() {
        let urls = parse_url_args(&args(&["https://example.com"])).unwrap();
        assert_eq!(urls, vec!["https://example.com"]);
    }

    #[test]
    fn test_repeated_flag() {
        let urls = parse_url_args(&args(&["https://a.example", " https://b.example "])).unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_json_array() {
        let urls =
            parse_url_args(&args(&[r#"["https://a.example", "https://b.example"]"#])).unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_single_quoted_array() {
        let urls = parse_url_args(&args(&["['https://a.example','https://b.example']"])).unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_unquoted_array() {
        let urls = parse_url_args(&args(&["[https://a.example, https://b.example]"])).unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_array_mixed_with_single_url() {
        let urls = parse_url_args(&args(&[
            r#"["https://a.example"]"#,
            "https://b.example",
        ]))
        .unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_empty_array_is_rejected() {
        assert!(parse_url_args(&args(&["[]"])).is_err());
        assert!(parse_url_args(&args(&["[ , ]"])).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/path").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_cli_accepts_repeated_url() {
        let cli = Cli::try_parse_from([
            "linkpulse",
            "create",
            "--url",
            "https://a.example",
            "--url",
            "https://b.example",
        ])
        .unwrap();

        match cli.command {
            Commands::Create { urls } => {
                assert_eq!(urls, vec!["https://a.example", "https://b.example"])
            }
            _ => panic!("expected create command"),
        }
    }

    #[test]
    fn test_cli_requires_url() {
        assert!(Cli::try_parse_from(["linkpulse", "create"]).is_err());
    }
}
