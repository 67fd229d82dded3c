//! CLI entrypoint for gatehouse
//!
//! Wires the layers together: loads configuration, registers the
//! built-in tools, runs capability discovery for provider tools, and
//! exposes the catalog through a few subcommands.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use gatehouse_application::{CapabilityDiscovery, DiscoveryMode, DiscoveryReport};
use gatehouse_domain::{ExecutionContext, ExecutionResult, ToolCatalog};
use gatehouse_infrastructure::{
    ConfigLoader, ConfigProviderStore, FileConfig, StdioClientFactory, register_builtin_tools,
};
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // The guard must outlive main so buffered log lines get flushed.
    let _log_guard = match &cli.log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or(std::path::Path::new("."));
            let filename = path.file_name().context("--log-file needs a file name")?;
            let appender = tracing_appender::rolling::never(directory, filename);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };
    info!(agent = %config.agent.id, "Starting gatehouse");

    match cli.command {
        Command::Tools { with_providers } => run_tools(&config, with_providers).await,
        Command::Call { name, args, auto } => run_call(&config, &name, &args, auto).await,
        Command::Providers => run_providers(&config),
    }
}

fn discovery(config: &FileConfig) -> CapabilityDiscovery {
    CapabilityDiscovery::new(
        Arc::new(ConfigProviderStore::new(config)),
        Arc::new(StdioClientFactory::new()),
    )
}

fn report_degradation(report: &DiscoveryReport) {
    for (provider, error) in &report.failed {
        eprintln!("warning: provider '{}' unavailable: {}", provider, error);
    }
}

async fn run_tools(config: &FileConfig, with_providers: bool) -> Result<()> {
    let mut catalog = ToolCatalog::new();
    register_builtin_tools(&mut catalog);

    if with_providers {
        let report = discovery(config)
            .prepare(&config.agent.tools, &mut catalog, DiscoveryMode::Selection)
            .await;
        report_degradation(&report);
    }

    for (category, tools) in catalog.list_by_category() {
        println!("{}:", category);
        for name in tools {
            let tool = catalog.get(&name)?;
            let gate = if tool.is_proposing() {
                " [requires approval]"
            } else {
                ""
            };
            println!("  {} ({}){}", name, tool.risk_level, gate);
        }
    }
    Ok(())
}

async fn run_call(config: &FileConfig, name: &str, raw_args: &str, auto: bool) -> Result<()> {
    let args: serde_json::Value =
        serde_json::from_str(raw_args).context("--args must be a JSON object")?;

    let mut catalog = ToolCatalog::new();
    register_builtin_tools(&mut catalog);

    let report = discovery(config)
        .prepare(&config.agent.tools, &mut catalog, DiscoveryMode::Usage)
        .await;
    report_degradation(&report);

    let ctx = ExecutionContext::new(&config.agent.id);
    let result = catalog.dispatch(name, args, &ctx).await?;

    let Some(ticket) = result.approval_request() else {
        print_result(&catalog, name, &result);
        if !result.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    };

    // Approval gate: confirm, then dispatch the executor with the
    // ticket's arguments unmodified.
    let risk = catalog.get(name)?.risk_level;
    let approved = if auto && risk.allows_auto_approval() {
        info!(tool = name, risk = %risk, "Auto-approving proposal");
        true
    } else {
        confirm(&ticket.message)?
    };
    if !approved {
        println!("Not approved, nothing executed.");
        return Ok(());
    }

    let result = catalog
        .dispatch(&ticket.execute_tool_name, ticket.execute_args, &ctx)
        .await?;
    print_result(&catalog, &ticket.execute_tool_name, &result);
    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_providers(config: &FileConfig) -> Result<()> {
    if config.providers.is_empty() {
        println!("No providers configured.");
        return Ok(());
    }
    for record in config.provider_records() {
        let state = if record.enabled { "enabled" } else { "disabled" };
        println!(
            "{} ({}) - {} {}",
            record.name,
            state,
            record.connection.command,
            record.connection.args.join(" ")
        );
    }
    Ok(())
}

fn confirm(message: &str) -> Result<bool> {
    print!("{} [y/N] ", message);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_result(catalog: &ToolCatalog, name: &str, result: &ExecutionResult) {
    if result.is_success() {
        if let Some(summary) = catalog.summary_for(name, result) {
            eprintln!("{}", summary);
        }
        match result.value() {
            Some(serde_json::Value::String(text)) => println!("{}", text),
            Some(value) => println!("{}", serde_json::to_string_pretty(value).unwrap_or_default()),
            None => {}
        }
    } else if let Some(error) = result.error() {
        eprintln!("error: {}", error);
    }
}
