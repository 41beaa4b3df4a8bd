//! CLI entrypoint for conductor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod presenter;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use commands::{Cli, Command};
use conductor_application::{Executor, NotificationManager};
use conductor_domain::{Arguments, History, SafetyContext, SafetyValidator};
use conductor_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditLogger, OsDesktopAlert, RegexSecretRedactor,
    ScriptedConversation, ScriptedLlmClient, StaticPermissionPolicy, ToolRegistry,
    TruncatingCompactor,
};
use presenter::ConsolePresenter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting conductor");

    match cli.command {
        Command::Check {
            tool,
            args,
            confirmed,
        } => run_check(&tool, args.as_deref(), confirmed),
        Command::Replay {
            script,
            message,
            confirmed,
            working_dir,
            quiet,
        } => {
            let config = load_config(cli.config.as_ref(), cli.no_config)?;
            run_replay(config, &script, message, confirmed, working_dir, quiet).await
        }
        Command::Config => {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            let config = load_config(cli.config.as_ref(), cli.no_config)?;
            println!();
            println!("Effective configuration:");
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "conductor.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

fn load_config(path: Option<&PathBuf>, no_config: bool) -> Result<FileConfig> {
    let config = if no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn parse_arguments(json: Option<&str>) -> Result<Arguments> {
    match json {
        Some(json) => serde_json::from_str(json).context("--args must be a JSON object"),
        None => Ok(Arguments::new()),
    }
}

/// `conductor check`: pre-flight and summary for one call.
fn run_check(tool: &str, args: Option<&str>, confirmed: bool) -> Result<()> {
    let args = parse_arguments(args)?;
    let validator = SafetyValidator::new();
    let meta = validator.metadata(tool);
    let check = validator.pre_flight(tool, &args, &SafetyContext { confirmed });
    let summary = validator.get_summary(tool, &args);

    println!(
        "{} {} ({}, {})",
        "Tool:".bold(),
        meta.display_name,
        meta.category.as_str(),
        summary.risk_level
    );
    println!("{} {}", "Action:".bold(), summary.describe());
    println!(
        "{} {}",
        "Approval:".bold(),
        if summary.requires_approval {
            "required"
        } else {
            "not required"
        }
    );

    print_list("Errors", &check.errors, |s| s.red().to_string());
    print_list("Warnings", &check.warnings, |s| s.yellow().to_string());
    print_list("Requirements", &check.requirements, |s| s.to_string());
    print_list("Suggestions", &check.suggestions, |s| s.dimmed().to_string());

    if !check.is_valid {
        bail!("Pre-flight failed: {}", check.error_message());
    }
    println!("{}", "Pre-flight passed".green().bold());
    Ok(())
}

fn print_list(title: &str, items: &[String], style: impl Fn(&str) -> String) {
    if items.is_empty() {
        return;
    }
    println!("{}:", title.bold());
    for item in items {
        println!("  - {}", style(item));
    }
}

/// `conductor replay`: run the executor against a scripted model.
async fn run_replay(
    config: FileConfig,
    script: &Path,
    message: Option<String>,
    confirmed: bool,
    working_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let conversation = ScriptedConversation::from_path(script)?;
    let message = message
        .or_else(|| conversation.message.clone())
        .unwrap_or_else(|| "Replay the scripted session".to_string());

    // === Dependency Injection ===
    let llm = Arc::new(ScriptedLlmClient::from_conversation(conversation));
    let tools = Arc::new(ToolRegistry::with_builtins());

    let mut exec_config = config.executor.to_executor_config();
    if confirmed {
        exec_config = exec_config.with_confirmed(true);
    }
    if let Some(dir) = working_dir {
        exec_config = exec_config.with_working_dir(dir);
    }

    let permissions = StaticPermissionPolicy::new()
        .allow(config.permissions.allow.iter().cloned())
        .deny(config.permissions.deny.iter().cloned())
        .ask_dangerous(config.permissions.ask_dangerous)
        .confirmed(exec_config.confirmed);

    let mut notifications = NotificationManager::new(config.notifications.to_notification_config());
    if config.notifications.os_alerts {
        notifications = notifications.with_alert(Arc::new(OsDesktopAlert::new()));
    }
    let notifications = Arc::new(notifications);

    let mut builder = Executor::builder(llm, tools)
        .config(exec_config)
        .permissions(Arc::new(permissions))
        .notifications(Arc::clone(&notifications))
        .handler(Arc::new(ConsolePresenter::new(quiet)));

    if config.audit.enabled {
        let path = config.audit.resolved_path();
        match JsonlAuditLogger::new(&path) {
            Some(logger) => builder = builder.audit(Arc::new(logger)),
            None => warn!("Audit log disabled: cannot open {}", path.display()),
        }
    }
    if config.redaction.enabled {
        let redactor = RegexSecretRedactor::new()
            .with_extra_patterns(&config.redaction.extra_patterns)
            .context("Invalid redaction pattern")?;
        builder = builder.redactor(Arc::new(redactor));
    }
    if config.compaction.enabled {
        let compactor = TruncatingCompactor::new(config.compaction.max_chars)
            .with_tool_limits(config.compaction.tool_limits.clone());
        builder = builder.compactor(Arc::new(compactor));
    }

    let executor = builder.build();

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut history = History::new();
    let output = executor.execute(&cancel, &mut history, &message).await?;

    println!("{}", output.final_text);

    if quiet {
        return Ok(());
    }

    eprintln!();
    eprintln!(
        "{} {} iteration(s), {} tool call(s), {} in / {} out tokens{}",
        "Done:".bold(),
        output.iterations,
        output.tools_used.len(),
        output.usage.input_tokens,
        output.usage.output_tokens,
        if output.used_fallback {
            " (fallback answer)".yellow().to_string()
        } else {
            String::new()
        }
    );

    let stats = notifications.stats();
    let mut by_type: Vec<_> = stats.by_type.iter().collect();
    by_type.sort_by_key(|(kind, _)| kind.as_str());
    let counts = by_type
        .iter()
        .map(|(kind, count)| format!("{}={}", kind, count))
        .collect::<Vec<_>>()
        .join(", ");
    eprintln!("{} {} total ({})", "Notifications:".bold(), stats.total, counts);

    for breaker in executor
        .circuit_stats()
        .into_iter()
        .filter(|b| b.consecutive_failures > 0)
    {
        eprintln!(
            "{} {} {:?} ({}/{} failures)",
            "Breaker:".bold(),
            breaker.name,
            breaker.state,
            breaker.consecutive_failures,
            breaker.failure_threshold
        );
    }

    Ok(())
}
