//! CLI entrypoint for Code Foundry
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod args;

use anyhow::{Context, Result, anyhow, bail};
use args::Cli;
use clap::Parser;
use foundry_application::{
    OrchestrateInput, OrchestrateUseCase, OrchestrationParams, RoleModels, RunOutput,
};
use foundry_domain::{CompactionPolicy, ContextManager, ModelConfigRegistry, RunOutcome};
use foundry_infrastructure::{
    ConfigLoader, FileConfig, FileSetStore, FileTransportConfig, JsonlConversationLogger,
    ProcessTransport, TracingRunObserver,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status when the reviewer still rejects the project after every rework round.
const EXIT_BLOCKED: u8 = 2;

const LOG_FILE_PREFIX: &str = "code-foundry.log";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        print_config_locations();
        return Ok(ExitCode::SUCCESS);
    }

    let Some(request) = cli.request.clone() else {
        bail!("A project request is required. Run with --help for usage.");
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.file.clone());
    let _log_guard = init_tracing(cli.verbose, log_dir.as_deref());

    info!("Starting Code Foundry");

    for issue in config.validate() {
        warn!("config {}", issue);
    }

    let models = role_models(&config, &cli);
    let params = orchestration_params(&config, &cli);

    // === Dependency Injection ===
    let transport_config = if config.transport.command.trim().is_empty() {
        FileTransportConfig::default()
    } else {
        config.transport.clone()
    };
    let transport = Arc::new(ProcessTransport::new(
        transport_config.command,
        transport_config.args,
    ));

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            ctrl_c_token.cancel();
        }
    });

    let mut use_case = OrchestrateUseCase::new(transport, models)
        .with_params(params.clone())
        .with_cancellation(cancellation);

    if let Some(path) = cli
        .conversation_log
        .clone()
        .or_else(|| config.logging.conversation_log.clone())
    {
        match JsonlConversationLogger::new(&path) {
            Some(logger) => use_case = use_case.with_conversation_logger(Arc::new(logger)),
            None => warn!("Conversation log disabled: cannot open {}", path.display()),
        }
    }

    let mut input = OrchestrateInput::new(request);

    if let Some(dir) = &cli.existing {
        let files = FileSetStore::new(dir)
            .load()
            .with_context(|| format!("Failed to load existing project {}", dir.display()))?;
        info!(files = files.len(), "Loaded existing project");
        input = input.with_existing_files(files);
    }

    if let Some(path) = &cli.resume_context {
        let snapshot = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context snapshot {}", path.display()))?;
        let context = ContextManager::restore(&snapshot, params.compaction.clone())
            .with_context(|| format!("Invalid context snapshot {}", path.display()))?;
        input = input.with_resume_context(context);
    }

    let output = use_case
        .execute_with_observer(input, &TracingRunObserver)
        .await?;

    deliver(&cli, &output)?;

    match &output.outcome {
        RunOutcome::Delivered => Ok(ExitCode::SUCCESS),
        RunOutcome::Blocked { blockers } => {
            eprintln!("Blocked after {} review round(s):", output.review_rounds);
            for blocker in blockers {
                eprintln!("  - {}", blocker);
            }
            Ok(ExitCode::from(EXIT_BLOCKED))
        }
    }
}

/// Initialize logging based on verbosity level.
///
/// The returned guard flushes the file log on drop and must outlive the run.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::new(verbosity_directive(verbose));

    let appender = log_dir.and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(dir)
            .map_err(|e| eprintln!("warning: file logging disabled: {}", e))
            .ok()
    });
    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    }
}

fn role_models(config: &FileConfig, cli: &Cli) -> RoleModels {
    let (mut models, _) = config.role_models();
    if let Some(model) = &cli.model {
        if !ModelConfigRegistry::is_known(model) {
            warn!(
                "Unknown model '{}', assuming an 8192-token context window",
                model
            );
        }
        models.default = model.clone();
    }
    models
}

/// Config-file parameters with command-line overrides applied.
fn orchestration_params(config: &FileConfig, cli: &Cli) -> OrchestrationParams {
    let (mut params, _) = config.orchestration_params();

    if let Some(max) = cli.max_task_retries {
        params = params.with_max_task_retries(max);
    }
    if let Some(max) = cli.max_reworks {
        params = params.with_max_review_reworks(max);
    }
    if let Some(threshold) = cli.threshold {
        match CompactionPolicy::try_new(threshold, params.compaction.keep_recent()) {
            Ok(policy) => params = params.with_compaction(policy),
            Err(e) => warn!("Ignoring --threshold: {}", e),
        }
    }
    params
}

/// Print the report and persist the run's artifacts.
fn deliver(cli: &Cli, output: &RunOutput) -> Result<()> {
    println!("{}", output.report.content);

    match &cli.output {
        Some(dir) => {
            let written = FileSetStore::new(dir)
                .write(&output.files)
                .with_context(|| format!("Failed to write files to {}", dir.display()))?;
            eprintln!("Wrote {} file(s) to {}", written.len(), dir.display());
        }
        None => {
            eprintln!("Files (pass --output <DIR> to write them):");
            for path in output.files.keys() {
                eprintln!("  {}", path);
            }
        }
    }

    if let Some(path) = &cli.context_snapshot {
        let snapshot = output.context.snapshot()?;
        std::fs::write(path, snapshot)
            .with_context(|| format!("Failed to save context snapshot {}", path.display()))?;
        info!(path = %path.display(), "Saved context snapshot");
    }

    eprintln!(
        "{} | compactions: {} | review rounds: {}",
        output.context_status, output.compactions, output.review_rounds
    );
    Ok(())
}

fn print_config_locations() {
    let describe = |path: Option<std::path::PathBuf>| match path {
        Some(p) if p.exists() => format!("{} (found)", p.display()),
        Some(p) => format!("{} (not found)", p.display()),
        None => "(unavailable)".to_string(),
    };
    println!("Global config:  {}", describe(ConfigLoader::global_config_path()));
    println!("Project config: {}", describe(ConfigLoader::project_config_path()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_domain::AgentRole;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["code-foundry"];
        argv.extend_from_slice(args);
        argv.push("request");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(verbosity_directive(0), "warn");
        assert_eq!(verbosity_directive(1), "info");
        assert_eq!(verbosity_directive(2), "debug");
        assert_eq!(verbosity_directive(7), "trace");
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = FileConfig::default();
        config.orchestration.max_task_retries = 5;
        config.models.reviewer = Some("claude-opus-4".to_string());

        let cli = cli(&[
            "--model",
            "gpt-4o",
            "--max-task-retries",
            "2",
            "--max-reworks",
            "0",
            "--threshold",
            "60",
        ]);
        let params = orchestration_params(&config, &cli);
        assert_eq!(params.max_task_retries, 2);
        assert_eq!(params.max_review_reworks, 0);
        assert_eq!(params.compaction.threshold_percent(), 60.0);

        let models = role_models(&config, &cli);
        assert_eq!(models.model_for(AgentRole::Coder), "gpt-4o");
        assert_eq!(models.model_for(AgentRole::Reviewer), "claude-opus-4");
    }

    #[test]
    fn test_invalid_threshold_keeps_config_value() {
        let mut config = FileConfig::default();
        config.context.compaction_threshold = 70.0;

        let params = orchestration_params(&config, &cli(&["--threshold", "150"]));
        assert_eq!(params.compaction.threshold_percent(), 70.0);
    }

    #[test]
    fn test_config_used_without_overrides() {
        let config = FileConfig::default();
        let params = orchestration_params(&config, &cli(&[]));
        assert_eq!(params.max_task_retries, 3);
        assert_eq!(params.max_review_reworks, 2);
        assert_eq!(params.compaction.threshold_percent(), 80.0);
    }
}
