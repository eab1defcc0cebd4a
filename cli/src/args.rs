//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for code-foundry
#[derive(Parser, Debug)]
#[command(name = "code-foundry")]
#[command(author, version, about = "Plan, write, test and review a project with LLM agents")]
#[command(long_about = r#"
Code Foundry turns a project request into files through a team of agents:

1. Planner: breaks the request into a plan of tasks
2. Coder and Tester: implement each task, retrying failed attempts
3. Reviewer: checks the whole project and may schedule rework rounds

The conversation is compacted automatically before it outgrows the model's
context window.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./foundry.toml      Project-level config
3. ~/.config/code-foundry/config.toml   Global config

Example:
  code-foundry --output ./todo "A CLI todo app in Rust with SQLite storage"
  code-foundry -m gpt-4.1 --existing ./svc --output ./svc "Add a /health endpoint"
"#)]
pub struct Cli {
    /// The project request (not required with --show-config)
    pub request: Option<String>,

    /// Default model for every role without a configured override
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory the delivered files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Existing project directory to start from
    #[arg(long, value_name = "DIR")]
    pub existing: Option<PathBuf>,

    /// Attempts per task before it is marked failed
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_task_retries: Option<u32>,

    /// Review rework rounds before the run is blocked
    #[arg(long, value_name = "N")]
    pub max_reworks: Option<u32>,

    /// Context usage percentage that triggers compaction, in (0, 100]
    #[arg(long, value_name = "PERCENT")]
    pub threshold: Option<f64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory for the daily-rotated diagnostic log
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// JSONL transcript of agent calls and verdicts
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Save the final conversation here so a later run can resume it
    #[arg(long, value_name = "PATH")]
    pub context_snapshot: Option<PathBuf>,

    /// Resume from a conversation saved with --context-snapshot
    #[arg(long, value_name = "PATH")]
    pub resume_context: Option<PathBuf>,
}
