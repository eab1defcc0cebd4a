//! Child-process model transport.
//!
//! Runs a model CLI once per call: the prompt goes to the child's stdin and
//! the response is read from its stdout. Anything that speaks this
//! convention works (`llm`, `ollama run`, a wrapper script).

use async_trait::async_trait;
use foundry_application::ports::model_transport::{ModelTransport, TransportError};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Placeholder in `args` replaced by the requested model id.
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Maximum stderr characters carried in a [`TransportError::NonZeroExit`].
const MAX_STDERR_CHARS: usize = 2000;

/// [`ModelTransport`] that spawns a command per call.
#[derive(Debug, Clone)]
pub struct ProcessTransport {
    command: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessTransport {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments with the model placeholder substituted.
    pub fn args_for(&self, model_id: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(MODEL_PLACEHOLDER, model_id))
            .collect()
    }
}

#[async_trait]
impl ModelTransport for ProcessTransport {
    async fn invoke(&self, prompt: &str, model_id: &str) -> Result<String, TransportError> {
        let args = self.args_for(model_id);
        debug!(
            command = %self.command,
            ?args,
            prompt_bytes = prompt.len(),
            "Spawning model process"
        );

        let mut cmd = Command::new(&self.command);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out call drops this future; the child must not outlive it
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| TransportError::Spawn(format!("{}: {}", self.command, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::Spawn("Failed to capture stdin".to_string()))?;

        // Write concurrently with reading so a chatty child cannot deadlock on a full pipe
        let input = prompt.to_owned();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            result
        });

        let output = child.wait_with_output().await?;

        if let Ok(Err(e)) = writer.await
            && e.kind() != ErrorKind::BrokenPipe
        {
            return Err(TransportError::Io(e));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransportError::NonZeroExit {
                code: output.status.code(),
                stderr: stderr.trim().chars().take(MAX_STDERR_CHARS).collect(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() {
            return Err(TransportError::EmptyOutput);
        }

        debug!(response_bytes = stdout.len(), "Model process finished");
        Ok(stdout)
    }
}
