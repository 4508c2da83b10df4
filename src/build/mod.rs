//! Production build invocation.
//!
//! The bundler belongs to the rendering layer; this module only runs it.
//! In build mode the startup sequencer keeps the listener up transiently,
//! awaits one bundler run, and exits with its verdict.

use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::Command;

use crate::config::BuildConfig;

/// Errors from a bundler run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to spawn bundler `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bundler exited with {status}")]
    Failed { status: ExitStatus },
}

/// Runs the configured bundler command to completion.
pub struct Bundler {
    config: BuildConfig,
}

impl Bundler {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Spawn the bundler once and wait for it.
    ///
    /// Stdout/stderr are inherited: build output belongs on the console,
    /// not in our log stream.
    pub async fn run(&self) -> Result<(), BuildError> {
        tracing::info!(
            command = %self.config.command,
            args = ?self.config.args,
            dir = %self.config.dir,
            "Running production build"
        );

        let status = Command::new(&self.config.command)
            .args(&self.config.args)
            .current_dir(&self.config.dir)
            .status()
            .await
            .map_err(|source| BuildError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        if status.success() {
            tracing::info!("Production build finished");
            Ok(())
        } else {
            Err(BuildError::Failed { status })
        }
    }
}
