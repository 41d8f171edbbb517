//! Best-effort editor launch for the input file.

use crate::config::EditorSettings;
use crate::error::{HumanloopError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Something that can put the input file in front of a human.
///
/// Launching is fire-and-forget: implementations log their failures and never
/// report them to the caller.
#[async_trait]
pub trait EditorLauncher: Send + Sync {
    async fn open(&self, path: &Path);
}

/// Launcher that does nothing. Used when editor launch is disabled.
pub struct NoEditor;

#[async_trait]
impl EditorLauncher for NoEditor {
    async fn open(&self, path: &Path) {
        debug!("Editor launch disabled; input file is {}", path.display());
    }
}

/// Tries a ranked list of editor programs until one starts.
pub struct CommandLauncher {
    candidates: Vec<String>,
    reuse_window_flag: String,
}

impl CommandLauncher {
    pub fn new(candidates: Vec<String>, reuse_window_flag: impl Into<String>) -> Self {
        Self {
            candidates,
            reuse_window_flag: reuse_window_flag.into(),
        }
    }

    /// Spawn a single candidate without waiting for it to exit.
    fn attempt(&self, program: &str, path: &Path) -> Result<()> {
        let resolved = which::which(program)
            .map_err(|e| HumanloopError::EditorLaunch(format!("{}: {}", program, e)))?;

        let mut command = Command::new(resolved);
        if !self.reuse_window_flag.is_empty() {
            command.arg(&self.reuse_window_flag);
        }

        // Never inherit stdout: it carries the JSON-RPC stream
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HumanloopError::EditorLaunch(format!("{}: {}", program, e)))?;

        Ok(())
    }
}

#[async_trait]
impl EditorLauncher for CommandLauncher {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn open(&self, path: &Path) {
        for program in &self.candidates {
            match self.attempt(program, path) {
                Ok(()) => {
                    info!(editor = %program, "Opened input file in editor");
                    return;
                }
                Err(e) => debug!("Editor attempt failed: {}", e),
            }
        }

        warn!(
            "Could not open an editor; edit {} manually",
            path.display()
        );
    }
}

/// Build the launcher described by the editor settings.
pub fn launcher_from_settings(settings: &EditorSettings) -> Arc<dyn EditorLauncher> {
    if settings.enabled && !settings.candidates.is_empty() {
        Arc::new(CommandLauncher::new(
            settings.candidates.clone(),
            settings.reuse_window_flag.clone(),
        ))
    } else {
        Arc::new(NoEditor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_editor_is_an_error() {
        let launcher = CommandLauncher::new(vec![], "--reuse-window");
        let result = launcher.attempt("humanloop-no-such-editor", Path::new("/tmp/x.md"));
        assert!(matches!(result, Err(HumanloopError::EditorLaunch(_))));
    }

    #[tokio::test]
    async fn test_open_never_fails() {
        let launcher = CommandLauncher::new(
            vec![
                "humanloop-no-such-editor".to_string(),
                "humanloop-also-missing".to_string(),
            ],
            "--reuse-window",
        );
        launcher.open(Path::new("/tmp/x.md")).await;
    }
}
