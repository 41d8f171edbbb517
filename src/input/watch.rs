//! Change notifications for the watched input file.

use crate::error::{HumanloopError, Result};
use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// An active subscription to changes of a single file.
///
/// The parent directory is watched so that editors which save by writing a
/// new file and renaming it over the old one are still observed. Dropping the
/// subscription stops the underlying watcher.
pub struct FileSubscription {
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    file_name: OsString,
}

impl FileSubscription {
    /// Start watching `path`.
    pub fn watch(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                HumanloopError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?
            .to_os_string();

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let (tx, events) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        debug!(dir = %dir.display(), "Watching for input file changes");

        Ok(Self {
            _watcher: watcher,
            events,
            file_name,
        })
    }

    /// Wait for the next change that touches the watched file.
    ///
    /// Watcher errors are logged and skipped. Returns `None` only if the
    /// notification source shuts down.
    pub async fn next_change(&mut self) -> Option<()> {
        while let Some(res) = self.events.recv().await {
            match res {
                Ok(event) if self.is_relevant(&event) => return Some(()),
                Ok(_) => {}
                Err(e) => warn!("File watch error: {}", e),
            }
        }
        None
    }

    fn is_relevant(&self, event: &Event) -> bool {
        let kind_matches = matches!(
            event.kind,
            EventKind::Any
                | EventKind::Create(_)
                | EventKind::Modify(_)
                | EventKind::Access(AccessKind::Close(AccessMode::Write))
        );

        kind_matches
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_reports_write_to_watched_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.md");
        std::fs::write(&path, "initial").unwrap();

        let mut subscription = FileSubscription::watch(&path).unwrap();
        std::fs::write(&path, "changed").unwrap();

        let change = tokio::time::timeout(Duration::from_secs(10), subscription.next_change())
            .await
            .expect("no change event received");
        assert_eq!(change, Some(()));
    }

    #[tokio::test]
    async fn test_reports_rename_over_watched_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.md");
        std::fs::write(&path, "initial").unwrap();

        let mut subscription = FileSubscription::watch(&path).unwrap();

        // Save the way many editors do: write a sibling, then rename it over the file
        let swap = dir.path().join(".input.md.swp");
        std::fs::write(&swap, "saved via rename").unwrap();
        std::fs::rename(&swap, &path).unwrap();

        let change = tokio::time::timeout(Duration::from_secs(10), subscription.next_change())
            .await
            .expect("no change event received");
        assert_eq!(change, Some(()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "saved via rename");
    }

    #[tokio::test]
    async fn test_ignores_sibling_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.md");
        std::fs::write(&path, "initial").unwrap();

        let mut subscription = FileSubscription::watch(&path).unwrap();
        std::fs::write(dir.path().join("other.md"), "noise").unwrap();

        let change =
            tokio::time::timeout(Duration::from_millis(500), subscription.next_change()).await;
        assert!(change.is_err());
    }

    #[test]
    fn test_rejects_path_without_file_name() {
        assert!(FileSubscription::watch(Path::new("/")).is_err());
    }
}
