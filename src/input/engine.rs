//! The wait-for-input state machine.

use super::editor::EditorLauncher;
use super::marker::SubmissionParser;
use super::template;
use super::watch::FileSubscription;
use crate::error::{HumanloopError, Result};
use crate::session::Session;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a single wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// No wait outstanding.
    Idle,
    /// Writing the input file and opening the editor.
    Rendering,
    /// Subscribed to file changes, testing each save for a submission.
    Watching,
    /// A message was accepted; history is being updated.
    Resolved,
}

/// Blocks until a human submits a message through the input file.
///
/// At most one wait runs at a time. A call made while another is outstanding
/// fails with [`HumanloopError::WaitInProgress`] and leaves the running wait
/// untouched.
pub struct WaitEngine {
    session: Arc<Session>,
    launcher: Arc<dyn EditorLauncher>,
    parser: SubmissionParser,
    state: Mutex<WaitState>,
}

impl WaitEngine {
    pub fn new(session: Arc<Session>, launcher: Arc<dyn EditorLauncher>) -> Self {
        Self {
            session,
            launcher,
            parser: SubmissionParser::new(),
            state: Mutex::new(WaitState::Idle),
        }
    }

    /// Current state of the engine.
    pub fn state(&self) -> WaitState {
        *lock(&self.state)
    }

    /// Wait for the next submitted message and record it in the history.
    ///
    /// There is no timeout. Dropping the returned future abandons the wait and
    /// releases the file watch.
    #[instrument(skip(self), fields(path = %self.session.input_file().display()))]
    pub async fn wait_for_user_input(&self) -> Result<String> {
        let pending = PendingWait::begin(&self.state)?;
        let path = self.session.input_file();

        let history = self.session.history().await;
        write_input_file(path, &template::render(&history)).await?;
        debug!(entries = history.len(), "Input file rendered");

        self.launcher.open(path).await;

        let mut subscription = FileSubscription::watch(path)?;
        pending.advance(WaitState::Watching);
        info!("Waiting for user input");

        let message = loop {
            subscription
                .next_change()
                .await
                .ok_or(HumanloopError::WatchClosed)?;

            match tokio::fs::read_to_string(path).await {
                Ok(content) => match self.parser.extract(&content) {
                    Some(message) => break message,
                    None => debug!("Change without a complete submission"),
                },
                Err(e) => warn!("Failed to read input file: {}", e),
            }
        };

        drop(subscription);
        pending.advance(WaitState::Resolved);

        let entry = self.session.record(message.clone()).await;
        info!(timestamp = %entry.timestamp, chars = message.len(), "User message received");

        Ok(message)
    }
}

/// Claim on the engine for the duration of one wait. Returns it to idle on drop.
struct PendingWait<'a> {
    state: &'a Mutex<WaitState>,
}

impl<'a> PendingWait<'a> {
    fn begin(state: &'a Mutex<WaitState>) -> Result<Self> {
        let mut current = lock(state);
        if *current != WaitState::Idle {
            return Err(HumanloopError::WaitInProgress);
        }
        *current = WaitState::Rendering;
        Ok(Self { state })
    }

    fn advance(&self, next: WaitState) {
        *lock(self.state) = next;
    }
}

impl Drop for PendingWait<'_> {
    fn drop(&mut self) {
        *lock(self.state) = WaitState::Idle;
    }
}

fn lock(state: &Mutex<WaitState>) -> MutexGuard<'_, WaitState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

async fn write_input_file(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, body).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::editor::NoEditor;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::task::JoinHandle;

    fn engine() -> (TempDir, Arc<WaitEngine>) {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(Session::new(dir.path().join("input.md")));
        let engine = Arc::new(WaitEngine::new(session, Arc::new(NoEditor)));
        (dir, engine)
    }

    fn start(engine: &Arc<WaitEngine>) -> JoinHandle<Result<String>> {
        let engine = Arc::clone(engine);
        tokio::spawn(async move { engine.wait_for_user_input().await })
    }

    async fn until_watching(engine: &WaitEngine) {
        for _ in 0..500 {
            if engine.state() == WaitState::Watching {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("engine never started watching");
    }

    async fn finish(handle: JoinHandle<Result<String>>) -> String {
        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .expect("wait did not resolve")
            .unwrap()
            .unwrap()
    }

    async fn submit(engine: &Arc<WaitEngine>, text: &str) -> String {
        let handle = start(engine);
        until_watching(engine).await;
        tokio::fs::write(engine.session.input_file(), format!("{}\n//SEND", text))
            .await
            .unwrap();
        finish(handle).await
    }

    #[tokio::test]
    async fn test_resolves_on_marked_save() {
        let (_dir, engine) = engine();
        let path = engine.session.input_file().to_path_buf();

        let handle = start(&engine);
        until_watching(&engine).await;

        let rendered = std::fs::read_to_string(&path).unwrap();
        assert_eq!(rendered, template::render(&[]));

        std::fs::write(&path, "Test message\n//SEND").unwrap();
        assert_eq!(finish(handle).await, "Test message");

        let history = engine.session.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "Test message");
        // Watch released and engine ready for the next call
        assert_eq!(engine.state(), WaitState::Idle);
    }

    #[tokio::test]
    async fn test_unmarked_saves_do_not_resolve() {
        let (_dir, engine) = engine();
        let path = engine.session.input_file().to_path_buf();

        let handle = start(&engine);
        until_watching(&engine).await;

        std::fs::write(&path, "draft without a marker").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(&path, "   \n//SEND\n").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(&path, "").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!handle.is_finished());
        assert_eq!(engine.state(), WaitState::Watching);
        assert!(engine.session.history().await.is_empty());

        std::fs::write(&path, "final answer\n//send").unwrap();
        assert_eq!(finish(handle).await, "final answer");
    }

    #[tokio::test]
    async fn test_second_wait_is_rejected() {
        let (_dir, engine) = engine();
        let path = engine.session.input_file().to_path_buf();

        let handle = start(&engine);
        until_watching(&engine).await;
        std::fs::write(&path, "half written").unwrap();

        let second = tokio_test::assert_err!(engine.wait_for_user_input().await);
        assert!(matches!(second, HumanloopError::WaitInProgress));

        // The running wait keeps its file and its watch
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "half written");
        assert_eq!(engine.state(), WaitState::Watching);

        std::fs::write(&path, "half written, now done\n//SEND").unwrap();
        assert_eq!(finish(handle).await, "half written, now done");
    }

    #[tokio::test]
    async fn test_history_is_replayed_in_order() {
        let (_dir, engine) = engine();

        assert_eq!(submit(&engine, "a").await, "a");
        assert_eq!(submit(&engine, "b").await, "b");

        let handle = start(&engine);
        until_watching(&engine).await;

        let rendered = std::fs::read_to_string(engine.session.input_file()).unwrap();
        let a = rendered.find("USER: a").unwrap();
        let b = rendered.find("USER: b").unwrap();
        assert!(a < b);
        assert!(rendered.contains(template::REGION_START));

        handle.abort();
    }

    #[tokio::test]
    async fn test_survives_file_removal() {
        let (_dir, engine) = engine();
        let path = engine.session.input_file().to_path_buf();

        let handle = start(&engine);
        until_watching(&engine).await;

        std::fs::remove_file(&path).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!handle.is_finished());

        std::fs::write(&path, "recreated\n//SEND").unwrap();
        assert_eq!(finish(handle).await, "recreated");
    }

    #[tokio::test]
    async fn test_dropped_wait_returns_to_idle() {
        let (_dir, engine) = engine();

        let wait = engine.wait_for_user_input();
        let result = tokio::time::timeout(Duration::from_millis(300), wait).await;
        assert!(result.is_err());

        assert_eq!(engine.state(), WaitState::Idle);
        assert!(engine.session.history().await.is_empty());
    }
}
