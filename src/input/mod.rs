//! Waiting for a human to write into the input file.
//!
//! The [`WaitEngine`] renders the conversation so far into the watched file,
//! tries to open it in an editor, then watches the file until a save ends
//! with the `//SEND` marker and carries a non-empty message.

mod editor;
mod engine;
mod marker;
pub mod template;
mod watch;

pub use editor::{launcher_from_settings, CommandLauncher, EditorLauncher, NoEditor};
pub use engine::{WaitEngine, WaitState};
pub use marker::SubmissionParser;
pub use watch::FileSubscription;
