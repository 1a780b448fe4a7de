//! # Narrative Engine
//!
//! Drives conversations over the content graph of `adventure_rules` and
//! exposes one [`Session`] per player to the presentation layer.
//!
//! ## Core Components
//!
//! - **dialogue**: the idle/active state machine, option guards and stale
//!   choice detection
//! - **session**: the facade the UI calls, plus serialisable snapshots
//! - **console**: the M.A.R.C. console answering free-text questions from a
//!   script
//! - **presentation**: typewriter and thinking-delay timers that only pace
//!   how settled state is shown
//! - **config**: engine tunables loaded from TOML
//!
//! The engine never installs a tracing subscriber; that is up to the binary.

pub mod config;
pub mod console;
pub mod dialogue;
pub mod error;
pub mod presentation;
pub mod session;

pub use config::EngineConfig;
pub use console::{Console, ConsoleReply, ConsoleScript, PendingReply, ReplySource};
pub use dialogue::{
    Choice, DialogueEngine, DialogueState, EndReason, GuardFailure, PresentedOption, Selection,
    Transition,
};
pub use error::{ConfigError, DialogueError};
pub use presentation::{ThinkingDelay, Typewriter};
pub use session::{Session, SessionId, Snapshot};
