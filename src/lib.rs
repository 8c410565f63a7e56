//! # VERA TUI
//!
//! A terminal companion app: gentle generated words, letters, images and a
//! journal, rendered as cards in the terminal.
//!
//! ## Features
//! - Words of support for a chosen situation
//! - Letters (support, future self, hard moments, from life)
//! - Image generation with style presets
//! - Journal with generated replies
//! - Library of favorites with tag filters
//! - Daily greeting, once per calendar day
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Provider Layer (Tokio runtime, generative text/image API)

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod provider;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::AppConfig;
pub use messages::{ProviderCommand, ProviderReply, RenderState, Screen, UiEvent};
pub use models::{ContentItem, ContentKind, JournalEntry, Mood, StyleOptions, Tone};
pub use provider::{GenerationClient, ProviderActor, ProviderError};
pub use storage::Storage;
