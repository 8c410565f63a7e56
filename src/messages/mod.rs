//! Message types - communication between UI, App and Provider layers

pub mod provider;
pub mod render;
pub mod ui_events;

pub use provider::{ImageSource, ProviderCommand, ProviderReply};
pub use render::RenderState;
pub use ui_events::{Screen, UiEvent};
