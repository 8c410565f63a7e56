//! Provider layer - talks to the generative text/image service in a Tokio runtime

pub mod actor;
pub mod client;
pub mod error;
pub mod retry;

pub use actor::ProviderActor;
pub use client::GenerationClient;
pub use error::ProviderError;
