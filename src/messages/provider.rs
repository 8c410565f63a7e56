//! Provider messages - communication between App and Provider layers

use std::path::PathBuf;

use crate::models::StyleOptions;

/// Where a generated image lives
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Inline base64 payload, rendered as a `data:` URI
    DataUri(String),
    /// Hosted image, already validated as reachable
    Url(String),
}

impl ImageSource {
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::DataUri(uri) => uri,
            ImageSource::Url(url) => url,
        }
    }
}

/// Commands sent from App layer to Provider layer
#[derive(Debug, Clone)]
pub enum ProviderCommand {
    /// Generate a word of support for a situation
    GenerateWord {
        id: u64,
        situation: String,
        style: StyleOptions,
    },
    /// Generate a letter of the given type
    GenerateLetter {
        id: u64,
        label: String,
        context: String,
        style: StyleOptions,
    },
    /// Generate a reply to a journal entry
    GenerateJournalReply {
        id: u64,
        user_text: String,
    },
    /// Generate the once-a-day greeting
    GenerateDaily {
        id: u64,
    },
    /// Generate an image from the user's description plus a style descriptor
    GenerateImage {
        id: u64,
        user_prompt: String,
        style_prompt: String,
    },
    /// Fetch/decode a generated image and write it to disk
    SaveImage {
        id: u64,
        source: ImageSource,
    },
    /// Fire-and-forget new-user notification; failures are logged only
    NotifyNewUser {
        name: String,
        user_id: String,
    },
    /// Shutdown the provider actor
    Shutdown,
}

/// Replies sent from Provider layer back to the App layer
#[derive(Debug, Clone)]
pub enum ProviderReply {
    /// Generated text (word, letter, journal reply or daily message;
    /// the app resolves the flow from its pending request)
    Generated {
        id: u64,
        text: String,
    },
    /// Generated image
    Image {
        id: u64,
        source: ImageSource,
    },
    /// Image written to disk
    ImageSaved {
        id: u64,
        path: PathBuf,
    },
    /// Generation failed; `message` is already user-presentable
    Failed {
        id: u64,
        message: String,
    },
}

impl ProviderReply {
    /// Get the request ID this reply answers
    pub fn id(&self) -> u64 {
        match self {
            ProviderReply::Generated { id, .. } => *id,
            ProviderReply::Image { id, .. } => *id,
            ProviderReply::ImageSaved { id, .. } => *id,
            ProviderReply::Failed { id, .. } => *id,
        }
    }
}
