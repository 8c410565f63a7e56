use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of content a card holds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Word,
    Letter,
    JournalReply,
}

/// Tone of a generation request (variant-specific style option)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Masculine,
    FemaleDirected,
    #[default]
    Universal,
}

impl Tone {
    pub fn as_str(&self) -> &str {
        match self {
            Tone::Masculine => "мужской",
            Tone::FemaleDirected => "женский",
            Tone::Universal => "универсальный",
        }
    }

    pub fn next(&self) -> Tone {
        match self {
            Tone::Masculine => Tone::FemaleDirected,
            Tone::FemaleDirected => Tone::Universal,
            Tone::Universal => Tone::Masculine,
        }
    }
}

/// Mood of a generation request (variant-specific style option)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Hard,
    #[default]
    Soft,
    Philosophical,
}

impl Mood {
    pub fn as_str(&self) -> &str {
        match self {
            Mood::Hard => "жёсткий",
            Mood::Soft => "мягкий",
            Mood::Philosophical => "философский",
        }
    }

    pub fn next(&self) -> Mood {
        match self {
            Mood::Hard => Mood::Soft,
            Mood::Soft => Mood::Philosophical,
            Mood::Philosophical => Mood::Hard,
        }
    }
}

/// Optional style options attached to a generation request and kept on the
/// resulting item
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct StyleOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

/// A single generated piece of content plus its metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub text: String,
    /// Paragraph blocks derived from `text`, see [`split_blocks`]
    pub blocks: Vec<String>,
    pub kind: ContentKind,
    /// Emotion or topic that seeded the generation
    pub tag: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub is_favorite: bool,
    #[serde(default)]
    pub style: StyleOptions,
}

impl ContentItem {
    /// Build an item from freshly generated text, splitting it into blocks
    pub fn new(text: impl Into<String>, kind: ContentKind, tag: impl Into<String>) -> Self {
        let text = text.into();
        ContentItem {
            id: Uuid::new_v4().to_string(),
            blocks: split_blocks(&text),
            text,
            kind,
            tag: tag.into(),
            timestamp: Utc::now().timestamp_millis(),
            is_favorite: false,
            style: StyleOptions::default(),
        }
    }

    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }
}

/// One journal submission and the reply it received
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub user_text: String,
    pub reply: Option<ContentItem>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl JournalEntry {
    pub fn new(user_text: impl Into<String>, reply: Option<ContentItem>) -> Self {
        JournalEntry {
            id: Uuid::new_v4().to_string(),
            user_text: user_text.into(),
            reply,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Split generated text into paragraph blocks on blank-line boundaries.
/// Empty fragments are discarded; the result is non-empty for any text
/// containing at least one non-whitespace character.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                blocks.push(current.trim().to_string());
            }
            current.clear();
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.trim().is_empty() {
        blocks.push(current.trim().to_string());
    }

    blocks
}
