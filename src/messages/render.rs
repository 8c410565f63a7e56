//! Render state - data structure sent from App layer to UI for rendering

use std::path::PathBuf;

use crate::messages::provider::ImageSource;
use crate::messages::ui_events::{InputMode, Screen};
use crate::models::{ContentItem, JournalEntry, StyleOptions};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Navigation
    pub screen: Screen,
    pub onboarding_step: usize,
    pub is_night: bool,

    // Generation
    pub is_loading: bool,
    pub current_card: Option<ContentItem>,
    pub card_scroll: u16,
    pub error: Option<String>,

    // Home
    pub selected_situation: usize,
    pub style: StyleOptions,

    // Letters
    pub selected_letter: usize,

    // Images
    pub image_prompt: String,
    pub image_cursor: usize,
    pub selected_image_style: usize,
    pub image_source: Option<ImageSource>,
    pub image_saved_path: Option<PathBuf>,

    // Journal
    pub journal_input: String,
    pub journal_cursor: usize,
    pub journal: Vec<JournalEntry>,
    pub journal_scroll: u16,

    // Library
    pub favorites: Vec<ContentItem>,
    pub selected_filter: usize,
    pub selected_favorite: usize,

    // Overlays
    pub daily_message: Option<String>,
    pub show_daily: bool,
    pub show_help: bool,

    // Input
    pub input_mode: InputMode,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screen: Screen::Onboarding,
            onboarding_step: 0,
            is_night: false,
            is_loading: false,
            current_card: None,
            card_scroll: 0,
            error: None,
            selected_situation: 0,
            style: StyleOptions::default(),
            selected_letter: 0,
            image_prompt: String::new(),
            image_cursor: 0,
            selected_image_style: 0,
            image_source: None,
            image_saved_path: None,
            journal_input: String::new(),
            journal_cursor: 0,
            journal: Vec::new(),
            journal_scroll: 0,
            favorites: Vec::new(),
            selected_filter: 0,
            selected_favorite: 0,
            daily_message: None,
            show_daily: false,
            show_help: false,
            input_mode: InputMode::Normal,
        }
    }
}
