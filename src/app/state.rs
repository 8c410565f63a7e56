//! App state - pure data structure with no I/O logic beyond Storage

use std::path::PathBuf;
use std::time::Instant;

use chrono::Timelike;

use crate::config::AppConfig;
use crate::messages::provider::ImageSource;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;
use crate::models::{ContentItem, StyleOptions};
use crate::storage::Storage;

/// What the single outstanding generation request was asked for, so the
/// reply can be turned back into domain data
#[derive(Clone, Debug)]
pub enum PendingFlow {
    Word { situation: String },
    Letter { label: String },
    Journal { user_text: String },
    Image,
    SaveImage,
}

#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub id: u64,
    pub flow: PendingFlow,
}

/// Main application state - mutated only by sequential event handling
pub struct AppState {
    // Navigation
    pub screen: Screen,
    pub onboarding_step: usize,
    pub splash_started: Instant,
    pub is_night: bool,

    // Generation
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending: Option<PendingRequest>,
    pub pending_daily: Option<u64>,
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
    pub journal_scroll: u16,

    // Library
    pub selected_filter: usize,
    pub selected_favorite: usize,

    // Overlays
    pub daily_message: Option<String>,
    pub show_daily: bool,
    pub show_help: bool,

    // Input
    pub input_mode: InputMode,

    // Persisted data and configuration
    pub storage: Storage,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Storage) -> Self {
        let screen = if storage.markers.onboarding_complete {
            Screen::Home
        } else {
            Screen::Onboarding
        };
        let is_night = config.is_night_hour(chrono::Local::now().hour());

        AppState {
            screen,
            onboarding_step: 0,
            splash_started: Instant::now(),
            is_night,
            is_loading: false,
            next_request_id: 1,
            pending: None,
            pending_daily: None,
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
            journal_scroll: 0,
            selected_filter: 0,
            selected_favorite: 0,
            daily_message: None,
            show_daily: false,
            show_help: false,
            input_mode: InputMode::Normal,
            storage,
            config,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Favorites matching the active library filter
    pub fn filtered_favorites(&self) -> Vec<ContentItem> {
        let filter = crate::constants::LIBRARY_FILTERS
            .get(self.selected_filter)
            .copied()
            .unwrap_or("Все");
        self.storage
            .favorites
            .iter()
            .filter(|f| filter == "Все" || f.tag.contains(filter))
            .cloned()
            .collect()
    }

    /// Convert state to RenderState for the UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            onboarding_step: self.onboarding_step,
            is_night: self.is_night,
            is_loading: self.is_loading,
            current_card: self.current_card.clone(),
            card_scroll: self.card_scroll,
            error: self.error.clone(),
            selected_situation: self.selected_situation,
            style: self.style,
            selected_letter: self.selected_letter,
            image_prompt: self.image_prompt.clone(),
            image_cursor: self.image_cursor,
            selected_image_style: self.selected_image_style,
            image_source: self.image_source.clone(),
            image_saved_path: self.image_saved_path.clone(),
            journal_input: self.journal_input.clone(),
            journal_cursor: self.journal_cursor,
            journal: self.storage.journal.clone(),
            journal_scroll: self.journal_scroll,
            favorites: self.filtered_favorites(),
            selected_filter: self.selected_filter,
            selected_favorite: self.selected_favorite,
            daily_message: self.daily_message.clone(),
            show_daily: self.show_daily,
            show_help: self.show_help,
            input_mode: self.input_mode,
        }
    }
}
