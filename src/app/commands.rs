//! Command handlers - business logic for processing UI events

use std::time::Duration;

use crate::app::state::{AppState, PendingFlow, PendingRequest};
use crate::constants::{IMAGE_STYLES, LETTER_TYPES, LIBRARY_FILTERS, ONBOARDING_STEPS, SITUATIONS};
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{ProviderCommand, ProviderReply};
use crate::models::{ContentItem, ContentKind, JournalEntry, Mood, Tone};

/// Local calendar date used for the daily-message gate
fn today_string() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// How long the splash slide stays up before auto-advancing
const SPLASH_DURATION: Duration = Duration::from_millis(2500);

impl AppState {
    // ========================
    // Startup
    // ========================

    /// Commands to fire once when the app comes up: the one-shot new-user
    /// notification and, when starting on Home, the daily-message check.
    pub fn on_start(&mut self) -> Vec<ProviderCommand> {
        let mut commands = Vec::new();

        if let Some(user_id) = self.storage.first_launch_id() {
            if self.config.notify.is_enabled() {
                let name = if self.config.user_name.is_empty() {
                    String::from("Гостья")
                } else {
                    self.config.user_name.clone()
                };
                commands.push(ProviderCommand::NotifyNewUser { name, user_id });
            }
        }

        if self.screen == Screen::Home {
            if let Some(cmd) = self.maybe_request_daily(&today_string()) {
                commands.push(cmd);
            }
        }
        commands
    }

    /// Periodic tick from the UI poll loop; auto-advances the splash slide
    pub fn tick(&mut self) {
        if self.screen == Screen::Onboarding
            && self.onboarding_step == 0
            && self.splash_started.elapsed() >= SPLASH_DURATION
        {
            self.onboarding_step = 1;
        }
    }

    // ========================
    // Onboarding
    // ========================

    pub fn onboarding_next(&mut self) -> Option<ProviderCommand> {
        if self.screen != Screen::Onboarding {
            return None;
        }
        if self.onboarding_step < ONBOARDING_STEPS.len() {
            self.onboarding_step += 1;
            None
        } else {
            self.finish_onboarding()
        }
    }

    pub fn finish_onboarding(&mut self) -> Option<ProviderCommand> {
        if let Err(e) = self.storage.set_onboarding_complete() {
            tracing::warn!(error = %e, "Failed to persist onboarding marker");
        }
        self.screen = Screen::Home;
        self.maybe_request_daily(&today_string())
    }

    // ========================
    // Navigation
    // ========================

    /// Switch screens unconditionally. The current card and any outstanding
    /// request become stale; entering Home may trigger the daily message.
    pub fn navigate(&mut self, screen: Screen) -> Option<ProviderCommand> {
        self.screen = screen;
        self.current_card = None;
        self.card_scroll = 0;
        self.error = None;
        self.input_mode = InputMode::Normal;
        self.pending = None;
        self.is_loading = false;

        if screen == Screen::Home {
            self.maybe_request_daily(&today_string())
        } else {
            None
        }
    }

    /// One-shot daily message fetch, gated by the persisted date marker
    pub fn maybe_request_daily(&mut self, today: &str) -> Option<ProviderCommand> {
        if self.screen != Screen::Home || self.show_daily || self.pending_daily.is_some() {
            return None;
        }
        if !self.storage.daily_message_due(today) {
            return None;
        }
        let id = self.next_id();
        self.pending_daily = Some(id);
        Some(ProviderCommand::GenerateDaily { id })
    }

    pub fn dismiss_daily(&mut self) {
        self.dismiss_daily_on(&today_string());
    }

    pub fn dismiss_daily_on(&mut self, today: &str) {
        self.show_daily = false;
        if let Err(e) = self.storage.set_last_daily_date(today) {
            tracing::warn!(error = %e, "Failed to persist daily-message date");
        }
    }

    // ========================
    // Selection
    // ========================

    pub fn next_choice(&mut self) {
        match self.screen {
            Screen::Home => {
                self.selected_situation = (self.selected_situation + 1) % SITUATIONS.len();
            }
            Screen::Letters => {
                self.selected_letter = (self.selected_letter + 1) % LETTER_TYPES.len();
            }
            Screen::Images => {
                self.selected_image_style = (self.selected_image_style + 1) % IMAGE_STYLES.len();
            }
            Screen::Library => {
                self.selected_filter = (self.selected_filter + 1) % LIBRARY_FILTERS.len();
                self.selected_favorite = 0;
            }
            _ => {}
        }
    }

    pub fn prev_choice(&mut self) {
        match self.screen {
            Screen::Home => {
                self.selected_situation = self
                    .selected_situation
                    .checked_sub(1)
                    .unwrap_or(SITUATIONS.len() - 1);
            }
            Screen::Letters => {
                self.selected_letter = self
                    .selected_letter
                    .checked_sub(1)
                    .unwrap_or(LETTER_TYPES.len() - 1);
            }
            Screen::Images => {
                self.selected_image_style = self
                    .selected_image_style
                    .checked_sub(1)
                    .unwrap_or(IMAGE_STYLES.len() - 1);
            }
            Screen::Library => {
                self.selected_filter = self
                    .selected_filter
                    .checked_sub(1)
                    .unwrap_or(LIBRARY_FILTERS.len() - 1);
                self.selected_favorite = 0;
            }
            _ => {}
        }
    }

    /// Cycle tone through unset and the three options
    pub fn cycle_tone(&mut self) {
        self.style.tone = match self.style.tone {
            None => Some(Tone::Masculine),
            Some(tone) => {
                let next = tone.next();
                if next == Tone::Masculine {
                    None
                } else {
                    Some(next)
                }
            }
        };
    }

    /// Cycle mood through unset and the three options
    pub fn cycle_mood(&mut self) {
        self.style.mood = match self.style.mood {
            None => Some(Mood::Hard),
            Some(mood) => {
                let next = mood.next();
                if next == Mood::Hard {
                    None
                } else {
                    Some(next)
                }
            }
        };
    }

    // ========================
    // Generation triggers
    // ========================

    pub fn generate_word(&mut self) -> Option<ProviderCommand> {
        if self.is_loading {
            return None;
        }
        let situation = SITUATIONS.get(self.selected_situation)?.to_string();
        if situation.trim().is_empty() {
            return None;
        }
        self.error = None;
        self.is_loading = true;
        let id = self.next_id();
        self.pending = Some(PendingRequest {
            id,
            flow: PendingFlow::Word {
                situation: situation.clone(),
            },
        });
        Some(ProviderCommand::GenerateWord {
            id,
            situation,
            style: self.style,
        })
    }

    pub fn generate_letter(&mut self) -> Option<ProviderCommand> {
        if self.is_loading {
            return None;
        }
        let letter = LETTER_TYPES.get(self.selected_letter)?;
        let label = letter.label.to_string();
        let context = if self.is_night {
            String::from("ночное, тихое")
        } else {
            String::from("дневное, поддерживающее")
        };
        self.error = None;
        self.is_loading = true;
        let id = self.next_id();
        self.pending = Some(PendingRequest {
            id,
            flow: PendingFlow::Letter {
                label: label.clone(),
            },
        });
        Some(ProviderCommand::GenerateLetter {
            id,
            label,
            context,
            style: self.style,
        })
    }

    /// Submit the journal input; empty text is a silent no-op
    pub fn submit_journal(&mut self) -> Option<ProviderCommand> {
        let text = self.journal_input.trim().to_string();
        if text.is_empty() || self.is_loading {
            return None;
        }
        self.input_mode = InputMode::Normal;
        self.error = None;
        self.is_loading = true;
        let id = self.next_id();
        self.pending = Some(PendingRequest {
            id,
            flow: PendingFlow::Journal {
                user_text: text.clone(),
            },
        });
        Some(ProviderCommand::GenerateJournalReply { id, user_text: text })
    }

    /// Generate an image; empty prompt is a silent no-op
    pub fn generate_image(&mut self) -> Option<ProviderCommand> {
        let prompt = self.image_prompt.trim().to_string();
        if prompt.is_empty() || self.is_loading {
            return None;
        }
        let style = IMAGE_STYLES.get(self.selected_image_style)?;
        self.input_mode = InputMode::Normal;
        self.image_source = None;
        self.image_saved_path = None;
        self.error = None;
        self.is_loading = true;
        let id = self.next_id();
        self.pending = Some(PendingRequest {
            id,
            flow: PendingFlow::Image,
        });
        Some(ProviderCommand::GenerateImage {
            id,
            user_prompt: prompt,
            style_prompt: style.prompt.to_string(),
        })
    }

    pub fn save_image(&mut self) -> Option<ProviderCommand> {
        if self.is_loading {
            return None;
        }
        let source = self.image_source.clone()?;
        self.is_loading = true;
        let id = self.next_id();
        self.pending = Some(PendingRequest {
            id,
            flow: PendingFlow::SaveImage,
        });
        Some(ProviderCommand::SaveImage { id, source })
    }

    // ========================
    // Current card / image
    // ========================

    pub fn clear_card(&mut self) {
        self.current_card = None;
        self.card_scroll = 0;
        self.error = None;
    }

    pub fn clear_image(&mut self) {
        self.image_source = None;
        self.image_saved_path = None;
        self.error = None;
    }

    /// Toggle the favorite flag of the relevant item: the selected library
    /// entry on the Library screen, the current card elsewhere. Keeps the
    /// displayed copy and the stored copy in sync.
    pub fn toggle_favorite(&mut self) {
        let target = match self.screen {
            Screen::Library => self
                .filtered_favorites()
                .get(self.selected_favorite)
                .cloned(),
            _ => self.current_card.clone(),
        };
        let Some(item) = target else {
            return;
        };

        match self.storage.toggle_favorite(&item) {
            Ok(now_favorite) => {
                if let Some(card) = &mut self.current_card {
                    if card.id == item.id {
                        card.is_favorite = now_favorite;
                    }
                }
                let len = self.filtered_favorites().len();
                if self.selected_favorite >= len {
                    self.selected_favorite = len.saturating_sub(1);
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to persist favorites"),
        }
    }

    // ========================
    // Input editing
    // ========================

    /// The editable buffer and cursor of the active screen, if it has one
    fn input_parts(&mut self) -> Option<(&mut String, &mut usize)> {
        match self.screen {
            Screen::Journal => Some((&mut self.journal_input, &mut self.journal_cursor)),
            Screen::Images => Some((&mut self.image_prompt, &mut self.image_cursor)),
            _ => None,
        }
    }

    pub fn start_editing(&mut self) {
        if let Some((buffer, cursor)) = self.input_parts() {
            *cursor = buffer.len();
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some((buffer, cursor)) = self.input_parts() {
            if *cursor <= buffer.len() {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if let Some((buffer, cursor)) = self.input_parts() {
            if *cursor > 0 {
                let prev = buffer[..*cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                buffer.remove(prev);
                *cursor = prev;
            }
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some((buffer, cursor)) = self.input_parts() {
            if *cursor > 0 {
                *cursor = buffer[..*cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
            }
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some((buffer, cursor)) = self.input_parts() {
            if *cursor < buffer.len() {
                *cursor = buffer[*cursor..]
                    .char_indices()
                    .nth(1)
                    .map(|(i, _)| *cursor + i)
                    .unwrap_or(buffer.len());
            }
        }
    }

    // ========================
    // Scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        match self.screen {
            Screen::Journal => self.journal_scroll = self.journal_scroll.saturating_sub(1),
            Screen::Library => self.selected_favorite = self.selected_favorite.saturating_sub(1),
            _ => self.card_scroll = self.card_scroll.saturating_sub(1),
        }
    }

    pub fn scroll_down(&mut self) {
        match self.screen {
            Screen::Journal => self.journal_scroll = self.journal_scroll.saturating_add(1),
            Screen::Library => {
                let len = self.filtered_favorites().len();
                if self.selected_favorite + 1 < len {
                    self.selected_favorite += 1;
                }
            }
            _ => self.card_scroll = self.card_scroll.saturating_add(1),
        }
    }

    // ========================
    // Overlays
    // ========================

    pub fn toggle_night(&mut self) {
        self.is_night = !self.is_night;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Provider replies
    // ========================

    /// Fold a provider reply into the state. Replies that do not match the
    /// outstanding request id are stale (the user navigated on) and dropped.
    pub fn handle_reply(&mut self, reply: ProviderReply) {
        if self.pending_daily == Some(reply.id()) {
            self.pending_daily = None;
            // The daily greeting is best effort: failures stay silent
            if let ProviderReply::Generated { text, .. } = reply {
                self.daily_message = Some(text);
                self.show_daily = true;
            }
            return;
        }

        let Some(pending) = self.pending.take() else {
            return;
        };
        if pending.id != reply.id() {
            self.pending = Some(pending);
            return;
        }
        self.is_loading = false;

        match reply {
            ProviderReply::Generated { text, .. } => match pending.flow {
                PendingFlow::Word { situation } => {
                    self.current_card = Some(
                        ContentItem::new(text, ContentKind::Word, situation)
                            .with_style(self.style),
                    );
                    self.card_scroll = 0;
                }
                PendingFlow::Letter { label } => {
                    self.current_card = Some(
                        ContentItem::new(text, ContentKind::Letter, label)
                            .with_style(self.style),
                    );
                    self.card_scroll = 0;
                }
                PendingFlow::Journal { user_text } => {
                    let reply_item = ContentItem::new(text, ContentKind::JournalReply, "Дневник");
                    let entry = JournalEntry::new(user_text, Some(reply_item));
                    if let Err(e) = self.storage.add_journal_entry(entry) {
                        tracing::warn!(error = %e, "Failed to persist journal entry");
                    }
                    self.journal_input.clear();
                    self.journal_cursor = 0;
                    self.journal_scroll = 0;
                }
                PendingFlow::Image | PendingFlow::SaveImage => {}
            },
            ProviderReply::Image { source, .. } => {
                self.image_source = Some(source);
            }
            ProviderReply::ImageSaved { path, .. } => {
                self.image_saved_path = Some(path);
            }
            ProviderReply::Failed { message, .. } => {
                self.error = Some(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::messages::provider::ImageSource;
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path());
        let state = AppState::new(AppConfig::default(), storage);
        (state, dir)
    }

    fn home_state() -> (AppState, TempDir) {
        let (mut state, dir) = test_state();
        state.storage.set_onboarding_complete().unwrap();
        state.screen = Screen::Home;
        (state, dir)
    }

    #[test]
    fn test_initial_screen_follows_onboarding_marker() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = Storage::open(dir.path());
            storage.set_onboarding_complete().unwrap();
        }
        let state = AppState::new(AppConfig::default(), Storage::open(dir.path()));
        assert_eq!(state.screen, Screen::Home);

        let fresh_dir = tempfile::tempdir().unwrap();
        let state = AppState::new(AppConfig::default(), Storage::open(fresh_dir.path()));
        assert_eq!(state.screen, Screen::Onboarding);
    }

    #[test]
    fn test_generate_word_sends_command_and_sets_loading() {
        let (mut state, _dir) = home_state();
        let cmd = state.generate_word().unwrap();
        assert!(state.is_loading);
        match cmd {
            ProviderCommand::GenerateWord { situation, .. } => {
                assert_eq!(situation, "Я устала");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        // duplicate trigger while loading is ignored
        assert!(state.generate_word().is_none());
    }

    #[test]
    fn test_word_reply_builds_card() {
        let (mut state, _dir) = home_state();
        let cmd = state.generate_word().unwrap();
        let id = match cmd {
            ProviderCommand::GenerateWord { id, .. } => id,
            _ => unreachable!(),
        };

        state.handle_reply(ProviderReply::Generated {
            id,
            text: String::from("Блок1\n\nБлок2"),
        });

        assert!(!state.is_loading);
        let card = state.current_card.as_ref().unwrap();
        assert_eq!(card.blocks, vec!["Блок1", "Блок2"]);
        assert_eq!(card.tag, "Я устала");
        assert!(!card.is_favorite);
    }

    #[test]
    fn test_stale_reply_is_dropped() {
        let (mut state, _dir) = home_state();
        state.generate_word().unwrap();

        state.handle_reply(ProviderReply::Generated {
            id: 9999,
            text: String::from("устаревший"),
        });
        assert!(state.is_loading);
        assert!(state.current_card.is_none());

        // navigating away makes the real reply stale too
        let pending_id = state.pending.as_ref().unwrap().id;
        state.navigate(Screen::Journal);
        state.handle_reply(ProviderReply::Generated {
            id: pending_id,
            text: String::from("опоздал"),
        });
        assert!(state.current_card.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_failed_reply_sets_error_and_clears_loading() {
        let (mut state, _dir) = home_state();
        let id = match state.generate_word().unwrap() {
            ProviderCommand::GenerateWord { id, .. } => id,
            _ => unreachable!(),
        };
        state.handle_reply(ProviderReply::Failed {
            id,
            message: String::from("Муза отдыхает."),
        });
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Муза отдыхает."));
    }

    #[test]
    fn test_daily_gate_same_day_no_fetch() {
        let (mut state, _dir) = home_state();
        state.storage.set_last_daily_date("2026-08-27").unwrap();
        assert!(state.maybe_request_daily("2026-08-27").is_none());
    }

    #[test]
    fn test_daily_gate_new_day_fetches_once() {
        let (mut state, _dir) = home_state();
        state.storage.set_last_daily_date("2026-08-26").unwrap();

        let cmd = state.maybe_request_daily("2026-08-27");
        assert!(matches!(cmd, Some(ProviderCommand::GenerateDaily { .. })));
        // a second check while the first is pending stays quiet
        assert!(state.maybe_request_daily("2026-08-27").is_none());

        let id = state.pending_daily.unwrap();
        state.handle_reply(ProviderReply::Generated {
            id,
            text: String::from("Сегодня твой день."),
        });
        assert!(state.show_daily);
        assert_eq!(state.daily_message.as_deref(), Some("Сегодня твой день."));

        state.dismiss_daily_on("2026-08-27");
        assert!(!state.show_daily);
        assert!(state.maybe_request_daily("2026-08-27").is_none());
        assert!(state.maybe_request_daily("2026-08-28").is_some());
    }

    #[test]
    fn test_daily_failure_is_silent() {
        let (mut state, _dir) = home_state();
        state.maybe_request_daily("2026-08-27").unwrap();
        let id = state.pending_daily.unwrap();
        state.handle_reply(ProviderReply::Failed {
            id,
            message: String::from("oops"),
        });
        assert!(!state.show_daily);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_journal_empty_input_is_silent_noop() {
        let (mut state, _dir) = home_state();
        state.navigate(Screen::Journal);
        state.journal_input = String::from("   \n ");
        assert!(state.submit_journal().is_none());
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_journal_submit_appends_newest_first() {
        let (mut state, _dir) = home_state();
        state.navigate(Screen::Journal);

        state.journal_input = String::from("первая запись");
        let id = match state.submit_journal().unwrap() {
            ProviderCommand::GenerateJournalReply { id, .. } => id,
            _ => unreachable!(),
        };
        state.handle_reply(ProviderReply::Generated {
            id,
            text: String::from("Я рядом."),
        });

        state.journal_input = String::from("вторая запись");
        let id = match state.submit_journal().unwrap() {
            ProviderCommand::GenerateJournalReply { id, .. } => id,
            _ => unreachable!(),
        };
        state.handle_reply(ProviderReply::Generated {
            id,
            text: String::from("Слышу тебя."),
        });

        assert_eq!(state.storage.journal.len(), 2);
        assert_eq!(state.storage.journal[0].user_text, "вторая запись");
        assert_eq!(
            state.storage.journal[0].reply.as_ref().unwrap().text,
            "Слышу тебя."
        );
        assert!(state.journal_input.is_empty());
    }

    #[test]
    fn test_toggle_favorite_syncs_card_and_store() {
        let (mut state, _dir) = home_state();
        let card = ContentItem::new("текст", ContentKind::Word, "Тишина");
        state.current_card = Some(card.clone());

        state.toggle_favorite();
        assert!(state.current_card.as_ref().unwrap().is_favorite);
        assert!(state.storage.favorites.iter().any(|f| f.id == card.id));

        state.toggle_favorite();
        assert!(!state.current_card.as_ref().unwrap().is_favorite);
        assert!(state.storage.favorites.is_empty());
    }

    #[test]
    fn test_toggle_favorite_from_library_removes_selected() {
        let (mut state, _dir) = home_state();
        let a = ContentItem::new("a", ContentKind::Word, "Тишина");
        let b = ContentItem::new("b", ContentKind::Word, "Сила");
        state.storage.toggle_favorite(&a).unwrap();
        state.storage.toggle_favorite(&b).unwrap();

        state.navigate(Screen::Library);
        state.selected_favorite = 1; // oldest (a)
        state.toggle_favorite();

        assert_eq!(state.storage.favorites.len(), 1);
        assert_eq!(state.storage.favorites[0].id, b.id);
        assert_eq!(state.selected_favorite, 0);
    }

    #[test]
    fn test_library_filter_matches_tags() {
        let (mut state, _dir) = home_state();
        let quiet = ContentItem::new("a", ContentKind::Word, "Тишина");
        let strength = ContentItem::new("b", ContentKind::Word, "Сила");
        state.storage.toggle_favorite(&quiet).unwrap();
        state.storage.toggle_favorite(&strength).unwrap();

        state.navigate(Screen::Library);
        assert_eq!(state.filtered_favorites().len(), 2);

        let quiet_pos = LIBRARY_FILTERS.iter().position(|f| *f == "Тишина").unwrap();
        state.selected_filter = quiet_pos;
        let filtered = state.filtered_favorites();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, quiet.id);
    }

    #[test]
    fn test_image_flow() {
        let (mut state, _dir) = home_state();
        state.navigate(Screen::Images);

        assert!(state.generate_image().is_none()); // empty prompt

        state.image_prompt = String::from("тихое утро у моря");
        let id = match state.generate_image().unwrap() {
            ProviderCommand::GenerateImage { id, style_prompt, .. } => {
                assert_eq!(style_prompt, IMAGE_STYLES[0].prompt);
                id
            }
            _ => unreachable!(),
        };

        let source = ImageSource::DataUri(String::from("data:image/png;base64,QUJD"));
        state.handle_reply(ProviderReply::Image {
            id,
            source: source.clone(),
        });
        assert!(!state.is_loading);
        assert_eq!(state.image_source, Some(source));

        let id = match state.save_image().unwrap() {
            ProviderCommand::SaveImage { id, .. } => id,
            _ => unreachable!(),
        };
        state.handle_reply(ProviderReply::ImageSaved {
            id,
            path: std::path::PathBuf::from("/tmp/vera-art-1.png"),
        });
        assert_eq!(
            state.image_saved_path.as_deref(),
            Some(std::path::Path::new("/tmp/vera-art-1.png"))
        );
    }

    #[test]
    fn test_onboarding_walkthrough() {
        let (mut state, _dir) = test_state();
        assert_eq!(state.screen, Screen::Onboarding);
        assert_eq!(state.onboarding_step, 0);

        // splash auto-advance after the timer
        state.splash_started = std::time::Instant::now() - Duration::from_secs(3);
        state.tick();
        assert_eq!(state.onboarding_step, 1);

        for _ in 0..3 {
            state.onboarding_next();
        }
        assert_eq!(state.onboarding_step, 4);
        state.onboarding_next();
        assert_eq!(state.screen, Screen::Home);
        assert!(state.storage.markers.onboarding_complete);
    }

    #[test]
    fn test_navigation_clears_card() {
        let (mut state, _dir) = home_state();
        state.current_card = Some(ContentItem::new("x", ContentKind::Word, "t"));
        state.navigate(Screen::Letters);
        assert!(state.current_card.is_none());
        assert_eq!(state.screen, Screen::Letters);
    }

    #[test]
    fn test_on_start_notifies_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.notify.bot_token = Some(String::from("token"));
        config.notify.admin_chat_id = Some(String::from("42"));
        config.user_name = String::from("Вера");

        let mut state = AppState::new(config.clone(), Storage::open(dir.path()));
        let commands = state.on_start();
        assert!(commands
            .iter()
            .any(|c| matches!(c, ProviderCommand::NotifyNewUser { name, .. } if name == "Вера")));

        // second launch: marker is set, no notification
        let mut state = AppState::new(config, Storage::open(dir.path()));
        let commands = state.on_start();
        assert!(!commands
            .iter()
            .any(|c| matches!(c, ProviderCommand::NotifyNewUser { .. })));
    }

    #[test]
    fn test_cycle_style_options() {
        let (mut state, _dir) = home_state();
        assert!(state.style.tone.is_none());
        state.cycle_tone();
        assert_eq!(state.style.tone, Some(Tone::Masculine));
        state.cycle_tone();
        state.cycle_tone();
        assert_eq!(state.style.tone, Some(Tone::Universal));
        state.cycle_tone();
        assert!(state.style.tone.is_none());

        state.cycle_mood();
        assert_eq!(state.style.mood, Some(Mood::Hard));
    }

    #[test]
    fn test_editing_buffer_per_screen() {
        let (mut state, _dir) = home_state();
        state.navigate(Screen::Journal);
        state.start_editing();
        for c in "привет".chars() {
            state.enter_char(c);
        }
        assert_eq!(state.journal_input, "привет");
        state.delete_char();
        assert_eq!(state.journal_input, "приве");
        state.cursor_left();
        state.enter_char('т');
        assert_eq!(state.journal_input, "привте");
    }
}
