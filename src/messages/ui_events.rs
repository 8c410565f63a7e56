//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Screen {
    #[default]
    Onboarding,
    Home,
    Letters,
    Images,
    Journal,
    Library,
}

impl Screen {
    pub fn title(&self) -> &str {
        match self {
            Screen::Onboarding => "Добро пожаловать",
            Screen::Home => "Дом",
            Screen::Letters => "Письма",
            Screen::Images => "Образы",
            Screen::Journal => "Дневник",
            Screen::Library => "Библиотека",
        }
    }
}

/// Text input mode (journal entry / image prompt editing)
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Navigation
    Navigate(Screen),

    // Periodic timer from the UI poll loop (splash auto-advance)
    Tick,

    // Onboarding
    OnboardingNext,
    OnboardingSkip,

    // Selection within the active screen
    NextChoice,
    PrevChoice,

    // Style options
    CycleTone,
    CycleMood,

    // Generation triggers
    GenerateWord,
    GenerateLetter,
    GenerateImage,
    SubmitJournal,

    // Current card
    ClearCard,
    ToggleFavorite,

    // Image result actions
    SaveImage,
    ClearImage,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Scrolling (journal list, letter card)
    ScrollUp,
    ScrollDown,

    // Overlays
    DismissDaily,
    ToggleNight,
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Map a key event to a UI event, depending on where the user is
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
    show_daily: bool,
) -> Option<UiEvent> {
    // Ctrl-C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(UiEvent::CloseHelp),
            _ => None,
        };
    }

    // The daily message overlay swallows everything until dismissed
    if show_daily {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Some(UiEvent::DismissDaily),
            _ => None,
        };
    }

    if input_mode == InputMode::Editing {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => match screen {
                Screen::Journal => Some(UiEvent::SubmitJournal),
                Screen::Images => Some(UiEvent::GenerateImage),
                _ => Some(UiEvent::StopEditing),
            },
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        };
    }

    if screen == Screen::Onboarding {
        return match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(UiEvent::OnboardingNext),
            KeyCode::Esc => Some(UiEvent::OnboardingSkip),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            _ => None,
        };
    }

    // Normal mode, main screens
    match key.code {
        KeyCode::Char('1') => Some(UiEvent::Navigate(Screen::Home)),
        KeyCode::Char('2') => Some(UiEvent::Navigate(Screen::Letters)),
        KeyCode::Char('3') => Some(UiEvent::Navigate(Screen::Images)),
        KeyCode::Char('4') => Some(UiEvent::Navigate(Screen::Journal)),
        KeyCode::Char('5') => Some(UiEvent::Navigate(Screen::Library)),
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('n') => Some(UiEvent::ToggleNight),
        KeyCode::Char('f') => Some(UiEvent::ToggleFavorite),
        KeyCode::Char('t') => Some(UiEvent::CycleTone),
        KeyCode::Char('m') => Some(UiEvent::CycleMood),
        KeyCode::Left | KeyCode::Char('h') => Some(UiEvent::PrevChoice),
        KeyCode::Right | KeyCode::Char('l') => Some(UiEvent::NextChoice),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
        KeyCode::Esc => match screen {
            Screen::Images => Some(UiEvent::ClearImage),
            _ => Some(UiEvent::ClearCard),
        },
        KeyCode::Char('e') if matches!(screen, Screen::Journal | Screen::Images) => {
            Some(UiEvent::StartEditing)
        }
        KeyCode::Char('s') if screen == Screen::Images => Some(UiEvent::SaveImage),
        KeyCode::Enter => match screen {
            Screen::Home => Some(UiEvent::GenerateWord),
            Screen::Letters => Some(UiEvent::GenerateLetter),
            Screen::Images => Some(UiEvent::GenerateImage),
            Screen::Journal => Some(UiEvent::SubmitJournal),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_enter_on_home_generates_word() {
        let event = key_to_ui_event(key(KeyCode::Enter), Screen::Home, InputMode::Normal, false, false);
        assert!(matches!(event, Some(UiEvent::GenerateWord)));
    }

    #[test]
    fn test_daily_overlay_swallows_keys() {
        let event = key_to_ui_event(key(KeyCode::Char('1')), Screen::Home, InputMode::Normal, false, true);
        assert!(event.is_none());
        let event = key_to_ui_event(key(KeyCode::Enter), Screen::Home, InputMode::Normal, false, true);
        assert!(matches!(event, Some(UiEvent::DismissDaily)));
    }

    #[test]
    fn test_editing_mode_captures_chars() {
        let event = key_to_ui_event(key(KeyCode::Char('q')), Screen::Journal, InputMode::Editing, false, false);
        assert!(matches!(event, Some(UiEvent::CharInput('q'))));
    }

    #[test]
    fn test_onboarding_enter_advances() {
        let event = key_to_ui_event(key(KeyCode::Enter), Screen::Onboarding, InputMode::Normal, false, false);
        assert!(matches!(event, Some(UiEvent::OnboardingNext)));
        let event = key_to_ui_event(key(KeyCode::Esc), Screen::Onboarding, InputMode::Normal, false, false);
        assert!(matches!(event, Some(UiEvent::OnboardingSkip)));
    }
}
