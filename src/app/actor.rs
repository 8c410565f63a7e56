//! App actor - message loop processing UI events and provider replies

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{ProviderCommand, ProviderReply, RenderState, UiEvent};

/// App actor that processes UI events and provider replies
pub struct AppActor {
    state: AppState,
    provider_tx: mpsc::UnboundedSender<ProviderCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        provider_tx: mpsc::UnboundedSender<ProviderCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            provider_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut reply_rx: mpsc::UnboundedReceiver<ProviderReply>,
    ) {
        // Startup commands: first-launch notification, daily message check
        for cmd in self.state.on_start() {
            let _ = self.provider_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.provider_tx.send(ProviderCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(reply) = reply_rx.recv() => {
                    self.state.handle_reply(reply);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::Navigate(screen) => self.send_opt(|s| s.navigate(screen)),
            UiEvent::Tick => self.state.tick(),

            // Onboarding
            UiEvent::OnboardingNext => self.send_opt(|s| s.onboarding_next()),
            UiEvent::OnboardingSkip => self.send_opt(|s| s.finish_onboarding()),

            // Selection
            UiEvent::NextChoice => self.state.next_choice(),
            UiEvent::PrevChoice => self.state.prev_choice(),
            UiEvent::CycleTone => self.state.cycle_tone(),
            UiEvent::CycleMood => self.state.cycle_mood(),

            // Generation triggers
            UiEvent::GenerateWord => self.send_opt(|s| s.generate_word()),
            UiEvent::GenerateLetter => self.send_opt(|s| s.generate_letter()),
            UiEvent::GenerateImage => self.send_opt(|s| s.generate_image()),
            UiEvent::SubmitJournal => self.send_opt(|s| s.submit_journal()),

            // Current card / image
            UiEvent::ClearCard => self.state.clear_card(),
            UiEvent::ToggleFavorite => self.state.toggle_favorite(),
            UiEvent::SaveImage => self.send_opt(|s| s.save_image()),
            UiEvent::ClearImage => self.state.clear_image(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.cursor_left(),
            UiEvent::CursorRight => self.state.cursor_right(),

            // Scrolling
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Overlays
            UiEvent::DismissDaily => self.state.dismiss_daily(),
            UiEvent::ToggleNight => self.state.toggle_night(),
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }

    /// Run a state method that may produce a provider command, and send it
    fn send_opt(&mut self, f: impl FnOnce(&mut AppState) -> Option<ProviderCommand>) {
        if let Some(cmd) = f(&mut self.state) {
            let _ = self.provider_tx.send(cmd);
        }
    }
}
