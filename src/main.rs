//! VERA TUI - actor-based terminal companion app
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Provider Layer (Tokio) - async generation calls

mod app;
mod config;
mod constants;
mod messages;
mod models;
mod provider;
mod storage;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::{AppActor, AppState};
use config::AppConfig;
use constants::{APP_NAME, IMAGE_STYLES, LETTER_TYPES, LIBRARY_FILTERS, ONBOARDING_STEPS, SITUATIONS};
use messages::ui_events::{key_to_ui_event, InputMode, Screen};
use messages::{ProviderCommand, ProviderReply, RenderState, UiEvent};
use provider::{GenerationClient, ProviderActor};
use storage::Storage;
use ui::{accent_color, card_lines, centered_rect, format_timestamp, input_block, pill_row};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "vera.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Load configuration and persisted state
    let config_dir = AppConfig::default_dir();
    let config = AppConfig::load(&config_dir);
    let storage = Storage::open(&config_dir);
    let images_dir = provider::client::images_dir(&config_dir);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ProviderCommand>();
    let (reply_tx, reply_rx) = mpsc::unbounded_channel::<ProviderReply>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn provider actor
    let provider_actor = ProviderActor::new(GenerationClient::new(config.clone(), images_dir), reply_tx);
    tokio::spawn(provider_actor.run(cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(config, storage), cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, reply_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_daily,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        } else {
            // Idle: drive timers (splash auto-advance)
            let _ = ui_tx.send(UiEvent::Tick);
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    if state.screen == Screen::Onboarding {
        draw_onboarding(f, state, area);
        return;
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    match state.screen {
        Screen::Home => draw_home(f, state, main_chunks[1]),
        Screen::Letters => draw_letters(f, state, main_chunks[1]),
        Screen::Images => draw_images(f, state, main_chunks[1]),
        Screen::Journal => draw_journal(f, state, main_chunks[1]),
        Screen::Library => draw_library(f, state, main_chunks[1]),
        Screen::Onboarding => {}
    }

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_daily {
        if let Some(message) = &state.daily_message {
            draw_daily_overlay(f, message, state.is_night, area);
        }
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let tabs = [
        (Screen::Home, " 1:Дом "),
        (Screen::Letters, " 2:Письма "),
        (Screen::Images, " 3:Образы "),
        (Screen::Journal, " 4:Дневник "),
        (Screen::Library, " 5:Библиотека "),
    ];

    let mut spans = Vec::new();
    for (screen, label) in tabs {
        let style = if state.screen == screen {
            Style::default()
                .fg(Color::Black)
                .bg(accent_color(state.is_night))
                .bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    if state.is_night {
        spans.push(Span::styled(" ☾ ночь ", Style::default().fg(Color::Magenta)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_home(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Greeting
            Constraint::Length(2), // Situations
            Constraint::Length(1), // Style options
            Constraint::Min(3),    // Card
        ])
        .split(area);

    let greeting = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(accent_color(state.is_night)).bold(),
        ),
        Span::styled(
            " · что сейчас отзывается?",
            Style::default().fg(Color::Gray),
        ),
    ]));
    f.render_widget(greeting, chunks[0]);

    f.render_widget(
        Paragraph::new(pill_row(&SITUATIONS, state.selected_situation, state.is_night)),
        chunks[1],
    );

    let tone = state
        .style
        .tone
        .map(|t| t.as_str().to_string())
        .unwrap_or_else(|| String::from("-"));
    let mood = state
        .style
        .mood
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| String::from("-"));
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" тон: {}  настроение: {}  (t/m)", tone, mood),
            Style::default().fg(Color::DarkGray),
        ))),
        chunks[2],
    );

    draw_card_area(
        f,
        state,
        chunks[3],
        "Enter — слово поддержки, ←/→ — ситуация",
    );
}

fn draw_letters(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(LETTER_TYPES.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(area);

    let items: Vec<ListItem> = LETTER_TYPES
        .iter()
        .enumerate()
        .map(|(i, letter)| {
            let style = if i == state.selected_letter {
                Style::default().fg(accent_color(state.is_night)).bold()
            } else {
                Style::default()
            };
            ListItem::new(format!("  {}", letter.label)).style(style)
        })
        .collect();

    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Письма ")),
        chunks[0],
    );

    draw_card_area(f, state, chunks[1], "Enter — написать письмо, ←/→ — тип");
}

fn draw_images(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Prompt input
            Constraint::Length(2), // Styles
            Constraint::Min(3),    // Result
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    f.render_widget(
        Paragraph::new(state.image_prompt.as_str())
            .block(input_block("Опиши свой сон, чувство или мечту (e — ввод)", editing)),
        chunks[0],
    );
    if editing {
        set_input_cursor(f, chunks[0], &state.image_prompt, state.image_cursor);
    }

    let labels: Vec<&str> = IMAGE_STYLES.iter().map(|s| s.label).collect();
    f.render_widget(
        Paragraph::new(pill_row(&labels, state.selected_image_style, state.is_night)),
        chunks[1],
    );

    let mut lines: Vec<Line> = Vec::new();
    if state.is_loading {
        lines.push(Line::from(Span::styled(
            "Подбираю краски...",
            Style::default().fg(Color::Gray).italic(),
        )));
    } else if let Some(source) = &state.image_source {
        lines.push(Line::from(Span::styled(
            "Образ готов",
            Style::default().fg(accent_color(state.is_night)).bold(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(truncated(source.as_str(), 120)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "s — сохранить, Esc — закрыть",
            Style::default().fg(Color::DarkGray),
        )));
        if let Some(path) = &state.image_saved_path {
            lines.push(Line::from(Span::styled(
                format!("Сохранено: {}", path.display()),
                Style::default().fg(Color::Green),
            )));
        }
    } else if let Some(error) = &state.error {
        lines.push(Line::from(Span::styled(
            "Муза отдыхает",
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Gray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Создай визуальное отражение своих чувств. Enter — воплотить.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Образы ")),
        chunks[2],
    );
}

fn draw_journal(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    f.render_widget(
        Paragraph::new(state.journal_input.as_str())
            .block(input_block("Что у тебя внутри? (e — ввод, Enter — отправить)", editing)),
        chunks[0],
    );
    if editing {
        set_input_cursor(f, chunks[0], &state.journal_input, state.journal_cursor);
    }

    let mut lines: Vec<Line> = Vec::new();
    if state.is_loading {
        lines.push(Line::from(Span::styled(
            "VERA пишет ответ...",
            Style::default().fg(Color::Gray).italic(),
        )));
        lines.push(Line::from(""));
    }
    for entry in &state.journal {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", format_timestamp(entry.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(entry.user_text.clone(), Style::default().bold()),
        ]));
        if let Some(reply) = &entry.reply {
            for block in &reply.blocks {
                lines.push(Line::from(Span::styled(
                    format!("  {}", block.replace('\n', " ")),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        lines.push(Line::from(""));
    }
    if state.journal.is_empty() && !state.is_loading {
        lines.push(Line::from(Span::styled(
            "Дневник пока пуст. Напиши первую запись.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((state.journal_scroll, 0))
            .block(Block::default().borders(Borders::ALL).title(" Дневник ")),
        chunks[1],
    );
}

fn draw_library(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Filters
            Constraint::Percentage(50),
            Constraint::Min(3), // Preview
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(pill_row(&LIBRARY_FILTERS, state.selected_filter, state.is_night)),
        chunks[0],
    );

    let items: Vec<ListItem> = state
        .favorites
        .iter()
        .enumerate()
        .map(|(i, fav)| {
            let style = if i == state.selected_favorite {
                Style::default().fg(accent_color(state.is_night)).bold()
            } else {
                Style::default()
            };
            let first = fav.blocks.first().map(String::as_str).unwrap_or("");
            ListItem::new(format!(
                " ♥ {} · {} · {}",
                fav.tag,
                format_timestamp(fav.timestamp),
                truncated(first, 40)
            ))
            .style(style)
        })
        .collect();

    let title = format!(" Сохранённое ({}) ", state.favorites.len());
    if items.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                " Здесь появятся слова, которые ты сохранишь (f).",
                Style::default().fg(Color::DarkGray),
            ))
            .block(Block::default().borders(Borders::ALL).title(title)),
            chunks[1],
        );
    } else {
        f.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
            chunks[1],
        );
    }

    // Preview of the selected favorite
    let preview: Vec<Line> = state
        .favorites
        .get(state.selected_favorite)
        .map(|fav| card_lines(fav, state.is_night))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(preview)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );
}

/// Shared card area used by Home and Letters
fn draw_card_area(f: &mut Frame, state: &RenderState, area: Rect, hint: &str) {
    let mut lines: Vec<Line> = Vec::new();

    if state.is_loading {
        lines.push(Line::from(Span::styled(
            "VERA подбирает слова...",
            Style::default().fg(Color::Gray).italic(),
        )));
    } else if let Some(card) = &state.current_card {
        lines = card_lines(card, state.is_night);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "f — в библиотеку, Esc — закрыть",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(error) = &state.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((state.card_scroll, 0))
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let text = if state.is_loading {
        Span::styled(" ожидание ответа... ", Style::default().fg(Color::Yellow))
    } else if let Some(error) = &state.error {
        Span::styled(format!(" {} ", error), Style::default().fg(Color::Red))
    } else {
        Span::styled(
            " 1-5 экраны · n ночь · ? помощь · q выход ",
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(Paragraph::new(Line::from(text)), area);
}

fn draw_onboarding(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup = centered_rect(70, 60, area);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();

    if state.onboarding_step == 0 {
        // Splash
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            APP_NAME,
            Style::default().fg(Color::Yellow).bold(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "GENTLE SUPPORT",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let (title, subtitle) = ONBOARDING_STEPS[state.onboarding_step - 1];
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(Color::Yellow).bold(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(subtitle, Style::default())));
        lines.push(Line::from(""));

        // Step indicators
        let dots: String = (1..=ONBOARDING_STEPS.len())
            .map(|i| if i == state.onboarding_step { '●' } else { '○' })
            .collect();
        lines.push(Line::from(Span::styled(dots, Style::default().fg(Color::Gray))));
        lines.push(Line::from(""));

        let action = if state.onboarding_step == ONBOARDING_STEPS.len() {
            "Enter — начать мягко"
        } else {
            "Enter — далее"
        };
        lines.push(Line::from(Span::styled(
            format!("{} · Esc — пропустить", action),
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn draw_daily_overlay(f: &mut Frame, message: &str, is_night: bool, area: Rect) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let mut lines = vec![Line::from("")];
    for row in message.lines() {
        lines.push(Line::from(row.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter — принять",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent_color(is_night)))
                    .title(" Фраза дня "),
            ),
        popup,
    );
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(""),
        Line::from("  1-5      экраны"),
        Line::from("  ←/→ h/l  выбор ситуации / типа / стиля / фильтра"),
        Line::from("  ↑/↓ k/j  прокрутка, выбор в библиотеке"),
        Line::from("  Enter    создать (слово / письмо / образ / запись)"),
        Line::from("  e        редактировать текст (дневник, образы)"),
        Line::from("  f        добавить/убрать из библиотеки"),
        Line::from("  s        сохранить образ на диск"),
        Line::from("  t / m    тон / настроение"),
        Line::from("  n        ночной режим"),
        Line::from("  Esc      закрыть карточку / ввод"),
        Line::from("  q        выход"),
    ];

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Помощь (Esc — закрыть) "),
        ),
        popup,
    );
}

/// Place the terminal cursor inside a single-line input block
fn set_input_cursor(f: &mut Frame, area: Rect, buffer: &str, cursor: usize) {
    let chars_before = buffer
        .get(..cursor.min(buffer.len()))
        .map(|s| s.chars().count() as u16)
        .unwrap_or(0);
    let max_x = area.x + area.width.saturating_sub(2);
    let x = (area.x + 1 + chars_before).min(max_x);
    f.set_cursor_position((x, area.y + 1));
}

fn truncated(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
