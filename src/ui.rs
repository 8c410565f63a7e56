use ratatui::{prelude::*, widgets::*};

use crate::models::ContentItem;

/// Accent color of the current theme
pub fn accent_color(is_night: bool) -> Color {
    if is_night {
        Color::Magenta
    } else {
        Color::Yellow
    }
}

/// Render a generated card as lines: blocks separated by a blank line,
/// with a small tag/date footer
pub fn card_lines(item: &ContentItem, is_night: bool) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    for (i, block) in item.blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        for row in block.lines() {
            lines.push(Line::from(row.to_string()));
        }
    }

    lines.push(Line::from(""));
    let heart = if item.is_favorite { "♥" } else { "♡" };
    lines.push(Line::from(Span::styled(
        format!("{} {} · {}", heart, item.tag, format_timestamp(item.timestamp)),
        Style::default().fg(accent_color(is_night)),
    )));

    lines
}

/// Epoch milliseconds as a short local date-time
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%d.%m.%Y %H:%M")
                .to_string()
        })
        .unwrap_or_default()
}

/// A horizontal row of selectable labels, the selected one highlighted
pub fn pill_row<'a>(labels: &[&'a str], selected: usize, is_night: bool) -> Line<'a> {
    let mut spans = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let style = if i == selected {
            Style::default()
                .fg(Color::Black)
                .bg(accent_color(is_night))
                .bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Centered popup area of the given percentage size
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Bordered input block, highlighted while editing
pub fn input_block(title: &str, editing: bool) -> Block<'_> {
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {} ", title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentKind;

    #[test]
    fn test_card_lines_separate_blocks() {
        let item = ContentItem::new("Блок1\n\nБлок2", ContentKind::Word, "Я устала");
        let lines = card_lines(&item, false);
        let texts: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(texts[0], "Блок1");
        assert_eq!(texts[1], "");
        assert_eq!(texts[2], "Блок2");
        assert!(texts.last().unwrap().contains("Я устала"));
    }

    #[test]
    fn test_format_timestamp_handles_bogus_values() {
        assert_eq!(format_timestamp(i64::MAX), "");
    }
}
