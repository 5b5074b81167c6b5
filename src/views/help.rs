// Help overlay listing the keybindings

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);

fn section(title: &str) -> [Line<'_>; 3] {
    [
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ]
}

fn key<'a>(keys: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", keys), KEY_STYLE),
        Span::raw(description),
    ])
}

/// Render the help dialog centered on top of the current view.
pub fn render(frame: &mut Frame) {
    let area = frame.area();

    let mut help_lines = Vec::new();
    help_lines.extend(section("Rows"));
    help_lines.push(key("j/k ↑/↓", "Move cursor down/up in all panes"));
    help_lines.push(key("PgUp/PgDn", "Move one page up/down"));
    help_lines.push(key("h/l ←/→", "Scroll lines left/right"));
    help_lines.extend(section("Panes and files"));
    help_lines.push(key("H/L", "Focus previous/next commit"));
    help_lines.push(key("J/K", "Show next/previous file"));
    help_lines.extend(section("Other"));
    help_lines.push(key("?", "Toggle this help dialog"));
    help_lines.push(key("q/Esc", "Close dialog / Quit application"));
    help_lines.push(Line::from(""));

    let content_width = 50;
    let content_height = help_lines.len() as u16;
    let dialog_width = content_width.min(area.width.saturating_sub(4));
    let dialog_height = (content_height + 2).min(area.height.saturating_sub(2)); // +2 for borders

    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(dialog_width) / 2,
        y: area.y + area.height.saturating_sub(dialog_height) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    // Clear the background to hide underlying content
    frame.render_widget(Clear, dialog_area);

    let help_text = Paragraph::new(help_lines)
        .block(
            Block::default()
                .title(" Help - Keybindings ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(help_text, dialog_area);
}
