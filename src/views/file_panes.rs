// Synchronized panes, one per commit of the selected file

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{app::AppState, views::plain, AlignedRow, DiffLineKind, FileCommit};

const HEADER_STYLE: Style = Style::new().fg(Color::White).bg(Color::Green);
const FOOTER_STYLE: Style = Style::new().fg(Color::White).bg(Color::Blue);
const PLACEHOLDER_STYLE: Style = Style::new().fg(Color::Blue).add_modifier(Modifier::DIM);
const FOCUSED_BORDER: Style = Style::new().fg(Color::Yellow);
const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

/// Narrowest a pane gets before fewer panes are shown.
pub const MIN_PANE_WIDTH: u16 = 24;

/// Render the panes of the selected history with header and footer.
///
/// Updates the visible row and pane counts in `app` before drawing, so
/// scrolling follows the current terminal size.
pub fn render(app: &mut AppState, frame: &mut Frame) {
    let [header_area, content_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let Some(history) = app.current_history() else {
        frame.render_widget(Paragraph::new("rediff").style(HEADER_STYLE), header_area);
        let placeholder = Paragraph::new("No files changed in range")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, content_area);
        frame.render_widget(Paragraph::new("").style(FOOTER_STYLE), footer_area);
        return;
    };

    let pane_count = history.commit_count();
    let fitting = usize::from((content_area.width / MIN_PANE_WIDTH).max(1));
    let visible_panes = fitting.min(pane_count).max(1);
    // Pane borders take two rows
    let visible_rows = usize::from(content_area.height.saturating_sub(2));
    app.fit_to_screen(visible_rows, visible_panes);

    let history = match app.current_history() {
        Some(history) => history,
        None => return,
    };

    let header = format!(
        " {} ({}/{})",
        plain::history_title(history),
        app.file_index + 1,
        app.histories.len()
    );
    frame.render_widget(Paragraph::new(header).style(HEADER_STYLE), header_area);

    let shown = app.first_pane..(app.first_pane + visible_panes).min(pane_count);
    let pane_areas = Layout::horizontal(
        shown
            .clone()
            .map(|_| Constraint::Ratio(1, visible_panes as u32)),
    )
    .split(content_area);

    for (pane, area) in shown.zip(pane_areas.iter()) {
        render_pane(frame, app, &history.commits()[pane], pane, *area);
    }

    let footer = format!(
        " row {}/{}  commit {}/{}  ? help",
        app.cursor_row + 1,
        history.total_length(),
        app.focused_pane + 1,
        pane_count
    );
    frame.render_widget(Paragraph::new(footer).style(FOOTER_STYLE), footer_area);
}

fn render_pane(frame: &mut Frame, app: &AppState, file_commit: &FileCommit, pane: usize, area: Rect) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", plain::commit_title(file_commit)));
    if pane == app.focused_pane {
        block = block.border_style(FOCUSED_BORDER);
    }

    let lines: Vec<Line> = file_commit
        .content_in_global_coordinates()
        .iter()
        .enumerate()
        .skip(app.scroll_row)
        .take(app.visible_rows)
        .map(|(row_idx, row)| {
            let line = row_line(row, app.column_offset);
            if row_idx == app.cursor_row {
                line.patch_style(Style::new().add_modifier(CURSOR_MODIFIER))
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One styled screen line for a row, with its tag character stripped.
fn row_line(row: &AlignedRow, column_offset: usize) -> Line<'static> {
    let style = match row.kind() {
        None => PLACEHOLDER_STYLE,
        Some(DiffLineKind::Addition) => Style::new().fg(Color::Green),
        Some(DiffLineKind::Deletion) => Style::new().fg(Color::Red),
        Some(DiffLineKind::Context) => Style::new(),
    };
    let text: String = row.text().chars().skip(column_offset).collect();

    Line::from(Span::styled(text, style)).style(style)
}
