// TUI application state management

use crate::{FileHistories, FileHistory};

/// Columns moved per horizontal scroll step.
pub const HORIZONTAL_STEP: usize = 4;

/// Application state for the synchronized pane viewer.
///
/// All panes share `cursor_row` and `scroll_row`, so aligned rows of every
/// commit stay on the same screen line.
pub struct AppState {
    pub histories: FileHistories,
    /// Index of the shown history in `histories`.
    pub file_index: usize,
    /// Pane (commit) that has focus.
    pub focused_pane: usize,
    /// Leftmost pane on screen.
    pub first_pane: usize,
    pub cursor_row: usize,
    /// First row on screen.
    pub scroll_row: usize,
    /// Characters hidden at the start of every line.
    pub column_offset: usize,
    /// Rows that fit in a pane, updated by the renderer.
    pub visible_rows: usize,
    /// Panes that fit side by side, updated by the renderer.
    pub visible_panes: usize,
    pub show_help: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(histories: FileHistories) -> Self {
        Self {
            histories,
            file_index: 0,
            focused_pane: 0,
            first_pane: 0,
            cursor_row: 0,
            scroll_row: 0,
            column_offset: 0,
            visible_rows: 1,
            visible_panes: 1,
            show_help: false,
            should_quit: false,
        }
    }

    /// Start on the history whose end-state path is `path`.
    ///
    /// Unknown paths leave the first history selected and return false.
    pub fn select_file(&mut self, path: &str) -> bool {
        match self.histories.position(path) {
            Some(idx) => {
                self.show_file(idx);
                true
            }
            None => false,
        }
    }

    pub fn current_history(&self) -> Option<&FileHistory> {
        self.histories.get_index(self.file_index)
    }

    fn total_rows(&self) -> usize {
        self.current_history().map_or(0, FileHistory::total_length)
    }

    fn pane_count(&self) -> usize {
        self.current_history().map_or(0, FileHistory::commit_count)
    }

    pub fn move_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
        self.keep_cursor_visible();
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.total_rows() {
            self.cursor_row += 1;
        }
        self.keep_cursor_visible();
    }

    pub fn page_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(self.visible_rows.max(1));
        self.keep_cursor_visible();
    }

    pub fn page_down(&mut self) {
        let last = self.total_rows().saturating_sub(1);
        self.cursor_row = (self.cursor_row + self.visible_rows.max(1)).min(last);
        self.keep_cursor_visible();
    }

    pub fn scroll_left(&mut self) {
        self.column_offset = self.column_offset.saturating_sub(HORIZONTAL_STEP);
    }

    pub fn scroll_right(&mut self) {
        self.column_offset += HORIZONTAL_STEP;
    }

    pub fn focus_left(&mut self) {
        self.focused_pane = self.focused_pane.saturating_sub(1);
        self.keep_focus_visible();
    }

    pub fn focus_right(&mut self) {
        if self.focused_pane + 1 < self.pane_count() {
            self.focused_pane += 1;
        }
        self.keep_focus_visible();
    }

    /// Switch to the next history, wrapping around.
    pub fn next_file(&mut self) {
        if !self.histories.is_empty() {
            self.show_file((self.file_index + 1) % self.histories.len());
        }
    }

    /// Switch to the previous history, wrapping around.
    pub fn prev_file(&mut self) {
        if !self.histories.is_empty() {
            let count = self.histories.len();
            self.show_file((self.file_index + count - 1) % count);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    /// Re-apply scroll limits after the renderer updated the visible size.
    pub fn fit_to_screen(&mut self, visible_rows: usize, visible_panes: usize) {
        self.visible_rows = visible_rows.max(1);
        self.visible_panes = visible_panes.max(1);
        self.keep_cursor_visible();
        self.keep_focus_visible();
    }

    fn show_file(&mut self, idx: usize) {
        self.file_index = idx;
        self.focused_pane = 0;
        self.first_pane = 0;
        self.cursor_row = 0;
        self.scroll_row = 0;
        self.column_offset = 0;
    }

    fn keep_cursor_visible(&mut self) {
        if self.cursor_row < self.scroll_row {
            self.scroll_row = self.cursor_row;
        } else if self.cursor_row >= self.scroll_row + self.visible_rows {
            self.scroll_row = self.cursor_row + 1 - self.visible_rows;
        }
        // No empty rows below the last one while there is more to show
        let max_scroll = self.total_rows().saturating_sub(self.visible_rows);
        self.scroll_row = self.scroll_row.min(max_scroll);
    }

    fn keep_focus_visible(&mut self) {
        if self.focused_pane < self.first_pane {
            self.first_pane = self.focused_pane;
        } else if self.focused_pane >= self.first_pane + self.visible_panes {
            self.first_pane = self.focused_pane + 1 - self.visible_panes;
        }
        let max_first = self.pane_count().saturating_sub(self.visible_panes);
        self.first_pane = self.first_pane.min(max_first);
    }
}
