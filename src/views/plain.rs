// Plain-text rendering of aligned histories

use std::fmt;

use time::macros::format_description;

use crate::{FileCommit, FileHistories, FileHistory};

/// Heading naming a history, showing both names when the file was renamed.
pub fn history_title(history: &FileHistory) -> String {
    match (history.original_filename(), history.current_filename()) {
        (Some(original), Some(current)) if original != current => {
            format!("{} → {}", original, current)
        }
        (_, Some(name)) | (Some(name), None) => name.to_string(),
        (None, None) => "<unknown>".to_string(),
    }
}

/// Short id and summary of the commit a pane shows.
pub fn commit_title(file_commit: &FileCommit) -> String {
    let commit = file_commit.commit();
    format!("{} {}", commit.short_id, commit.summary)
}

/// Displays one history as text, one block of aligned rows per commit.
///
/// Every block has the same number of rows, so row `n` of each block refers
/// to the same line of the file.
pub struct HistoryDump<'a>(pub &'a FileHistory);

impl fmt::Display for HistoryDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history = self.0;
        writeln!(
            f,
            "### {} ({} rows)",
            history_title(history),
            history.total_length()
        )?;

        for file_commit in history.commits() {
            let date = file_commit
                .commit()
                .commit_date
                .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                .unwrap_or_default();
            writeln!(f)?;
            writeln!(
                f,
                "=== {} ({}) [{}]",
                commit_title(file_commit),
                date,
                file_commit.file_name().unwrap_or("-")
            )?;
            for row in file_commit.content_in_global_coordinates() {
                writeln!(f, "{}", row)?;
            }
        }

        Ok(())
    }
}

pub fn render_history(history: &FileHistory) -> String {
    HistoryDump(history).to_string()
}

/// Render every history, separated by blank lines.
pub fn render_all(histories: &FileHistories) -> String {
    histories
        .iter()
        .map(render_history)
        .collect::<Vec<_>>()
        .join("\n")
}
