// rediff entry point: dump or browse aligned file histories

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rediff::{
    app::AppState,
    event::{self, AppAction},
    repo::Git2Repo,
    views,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Show every version of the files changed since a base commit, aligned
/// line by line in side-by-side panes.
#[derive(Parser)]
#[command(name = "rediff", version)]
struct Cli {
    /// Commit-ish the analyzed range starts after (branch, tag, or hash).
    base_ref: String,

    /// Repository location; parent directories are searched for the root.
    #[arg(short = 'C', long, default_value = ".")]
    repo_path: PathBuf,

    /// Start on the history of this file (path at HEAD).
    #[arg(long)]
    file: Option<String>,

    /// Print the aligned histories to stdout instead of starting the TUI.
    #[arg(long)]
    dump: bool,

    /// Append diagnostic logs to this file. Filtered with RUST_LOG.
    #[arg(long, env = "REDIFF_LOG")]
    log_file: Option<PathBuf>,
}

/// Send tracing output to `path`; the terminal belongs to the TUI.
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .context(format!("Failed to open log file '{}'", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::from_default_env())
        .try_init()
        .context("Failed to install log subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let repo = Git2Repo::open(cli.repo_path.clone())?;
    let histories = rediff::load(&repo, &cli.base_ref)?;

    if cli.dump {
        match &cli.file {
            Some(path) => {
                let history = histories
                    .get(path)
                    .context(format!("No history for '{}' in {}..HEAD", path, cli.base_ref))?;
                print!("{}", views::plain::HistoryDump(history));
            }
            None => print!("{}", views::plain::render_all(&histories)),
        }
        return Ok(());
    }

    if histories.is_empty() {
        eprintln!("No files changed in {}..HEAD", cli.base_ref);
        return Ok(());
    }

    let mut app = AppState::new(histories);
    if let Some(path) = &cli.file {
        if !app.select_file(path) {
            anyhow::bail!("No history for '{}' in {}..HEAD", path, cli.base_ref);
        }
    }

    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stderr>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            views::file_panes::render(app, frame);
            if app.show_help {
                views::help::render(frame);
            }
        })?;

        let action = event::parse_key_event(event::read()?);

        if app.show_help {
            // Only closing keys apply while the dialog is open
            if matches!(action, AppAction::ShowHelp | AppAction::Quit) {
                app.close_help();
            }
            continue;
        }

        match action {
            AppAction::MoveUp => app.move_up(),
            AppAction::MoveDown => app.move_down(),
            AppAction::PageUp => app.page_up(),
            AppAction::PageDown => app.page_down(),
            AppAction::ScrollLeft => app.scroll_left(),
            AppAction::ScrollRight => app.scroll_right(),
            AppAction::FocusLeft => app.focus_left(),
            AppAction::FocusRight => app.focus_right(),
            AppAction::NextFile => app.next_file(),
            AppAction::PrevFile => app.prev_file(),
            AppAction::ShowHelp => app.toggle_help(),
            AppAction::Quit => app.should_quit = true,
            AppAction::None => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
