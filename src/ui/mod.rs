pub mod components;
pub mod theme;

use crate::app::event::{handle_key_event, handle_mouse_event};
use crate::app::AppState;
use crate::storage::SqliteStore;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, warn};

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = disable_raw_mode();
        let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
        let _ = stdout.flush();
    }
}

/// Run the interactive list until the user quits. Hands the state back so
/// the caller can persist UI preferences.
pub fn run_tui(mut state: AppState<SqliteStore>) -> Result<AppState<SqliteStore>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (db_tx, db_rx) = mpsc::channel();
    let _watcher = state
        .service
        .store()
        .backend()
        .path()
        .and_then(|path| setup_database_watcher(path, db_tx));

    let result = run_app(&mut terminal, &mut state, db_rx);
    terminal.show_cursor()?;

    result.map(|()| state)
}

/// Watch the database file so writes from `catlist add` in another shell
/// show up in a running TUI.
fn setup_database_watcher(db_path: &Path, tx: mpsc::Sender<()>) -> Option<RecommendedWatcher> {
    let watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && event.kind.is_modify()
            {
                let _ = tx.send(());
            }
        },
        Config::default(),
    );

    match watcher {
        Ok(mut w) => match w.watch(db_path, RecursiveMode::NonRecursive) {
            Ok(()) => Some(w),
            Err(e) => {
                warn!(error = %e, path = %db_path.display(), "could not watch database");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "could not create database watcher");
            None
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState<SqliteStore>,
    db_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let mut pending_reload = false;
    loop {
        state.clear_expired_status_message();

        terminal.draw(|f| {
            components::render(f, state);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, state)?;
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, state)?,
                _ => {}
            }
        }

        // Our own writes also fire the watcher; reloading is idempotent so
        // they are simply coalesced here. Reloading waits until no editor
        // is open.
        while db_rx.try_recv().is_ok() {
            pending_reload = true;
        }
        if pending_reload && state.editor.is_none() {
            debug!("database changed on disk");
            state.reload_from_storage();
            pending_reload = false;
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
