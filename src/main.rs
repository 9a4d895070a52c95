mod app;
mod cli;
mod ui;

use catlist::config;
use catlist::storage;
use catlist::todo;
use catlist::utils;

use anyhow::{Result, anyhow};
use app::AppState;
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use std::fs;
use std::io::{IsTerminal, Write};
use std::panic;
use storage::{SqliteStore, UiCache};
use todo::{EditTarget, TodoService};
use ui::theme::Theme;
use utils::paths::{get_crash_log_path, get_logs_dir};

/// Install a panic hook that writes crash information to a log file
fn install_crash_handler() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if let Ok(crash_log_path) = get_crash_log_path() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let mut crash_report = format!("=== CRASH at {timestamp} ===\n");

            if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
                crash_report.push_str(&format!("Message: {message}\n"));
            } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
                crash_report.push_str(&format!("Message: {message}\n"));
            }

            if let Some(location) = panic_info.location() {
                crash_report.push_str(&format!(
                    "Location: {}:{}:{}\n",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }

            crash_report.push_str(&format!("\nBacktrace:\n{}\n\n", std::backtrace::Backtrace::force_capture()));

            if let Some(parent) = crash_log_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(mut file) = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log_path)
            {
                let _ = file.write_all(crash_report.as_bytes());
                eprintln!("\nCrash logged to: {}", crash_log_path.display());
            }
        }

        default_hook(panic_info);
    }));
}

/// Initialize file-based logging for the TUI mode.
///
/// Logs are written to ~/.catlist/logs/catlist.log, rotated daily.
/// Log level can be controlled with RUST_LOG env var (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = get_logs_dir().ok()?;

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {e}");
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "catlist.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

/// Subcommands log warnings to stderr only.
fn init_stderr_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn open_service() -> Result<TodoService<SqliteStore>> {
    let store = SqliteStore::open_default()?;
    Ok(TodoService::open(store))
}

/// Convert a 1-based position from the command line.
fn position_from(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Item numbers start at 1"))
}

fn main() -> Result<()> {
    install_crash_handler();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(command) => {
            init_stderr_logging();
            let mut service = open_service()?;
            match command {
                Commands::Add { text, category } => handle_add(&mut service, &config, &text, category)?,
                Commands::List { search } => handle_list(&service, search.as_deref()),
                Commands::Done => handle_done(&service),
                Commands::Edit {
                    category,
                    number,
                    text,
                    new_category,
                } => handle_edit(&mut service, category.trim(), number, &text, new_category)?,
                Commands::Complete { category, number } => handle_complete(&mut service, category.trim(), number)?,
                Commands::Remove { category, number } => handle_remove(&mut service, category.trim(), number)?,
            }
        }
        None => {
            // Guard must be kept alive for the duration of the app
            let _log_guard = init_file_logging();
            tracing::info!("catlist starting");

            let service = open_service()?;
            let ui_cache = UiCache::load().ok();
            let theme = Theme::from_config(&config);
            let state = AppState::new(service, config, theme, ui_cache);

            let state = ui::run_tui(state)?;
            if let Err(e) = state.ui_cache().save() {
                tracing::warn!(error = %e, "could not save UI cache");
            }

            tracing::info!("catlist exiting gracefully");
        }
    }

    Ok(())
}

fn choose_category(service: &TodoService<SqliteStore>, config: &Config) -> Result<String> {
    let categories = config.picker_categories(service.map());
    let default = config.default_category().to_string();

    if !std::io::stdin().is_terminal() {
        return Ok(default);
    }

    let start = categories.iter().position(|c| *c == default).unwrap_or(0);
    let choice = dialoguer::Select::new()
        .with_prompt("Select a category")
        .items(&categories)
        .default(start)
        .interact_opt()?;

    match choice.and_then(|i| categories.get(i)) {
        Some(category) => Ok(category.clone()),
        None => Err(anyhow!("No category selected")),
    }
}

fn handle_add(
    service: &mut TodoService<SqliteStore>,
    config: &Config,
    text: &str,
    category: Option<String>,
) -> Result<()> {
    let category = match category {
        Some(category) => category,
        None => choose_category(service, config)?,
    };

    service.add(&category, text)?;
    println!("✓ Added to {}", category.trim());

    Ok(())
}

fn handle_list(service: &TodoService<SqliteStore>, search: Option<&str>) {
    let view = service.search(search.unwrap_or_default());
    let map = view.map();

    if map.is_empty() {
        match search {
            Some(query) if !query.is_empty() => println!("No items match \"{query}\""),
            _ => println!("You didn't add anything yet."),
        }
        return;
    }

    for (category, items) in map.iter() {
        println!("\n{category}");
        for (position, text) in items.iter().enumerate() {
            // Numbers refer to the live list so they can be passed to edit/complete/remove
            let number = view
                .origin(category, position)
                .map_or(position, |target| target.position)
                + 1;
            println!("  {number}. {text}");
        }
    }
    println!();
}

fn handle_done(service: &TodoService<SqliteStore>) {
    let log = service.completed();
    if log.is_empty() {
        println!("You didn't complete any tasks yet!");
        return;
    }

    for record in log.records() {
        println!("✓ {}", record.text);
        println!("    {}", ui::components::done_list::record_details(record));
    }
}

fn handle_edit(
    service: &mut TodoService<SqliteStore>,
    category: &str,
    number: usize,
    text: &str,
    new_category: Option<String>,
) -> Result<()> {
    let target = EditTarget::new(category, position_from(number)?);
    let destination = new_category.unwrap_or_else(|| category.to_string());

    service.edit(&target, text, &destination)?;
    println!("✓ Saved to {}", destination.trim());

    Ok(())
}

fn handle_complete(service: &mut TodoService<SqliteStore>, category: &str, number: usize) -> Result<()> {
    service.complete(category, position_from(number)?)?;
    if let Some(record) = service.completed().last() {
        println!("✓ Completed \"{}\"", record.text);
    }

    Ok(())
}

fn handle_remove(service: &mut TodoService<SqliteStore>, category: &str, number: usize) -> Result<()> {
    service.remove(category, position_from(number)?)?;
    println!("✓ Deleted item {number} from {category}");

    Ok(())
}
