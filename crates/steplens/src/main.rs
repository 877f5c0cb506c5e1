//! steplens CLI - step-through viewer for multi-pass code transformations

mod app;
mod config;
mod logging;
mod ui;
mod views;

use anyhow::{Context, Result};
use app::{App, DecompileWorker};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use steplens_core::{CommandDecompiler, Decompiler, FixtureDecompiler};

#[derive(Parser, Debug)]
#[command(name = "steplens")]
#[command(author, version, about = "A step-through viewer for multi-pass code transformations")]
struct Args {
    /// Precomputed step set (JSON) to show instead of running a decompiler
    #[arg(long, conflicts_with = "command")]
    steps: Option<PathBuf>,

    /// Decompiler program and arguments; reads source on stdin, writes JSON steps
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    command: Option<Vec<String>>,

    /// Source file to load into the editor at startup
    #[arg(short, long)]
    initial: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// Pick the decompiler: CLI flags win over the config file
fn build_decompiler(args: &Args, config: &config::Config) -> Result<Box<dyn Decompiler>> {
    let initial = args
        .initial
        .clone()
        .or_else(|| config.backend.initial_code.clone());

    if let Some(path) = &args.steps {
        if !path.exists() {
            anyhow::bail!("Step file not found: {}", path.display());
        }
        return Ok(Box::new(
            FixtureDecompiler::new(path).with_initial_code(initial),
        ));
    }

    let argv = args
        .command
        .clone()
        .unwrap_or_else(|| config.backend.command.clone());
    let decompiler = CommandDecompiler::from_argv(&argv).context(
        "No decompiler configured.\n\
         \n\
         Usage: steplens --command <program> [args...]\n\
         \x20      steplens --steps <result.json>\n\
         \n\
         Or set [backend] command in ~/.config/steplens/config.toml",
    )?;
    Ok(Box::new(decompiler.with_initial_code(initial)))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::Config::load();

    let log_file = args.log_file.clone().or_else(|| config.log.file.clone());
    let level = if args.verbose { "debug" } else { config.log.level.as_str() };
    logging::init(log_file.as_deref(), level)?;

    let decompiler = build_decompiler(&args, &config)?;

    let mut app = App::from_config(&config);
    app.attach_worker(DecompileWorker::spawn(decompiler));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if config.ui.mouse {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "exiting with error");
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(16);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(me) => app.handle_mouse(me),
                _ => {}
            }
        }

        // Pick up decompiler results
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
