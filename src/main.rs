mod app_service;
mod app_state;
mod commands;
mod config;
mod form;
mod schedule;
mod storage;
mod ui;

use anyhow::Context;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app_service::{handle_command, refresh_ui};
use crate::app_state::{App, AppEvent};
use crate::commands::AppCommand;
use crate::config::AppConfig;
use crate::ui::draw;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv::dotenv().is_ok();
    let config = AppConfig::from_env();

    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log dir {}", config.log_dir.display()))?;
    let log_path = config.log_dir.join(format!("app-{}.log", ts));
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    // the terminal belongs to the TUI, so logs go to a file
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("refdesk", log::LevelFilter::Info)
        .filter_module("sqlx", log::LevelFilter::Error)
        .filter_module("sea_orm", log::LevelFilter::Error)
        .init();

    let mut startup_info = Vec::new();
    if env_loaded {
        startup_info.push("✓ loaded .env".to_string());
    } else {
        startup_info.push("⚠ no .env file, using process environment".to_string());
    }
    startup_info.push(format!("log file: {}", log_path.display()));

    let db = Arc::new(
        storage::establish_connection(&config.database_url)
            .await
            .context("database connection failed")?,
    );
    startup_info.push("✓ database ready".to_string());
    startup_info.push("press / then type help for commands".to_string());
    info!("startup complete, refresh every {:?}", config.refresh_interval);

    // screen -> worker commands, worker -> screen events
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();

    // periodic refresh of lists, lookup names and the summary
    {
        let dbc = Arc::clone(&db);
        let txc = evt_tx.clone();
        let every = config.refresh_interval;
        tokio::spawn(async move {
            loop {
                refresh_ui(&dbc, &txc).await;
                tokio::time::sleep(every).await;
            }
        });
    }

    // commands run one at a time on a single worker
    let db_bg = Arc::clone(&db);
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            handle_command(cmd, &db_bg, &evt_tx).await;
        }
    });

    // terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(startup_info, cmd_tx, evt_rx);
    let rx = app
        .evt_rx
        .take()
        .context("event receiver already taken")?;
    let res = run_app_loop(&mut terminal, &mut app, rx).await;

    // restore the terminal before reporting the loop result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("shutting down");
    res.map_err(Into::into)
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // drain worker events without blocking the draw loop
        while let Ok(event) = evt_rx.try_recv() {
            app.apply_event(event);
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key.code) {
                    return Ok(());
                }
            }
        }
    }
}
