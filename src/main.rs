mod app;
mod cli;
mod color;
mod config;
mod db;
mod entry;
mod error;
mod event;
mod logging;
mod report;
mod tickets;
mod time_mask;
mod tui;
mod types;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use crate::config::JournalConfig;
use crate::tickets::{DemoTicketSource, TicketSource};

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let config = JournalConfig::load()?;
    logging::init(&config.log_level);

    let db_path = config.db_path();
    let conn = db::init(&db_path)?;
    let source: Arc<dyn TicketSource> = Arc::new(DemoTicketSource::new());
    if let Some(command) = cli_opts.command {
        return cli::run(command, &config, source.as_ref(), &conn);
    }

    let mut app = app::App::new(conn, config, source);
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
