//! Terminal front end: menu, cart, orders, assistant and contact views.

mod app;
mod ui;
mod widgets;

pub use app::{App, Focus};

use anyhow::Result;
use campuseats_core::client::client_from_config;
use campuseats_core::geolocation::FixedGeolocator;
use campuseats_core::{Concierge, Config, Store};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;

pub async fn run_interactive(config: &Config) -> Result<()> {
    let client = client_from_config(config);
    let geolocator = Arc::new(FixedGeolocator::new(config.home));
    let concierge = Concierge::spawn(client, geolocator);
    let mut app = App::new(Store::new(config.thread_chat_history));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal, &concierge).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = concierge.shutdown().await {
        tracing::debug!("concierge already stopped: {e}");
    }
    tracing::info!("session ended with {} orders placed", app.store.orders.len());
    result
}
