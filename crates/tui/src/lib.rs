//! # omni-tui
//!
//! Terminal user interface for Omni-Stack.
//!
//! This crate renders the chat, agent builder, and dashboard pages plus the
//! voice-call overlay. It holds no network code: all backend work happens in
//! `omni-core`, reached over the `Op`/`Event` channels defined in
//! `omni-protocol`.

pub mod app;
pub mod event_handler;
pub mod pages;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::Result;
use omni_core::api::ApiClient;
use omni_core::config::AppConfig;
use omni_core::session::SessionRouter;
use omni_core::store::RecordStore;
use omni_core::voice::SimulatedRoom;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

/// Wire the clients and the session router, then run the app to completion.
pub async fn run_app(config: AppConfig) -> Result<()> {
    let api = Arc::new(ApiClient::new(&config)?);
    let store = Arc::new(RecordStore::new(&config)?);
    let room = Arc::new(SimulatedRoom);

    let (op_tx, op_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();

    let router = SessionRouter::new(api, store, room, event_tx);
    tokio::spawn(router.run(op_rx));

    let mut tui = Tui::init()?;
    let mut app = App::new(op_tx, event_rx);
    let result = app.run(&mut tui).await;
    tui.restore()?;
    result
}
