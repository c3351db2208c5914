// Slash Reader desktop library entry point.
// The shell owns the window and menu; the parse bridge is managed app
// state, wired up once the pipeline finishes loading.

mod commands;
mod menu;
mod window;

use anyhow::Context;
use slash_common::protocol::events::{PARSER_READY_EVENT, PARSE_RESULT_EVENT};
use slash_parser::bridge::{DeliveryReceiver, ParseBridge, ParserState};
use slash_parser::config::ParserConfig;
use slash_parser::pipeline::Pipeline;
use tauri::{AppHandle, Emitter, Manager, RunEvent};
use tokio::sync::mpsc;
use tracing::error;

/// Parser state as managed by Tauri.
pub(crate) type AppParserState = ParserState<Pipeline>;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();

    let app = tauri::Builder::default()
        .manage(AppParserState::new())
        .menu(|handle| menu::build_menu(handle))
        .on_menu_event(menu::handle_menu_event)
        .invoke_handler(tauri::generate_handler![commands::parse, commands::parser_status])
        .setup(|app| {
            window::create_main_window(app.handle())?;

            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                if let Err(error) = start_pipeline(handle).await {
                    error!(%error, "pipeline initialization failed");
                }
            });
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("failed to build slash reader app");

    app.run(|app, event| match event {
        // All windows closed: quit, except on macOS where the process
        // stays resident.
        RunEvent::ExitRequested { code: None, api, .. } => {
            #[cfg(target_os = "macos")]
            api.prevent_exit();
            #[cfg(not(target_os = "macos"))]
            let _ = api;
        }
        // Dock icon clicked with no window open: make a new one.
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { has_visible_windows: false, .. } => {
            if let Err(error) = window::create_main_window(app) {
                error!(%error, "failed to recreate main window");
            }
        }
        _ => {}
    });
}

/// Load the pipeline, wire the bridge, and start forwarding deliveries to
/// the front-end. On failure the parser state is marked failed and the
/// front-end never becomes able to submit.
async fn start_pipeline(app: AppHandle) -> anyhow::Result<()> {
    let config = ParserConfig::load();
    let state = app.state::<AppParserState>();

    match Pipeline::load(&config).await {
        Ok(pipeline) => {
            let (tx, rx) = mpsc::unbounded_channel();
            state.mark_ready(ParseBridge::new(pipeline, tx)).await;
            forward_deliveries(app.clone(), rx);
            app.emit(PARSER_READY_EVENT, ()).context("failed to emit parser-ready event")?;
            Ok(())
        }
        Err(error) => {
            state.mark_failed().await;
            Err(error).context("pipeline failed to load")
        }
    }
}

/// Relay bridge deliveries to the front-end as events.
fn forward_deliveries(app: AppHandle, mut rx: DeliveryReceiver) {
    tauri::async_runtime::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if let Err(error) = app.emit(PARSE_RESULT_EVENT, &payload) {
                error!(%error, "failed to push parse result to front-end");
            }
        }
    });
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
