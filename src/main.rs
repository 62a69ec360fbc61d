//! Bellbox — headless notification inbox client
//!
//! Wires the full engine (push channel + pull API + store + alerts) to a
//! live server and logs inbox activity. Useful for verifying a backend
//! without a UI in front of the engine.
//!
//! Usage:
//!   bellbox --url ws://host:7070/stream --api http://host:7070 --token secret
//!   bellbox ... --verbose                # debug-level logging

use anyhow::Context;
use bellbox_engine::{HttpNotificationApi, InboxController};
use bellbox_stream::{StreamConfig, StreamConnection};
use clap::Parser;
use secrecy::SecretString;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bellbox", about = "Bellbox — headless notification inbox client")]
struct Cli {
    /// Push channel endpoint
    #[arg(long, default_value = "ws://127.0.0.1:7070/stream")]
    url: String,

    /// Pull API base URL
    #[arg(long, default_value = "http://127.0.0.1:7070")]
    api: String,

    /// Bearer credential (also read from BELLBOX_TOKEN)
    #[arg(long, env = "BELLBOX_TOKEN")]
    token: String,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let credential = SecretString::from(cli.token);

    let api = HttpNotificationApi::new(&cli.api, credential.clone());
    let (controller, mut alerts) = InboxController::new(api);

    // Prime the store before the stream starts delivering.
    controller.refresh().await;
    info!(
        unread = controller.view().unread_count,
        total = controller.view().notifications.len(),
        "inbox primed"
    );

    let connection = StreamConnection::connect(
        StreamConfig::new(&cli.url),
        credential,
        controller.clone(),
    )
    .context("no credential provided, refusing to start without a session")?;
    controller.attach_connection(connection.state_watch());

    // Log connection transitions (the live/offline indicator).
    let mut state_rx = connection.state_watch();
    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = *state_rx.borrow();
            if state.is_live() {
                info!("stream live");
            } else {
                warn!(?state, "stream offline");
            }
        }
    });

    // Log toasts as they are raised.
    let alert_logger = {
        let controller = controller.clone();
        tokio::spawn(async move {
            while let Some(alert) = alerts.recv().await {
                info!(
                    severity = ?alert.severity,
                    dismiss_secs = alert.auto_dismiss.as_secs(),
                    unread = controller.view().unread_count,
                    "{}",
                    alert.title
                );
            }
        })
    };

    tokio::signal::ctrl_c().await.context("ctrl-c handler")?;
    info!("shutting down");

    connection.disconnect().await;
    controller.detach_connection();
    alert_logger.abort();

    let view = controller.view();
    info!(
        unread = view.unread_count,
        total = view.notifications.len(),
        "final inbox state"
    );
    Ok(())
}
