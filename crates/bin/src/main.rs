use std::{path::Path, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vitrine::{Broadcaster, ConnectionRegistry, FileCheckpoint, Server, State};

mod cli;
mod schema;

use schema::Panel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("vitrine=info".parse().unwrap()),
        )
        .init();

    let panel = load_panel(&args.state_file);

    let registry = Arc::new(ConnectionRegistry::new());
    let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&registry)));
    let checkpoint = Arc::new(FileCheckpoint::new(&args.state_file));

    let mut state = State::new(panel);
    state.watch(broadcaster);
    state.watch(checkpoint);
    let handle = state.spawn();

    let mut server = Server::new(handle.clone(), Arc::clone(&registry)).with_assets(&args.assets);
    server.start(&args.addr).await?;

    println!("vitrined listening on http://{}", server.local_addr()?);
    println!();
    println!("Available endpoints:");
    println!("  GET/POST/PUT/DELETE /api/<path>  - one-shot state access");
    println!("  GET /socket                      - streaming state access");
    println!("  GET /                            - display client assets");
    println!();
    println!("Press Ctrl+C to shutdown");

    shutdown_signal().await;
    tracing::info!("shutdown signal received");

    server.stop().await?;
    handle.shutdown().await;

    println!("Server shut down");
    Ok(())
}

/// Restore the state tree from disk, or start empty when there is
/// nothing to restore. The first mutation writes the file.
fn load_panel(path: &Path) -> Panel {
    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(panel) => {
                tracing::info!(path = %path.display(), "restored state");
                panel
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "state file unreadable: {e}; starting empty");
                Panel::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), "no state file: {e}; starting empty");
            Panel::default()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
