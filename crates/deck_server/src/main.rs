//! Deck server binary
//!
//! `deck-server [OPTIONS]` — serves the deck routes over HTTP. Decks
//! persist as JSON files under the data directory.

use std::sync::Arc;

use deck_server::{app, AppState};
use persistence::FileStore;
use pptx_export::HttpFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut port: u16 = match std::env::var("DECK_SERVER_PORT") {
        Ok(value) => value.parse().expect("Invalid DECK_SERVER_PORT"),
        Err(_) => 4000,
    };
    let mut data_dir =
        std::env::var("DECK_DATA_DIR").unwrap_or_else(|_| "./deck-data".to_string());

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().expect("Invalid port number");
                    i += 2;
                } else {
                    eprintln!("--port requires a value");
                    std::process::exit(1);
                }
            }
            "--data-dir" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("--data-dir requires a value");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("Usage: deck-server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --port <PORT>      Port to listen on (default: 4000)");
                println!("  --data-dir <DIR>       Deck storage directory (default: ./deck-data)");
                println!("  -h, --help             Show this help message");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(1);
            }
        }
    }

    let storage = Arc::new(FileStore::new(&data_dir)?);
    let state = AppState::new(storage, HttpFetcher::new());

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(%addr, data_dir = %data_dir, "deck server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
