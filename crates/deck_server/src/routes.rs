//! Route handlers
//!
//! Bodies are read as raw bytes and parsed explicitly, so any malformed
//! payload becomes a 400 instead of a framework-shaped rejection. Storage
//! errors map one-to-one onto status codes: stale revision 409, foreign
//! lease 423, anything else 500.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use deck_model::{validate_deck, Deck};
use persistence::{PersistError, Revision};
use pptx_export::{export_deck, ExportError, ImageFetcher};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::state::AppState;

/// Optional header identifying the writer for lease validation.
pub const HOLDER_HEADER: &str = "x-deck-holder";

pub fn app<F>(state: AppState<F>) -> Router
where
    F: ImageFetcher + 'static,
{
    Router::new()
        .route("/decks/:id", get(get_deck::<F>).put(put_deck::<F>))
        .route("/export", post(export::<F>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PutBody {
    doc: Deck,
    rev: Revision,
}

async fn get_deck<F: ImageFetcher>(
    State(state): State<AppState<F>>,
    Path(id): Path<String>,
) -> Response {
    // Storage does blocking file I/O; keep it off the async workers
    let storage = state.storage.clone();
    let deck_id = id.clone();
    let result = tokio::task::spawn_blocking(move || storage.get(&deck_id)).await;

    match result {
        Ok(Ok(record)) => Json(record).into_response(),
        Ok(Err(err)) => {
            warn!(deck_id = %id, error = %err, "get failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
        Err(err) => {
            warn!(deck_id = %id, error = %err, "get task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn put_deck<F: ImageFetcher>(
    State(state): State<AppState<F>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: PutBody = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(err) => {
            return (StatusCode::BAD_REQUEST, format!("Malformed body: {err}")).into_response();
        }
    };
    if let Err(err) = validate_deck(&body.doc) {
        return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
    }

    let holder = headers
        .get(HOLDER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let storage = state.storage.clone();
    let deck_id = id.clone();
    let result = tokio::task::spawn_blocking(move || {
        storage.put(&deck_id, body.doc, body.rev, holder.as_deref())
    })
    .await;

    match result {
        Ok(Ok(record)) => Json(record).into_response(),
        Ok(Err(PersistError::Conflict { caller, stored })) => {
            warn!(deck_id = %id, caller, stored, "revision conflict");
            (StatusCode::CONFLICT, "Revision conflict".to_string()).into_response()
        }
        Ok(Err(err @ PersistError::LeaseHeld { .. })) => {
            (StatusCode::LOCKED, err.to_string()).into_response()
        }
        Ok(Err(err)) => {
            warn!(deck_id = %id, error = %err, "put failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
        Err(err) => {
            warn!(deck_id = %id, error = %err, "put task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn export<F: ImageFetcher>(State(state): State<AppState<F>>, body: Bytes) -> Response {
    let deck: Deck = match serde_json::from_slice(&body) {
        Ok(deck) => deck,
        Err(err) => {
            return (StatusCode::BAD_REQUEST, format!("Malformed body: {err}")).into_response();
        }
    };

    match export_deck(&deck, state.fetcher.as_ref()).await {
        Ok(bytes) => (
            [
                (
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                ),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"deck.pptx\"",
                ),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(err @ ExportError::EmptyDeck) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => {
            warn!(error = %err, "export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
