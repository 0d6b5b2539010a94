//! Shared handler state

use std::sync::Arc;

use persistence::DeckStorage;
use pptx_export::ImageFetcher;

/// State shared by every handler: the storage backend behind the deck
/// routes and the fetcher used for export-time image downloads. Generic
/// over the fetcher so tests export without a network.
pub struct AppState<F: ImageFetcher> {
    pub storage: Arc<dyn DeckStorage>,
    pub fetcher: Arc<F>,
}

impl<F: ImageFetcher> AppState<F> {
    pub fn new(storage: Arc<dyn DeckStorage>, fetcher: F) -> Self {
        Self {
            storage,
            fetcher: Arc::new(fetcher),
        }
    }
}

impl<F: ImageFetcher> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}
