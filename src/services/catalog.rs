use async_trait::async_trait;

use crate::clients::{AnilistClient, ClientError};
use crate::models::{AnimeListParams, Media, Page};

/// Read access to the anime catalog.
///
/// The browse state machine only depends on this trait, so it can be driven
/// by the real client or by a scripted catalog in tests.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Fetches one page of the list query.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport, throttling or payload failures.
    async fn get_anime_list(&self, params: &AnimeListParams) -> Result<Page, ClientError>;

    /// Fetches one record by id, bypassing any list state.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport, throttling or payload failures.
    async fn get_anime_details(&self, id: i32) -> Result<Media, ClientError>;
}

#[async_trait]
impl MediaCatalog for AnilistClient {
    async fn get_anime_list(&self, params: &AnimeListParams) -> Result<Page, ClientError> {
        Self::get_anime_list(self, params).await
    }

    async fn get_anime_details(&self, id: i32) -> Result<Media, ClientError> {
        Self::get_anime_details(self, id).await
    }
}
