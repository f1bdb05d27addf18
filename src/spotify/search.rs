use crate::{
    error::SpotifyError,
    types::{SearchKind, SearchResponse},
};

use super::{SpotifyClient, read_json};

impl SpotifyClient {
    /// Searches the catalog (`GET /search`).
    ///
    /// Only the page for `kind` is requested; with `limit = 1` the response
    /// carries at most the single best match.
    ///
    /// # Arguments
    ///
    /// * `query` - Free text search, sent as `q` and URL-encoded by reqwest
    /// * `kind` - Item type to search for
    /// * `limit` - Maximum number of items in the returned page
    ///
    /// # Returns
    ///
    /// The search response. An empty result is not an error; check
    /// [`SearchResponse::first_track`](crate::types::SearchResponse::first_track).
    pub async fn search_catalog(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, SpotifyError> {
        let token = self.access_token().await?;
        let limit = limit.to_string();
        let response = self
            .http
            .get(self.url("/search"))
            .query(&[("q", query), ("type", kind.as_str()), ("limit", limit.as_str())])
            .bearer_auth(token)
            .send()
            .await?;

        read_json(response).await
    }
}
