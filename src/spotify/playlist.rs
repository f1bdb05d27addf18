use crate::{
    error::SpotifyError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
};

use super::{SpotifyClient, read_json};

impl SpotifyClient {
    /// Creates a public, non-collaborative playlist with an empty description
    /// for `user_id`.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Spotify user id of the playlist owner, normally the id
    ///   returned by [`SpotifyClient::me`]
    /// * `name` - Playlist name, sent as given
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] when Spotify refuses the request, for
    /// example 403 when the token lacks the playlist scopes.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.url(&format!("/users/{}/playlists", user_id)))
            .bearer_auth(token)
            .json(&CreatePlaylistRequest::new(name))
            .send()
            .await?;

        read_json(response).await
    }

    /// Appends `uris` to the end of the playlist.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Id of a playlist the user may modify
    /// * `uris` - Track URIs such as `spotify:track:4u7EnebtmKWzUH433cf5Qv`
    ///
    /// # Returns
    ///
    /// The playlist's new snapshot id.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        let token = self.access_token().await?;
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let response = self
            .http
            .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        read_json(response).await
    }
}
